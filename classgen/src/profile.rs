//! Creator profile: the one configurable description of what the tool offers.
//!
//! A profile lists the applications (with optional logo paths), the difficulty
//! levels, the generation settings, and where the catalog and prompts live. The
//! defaults reproduce the classic twelve-application, three-level setup; a TOML
//! file or table overrides any part of it.
//!
//! ```toml
//! catalog = "resources.json"
//! difficulties = ["Beginner", "Intermediate", "Advanced", "Expert"]
//! cache_capacity = 64
//!
//! [generation]
//! model = "gpt-4o-mini"
//! max_tokens = 1500
//!
//! [[applications]]
//! name = "Blender"
//! logo = "images/blender.png"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::difficulty::Difficulty;
use crate::error::PlanError;
use crate::llm::GenerationParams;
use crate::plan::PlanRequest;

/// Default catalog file name, relative to the profile's base directory.
pub const DEFAULT_CATALOG_FILE: &str = "resources.json";

const DEFAULT_APPLICATIONS: [(&str, &str); 12] = [
    ("Blender", "images/blender.png"),
    ("Unreal Engine", "images/unreal.png"),
    ("Microsoft Excel", "images/excel.png"),
    ("Roblox", "images/roblox.png"),
    ("Ableton Live", "images/ableton.png"),
    ("Godot", "images/godot.png"),
    ("BandLab", "images/bandlab.png"),
    ("Unity", "images/unity.png"),
    ("Construct 3", "images/construct.png"),
    ("Minecraft", "images/minecraft.png"),
    ("Krita", "images/krita.png"),
    ("Twinmotion", "images/twinmotion.png"),
];

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("read profile {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse profile: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid profile: {0}")]
    Invalid(String),
}

/// An application the user can pick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationEntry {
    pub name: String,
    #[serde(default)]
    pub logo: Option<PathBuf>,
}

/// Offered applications, levels, generation settings, and file locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreatorProfile {
    /// Catalog JSON path.
    pub catalog: PathBuf,
    /// Directory holding `lesson_plan.yaml`; embedded template when unset.
    pub prompts_dir: Option<PathBuf>,
    /// Offered difficulty levels, shown in ascending order.
    pub difficulties: Vec<Difficulty>,
    /// Maximum cached plans per session; unbounded when unset.
    pub cache_capacity: Option<usize>,
    /// Lifetime of a cached plan in seconds; no expiry when unset.
    pub cache_ttl_secs: Option<u64>,
    pub generation: GenerationParams,
    pub applications: Vec<ApplicationEntry>,
}

impl Default for CreatorProfile {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG_FILE),
            prompts_dir: None,
            difficulties: Difficulty::DEFAULT_OFFERED.to_vec(),
            cache_capacity: None,
            cache_ttl_secs: None,
            generation: GenerationParams::default(),
            applications: DEFAULT_APPLICATIONS
                .iter()
                .map(|(name, logo)| ApplicationEntry {
                    name: name.to_string(),
                    logo: Some(PathBuf::from(logo)),
                })
                .collect(),
        }
    }
}

impl CreatorProfile {
    /// Parses and validates a profile from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ProfileError> {
        let profile: Self = toml::from_str(content)?;
        profile.into_validated()
    }

    /// Parses and validates a profile from an already-parsed TOML table
    /// (e.g. the `[profile]` table of the user config).
    pub fn from_table(table: toml::Table) -> Result<Self, ProfileError> {
        let profile: Self = toml::Value::Table(table).try_into()?;
        profile.into_validated()
    }

    /// Reads a profile file. Relative `catalog`, `prompts_dir`, and logo paths are
    /// resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let profile = Self::from_toml_str(&content)?;
        Ok(match path.parent() {
            Some(base) if !base.as_os_str().is_empty() => profile.relative_to(base),
            _ => profile,
        })
    }

    /// Resolves relative paths against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |p: &Path| -> PathBuf {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        self.catalog = resolve(&self.catalog);
        self.prompts_dir = self.prompts_dir.as_deref().map(resolve);
        for app in &mut self.applications {
            app.logo = app.logo.as_deref().map(resolve);
        }
        self
    }

    fn into_validated(mut self) -> Result<Self, ProfileError> {
        self.validate()?;
        self.difficulties.sort();
        self.difficulties.dedup();
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.applications.is_empty() {
            return Err(ProfileError::Invalid(
                "at least one application is required".to_string(),
            ));
        }
        for (i, app) in self.applications.iter().enumerate() {
            if app.name.trim().is_empty() {
                return Err(ProfileError::Invalid(format!(
                    "application #{} has an empty name",
                    i + 1
                )));
            }
            let duplicate = self.applications[..i]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&app.name));
            if duplicate {
                return Err(ProfileError::Invalid(format!(
                    "application {} is listed twice",
                    app.name
                )));
            }
        }
        if self.difficulties.is_empty() {
            return Err(ProfileError::Invalid(
                "at least one difficulty is required".to_string(),
            ));
        }
        if self.cache_capacity == Some(0) {
            return Err(ProfileError::Invalid(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        self.generation.validate().map_err(ProfileError::Invalid)
    }

    /// Looks up an offered application, ignoring ASCII case.
    pub fn application(&self, name: &str) -> Option<&ApplicationEntry> {
        let name = name.trim();
        self.applications
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn application_names(&self) -> impl Iterator<Item = &str> {
        self.applications.iter().map(|a| a.name.as_str())
    }

    pub fn logo_for(&self, application: &str) -> Option<&Path> {
        self.application(application)?.logo.as_deref()
    }

    pub fn offers_difficulty(&self, difficulty: Difficulty) -> bool {
        self.difficulties.contains(&difficulty)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Validates user input and returns a request using the canonical application name.
    pub fn request(&self, application: &str, difficulty: &str) -> Result<PlanRequest, PlanError> {
        let app = self
            .application(application)
            .ok_or_else(|| PlanError::UnknownApplication(application.trim().to_string()))?;
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|_| PlanError::UnknownDifficulty(difficulty.trim().to_string()))?;
        if !self.offers_difficulty(difficulty) {
            return Err(PlanError::UnsupportedDifficulty(difficulty));
        }
        Ok(PlanRequest::new(app.name.clone(), difficulty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_offers_classic_setup() {
        let p = CreatorProfile::default();
        assert_eq!(p.applications.len(), 12);
        assert_eq!(
            p.difficulties,
            vec![
                Difficulty::Beginner,
                Difficulty::Intermediate,
                Difficulty::Expert
            ]
        );
        assert_eq!(p.catalog, PathBuf::from("resources.json"));
        assert_eq!(p.generation.max_tokens, 1800);
        assert_eq!(
            p.logo_for("unreal engine"),
            Some(Path::new("images/unreal.png"))
        );
        assert!(p.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let p = CreatorProfile::from_toml_str(
            r#"
difficulties = ["Expert", "beginner", "Advanced", "Intermediate"]

[generation]
max_tokens = 1500
"#,
        )
        .unwrap();
        assert_eq!(p.difficulties, Difficulty::ALL.to_vec());
        assert_eq!(p.generation.max_tokens, 1500);
        assert_eq!(p.generation.model, GenerationParams::DEFAULT_MODEL);
        assert_eq!(p.applications.len(), 12);
    }

    #[test]
    fn applications_replace_default_list() {
        let p = CreatorProfile::from_toml_str(
            r#"
[[applications]]
name = "Blender"

[[applications]]
name = "Fusion 360"
logo = "assets/fusion.png"
"#,
        )
        .unwrap();
        assert_eq!(
            p.application_names().collect::<Vec<_>>(),
            vec!["Blender", "Fusion 360"]
        );
        assert_eq!(p.logo_for("Blender"), None);
    }

    #[test]
    fn duplicate_application_is_invalid() {
        let err = CreatorProfile::from_toml_str(
            r#"
[[applications]]
name = "Unity"

[[applications]]
name = "unity"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(m) if m.contains("twice")));
    }

    #[test]
    fn unknown_key_is_parse_error() {
        let err = CreatorProfile::from_toml_str("colour = \"blue\"\n").unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }

    #[test]
    fn bad_temperature_is_invalid() {
        let err = CreatorProfile::from_toml_str("[generation]\ntemperature = 3.0\n").unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(m) if m.contains("temperature")));
    }

    #[test]
    fn empty_difficulties_is_invalid() {
        let err = CreatorProfile::from_toml_str("difficulties = []\n").unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }

    #[test]
    fn from_table_reads_profile_section() {
        let table: toml::Table = toml::from_str("catalog = \"/srv/resources.json\"\n").unwrap();
        let p = CreatorProfile::from_table(table).unwrap();
        assert_eq!(p.catalog, PathBuf::from("/srv/resources.json"));
    }

    #[test]
    fn load_resolves_paths_against_profile_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(
            &path,
            "catalog = \"data/resources.json\"\nprompts_dir = \"/abs/prompts\"\n",
        )
        .unwrap();
        let p = CreatorProfile::load(&path).unwrap();
        assert_eq!(p.catalog, dir.path().join("data/resources.json"));
        assert_eq!(p.prompts_dir, Some(PathBuf::from("/abs/prompts")));
        assert_eq!(
            p.logo_for("Blender"),
            Some(dir.path().join("images/blender.png").as_path())
        );
    }

    #[test]
    fn request_uses_canonical_name() {
        let p = CreatorProfile::default();
        let req = p.request("  microsoft excel ", "beginner").unwrap();
        assert_eq!(req.application, "Microsoft Excel");
        assert_eq!(req.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn request_rejects_unknown_application() {
        let p = CreatorProfile::default();
        let err = p.request("Photoshop", "Beginner").unwrap_err();
        assert!(matches!(err, PlanError::UnknownApplication(a) if a == "Photoshop"));
    }

    #[test]
    fn request_rejects_level_not_offered() {
        let p = CreatorProfile::default();
        let err = p.request("Blender", "Advanced").unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedDifficulty(Difficulty::Advanced)));
    }

    #[test]
    fn request_rejects_unparseable_level() {
        let p = CreatorProfile::default();
        let err = p.request("Blender", "wizard").unwrap_err();
        assert!(matches!(err, PlanError::UnknownDifficulty(l) if l == "wizard"));
    }
}
