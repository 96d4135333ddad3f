//! Resource catalog: application name → documentation links.
//!
//! The catalog is a JSON object such as
//! `{ "Blender": ["https://docs.blender.org/...", ...] }`. It is read-only and is
//! loaded through a [`CatalogSource`] on every plan request, so edits to the file
//! are picked up without restarting.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PlanError;

/// Errors reading or parsing a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse catalog {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Application whose catalog entry cannot satisfy a sampling requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogGap {
    pub application: String,
    /// Distinct links available (0 when the application is missing).
    pub available: usize,
}

/// Static mapping from application name to its ordered documentation links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceCatalog {
    entries: BTreeMap<String, Vec<String>>,
}

impl ResourceCatalog {
    /// Builds a catalog from `(application, links)` pairs.
    pub fn from_entries<I, A, L, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, L)>,
        A: Into<String>,
        L: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(app, links)| (app.into(), links.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Parses catalog JSON. `origin` is only used in error messages.
    pub fn from_json_str(content: &str, origin: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(content).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Reads and parses a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Links for `application`, or an empty slice when it is not in the catalog.
    pub fn links_for(&self, application: &str) -> &[String] {
        self.entries
            .get(application)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Application names, sorted.
    pub fn applications(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Links for `application` with repeats removed, first occurrence kept.
    pub fn distinct_links(&self, application: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for link in self.links_for(application) {
            if !out.contains(&link.as_str()) {
                out.push(link);
            }
        }
        out
    }

    /// Picks `count` distinct links for `application`, uniformly at random.
    ///
    /// Fails with [`PlanError::InsufficientResources`] when fewer than `count`
    /// distinct links exist, including when the application is unknown.
    pub fn sample_links<R>(
        &self,
        application: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, PlanError>
    where
        R: Rng + ?Sized,
    {
        let distinct = self.distinct_links(application);
        if distinct.len() < count {
            return Err(PlanError::InsufficientResources {
                application: application.to_string(),
                available: distinct.len(),
                required: count,
            });
        }
        Ok(rand::seq::index::sample(rng, distinct.len(), count)
            .into_iter()
            .map(|i| distinct[i].to_string())
            .collect())
    }

    /// Offered applications whose entry has fewer than `required` distinct links.
    pub fn audit<'a, I>(&self, offered: I, required: usize) -> Vec<CatalogGap>
    where
        I: IntoIterator<Item = &'a str>,
    {
        offered
            .into_iter()
            .filter_map(|app| {
                let available = self.distinct_links(app).len();
                (available < required).then(|| CatalogGap {
                    application: app.to_string(),
                    available,
                })
            })
            .collect()
    }
}

/// Where a catalog comes from. Called once per plan request.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<ResourceCatalog, CatalogError>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// Catalog backed by a JSON file that is re-read on every [`CatalogSource::load`].
#[derive(Clone, Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonFileCatalog {
    fn load(&self) -> Result<ResourceCatalog, CatalogError> {
        ResourceCatalog::load(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Catalog held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    catalog: ResourceCatalog,
}

impl StaticCatalog {
    pub fn new(catalog: ResourceCatalog) -> Self {
        Self { catalog }
    }
}

impl CatalogSource for StaticCatalog {
    fn load(&self) -> Result<ResourceCatalog, CatalogError> {
        Ok(self.catalog.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory catalog ({} applications)", self.catalog.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn blender_catalog() -> ResourceCatalog {
        ResourceCatalog::from_entries([(
            "Blender",
            vec![
                "https://docs.blender.org/a",
                "https://docs.blender.org/b",
                "https://docs.blender.org/c",
                "https://docs.blender.org/d",
            ],
        )])
    }

    #[test]
    fn links_for_unknown_application_is_empty() {
        let catalog = blender_catalog();
        assert_eq!(catalog.links_for("Blender").len(), 4);
        assert!(catalog.links_for("Maya").is_empty());
    }

    #[test]
    fn sample_links_returns_three_distinct_members() {
        let catalog = blender_catalog();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let links = catalog.sample_links("Blender", 3, &mut rng).unwrap();
            assert_eq!(links.len(), 3);
            let mut unique = links.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 3, "duplicates in {:?}", links);
            for l in &links {
                assert!(catalog.links_for("Blender").contains(l));
            }
        }
    }

    #[test]
    fn sample_links_eventually_covers_every_link() {
        let catalog = blender_catalog();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.extend(catalog.sample_links("Blender", 3, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn sample_links_fails_for_unknown_application() {
        let catalog = blender_catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let err = catalog.sample_links("Maya", 3, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InsufficientResources { available: 0, required: 3, .. }
        ));
    }

    #[test]
    fn sample_links_counts_duplicates_once() {
        let catalog = ResourceCatalog::from_entries([(
            "Krita",
            vec!["https://k/a", "https://k/a", "https://k/b"],
        )]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = catalog.sample_links("Krita", 3, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InsufficientResources { available: 2, .. }
        ));
    }

    #[test]
    fn from_json_str_parses_object_of_arrays() {
        let catalog = ResourceCatalog::from_json_str(
            r#"{"Godot": ["https://docs.godotengine.org/1", "https://docs.godotengine.org/2"]}"#,
            "inline",
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.links_for("Godot")[1], "https://docs.godotengine.org/2");
    }

    #[test]
    fn from_json_str_rejects_wrong_shape() {
        let err = ResourceCatalog::from_json_str(r#"["not", "an", "object"]"#, "inline")
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let err = ResourceCatalog::load(Path::new("/nonexistent/classgen/resources.json"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn json_file_catalog_rereads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.json");
        std::fs::write(&path, r#"{"Unity": ["u1"]}"#).unwrap();
        let source = JsonFileCatalog::new(&path);
        assert_eq!(source.load().unwrap().links_for("Unity").len(), 1);

        std::fs::write(&path, r#"{"Unity": ["u1", "u2", "u3"]}"#).unwrap();
        assert_eq!(source.load().unwrap().links_for("Unity").len(), 3);
    }

    #[test]
    fn audit_reports_short_and_missing_entries() {
        let catalog = ResourceCatalog::from_entries([
            ("Blender", vec!["a", "b", "c"]),
            ("Krita", vec!["a", "b"]),
        ]);
        let gaps = catalog.audit(["Blender", "Krita", "Twinmotion"], 3);
        assert_eq!(
            gaps,
            vec![
                CatalogGap {
                    application: "Krita".to_string(),
                    available: 2
                },
                CatalogGap {
                    application: "Twinmotion".to_string(),
                    available: 0
                },
            ]
        );
    }
}
