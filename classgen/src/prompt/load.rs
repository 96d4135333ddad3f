//! Load the lesson prompt from a directory of YAML files.
//!
//! **Canonical source**: the default text lives in `classgen/prompts/lesson_plan.yaml`
//! and is embedded at compile time. A directory (argument, `PROMPTS_DIR` env, or
//! `./prompts`) containing `lesson_plan.yaml` replaces it.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{PromptError, PromptTemplate};

const EMBED_LESSON_PLAN: &str = include_str!("../../prompts/lesson_plan.yaml");

/// File name of the lesson prompt inside a prompts directory.
pub const LESSON_PROMPT_FILE: &str = "lesson_plan.yaml";

/// Default directory name when `PROMPTS_DIR` is not set.
const DEFAULT_PROMPTS_DIR: &str = "prompts";

#[derive(Debug, Default, Deserialize)]
struct LessonPromptFile {
    #[serde(default)]
    template: Option<String>,
}

/// Returns the directory to load prompts from: `dir` if `Some`, else `PROMPTS_DIR` env, else `./prompts`.
fn prompts_dir(dir: Option<&Path>) -> PathBuf {
    dir.map(Path::to_path_buf).unwrap_or_else(|| {
        std::env::var("PROMPTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROMPTS_DIR))
    })
}

fn parse(content: &str, origin: &str) -> Result<PromptTemplate, PromptError> {
    let file: LessonPromptFile =
        serde_yaml::from_str(content).map_err(|e| PromptError::ParseYaml {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
    let text = file
        .template
        .ok_or_else(|| PromptError::MissingTemplate(origin.to_string()))?;
    PromptTemplate::new(text)
}

pub(super) fn embedded() -> Result<PromptTemplate, PromptError> {
    parse(EMBED_LESSON_PLAN, "embedded lesson_plan.yaml")
}

/// Loads the template from a prompts directory.
///
/// Returns [`PromptError::DirNotFound`] when the directory is missing. A directory
/// without `lesson_plan.yaml` yields the embedded template; a present file must
/// parse and validate.
pub fn load(dir: Option<&Path>) -> Result<PromptTemplate, PromptError> {
    let base = prompts_dir(dir);
    if !base.is_dir() {
        return Err(PromptError::DirNotFound(base.display().to_string()));
    }
    let path = base.join(LESSON_PROMPT_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return embedded(),
        Err(e) => {
            return Err(PromptError::ReadFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };
    parse(&content, &path.display().to_string())
}

/// Like [`load`], but a missing directory falls back to the embedded template.
pub fn load_or_default(dir: Option<&Path>) -> Result<PromptTemplate, PromptError> {
    match load(dir) {
        Err(PromptError::DirNotFound(_)) => embedded(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM: &str = "template: \"{difficulty} {application}: 45-60 minute, no time estimates, {resources}\"\n";

    #[test]
    fn embedded_template_is_valid() {
        let t = embedded().unwrap();
        assert!(t.text().contains("{previous_classes}"));
    }

    #[test]
    fn load_nonexistent_dir_returns_error() {
        let result = load(Some(Path::new("/nonexistent_prompts_dir_12345")));
        assert!(matches!(result, Err(PromptError::DirNotFound(_))));
    }

    #[test]
    fn load_or_default_nonexistent_returns_embedded() {
        let t = load_or_default(Some(Path::new("/nonexistent_prompts_dir_12345"))).unwrap();
        assert_eq!(t, embedded().unwrap());
    }

    #[test]
    fn load_dir_without_file_returns_embedded() {
        let temp = tempfile::TempDir::new().unwrap();
        let t = load(Some(temp.path())).unwrap();
        assert_eq!(t, embedded().unwrap());
    }

    #[test]
    fn load_from_dir_with_lesson_yaml() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join(LESSON_PROMPT_FILE), CUSTOM).unwrap();
        let t = load(Some(temp.path())).unwrap();
        assert!(t.text().starts_with("{difficulty} {application}"));
    }

    #[test]
    fn load_invalid_yaml_returns_parse_error() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join(LESSON_PROMPT_FILE), "template: [not closed").unwrap();
        let err = load(Some(temp.path())).unwrap_err();
        assert!(matches!(err, PromptError::ParseYaml { .. }));
    }

    #[test]
    fn load_file_without_template_key_is_error() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join(LESSON_PROMPT_FILE), "other: 1\n").unwrap();
        let err = load(Some(temp.path())).unwrap_err();
        assert!(matches!(err, PromptError::MissingTemplate(_)));
    }

    #[test]
    fn load_template_missing_constraint_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(LESSON_PROMPT_FILE),
            "template: \"{difficulty} {application} {resources}\"\n",
        )
        .unwrap();
        let err = load(Some(temp.path())).unwrap_err();
        assert!(matches!(err, PromptError::MissingRequirement(_)));
    }
}
