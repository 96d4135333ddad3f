//! Lesson-plan prompt template.
//!
//! The default text lives in `classgen/prompts/lesson_plan.yaml` and is embedded at
//! compile time; a prompts directory can replace it (see [`load`]). Any template is
//! validated on construction so the placeholders and the fixed class constraints
//! cannot be lost.

mod load;

pub use load::{load, load_or_default, LESSON_PROMPT_FILE};

use thiserror::Error;

use crate::difficulty::Difficulty;

/// Placeholder for the application name.
pub const APPLICATION_PLACEHOLDER: &str = "{application}";
/// Placeholder for the difficulty label.
pub const DIFFICULTY_PLACEHOLDER: &str = "{difficulty}";
/// Placeholder for the sampled documentation links.
pub const RESOURCES_PLACEHOLDER: &str = "{resources}";
/// Optional placeholder for the session's previously suggested classes.
pub const PREVIOUS_CLASSES_PLACEHOLDER: &str = "{previous_classes}";

/// Class length constraint every prompt must state.
pub const DURATION_CONSTRAINT: &str = "45-60 minute";
/// Instruction every prompt must carry.
pub const NO_TIME_ESTIMATES: &str = "no time estimates";

const REQUIRED_PLACEHOLDERS: [&str; 3] = [
    APPLICATION_PLACEHOLDER,
    DIFFICULTY_PLACEHOLDER,
    RESOURCES_PLACEHOLDER,
];
const REQUIRED_PHRASES: [&str; 2] = [DURATION_CONSTRAINT, NO_TIME_ESTIMATES];

/// Errors loading or validating a prompt template.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompts directory not found or not readable: {0}")]
    DirNotFound(String),
    #[error("failed to read prompt file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
    #[error("prompt file {0} has no template")]
    MissingTemplate(String),
    #[error("template must contain {0:?}")]
    MissingRequirement(String),
}

/// Validated lesson-plan prompt template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Validates `text` as a template.
    pub fn new(text: impl Into<String>) -> Result<Self, PromptError> {
        let text = text.into();
        for required in REQUIRED_PLACEHOLDERS.iter().chain(REQUIRED_PHRASES.iter()) {
            if !text.contains(required) {
                return Err(PromptError::MissingRequirement(required.to_string()));
            }
        }
        Ok(Self { text })
    }

    /// The template shipped with the crate.
    pub fn embedded() -> Result<Self, PromptError> {
        load::embedded()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fills the placeholders in one pass, so values containing placeholder-like
    /// text are inserted verbatim.
    ///
    /// `previous_titles` are classes already suggested in this session. When the
    /// template has no `{previous_classes}` placeholder they are appended at the end.
    pub fn render(
        &self,
        application: &str,
        difficulty: Difficulty,
        links: &[String],
        previous_titles: &[String],
    ) -> String {
        let resources = links.join(", ");
        let previous = previous_classes_section(previous_titles);
        let mut out = String::with_capacity(self.text.len() + resources.len() + previous.len());
        let mut previous_used = false;
        let mut rest = self.text.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let (value, consumed) = if tail.starts_with(APPLICATION_PLACEHOLDER) {
                (application, APPLICATION_PLACEHOLDER.len())
            } else if tail.starts_with(DIFFICULTY_PLACEHOLDER) {
                (difficulty.label(), DIFFICULTY_PLACEHOLDER.len())
            } else if tail.starts_with(RESOURCES_PLACEHOLDER) {
                (resources.as_str(), RESOURCES_PLACEHOLDER.len())
            } else if tail.starts_with(PREVIOUS_CLASSES_PLACEHOLDER) {
                previous_used = true;
                (previous.as_str(), PREVIOUS_CLASSES_PLACEHOLDER.len())
            } else {
                ("{", 1)
            };
            out.push_str(value);
            rest = &tail[consumed..];
        }
        out.push_str(rest);

        if !previous_used && !previous.is_empty() {
            out.push_str(&previous);
        }
        out
    }
}

fn previous_classes_section(previous_titles: &[String]) -> String {
    if previous_titles.is_empty() {
        return String::new();
    }
    format!(
        "\n\nClasses already suggested in this session (do not repeat any of them): {}.",
        previous_titles.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> Vec<String> {
        vec![
            "https://docs.blender.org/a".to_string(),
            "https://docs.blender.org/b".to_string(),
            "https://docs.blender.org/c".to_string(),
        ]
    }

    #[test]
    fn embedded_template_renders_all_required_parts() {
        let t = PromptTemplate::embedded().unwrap();
        let p = t.render("Blender", Difficulty::Beginner, &links(), &[]);
        assert!(p.contains("Blender"));
        assert!(p.contains("Beginner-level"));
        assert!(p.contains(DURATION_CONSTRAINT));
        assert!(p.contains(NO_TIME_ESTIMATES));
        for l in links() {
            assert!(p.contains(&l), "missing {} in {}", l, p);
        }
        assert!(!p.contains('{'), "unfilled placeholder in {}", p);
        assert!(!p.contains("already suggested"));
    }

    #[test]
    fn new_rejects_template_without_duration_constraint() {
        let err = PromptTemplate::new(
            "A {difficulty} class on {application} with {resources}; no time estimates.",
        )
        .unwrap_err();
        assert!(matches!(err, PromptError::MissingRequirement(r) if r == DURATION_CONSTRAINT));
    }

    #[test]
    fn new_rejects_template_without_resources_placeholder() {
        let err = PromptTemplate::new(
            "A {difficulty} class on {application}, 45-60 minute, no time estimates.",
        )
        .unwrap_err();
        assert!(matches!(err, PromptError::MissingRequirement(r) if r == RESOURCES_PLACEHOLDER));
    }

    #[test]
    fn previous_titles_fill_placeholder() {
        let t = PromptTemplate::new(
            "{difficulty} {application} 45-60 minute no time estimates {resources}.{previous_classes}",
        )
        .unwrap();
        let p = t.render(
            "Godot",
            Difficulty::Expert,
            &links(),
            &["Shader Magic".to_string(), "Tilemap Tales".to_string()],
        );
        assert!(p.ends_with("(do not repeat any of them): Shader Magic; Tilemap Tales."));
    }

    #[test]
    fn previous_titles_are_appended_without_placeholder() {
        let t = PromptTemplate::new(
            "{difficulty} {application} 45-60 minute no time estimates {resources}.",
        )
        .unwrap();
        let p = t.render("Godot", Difficulty::Expert, &links(), &["Shader Magic".to_string()]);
        assert!(p.contains("Shader Magic"));
        assert!(p.starts_with("Expert Godot"));
    }

    #[test]
    fn values_are_inserted_verbatim() {
        let t = PromptTemplate::new(
            "{application}|{difficulty}|{resources}|45-60 minute|no time estimates|{other}",
        )
        .unwrap();
        let p = t.render("App {difficulty}", Difficulty::Advanced, &links(), &[]);
        assert!(p.starts_with("App {difficulty}|Advanced|"));
        assert!(p.ends_with("|{other}"));
    }
}
