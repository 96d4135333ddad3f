//! Output formatting for plans, application reports, and difficulty levels.

use std::path::Path;

use classgen::{Difficulty, GeneratedPlan};
use serde::Serialize;

use crate::context::AppReport;

/// JSON shape printed by `generate --json`.
#[derive(Debug, Serialize)]
pub struct PlanOutput<'a> {
    pub application: &'a str,
    pub difficulty: Difficulty,
    pub token: u64,
    pub title: Option<&'a str>,
    pub logo: Option<&'a Path>,
    pub markdown: &'a str,
}

impl<'a> PlanOutput<'a> {
    pub fn new(plan: &'a GeneratedPlan, logo: Option<&'a Path>) -> Self {
        Self {
            application: &plan.application,
            difficulty: plan.difficulty,
            token: plan.token.value(),
            title: plan.title.as_deref(),
            logo,
            markdown: &plan.markdown,
        }
    }
}

pub fn plan_json(plan: &GeneratedPlan, logo: Option<&Path>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PlanOutput::new(plan, logo))
}

/// Plain text: logo line (when known), then the markdown.
pub fn plan_text(plan: &GeneratedPlan, logo: Option<&Path>) -> String {
    match logo {
        Some(path) => format!("[{}]\n\n{}", path.display(), plan.markdown),
        None => plan.markdown.clone(),
    }
}

/// One line per application: name, link count, and a marker for unserved entries.
pub fn apps_text(report: &[AppReport]) -> String {
    let width = report.iter().map(|r| r.name.len()).max().unwrap_or(0);
    report
        .iter()
        .map(|r| {
            let status = if r.ready {
                String::new()
            } else {
                "  (not enough catalog links)".to_string()
            };
            format!("{:<width$}  {} link(s){}", r.name, r.links, status, width = width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn levels_text(levels: &[Difficulty]) -> String {
    levels
        .iter()
        .map(Difficulty::label)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use classgen::RequestToken;
    use std::path::PathBuf;

    fn plan() -> GeneratedPlan {
        GeneratedPlan {
            application: "Godot".to_string(),
            difficulty: Difficulty::Intermediate,
            token: RequestToken::from(17),
            title: Some("Tilemaps".to_string()),
            markdown: "# Tilemaps\n\n## Outline".to_string(),
            cached: false,
        }
    }

    #[test]
    fn json_has_expected_fields() {
        let logo = PathBuf::from("images/godot.png");
        let out = plan_json(&plan(), Some(&logo)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["application"], "Godot");
        assert_eq!(v["difficulty"], "Intermediate");
        assert_eq!(v["token"], 17);
        assert_eq!(v["title"], "Tilemaps");
        assert_eq!(v["logo"], "images/godot.png");
        assert!(v["markdown"].as_str().unwrap().starts_with("# Tilemaps"));
    }

    #[test]
    fn text_starts_with_logo_when_known() {
        let logo = PathBuf::from("images/godot.png");
        assert!(plan_text(&plan(), Some(&logo)).starts_with("[images/godot.png]"));
        assert_eq!(plan_text(&plan(), None), plan().markdown);
    }

    #[test]
    fn apps_text_marks_unserved() {
        let report = vec![
            AppReport {
                name: "Blender".to_string(),
                logo: None,
                links: 5,
                ready: true,
            },
            AppReport {
                name: "Krita".to_string(),
                logo: None,
                links: 2,
                ready: false,
            },
        ];
        let out = apps_text(&report);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Blender  5 link(s)"));
        assert!(lines[1].ends_with("(not enough catalog links)"));
    }

    #[test]
    fn levels_are_one_per_line() {
        assert_eq!(
            levels_text(&Difficulty::DEFAULT_OFFERED),
            "Beginner\nIntermediate\nExpert"
        );
    }
}
