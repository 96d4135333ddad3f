//! Errors on the plan request path.
//!
//! Every failure propagates to the caller; nothing on this path is defaulted or
//! swallowed. [`PlanError::user_message`] gives the line a front end should show.

use thiserror::Error;

use crate::cache::CacheError;
use crate::catalog::CatalogError;
use crate::difficulty::Difficulty;
use crate::llm::LlmError;
use crate::prompt::PromptError;

/// Failure while building or requesting a lesson plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The resource catalog could not be read or parsed.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    /// The catalog has too few distinct links for the application.
    #[error(
        "cannot build resources section for {application}: {available} distinct link(s), {required} required"
    )]
    InsufficientResources {
        application: String,
        available: usize,
        required: usize,
    },

    /// The application is not one the profile offers.
    #[error("unknown application: {0}")]
    UnknownApplication(String),

    /// The difficulty label is not on the scale at all.
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// The difficulty is valid but not offered by the profile.
    #[error("difficulty not offered: {0}")]
    UnsupportedDifficulty(Difficulty),

    #[error("prompt template: {0}")]
    Prompt(#[from] PromptError),

    /// The completion service failed (transport, auth, quota, malformed response).
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("plan cache: {0}")]
    Cache(#[from] CacheError),
}

impl PlanError {
    /// Short text for the person using the tool.
    pub fn user_message(&self) -> String {
        match self {
            Self::CatalogUnavailable(_) => {
                "Catalog unavailable: the documentation resources could not be loaded.".to_string()
            }
            Self::InsufficientResources { application, .. } => format!(
                "Cannot build the resources section for {}: the catalog needs at least three links for it.",
                application
            ),
            Self::UnknownApplication(app) => {
                format!("{} is not one of the offered applications.", app)
            }
            Self::UnknownDifficulty(label) => {
                format!("{} is not a difficulty level.", label)
            }
            Self::UnsupportedDifficulty(d) => format!("{} is not an offered difficulty level.", d),
            Self::Prompt(e) => format!("The lesson prompt template is invalid: {}", e),
            Self::Generation(_) | Self::Cache(_) => {
                "Something went wrong while building your class. Please try again.".to_string()
            }
        }
    }
}
