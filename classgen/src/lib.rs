//! # classgen
//!
//! Generates lesson plans for a creative-software class. Pick an application and a
//! difficulty, and classgen samples three documentation links from a JSON resource
//! catalog, builds a lesson prompt, and makes one call to a text-generation API.
//! Results are memoized per session on (application, difficulty, request token).
//!
//! ## Main modules
//!
//! - [`catalog`]: [`ResourceCatalog`], [`CatalogSource`] ([`JsonFileCatalog`], [`StaticCatalog`]).
//! - [`difficulty`]: [`Difficulty`] scale.
//! - [`prompt`]: [`PromptTemplate`]; YAML loading with an embedded default.
//! - [`llm`]: [`LlmClient`] trait, [`ChatOpenAI`], [`MockLlm`], [`GenerationParams`].
//! - [`requester`]: [`PlanRequester`], one completion call per request, no caching.
//! - [`session`]: [`PlanSession`], memoized generation with a session-owned cache.
//! - [`cache`]: [`Cache`], [`InMemoryCache`].
//! - [`profile`]: [`CreatorProfile`], the offered applications and levels plus settings.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use classgen::{
//!     ChatOpenAI, CreatorProfile, JsonFileCatalog, PlanRequester, PlanSession, PromptTemplate,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profile = CreatorProfile::default();
//! let requester = PlanRequester::new(
//!     Arc::new(JsonFileCatalog::new(&profile.catalog)),
//!     Arc::new(ChatOpenAI::from_params(&profile.generation)),
//!     PromptTemplate::embedded()?,
//! );
//! let session = PlanSession::new(Arc::new(requester));
//! let plan = session.generate(&profile.request("Blender", "beginner")?).await?;
//! println!("{}", plan.markdown);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod difficulty;
pub mod error;
pub mod llm;
pub mod message;
pub mod plan;
pub mod profile;
pub mod prompt;
pub mod requester;
pub mod session;

pub use cache::{Cache, CacheError, InMemoryCache};
pub use catalog::{
    CatalogError, CatalogGap, CatalogSource, JsonFileCatalog, ResourceCatalog, StaticCatalog,
};
pub use difficulty::Difficulty;
pub use error::PlanError;
pub use llm::{ChatOpenAI, GenerationParams, LlmClient, LlmError, LlmResponse, LlmUsage, MockLlm};
pub use message::Message;
pub use plan::{extract_title, GeneratedPlan, PlanKey, PlanRequest, RequestToken};
pub use profile::{ApplicationEntry, CreatorProfile, ProfileError};
pub use prompt::{PromptError, PromptTemplate};
pub use requester::{BuiltPrompt, PlanRequester, RESOURCE_LINKS_PER_PLAN};
pub use session::PlanSession;
