//! Library side of the `classgen` binary: context building and output rendering.
//!
//! Kept separate from `main.rs` so integration tests can drive a full generation with a
//! mock completion client.

pub mod context;
pub mod render;

pub use context::{
    resolve_profile, AppReport, CliError, ContextOptions, Creator, APP_NAME, WAIT_NOTICE,
};
pub use render::{apps_text, levels_text, plan_json, plan_text, PlanOutput};
