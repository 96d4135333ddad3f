//! Builds the runtime context for one CLI invocation: profile, requester, session.
//!
//! Profile source precedence: `--profile` (or `CLASSGEN_PROFILE`) > XDG `[profile]`
//! table > built-in defaults. Flag overrides (`--catalog`, `--prompts-dir`,
//! `--model`) are applied on top and the result is validated again.

use std::path::PathBuf;
use std::sync::Arc;

use classgen::{
    CacheError, CatalogError, CatalogGap, CatalogSource, ChatOpenAI, CreatorProfile,
    JsonFileCatalog, LlmClient, LlmError, PlanError, PlanRequest, PlanRequester, PlanSession,
    ProfileError, PromptError, RESOURCE_LINKS_PER_PLAN,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Application name for XDG config lookup (`~/.config/classgen/config.toml`).
pub const APP_NAME: &str = "classgen";

/// Printed before every generation call.
pub const WAIT_NOTICE: &str = "Building your class - hang tight! This can take up to 30 seconds...";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("profile: {0}")]
    Profile(#[from] ProfileError),
    #[error("config: {0}")]
    Config(#[from] classgen_config::LoadError),
    #[error("prompt template: {0}")]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
    #[error("cache: {0}")]
    Cache(#[from] CacheError),
    #[error("completion client: {0}")]
    Llm(#[from] LlmError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Line shown to the user on stderr.
    pub fn user_message(&self) -> String {
        match self {
            Self::Plan(e) => e.user_message(),
            Self::Catalog(_) => {
                "Catalog unavailable: the documentation resources could not be loaded.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Global options that shape the context (clap fills these from flags and env).
#[derive(Clone, Debug, Default)]
pub struct ContextOptions {
    pub profile: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub prompts_dir: Option<PathBuf>,
    pub model: Option<String>,
    pub seed: Option<u64>,
}

/// Resolves the Creator Profile. `xdg_profile` is the `[profile]` table of the user
/// config, if any; it is ignored when a profile file is given.
pub fn resolve_profile(
    opts: &ContextOptions,
    xdg_profile: Option<toml::Table>,
) -> Result<CreatorProfile, CliError> {
    let mut profile = match (&opts.profile, xdg_profile) {
        (Some(path), _) => {
            debug!(path = %path.display(), "loading profile file");
            CreatorProfile::load(path)?
        }
        (None, Some(table)) => {
            debug!("using [profile] from user config");
            CreatorProfile::from_table(table)?
        }
        (None, None) => CreatorProfile::default(),
    };

    if let Some(catalog) = &opts.catalog {
        profile.catalog = catalog.clone();
    }
    if let Some(dir) = &opts.prompts_dir {
        profile.prompts_dir = Some(dir.clone());
    }
    if let Some(model) = &opts.model {
        profile.generation.model = model.clone();
    }
    profile.validate()?;
    Ok(profile)
}

/// Offered application with its catalog coverage.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AppReport {
    pub name: String,
    pub logo: Option<PathBuf>,
    pub links: usize,
    pub ready: bool,
}

/// Profile plus the plan requester wired to the profile's catalog and template.
pub struct Creator {
    profile: CreatorProfile,
    catalog: Arc<JsonFileCatalog>,
    requester: Arc<PlanRequester>,
}

impl Creator {
    /// Wires the requester with an explicit completion client (tests pass a mock).
    pub fn build(
        profile: CreatorProfile,
        llm: Arc<dyn LlmClient>,
        seed: Option<u64>,
    ) -> Result<Self, CliError> {
        let template = match profile.prompts_dir.as_deref() {
            Some(dir) => classgen::prompt::load(Some(dir))?,
            None => classgen::prompt::load_or_default(None)?,
        };
        let catalog = Arc::new(JsonFileCatalog::new(&profile.catalog));
        let mut requester = PlanRequester::new(catalog.clone(), llm, template);
        if let Some(seed) = seed {
            requester = requester.with_seed(seed);
        }
        Ok(Self {
            profile,
            catalog,
            requester: Arc::new(requester),
        })
    }

    /// Wires the requester with an OpenAI-compatible client configured from env.
    pub fn with_openai(profile: CreatorProfile, seed: Option<u64>) -> Result<Self, CliError> {
        let llm = ChatOpenAI::from_env(&profile.generation)?;
        Self::build(profile, Arc::new(llm), seed)
    }

    pub fn profile(&self) -> &CreatorProfile {
        &self.profile
    }

    pub fn requester(&self) -> &PlanRequester {
        &self.requester
    }

    /// Validates user input against the profile.
    pub fn request(&self, application: &str, difficulty: &str) -> Result<PlanRequest, PlanError> {
        self.profile.request(application, difficulty)
    }

    /// New session using the profile's cache capacity and TTL.
    pub fn session(&self) -> Result<PlanSession, CliError> {
        let session = match self.profile.cache_capacity {
            Some(capacity) => PlanSession::bounded(self.requester.clone(), capacity)?,
            None => PlanSession::new(self.requester.clone()),
        };
        Ok(session.with_ttl(self.profile.cache_ttl()))
    }

    /// Per-application catalog coverage. Logs every application that cannot be served.
    pub fn audit(&self) -> Result<Vec<AppReport>, CliError> {
        let catalog = self.catalog.load()?;
        let gaps: Vec<CatalogGap> =
            catalog.audit(self.profile.application_names(), RESOURCE_LINKS_PER_PLAN);
        for gap in &gaps {
            warn!(
                application = %gap.application,
                available = gap.available,
                required = RESOURCE_LINKS_PER_PLAN,
                "application cannot be served by catalog"
            );
        }
        Ok(self
            .profile
            .applications
            .iter()
            .map(|app| AppReport {
                name: app.name.clone(),
                logo: app.logo.clone(),
                links: catalog.distinct_links(&app.name).len(),
                ready: !gaps.iter().any(|g| g.application == app.name),
            })
            .collect())
    }
}
