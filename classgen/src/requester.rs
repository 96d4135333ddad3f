//! Plan requester: catalog lookup, prompt construction, and one completion call.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::catalog::CatalogSource;
use crate::error::PlanError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::plan::PlanRequest;
use crate::prompt::PromptTemplate;

/// Documentation links placed in every plan's resources section.
pub const RESOURCE_LINKS_PER_PLAN: usize = 3;

/// A rendered prompt and the links sampled for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub text: String,
    pub links: Vec<String>,
}

/// Builds the lesson prompt and sends it to the completion service.
///
/// The catalog is loaded from its source on every call. Nothing is cached here;
/// memoization belongs to [`PlanSession`](crate::session::PlanSession).
pub struct PlanRequester {
    catalog: Arc<dyn CatalogSource>,
    llm: Arc<dyn LlmClient>,
    template: PromptTemplate,
    rng: Mutex<StdRng>,
}

impl PlanRequester {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        llm: Arc<dyn LlmClient>,
        template: PromptTemplate,
    ) -> Self {
        Self {
            catalog,
            llm,
            template,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Uses a fixed seed for link sampling (reproducible prompts).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Loads the catalog, samples three links, and renders the prompt.
    ///
    /// `previous_titles` are classes already suggested in the caller's session.
    pub fn build_prompt(
        &self,
        request: &PlanRequest,
        previous_titles: &[String],
    ) -> Result<BuiltPrompt, PlanError> {
        let catalog = self.catalog.load().map_err(|e| {
            warn!(source = %self.catalog.describe(), error = %e, "catalog load failed");
            e
        })?;
        let links = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            catalog.sample_links(&request.application, RESOURCE_LINKS_PER_PLAN, &mut *rng)?
        };
        let text = self.template.render(
            &request.application,
            request.difficulty,
            &links,
            previous_titles,
        );
        Ok(BuiltPrompt { text, links })
    }

    /// Builds the prompt, sends it, and returns the trimmed generated text.
    pub async fn request(
        &self,
        request: &PlanRequest,
        previous_titles: &[String],
    ) -> Result<String, PlanError> {
        let prompt = self.build_prompt(request, previous_titles)?;
        debug!(
            application = %request.application,
            difficulty = %request.difficulty,
            links = ?prompt.links,
            previous = previous_titles.len(),
            "requesting lesson plan"
        );
        let response = self.llm.invoke(&[Message::user(prompt.text)]).await?;
        let text = response.content.trim().to_string();
        debug!(
            application = %request.application,
            chars = text.len(),
            usage = ?response.usage,
            "lesson plan received"
        );
        Ok(text)
    }
}
