//! Memoized plan generation for one user session.
//!
//! A [`PlanSession`] owns its cache. Two sessions never share results, and a
//! result is only reused for the exact (application, difficulty, token) key.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{Cache, CacheError, InMemoryCache};
use crate::error::PlanError;
use crate::plan::{extract_title, GeneratedPlan, PlanKey, PlanRequest, RequestToken};
use crate::requester::PlanRequester;

pub struct PlanSession {
    requester: Arc<PlanRequester>,
    cache: Box<dyn Cache<PlanKey, String>>,
    ttl: Option<Duration>,
    history: RwLock<Vec<String>>,
}

impl PlanSession {
    /// Session with an unbounded in-memory cache and no expiry.
    pub fn new(requester: Arc<PlanRequester>) -> Self {
        Self::with_cache(requester, Box::new(InMemoryCache::new()))
    }

    pub fn with_cache(
        requester: Arc<PlanRequester>,
        cache: Box<dyn Cache<PlanKey, String>>,
    ) -> Self {
        Self {
            requester,
            cache,
            ttl: None,
            history: RwLock::new(Vec::new()),
        }
    }

    /// Session cache bounded to `capacity` entries (oldest evicted first).
    pub fn bounded(requester: Arc<PlanRequester>, capacity: usize) -> Result<Self, CacheError> {
        Ok(Self::with_cache(
            requester,
            Box::new(InMemoryCache::with_capacity(capacity)?),
        ))
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn requester(&self) -> &PlanRequester {
        &self.requester
    }

    /// Returns the plan for `(request, token)`, calling the service only on a miss.
    ///
    /// Failures are returned as-is and never stored, so a retry with the same
    /// token calls the service again.
    pub async fn fetch(
        &self,
        request: &PlanRequest,
        token: RequestToken,
    ) -> Result<GeneratedPlan, PlanError> {
        let key = PlanKey::new(request, token);
        if let Some(markdown) = self.cache.get(&key).await {
            debug!(
                application = %request.application,
                difficulty = %request.difficulty,
                %token,
                "plan cache hit"
            );
            return Ok(self.plan(request, token, markdown, true));
        }

        let previous = self.history().await;
        let markdown = self.requester.request(request, &previous).await?;
        self.cache.set(key, markdown.clone(), self.ttl).await?;
        let plan = self.plan(request, token, markdown, false);
        if let Some(title) = &plan.title {
            let mut history = self.history.write().await;
            if !history.iter().any(|t| t == title) {
                history.push(title.clone());
            }
        }
        info!(
            application = %request.application,
            difficulty = %request.difficulty,
            %token,
            title = plan.title.as_deref().unwrap_or(""),
            "plan generated"
        );
        Ok(plan)
    }

    /// Mints a fresh token and fetches: always a new generation.
    pub async fn generate(&self, request: &PlanRequest) -> Result<GeneratedPlan, PlanError> {
        self.fetch(request, RequestToken::mint()).await
    }

    /// Titles generated so far in this session, oldest first, without repeats.
    pub async fn history(&self) -> Vec<String> {
        self.history.read().await.clone()
    }

    /// Number of plans currently held by the session cache.
    pub async fn cached_plans(&self) -> usize {
        self.cache.len().await
    }

    fn plan(
        &self,
        request: &PlanRequest,
        token: RequestToken,
        markdown: String,
        cached: bool,
    ) -> GeneratedPlan {
        GeneratedPlan {
            application: request.application.clone(),
            difficulty: request.difficulty,
            token,
            title: extract_title(&markdown),
            markdown,
            cached,
        }
    }
}
