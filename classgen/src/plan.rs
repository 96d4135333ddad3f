//! Plan request, request token, cache key, and generated plan types.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// What the user asked for: one application at one difficulty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanRequest {
    pub application: String,
    pub difficulty: Difficulty,
}

impl PlanRequest {
    /// Builds a request without checking it against a profile. Use
    /// [`CreatorProfile::request`](crate::profile::CreatorProfile::request) for
    /// validated input.
    pub fn new(application: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            application: application.into(),
            difficulty,
        }
    }
}

/// Opaque token distinguishing user-initiated requests that share an application
/// and difficulty.
///
/// Minted tokens are wall-clock microseconds, strictly increasing within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

static LAST_MINTED: AtomicU64 = AtomicU64::new(0);

impl RequestToken {
    /// Mints a token never handed out before in this process.
    pub fn mint() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        let mut prev = LAST_MINTED.load(Ordering::SeqCst);
        loop {
            let next = now.max(prev + 1);
            match LAST_MINTED.compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return Self(next),
                Err(actual) => prev = actual,
            }
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RequestToken {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestToken {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Cache key for a generated plan.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlanKey {
    pub application: String,
    pub difficulty: Difficulty,
    pub token: RequestToken,
}

impl PlanKey {
    pub fn new(request: &PlanRequest, token: RequestToken) -> Self {
        Self {
            application: request.application.clone(),
            difficulty: request.difficulty,
            token,
        }
    }
}

/// A lesson plan handed back to the front end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub application: String,
    pub difficulty: Difficulty,
    pub token: RequestToken,
    /// Class title taken from the markdown, when one is found.
    pub title: Option<String>,
    /// Trimmed markdown from the completion service.
    pub markdown: String,
    /// True when served from the session cache without a service call.
    pub cached: bool,
}

/// Title of a markdown plan: the first heading, else the first non-empty line.
///
/// Heading markers, emphasis markers, and a leading `Title:` label are stripped.
pub fn extract_title(markdown: &str) -> Option<String> {
    let mut lines = markdown.lines().map(str::trim).filter(|l| !l.is_empty());
    let first_heading = markdown
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with('#'));
    let line = first_heading.or_else(|| lines.next())?;

    let stripped = line.trim_start_matches('#').trim();
    let stripped = stripped
        .strip_prefix("Title:")
        .or_else(|| stripped.strip_prefix("title:"))
        .unwrap_or(stripped)
        .trim();
    let stripped = stripped.trim_matches(|c| c == '*' || c == '_').trim();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}
