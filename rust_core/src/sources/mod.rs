//! Slip source abstractions
//!
//! Defines the SlipSource trait that lets the conversion pipeline resolve a
//! booking code without knowing where slips come from (a fixed demo dataset,
//! a headless-browser render of the share page, or a raw HTTP fetch with
//! pattern extraction).

use crate::models::{Platform, Slip};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub mod browser;
pub mod fixed;
pub mod html;
pub mod pattern;
pub mod registry;

pub use browser::{BrowserSlipSource, HeadlessChrome, PageRenderer};
pub use fixed::{DatasetError, DemoDataset, FixedSlipSource};
pub use pattern::PatternSlipSource;
pub use registry::{build_slip_source, SourceConfig, SourceKind};

/// Universal slip source trait
///
/// Every backend resolves to either a structurally valid slip or
/// [`NotFound`]. Transport, status, timeout and parse failures are logged by
/// the backend and never reach the caller.
#[async_trait]
pub trait SlipSource: Send + Sync {
    /// Resolve a booking code issued by `platform`
    async fn resolve(&self, platform: Platform, code: &str) -> Result<Slip, NotFound>;

    /// Whether this backend can resolve codes issued by `platform`
    fn supports(&self, _platform: Platform) -> bool {
        true
    }

    /// Source name for logging and debugging
    fn source_name(&self) -> &str;

    /// Message returned to clients when a code cannot be resolved
    fn miss_message(&self, platform: Platform, code: &str) -> String {
        format!("Could not find or fetch booking code {} on {}.", code, platform)
    }

    /// Message returned to clients on a successful conversion
    fn success_message(&self) -> &str {
        "Converted."
    }
}

/// The only failure a [`SlipSource`] reports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("booking code {code} not found on {platform}")]
pub struct NotFound {
    pub platform: Platform,
    pub code: String,
}

impl NotFound {
    pub fn new(platform: Platform, code: &str) -> Self {
        Self {
            platform,
            code: code.to_string(),
        }
    }
}

/// Backend-internal failure, collapsed to [`NotFound`] at the trait boundary
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no endpoint configured for {0}")]
    NoEndpoint(Platform),

    #[error("booking code contains unsupported characters")]
    InvalidCode,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("browser failed: {0}")]
    Browser(String),

    #[error("browser process error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no slip found in page")]
    NoMatches,
}

impl FetchError {
    /// Log the cause and collapse into the caller-facing outcome
    pub(crate) fn collapse(self, source: &str, platform: Platform, code: &str) -> NotFound {
        warn!(
            "{} could not resolve {} on {}: {}",
            source, code, platform, self
        );
        NotFound::new(platform, code)
    }
}

/// Per-platform URL templates containing a `{code}` placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointTemplates {
    pub sportybet: Option<String>,
    pub bet9ja: Option<String>,
}

impl EndpointTemplates {
    pub fn template(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Sportybet => self.sportybet.as_deref(),
            Platform::Bet9ja => self.bet9ja.as_deref(),
        }
    }

    pub fn has(&self, platform: Platform) -> bool {
        self.template(platform).is_some()
    }

    /// Fill the template for `platform`. Codes are restricted to
    /// `[A-Za-z0-9_-]` so they can be substituted without escaping.
    pub fn url_for(&self, platform: Platform, code: &str) -> Result<String, FetchError> {
        let template = self
            .template(platform)
            .ok_or(FetchError::NoEndpoint(platform))?;

        let valid = !code.is_empty()
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(FetchError::InvalidCode);
        }

        Ok(template.replace("{code}", code))
    }
}
