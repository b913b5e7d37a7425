//! Slip source selection
//!
//! Builds the single [`SlipSource`] a deployment uses from configuration, so
//! the conversion pipeline never branches on backend.

use super::{
    BrowserSlipSource, DemoDataset, EndpointTemplates, FixedSlipSource, HeadlessChrome,
    PatternSlipSource, SlipSource,
};
use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Fixed,
    Browser,
    Pattern,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Fixed => "fixed",
            SourceKind::Browser => "browser",
            SourceKind::Pattern => "pattern",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" | "demo" => Ok(SourceKind::Fixed),
            "browser" | "scrape" => Ok(SourceKind::Browser),
            "pattern" | "http" => Ok(SourceKind::Pattern),
            other => Err(format!(
                "unknown slip source {:?} (expected fixed, browser or pattern)",
                other
            )),
        }
    }
}

/// Everything needed to construct any of the slip sources
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub dataset: Arc<DemoDataset>,
    pub http_timeout: Duration,
    pub render_timeout: Duration,
    pub max_concurrent_renders: usize,
    pub browser_bin: String,
    pub container_marker: String,
    pub lookup_urls: EndpointTemplates,
    pub share_urls: EndpointTemplates,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Fixed,
            dataset: Arc::new(DemoDataset::builtin()),
            http_timeout: Duration::from_secs(10),
            render_timeout: Duration::from_secs(30),
            max_concurrent_renders: 2,
            browser_bin: "chromium".to_string(),
            container_marker: "betslip".to_string(),
            lookup_urls: EndpointTemplates::default(),
            share_urls: EndpointTemplates::default(),
        }
    }
}

/// Construct the configured slip source
pub fn build_slip_source(config: &SourceConfig) -> Result<Arc<dyn SlipSource>> {
    let source: Arc<dyn SlipSource> = match config.kind {
        SourceKind::Fixed => Arc::new(FixedSlipSource::new(config.dataset.clone())),
        SourceKind::Browser => {
            let renderer = Arc::new(HeadlessChrome::new(
                &config.browser_bin,
                config.render_timeout,
            ));
            Arc::new(
                BrowserSlipSource::new(
                    renderer,
                    config.share_urls.clone(),
                    &config.container_marker,
                    config.max_concurrent_renders,
                    config.render_timeout,
                )
                .context("Invalid slip container marker")?,
            )
        }
        SourceKind::Pattern => Arc::new(
            PatternSlipSource::new(config.lookup_urls.clone(), config.http_timeout)
                .context("Failed to build HTTP client")?,
        ),
    };

    info!("Slip source initialized: {}", source.source_name());
    Ok(source)
}
