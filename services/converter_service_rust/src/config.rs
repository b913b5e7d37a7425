//! Configuration for the converter service
//!
//! Everything is read from environment variables (a `.env` file is honoured
//! by `main`) with defaults that run the demo dataset locally.

use anyhow::{anyhow, Context, Result};
use slipbridge_rust_core::markets::MarketTable;
use slipbridge_rust_core::sources::{DemoDataset, EndpointTemplates, SourceConfig, SourceKind};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const DEFAULT_SPORTYBET_LOOKUP_URL: &str = "https://www.sportybet.com/ng/?shareCode={code}";
const DEFAULT_BET9JA_LOOKUP_URL: &str = "https://sports.bet9ja.com/?bookingCode={code}";
const DEFAULT_SPORTYBET_SHARE_URL: &str = "https://www.sportybet.com/ng/m/?shareCode={code}";
const DEFAULT_BET9JA_SHARE_URL: &str = "https://sports.bet9ja.com/mobile/?bookingCode={code}";

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub slip_source: SourceKind,
    pub demo_dataset_path: Option<PathBuf>,
    pub market_map_path: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub render_timeout_secs: u64,
    pub max_concurrent_renders: usize,
    pub browser_bin: String,
    pub slip_container_marker: String,
    pub sportybet_lookup_url: Option<String>,
    pub bet9ja_lookup_url: Option<String>,
    pub sportybet_share_url: Option<String>,
    pub bet9ja_share_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset numeric values and
    /// unparseable ones fall back to defaults; an unknown `SLIP_SOURCE` is an
    /// error. Endpoint variables set to an empty string disable that platform.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let slip_source = match var("SLIP_SOURCE") {
            Some(raw) => raw
                .parse::<SourceKind>()
                .map_err(|e| anyhow!(e))
                .context("Invalid SLIP_SOURCE")?,
            None => SourceKind::Fixed,
        };

        let endpoint = |key: &str, default: &str| -> Option<String> {
            match var(key) {
                Some(v) if v.trim().is_empty() => None,
                Some(v) => Some(v.trim().to_string()),
                None => Some(default.to_string()),
            }
        };

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            slip_source,
            demo_dataset_path: var("DEMO_DATASET_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            market_map_path: var("MARKET_MAP_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            render_timeout_secs: var("RENDER_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            max_concurrent_renders: var("MAX_CONCURRENT_RENDERS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            browser_bin: var("BROWSER_BIN").unwrap_or_else(|| "chromium".to_string()),
            slip_container_marker: var("SLIP_CONTAINER_MARKER")
                .unwrap_or_else(|| "betslip".to_string()),
            sportybet_lookup_url: endpoint("SPORTYBET_LOOKUP_URL", DEFAULT_SPORTYBET_LOOKUP_URL),
            bet9ja_lookup_url: endpoint("BET9JA_LOOKUP_URL", DEFAULT_BET9JA_LOOKUP_URL),
            sportybet_share_url: endpoint("SPORTYBET_SHARE_URL", DEFAULT_SPORTYBET_SHARE_URL),
            bet9ja_share_url: endpoint("BET9JA_SHARE_URL", DEFAULT_BET9JA_SHARE_URL),
        })
    }

    /// Demo dataset from `DEMO_DATASET_PATH`, or the built-in one
    pub fn load_dataset(&self) -> Result<DemoDataset> {
        match &self.demo_dataset_path {
            Some(path) => DemoDataset::from_json_file(path)
                .with_context(|| format!("Failed to load demo dataset from {}", path.display())),
            None => Ok(DemoDataset::builtin()),
        }
    }

    /// Market table from `MARKET_MAP_PATH`, or the built-in one
    pub fn load_market_table(&self) -> Result<MarketTable> {
        match &self.market_map_path {
            Some(path) => MarketTable::from_json_file(path)
                .with_context(|| format!("Failed to load market map from {}", path.display())),
            None => MarketTable::builtin().context("Built-in market map is invalid"),
        }
    }

    pub fn source_config(&self, dataset: Arc<DemoDataset>) -> SourceConfig {
        SourceConfig {
            kind: self.slip_source,
            dataset,
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            render_timeout: Duration::from_secs(self.render_timeout_secs),
            max_concurrent_renders: self.max_concurrent_renders,
            browser_bin: self.browser_bin.clone(),
            container_marker: self.slip_container_marker.clone(),
            lookup_urls: EndpointTemplates {
                sportybet: self.sportybet_lookup_url.clone(),
                bet9ja: self.bet9ja_lookup_url.clone(),
            },
            share_urls: EndpointTemplates {
                sportybet: self.sportybet_share_url.clone(),
                bet9ja: self.bet9ja_share_url.clone(),
            },
        }
    }

    /// Log current configuration (useful at startup)
    pub fn log_config(&self) {
        info!("Config loaded:");
        info!("  bind_addr: {}", self.bind_addr);
        info!("  slip_source: {}", self.slip_source);
        info!("  demo_dataset_path: {:?}", self.demo_dataset_path);
        info!("  market_map_path: {:?}", self.market_map_path);
        info!("  http_timeout_secs: {}s", self.http_timeout_secs);
        info!("  render_timeout_secs: {}s", self.render_timeout_secs);
        info!("  max_concurrent_renders: {}", self.max_concurrent_renders);
        info!("  browser_bin: {}", self.browser_bin);
        info!("  slip_container_marker: {}", self.slip_container_marker);
        info!("  sportybet_lookup_url: {:?}", self.sportybet_lookup_url);
        info!("  bet9ja_lookup_url: {:?}", self.bet9ja_lookup_url);
        info!("  sportybet_share_url: {:?}", self.sportybet_share_url);
        info!("  bet9ja_share_url: {:?}", self.bet9ja_share_url);
    }
}
