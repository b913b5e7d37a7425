use crate::config::Config;
use anyhow::Result;
use slipbridge_rust_core::markets::MarketTranslator;
use slipbridge_rust_core::sources::build_slip_source;
use slipbridge_rust_core::ConversionOrchestrator;
use std::sync::Arc;
use tracing::info;

/// Shared, read-only state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConversionOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: ConversionOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Load tables and build the pipeline for the configured slip source
    pub fn from_config(config: &Config) -> Result<Self> {
        let dataset = Arc::new(config.load_dataset()?);
        let table = Arc::new(config.load_market_table()?);
        info!(
            "Loaded {} demo slips and {} market mappings",
            dataset.len(),
            table.len()
        );

        let source = build_slip_source(&config.source_config(dataset))?;
        let orchestrator = ConversionOrchestrator::new(source, MarketTranslator::new(table));

        Ok(Self::new(orchestrator))
    }
}
