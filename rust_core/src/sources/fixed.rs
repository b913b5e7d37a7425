//! Fixed demo dataset source
//!
//! Resolves codes against an immutable table loaded once at startup. No I/O
//! at resolve time; the only failure is a lookup miss.

use super::{NotFound, SlipSource};
use crate::models::{Leg, Platform, Slip};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// How many known codes to suggest in the miss message
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset entry {0:?} has an empty booking code")]
    EmptyCode(String),
}

/// Immutable `booking code -> slip` table
#[derive(Debug, Clone, Default)]
pub struct DemoDataset {
    slips: HashMap<String, Slip>,
    sample_codes: Vec<String>,
}

impl DemoDataset {
    /// Build from entries; the first codes double as suggestions on a miss
    pub fn new(entries: Vec<(String, Slip)>) -> Self {
        let sample_codes = entries
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(|(code, _)| code.clone())
            .collect();

        Self {
            slips: entries.into_iter().collect(),
            sample_codes,
        }
    }

    /// The built-in demo slips
    pub fn builtin() -> Self {
        Self::new(vec![
            (
                "SP12345".to_string(),
                Slip::new(vec![
                    Leg::new("Arsenal", "Chelsea", "1X2", "HOME", Some(1.85)),
                    Leg::new("Man Utd", "Liverpool", "GG", "YES", Some(1.70)),
                ]),
            ),
            (
                "BJ99999".to_string(),
                Slip::new(vec![Leg::new(
                    "Barcelona",
                    "Real Madrid",
                    "O/U 2.5",
                    "OVER",
                    Some(1.95),
                )]),
            ),
        ])
    }

    /// Load from a JSON object of `{ "<code>": {"legs": [...]}, ... }`
    pub fn from_json_file(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        let parsed: BTreeMap<String, Slip> = serde_json::from_str(raw)?;
        if let Some(code) = parsed.keys().find(|code| code.trim().is_empty()) {
            return Err(DatasetError::EmptyCode(code.clone()));
        }
        Ok(Self::new(parsed.into_iter().collect()))
    }

    pub fn get(&self, code: &str) -> Option<&Slip> {
        self.slips.get(code)
    }

    pub fn sample_codes(&self) -> &[String] {
        &self.sample_codes
    }

    pub fn len(&self) -> usize {
        self.slips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slips.is_empty()
    }
}

/// Slip source backed by a [`DemoDataset`]
pub struct FixedSlipSource {
    dataset: Arc<DemoDataset>,
}

impl FixedSlipSource {
    pub fn new(dataset: Arc<DemoDataset>) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl SlipSource for FixedSlipSource {
    async fn resolve(&self, platform: Platform, code: &str) -> Result<Slip, NotFound> {
        match self.dataset.get(code) {
            Some(slip) => {
                debug!("Demo dataset hit for {} ({} legs)", code, slip.len());
                Ok(slip.clone())
            }
            None => Err(NotFound::new(platform, code)),
        }
    }

    fn source_name(&self) -> &str {
        "fixed"
    }

    fn miss_message(&self, _platform: Platform, _code: &str) -> String {
        match self.dataset.sample_codes() {
            [] => "Code not found in demo dataset.".to_string(),
            [only] => format!("Code not found in demo dataset. Try {}.", only),
            [head @ .., last] => format!(
                "Code not found in demo dataset. Try {} or {}.",
                head.join(", "),
                last
            ),
        }
    }

    fn success_message(&self) -> &str {
        "Converted (demo)."
    }
}
