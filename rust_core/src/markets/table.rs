//! Market label mapping table
//!
//! Built once at startup (from the built-in defaults or a JSON file) and
//! shared read-only afterwards. Construction rejects tables that are not
//! symmetric, so every translation can be reversed.

use crate::models::Platform;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::error;

/// Built-in mapping between SportyBet and Bet9ja market labels
const DEFAULT_ENTRIES: &[(Platform, &str, &str)] = &[
    (Platform::Sportybet, "1X2", "Match Result"),
    (Platform::Sportybet, "GG", "Both Teams To Score"),
    (Platform::Sportybet, "O/U 2.5", "Over/Under 2.5 Goals"),
    (Platform::Bet9ja, "Match Result", "1X2"),
    (Platform::Bet9ja, "Both Teams To Score", "GG"),
    (Platform::Bet9ja, "Over/Under 2.5 Goals", "O/U 2.5"),
];

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("duplicate mapping for ({platform}, {label:?}): {first:?} vs {second:?}")]
    Duplicate {
        platform: Platform,
        label: String,
        first: String,
        second: String,
    },

    #[error("({platform}, {label:?}) -> {translated:?} has no reverse entry ({reverse}, {translated:?}) -> {label:?}")]
    Asymmetric {
        platform: Platform,
        label: String,
        translated: String,
        reverse: Platform,
    },

    #[error("failed to read market map: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse market map: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One row of a market map file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub platform: Platform,
    pub label: String,
    pub translated: String,
}

/// Symmetric `(source platform, label) -> target label` table
#[derive(Debug, Clone)]
pub struct MarketTable {
    entries: HashMap<(Platform, String), String>,
}

impl MarketTable {
    /// Build a table, rejecting duplicates and entries without a reverse
    pub fn new(entries: Vec<MarketEntry>) -> Result<Self, MappingError> {
        let mut map: HashMap<(Platform, String), String> = HashMap::new();

        for entry in entries {
            let key = (entry.platform, entry.label);
            if let Some(existing) = map.get(&key) {
                if *existing != entry.translated {
                    return Err(MappingError::Duplicate {
                        platform: key.0,
                        label: key.1,
                        first: existing.clone(),
                        second: entry.translated,
                    });
                }
                continue;
            }
            map.insert(key, entry.translated);
        }

        for ((platform, label), translated) in &map {
            let reverse = platform.counterpart();
            let back = map.get(&(reverse, translated.clone()));
            if back != Some(label) {
                return Err(MappingError::Asymmetric {
                    platform: *platform,
                    label: label.clone(),
                    translated: translated.clone(),
                    reverse,
                });
            }
        }

        Ok(Self { entries: map })
    }

    /// Load a table from a JSON array of [`MarketEntry`]
    pub fn from_json_file(path: &Path) -> Result<Self, MappingError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, MappingError> {
        let entries: Vec<MarketEntry> = serde_json::from_str(raw)?;
        Self::new(entries)
    }

    pub fn get(&self, platform: Platform, label: &str) -> Option<&str> {
        self.entries
            .get(&(platform, label.to_string()))
            .map(String::as_str)
    }

    /// All labels declared for a source platform, sorted
    pub fn labels(&self, platform: Platform) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .entries
            .keys()
            .filter(|(p, _)| *p == platform)
            .map(|(_, label)| label.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MarketTable {
    /// The built-in SportyBet/Bet9ja table
    pub fn builtin() -> Result<Self, MappingError> {
        let entries = DEFAULT_ENTRIES
            .iter()
            .map(|(platform, label, translated)| MarketEntry {
                platform: *platform,
                label: label.to_string(),
                translated: translated.to_string(),
            })
            .collect();
        Self::new(entries)
    }
}

impl Default for MarketTable {
    fn default() -> Self {
        Self::builtin().unwrap_or_else(|e| {
            error!("Built-in market table rejected, translating by identity: {}", e);
            Self {
                entries: HashMap::new(),
            }
        })
    }
}
