//! Market label translation between platform vocabularies
//!
//! Each platform names the same betting markets differently ("1X2" on
//! SportyBet is "Match Result" on Bet9ja). The translator looks labels up in
//! a shared [`MarketTable`] and passes unknown labels through untouched.

use crate::models::Platform;
use std::sync::Arc;

pub mod table;

pub use table::{MappingError, MarketEntry, MarketTable};

/// Pure lookup from a source platform's market label to the other platform's
#[derive(Debug, Clone)]
pub struct MarketTranslator {
    table: Arc<MarketTable>,
}

impl MarketTranslator {
    pub fn new(table: Arc<MarketTable>) -> Self {
        Self { table }
    }

    /// Translate `label` out of `source`'s vocabulary. Total: a miss returns
    /// the input unchanged.
    pub fn translate(&self, source: Platform, label: &str) -> String {
        self.table
            .get(source, label)
            .map(str::to_string)
            .unwrap_or_else(|| label.to_string())
    }

    pub fn table(&self) -> &MarketTable {
        &self.table
    }
}

impl Default for MarketTranslator {
    fn default() -> Self {
        Self::new(Arc::new(MarketTable::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_labels() {
        let translator = MarketTranslator::default();

        assert_eq!(translator.translate(Platform::Sportybet, "1X2"), "Match Result");
        assert_eq!(
            translator.translate(Platform::Sportybet, "GG"),
            "Both Teams To Score"
        );
        assert_eq!(
            translator.translate(Platform::Bet9ja, "Over/Under 2.5 Goals"),
            "O/U 2.5"
        );
    }

    #[test]
    fn test_unmapped_label_passes_through() {
        let translator = MarketTranslator::default();

        // "O/U 2.5" is a SportyBet label; there is no (bet9ja, "O/U 2.5") key
        assert_eq!(translator.translate(Platform::Bet9ja, "O/U 2.5"), "O/U 2.5");
        assert_eq!(
            translator.translate(Platform::Sportybet, "Draw No Bet"),
            "Draw No Bet"
        );
        assert_eq!(translator.translate(Platform::Sportybet, ""), "");
    }

    #[test]
    fn test_round_trip_restores_every_label() {
        let translator = MarketTranslator::default();

        for platform in Platform::ALL {
            for label in translator.table().labels(platform) {
                let there = translator.translate(platform, label);
                let back = translator.translate(platform.counterpart(), &there);
                assert_eq!(back, label, "round trip failed for ({}, {})", platform, label);
            }
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let translator = MarketTranslator::default();
        assert_eq!(translator.translate(Platform::Sportybet, "gg"), "gg");
    }
}
