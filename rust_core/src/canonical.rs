//! Slip canonicalization: rewrite every leg's market label into the target
//! platform's vocabulary.

use crate::markets::MarketTranslator;
use crate::models::{Platform, Slip};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Canonicalizer {
    translator: MarketTranslator,
}

impl Canonicalizer {
    pub fn new(translator: MarketTranslator) -> Self {
        Self { translator }
    }

    /// Produce a new slip with translated markets. Leg order and count are
    /// preserved; home, away, pick and odds are copied as-is.
    pub fn apply(&self, slip: &Slip, source: Platform, target: Platform) -> Slip {
        let legs: Vec<_> = slip
            .legs
            .iter()
            .map(|leg| leg.with_market(&self.translator.translate(source, &leg.market)))
            .collect();

        let translated = legs
            .iter()
            .zip(&slip.legs)
            .filter(|(out, inp)| out.market != inp.market)
            .count();
        debug!(
            "Canonicalized {} legs {} -> {} ({} markets translated)",
            legs.len(),
            source,
            target,
            translated
        );

        Slip::new(legs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Leg;

    fn sample_slip() -> Slip {
        Slip::new(vec![
            Leg::new("Arsenal", "Chelsea", "1X2", "HOME", Some(1.85)),
            Leg::new("Man Utd", "Liverpool", "GG", "YES", Some(1.70)),
            Leg::new("Spurs", "Everton", "Corners O/U 9.5", "OVER", None),
        ])
    }

    #[test]
    fn test_apply_translates_markets_only() {
        let canonicalizer = Canonicalizer::new(MarketTranslator::default());
        let input = sample_slip();

        let output = canonicalizer.apply(&input, Platform::Sportybet, Platform::Bet9ja);

        assert_eq!(output.legs[0].market, "Match Result");
        assert_eq!(output.legs[1].market, "Both Teams To Score");
        assert_eq!(output.legs[2].market, "Corners O/U 9.5");

        for (out, inp) in output.legs.iter().zip(&input.legs) {
            assert_eq!(out.home, inp.home);
            assert_eq!(out.away, inp.away);
            assert_eq!(out.pick, inp.pick);
            assert_eq!(out.odds, inp.odds);
        }
    }

    #[test]
    fn test_apply_preserves_count_and_order() {
        let canonicalizer = Canonicalizer::new(MarketTranslator::default());
        let input = sample_slip();

        let output = canonicalizer.apply(&input, Platform::Sportybet, Platform::Bet9ja);

        assert_eq!(output.len(), input.len());
        let homes: Vec<_> = output.legs.iter().map(|l| l.home.as_str()).collect();
        assert_eq!(homes, vec!["Arsenal", "Man Utd", "Spurs"]);
    }

    #[test]
    fn test_apply_empty_slip() {
        let canonicalizer = Canonicalizer::new(MarketTranslator::default());
        let output = canonicalizer.apply(&Slip::default(), Platform::Bet9ja, Platform::Sportybet);
        assert!(output.is_empty());
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let canonicalizer = Canonicalizer::new(MarketTranslator::default());
        let input = sample_slip();
        let _ = canonicalizer.apply(&input, Platform::Sportybet, Platform::Bet9ja);
        assert_eq!(input, sample_slip());
    }
}
