//! Slipbridge Core - booking-code conversion between bookmaker platforms.
//!
//! This module provides:
//! - Slip sources: fixed demo dataset, headless-browser scrape, HTTP fetch
//!   with pattern extraction, all behind one `SlipSource` trait
//! - Market label translation between SportyBet and Bet9ja vocabularies
//! - Slip canonicalization (market relabeling, everything else untouched)
//! - Deterministic booking-code synthesis for the target platform
//! - The conversion orchestrator tying the pipeline together

pub mod canonical;
pub mod codegen;
pub mod conversion;
pub mod markets;
pub mod models;
pub mod sources;

pub use canonical::Canonicalizer;
pub use codegen::{CodeSynthesizer, CODE_HASH_VERSION};
pub use conversion::{ConversionError, ConversionOrchestrator};
pub use markets::{MarketTable, MarketTranslator};
pub use models::{ConversionRequest, ConversionResult, Leg, Platform, Slip};
pub use sources::{build_slip_source, SlipSource, SourceConfig, SourceKind};
