// Shared models for Slipbridge services
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Platform
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Sportybet,
    Bet9ja,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Sportybet, Platform::Bet9ja];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Sportybet => "sportybet",
            Platform::Bet9ja => "bet9ja",
        }
    }

    /// The other member of the platform pair
    pub fn counterpart(&self) -> Platform {
        match self {
            Platform::Sportybet => Platform::Bet9ja,
            Platform::Bet9ja => Platform::Sportybet,
        }
    }

    /// Two-letter prefix used for codes synthesized for this platform
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Platform::Bet9ja => "BJ",
            Platform::Sportybet => "SP",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sportybet" => Ok(Platform::Sportybet),
            "bet9ja" => Ok(Platform::Bet9ja),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

// ============================================================================
// Slip & Leg
// ============================================================================

/// Market label used when a backend cannot recover the leg's market
pub const UNRESOLVED_MARKET: &str = "Unknown";
/// Pick used when a backend cannot recover the leg's selection
pub const UNRESOLVED_PICK: &str = "?";

/// A single selection within a slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub home: String,
    pub away: String,
    pub market: String,
    pub pick: String,
    #[serde(default)]
    pub odds: Option<f64>,
}

impl Leg {
    pub fn new(home: &str, away: &str, market: &str, pick: &str, odds: Option<f64>) -> Self {
        Self {
            home: home.to_string(),
            away: away.to_string(),
            market: market.to_string(),
            pick: pick.to_string(),
            odds,
        }
    }

    /// Leg with only the fixture known; market, pick and odds are placeholders
    pub fn fixture_only(home: &str, away: &str) -> Self {
        Self::new(home, away, UNRESOLVED_MARKET, UNRESOLVED_PICK, None)
    }

    /// Copy of this leg with a different market label
    pub fn with_market(&self, market: &str) -> Self {
        Self {
            market: market.to_string(),
            ..self.clone()
        }
    }
}

/// Ordered collection of legs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slip {
    pub legs: Vec<Leg>,
}

impl Slip {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

// ============================================================================
// Conversion request / result (wire types)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub code: String,
    pub from_platform: Platform,
    pub to_platform: Platform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub ok: bool,
    pub message: String,
    pub converted_code: Option<String>,
    pub preview: Option<Slip>,
}

impl ConversionResult {
    pub fn success(message: &str, converted_code: String, preview: Slip) -> Self {
        Self {
            ok: true,
            message: message.to_string(),
            converted_code: Some(converted_code),
            preview: Some(preview),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            converted_code: None,
            preview: None,
        }
    }
}
