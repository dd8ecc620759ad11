use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Axes ---

/// The nine scoring axes, in report order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Performance,
    Seo,
    Security,
    Accessibility,
    BestPractices,
    DomainTrust,
    Content,
    Technology,
    OnlinePresence,
}

impl Axis {
    pub const ALL: [Axis; 9] = [
        Axis::Performance,
        Axis::Seo,
        Axis::Security,
        Axis::Accessibility,
        Axis::BestPractices,
        Axis::DomainTrust,
        Axis::Content,
        Axis::Technology,
        Axis::OnlinePresence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Performance => "performance",
            Axis::Seo => "seo",
            Axis::Security => "security",
            Axis::Accessibility => "accessibility",
            Axis::BestPractices => "best_practices",
            Axis::DomainTrust => "domain_trust",
            Axis::Content => "content",
            Axis::Technology => "technology",
            Axis::OnlinePresence => "online_presence",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Bands ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColorBand {
    Green,
    LightGreen,
    Yellow,
    Orange,
    Red,
}

impl std::fmt::Display for ColorBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorBand::Green => write!(f, "green"),
            ColorBand::LightGreen => write!(f, "light_green"),
            ColorBand::Yellow => write!(f, "yellow"),
            ColorBand::Orange => write!(f, "orange"),
            ColorBand::Red => write!(f, "red"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Band {
    /// Inclusive lower bound.
    pub min: u8,
    pub label: String,
    pub color: ColorBand,
}

/// Descending list of score bands. The last band must have `min == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BandTable {
    pub bands: Vec<Band>,
}

impl Default for BandTable {
    fn default() -> Self {
        let band = |min, label: &str, color| Band {
            min,
            label: label.to_string(),
            color,
        };
        Self {
            bands: vec![
                band(90, "Excellent", ColorBand::Green),
                band(75, "Good", ColorBand::LightGreen),
                band(50, "Fair", ColorBand::Yellow),
                band(30, "Poor", ColorBand::Orange),
                band(0, "Critical", ColorBand::Red),
            ],
        }
    }
}

impl BandTable {
    pub fn classify(&self, score: u8) -> (&str, ColorBand) {
        self.bands
            .iter()
            .find(|b| score >= b.min)
            .or_else(|| self.bands.last())
            .map(|b| (b.label.as_str(), b.color))
            .unwrap_or(("Critical", ColorBand::Red))
    }
}

// --- Category scores ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryScore {
    pub score: u8,
    pub label: String,
    pub color: ColorBand,
    /// Evidence strings in rule-declaration order.
    pub details: Vec<String>,
    /// Axis not computable; excluded from the overall, not zeroed.
    pub no_data: bool,
}

impl CategoryScore {
    pub fn scored(score: u8, details: Vec<String>, bands: &BandTable) -> Self {
        let score = score.min(100);
        let (label, color) = bands.classify(score);
        Self {
            score,
            label: label.to_string(),
            color,
            details,
            no_data: false,
        }
    }

    pub fn no_data(reason: &str) -> Self {
        Self {
            score: 0,
            label: "No data".to_string(),
            color: ColorBand::Red,
            details: vec![reason.to_string()],
            no_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringResult {
    pub overall: u8,
    pub overall_color: ColorBand,
    pub categories: BTreeMap<Axis, CategoryScore>,
}

impl ScoringResult {
    pub fn category(&self, axis: Axis) -> Option<&CategoryScore> {
        self.categories.get(&axis)
    }

    /// Score of an axis when it was computable.
    pub fn score_of(&self, axis: Axis) -> Option<u8> {
        self.category(axis).filter(|c| !c.no_data).map(|c| c.score)
    }
}
