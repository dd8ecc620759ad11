use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sitelens_common::{Axis, BandTable};

/// Static per-axis weights. Renormalized per call over the computable axes;
/// the table itself is never modified by scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightTable {
    weights: BTreeMap<Axis, f64>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::from_pairs(&[
            (Axis::Performance, 0.18),
            (Axis::Seo, 0.18),
            (Axis::Security, 0.14),
            (Axis::Accessibility, 0.09),
            (Axis::BestPractices, 0.09),
            (Axis::DomainTrust, 0.09),
            (Axis::Content, 0.09),
            (Axis::Technology, 0.04),
            (Axis::OnlinePresence, 0.10),
        ])
    }
}

impl WeightTable {
    pub fn from_pairs(pairs: &[(Axis, f64)]) -> Self {
        Self {
            weights: pairs.iter().copied().collect(),
        }
    }

    /// Weight of an axis; axes missing from the table weigh nothing.
    pub fn weight(&self, axis: Axis) -> f64 {
        self.weights.get(&axis).copied().unwrap_or(0.0).max(0.0)
    }
}

/// Rule tables injected into the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringConfig {
    pub weights: WeightTable,
    pub bands: BandTable,
}
