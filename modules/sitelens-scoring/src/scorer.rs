use std::collections::BTreeMap;

use tracing::debug;

use sitelens_common::{AuditBundle, Axis, CategoryScore, ScoringResult};

use crate::axes::score_axis;
use crate::config::{ScoringConfig, WeightTable};

/// Score every axis and aggregate the computable ones into an overall.
pub fn score_all(bundle: &AuditBundle, config: &ScoringConfig) -> ScoringResult {
    let categories: BTreeMap<Axis, CategoryScore> = Axis::ALL
        .iter()
        .map(|axis| (*axis, score_axis(*axis, bundle, &config.bands)))
        .collect();

    let overall = weighted_overall(&categories, &config.weights);
    let (_, overall_color) = config.bands.classify(overall);

    debug!(
        url = bundle.snapshot.url.as_str(),
        overall,
        no_data = categories.values().filter(|c| c.no_data).count(),
        "Scored snapshot"
    );

    ScoringResult {
        overall,
        overall_color,
        categories,
    }
}

/// `round(Σ score·w / Σ w)` over axes that are not `no_data`.
/// Returns 0 when no axis is computable.
pub fn weighted_overall(categories: &BTreeMap<Axis, CategoryScore>, weights: &WeightTable) -> u8 {
    let (weighted, total_weight) = categories
        .iter()
        .filter(|(_, c)| !c.no_data)
        .fold((0.0_f64, 0.0_f64), |(sum, wsum), (axis, c)| {
            let w = weights.weight(*axis);
            (sum + c.score.min(100) as f64 * w, wsum + w)
        });

    if total_weight <= 0.0 {
        return 0;
    }
    (weighted / total_weight).round().clamp(0.0, 100.0) as u8
}
