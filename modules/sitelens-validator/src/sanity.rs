use tracing::warn;

use sitelens_common::{ScoringResult, ValidationCheckResult};
use sitelens_scoring::{weighted_overall, ScoringConfig};

/// Clamp every category into [0, 100], recompute the weighted overall, and
/// replace the reported overall when it diverges by more than `tolerance`.
/// Labels and colors are re-derived from the band table.
pub fn check(
    reported: &ScoringResult,
    config: &ScoringConfig,
    tolerance: f64,
    checks: &mut Vec<ValidationCheckResult>,
) -> ScoringResult {
    let mut scores = reported.clone();

    for (axis, category) in scores.categories.iter_mut() {
        if category.score > 100 {
            checks.push(ValidationCheckResult::corrected(
                &format!("scores.{axis}"),
                format!("{} out of range; clamped to 100", category.score),
            ));
            category.score = 100;
        }
        if !category.no_data {
            let (label, color) = config.bands.classify(category.score);
            category.label = label.to_string();
            category.color = color;
        }
    }

    let recomputed = weighted_overall(&scores.categories, &config.weights);
    let divergence = (recomputed as f64 - reported.overall as f64).abs();
    if divergence > tolerance {
        warn!(
            reported = reported.overall,
            recomputed,
            "Reported overall diverges from weighted categories"
        );
        checks.push(ValidationCheckResult::corrected(
            "scores.overall",
            format!("reported {} but categories weigh to {recomputed}", reported.overall),
        ));
        scores.overall = recomputed;
    } else {
        checks.push(ValidationCheckResult::verified(
            "scores.overall",
            format!("within {tolerance} of weighted categories ({recomputed})"),
        ));
    }
    scores.overall_color = config.bands.classify(scores.overall).1;
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::testing::healthy_bundle;
    use sitelens_common::{Axis, ColorBand};
    use sitelens_scoring::score_all;

    #[test]
    fn consistent_scores_pass_untouched() {
        let config = ScoringConfig::default();
        let scores = score_all(&healthy_bundle(), &config);
        let mut checks = Vec::new();
        let checked = check(&scores, &config, 2.0, &mut checks);
        assert_eq!(checked, scores);
        assert_eq!(checks.len(), 1);
        assert!(checks[0].verified);
    }

    #[test]
    fn out_of_range_and_divergent_scores_are_corrected() {
        let config = ScoringConfig::default();
        let mut scores = score_all(&healthy_bundle(), &config);
        scores.categories.get_mut(&Axis::Seo).unwrap().score = 180;
        scores.overall = 40;
        scores.overall_color = ColorBand::Orange;

        let mut checks = Vec::new();
        let checked = check(&scores, &config, 2.0, &mut checks);

        assert_eq!(checked.score_of(Axis::Seo), Some(100));
        assert!(checked.overall >= 90);
        assert_eq!(checked.overall_color, ColorBand::Green);
        let fields: Vec<_> = checks
            .iter()
            .filter(|c| c.is_correction())
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(fields, vec!["scores.seo", "scores.overall"]);
    }

    #[test]
    fn small_divergence_is_tolerated() {
        let config = ScoringConfig::default();
        let mut scores = score_all(&healthy_bundle(), &config);
        let original = scores.overall;
        scores.overall = original - 2;
        let mut checks = Vec::new();
        let checked = check(&scores, &config, 2.0, &mut checks);
        assert_eq!(checked.overall, original - 2);
        assert!(checks[0].verified);
    }
}
