use std::collections::BTreeSet;

use sitelens_common::testing::{healthy_bundle, thin_noindex_bundle};
use sitelens_common::{Axis, BandTable, ColorBand, PhaseId, Priority};
use sitelens_scoring::{build_plan, generate, score_all, weighted_overall, ScoringConfig};

#[test]
fn healthy_site_scores_every_axis_in_the_top_band() {
    let result = score_all(&healthy_bundle(), &ScoringConfig::default());

    assert!(result.categories.values().all(|c| !c.no_data));
    assert_eq!(result.score_of(Axis::Security), Some(100));
    assert_eq!(result.score_of(Axis::Seo), Some(100));
    assert!(result.overall >= 90, "overall was {}", result.overall);
    assert_eq!(result.overall_color, ColorBand::Green);
}

#[test]
fn overall_is_rederivable_from_categories() {
    let config = ScoringConfig::default();
    for bundle in [healthy_bundle(), thin_noindex_bundle()] {
        let result = score_all(&bundle, &config);
        assert_eq!(
            result.overall,
            weighted_overall(&result.categories, &config.weights)
        );
    }
}

#[test]
fn labels_and_colors_follow_the_band_table() {
    let bands = BandTable::default();
    let result = score_all(&thin_noindex_bundle(), &ScoringConfig::default());
    for (axis, category) in &result.categories {
        let (label, color) = bands.classify(category.score);
        assert_eq!(category.label, label, "{axis}");
        assert_eq!(category.color, color, "{axis}");
        assert!(category.score <= 100);
    }
}

#[test]
fn missing_presence_data_only_renormalizes() {
    let config = ScoringConfig::default();
    let mut bundle = healthy_bundle();
    bundle.online_presence = None;
    let result = score_all(&bundle, &config);

    assert!(result.categories[&Axis::OnlinePresence].no_data);
    assert_eq!(
        result.overall,
        weighted_overall(&result.categories, &config.weights)
    );
    assert!(result.overall >= 90);
}

#[test]
fn noindex_thin_page_is_capped_and_gets_critical_fixes_first() {
    let bundle = thin_noindex_bundle();
    let scores = score_all(&bundle, &ScoringConfig::default());
    assert!(scores.score_of(Axis::Seo).unwrap() <= 20);
    assert!(scores.score_of(Axis::Content).unwrap() <= 20);

    let recs = generate(&bundle, &scores, true);
    let titles: Vec<_> = recs.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(&titles[..2], &["Remove the noindex directive", "Fix thin content"]);
    assert!(recs[..2].iter().all(|r| r.priority == Priority::Critical));

    let first_medium = recs
        .iter()
        .position(|r| r.priority == Priority::Medium)
        .expect("a medium recommendation");
    assert!(recs[first_medium..]
        .iter()
        .all(|r| r.priority.rank() >= Priority::Medium.rank()));
    assert!(titles.contains(&"Declare a canonical URL"));
}

#[test]
fn identity_keys_are_stable_across_runs() {
    let config = ScoringConfig::default();
    let keys = |word_count: u32| -> BTreeSet<String> {
        let mut bundle = thin_noindex_bundle();
        bundle.snapshot.content.word_count = word_count;
        let scores = score_all(&bundle, &config);
        generate(&bundle, &scores, true)
            .iter()
            .map(|r| r.identity_key())
            .collect()
    };

    let first = keys(20);
    assert_eq!(first, keys(20));
    // a different measurement of the same issue keeps the same key
    assert_eq!(first, keys(55));
    assert!(first.contains("content::fix thin content"));
}

#[test]
fn treatment_plan_covers_every_recommendation() {
    let bundle = thin_noindex_bundle();
    let scores = score_all(&bundle, &ScoringConfig::default());
    let recs = generate(&bundle, &scores, true);
    let plan = build_plan(&recs);

    assert_eq!(plan.total_steps, recs.len());
    assert_eq!(
        plan.phases.iter().map(|p| p.steps.len()).sum::<usize>(),
        recs.len()
    );
    assert_eq!(plan.phases[0].id, PhaseId::Urgent);
}

#[test]
fn healthy_site_has_no_urgent_work() {
    let bundle = healthy_bundle();
    let scores = score_all(&bundle, &ScoringConfig::default());
    let recs = generate(&bundle, &scores, true);
    assert!(
        recs.iter().all(|r| r.priority.rank() > Priority::High.rank()),
        "unexpected urgent items: {:?}",
        recs.iter().map(|r| &r.title).collect::<Vec<_>>()
    );
}
