use sitelens_authority::{rule_set, score_all_authorities, score_authority};
use sitelens_common::testing::healthy_bundle;
use sitelens_common::{AuthorityKind, BandTable, ColorBand, Verdict};

#[test]
fn healthy_site_earns_five_reports_with_consistent_totals() {
    let reports = score_all_authorities(&healthy_bundle(), &BandTable::default());
    assert_eq!(reports.len(), 5);

    for (report, kind) in reports.iter().zip(AuthorityKind::ALL) {
        assert_eq!(report.kind, kind);
        assert_eq!(
            report.overall,
            report.categories.iter().map(|c| c.score).sum::<u32>(),
            "{kind}"
        );
        assert!(report.categories.iter().all(|c| c.score <= c.max));
        assert!(!report.action_plan.is_empty());
    }

    let seo = &reports[0];
    assert_eq!(seo.overall, 100);
    assert_eq!(seo.verdict, Verdict::Approve);
    assert_eq!(seo.color, ColorBand::Green);
}

#[test]
fn missing_presence_marks_dependent_sub_scores_no_data() {
    let mut bundle = healthy_bundle();
    bundle.online_presence = None;
    let bands = BandTable::default();

    for (kind, key) in [
        (AuthorityKind::Seo, "indexation"),
        (AuthorityKind::Geo, "brand_footprint"),
        (AuthorityKind::Aeo, "search_visibility"),
        (AuthorityKind::Backlink, "referring_domains"),
    ] {
        let report = score_authority(&rule_set(kind), &bundle, &bands);
        let sub = report.sub_score(key).expect("sub-score present");
        assert!(sub.no_data, "{kind}/{key}");
        assert_eq!(sub.score, 0);
        assert_eq!(
            report.categories.iter().map(|c| c.max).sum::<u32>(),
            100,
            "{kind} maxima rescale to 100"
        );
    }
}

#[test]
fn missing_presence_does_not_drag_a_perfect_site_down() {
    let mut bundle = healthy_bundle();
    bundle.online_presence = None;
    let report = score_authority(&rule_set(AuthorityKind::Seo), &bundle, &BandTable::default());
    assert_eq!(report.overall, 100);
    assert_eq!(report.verdict, Verdict::Approve);
}

#[test]
fn site_without_a_blog_cannot_be_evaluated() {
    let mut bundle = healthy_bundle();
    bundle.snapshot.blog = None;
    let report = score_authority(&rule_set(AuthorityKind::Blog), &bundle, &BandTable::default());

    assert!(report.categories.iter().all(|c| c.no_data));
    assert_eq!(report.overall, 0);
    assert_eq!(report.verdict, Verdict::Rebuild);
    assert_eq!(report.insights.len(), 5);
    assert!(report
        .insights
        .iter()
        .all(|i| i.contains("could not be evaluated")));
}

#[test]
fn unprobed_links_leave_link_health_unscored() {
    let report = score_authority(
        &rule_set(AuthorityKind::Backlink),
        &healthy_bundle(),
        &BandTable::default(),
    );
    assert!(report.sub_score("link_health").unwrap().no_data);
    assert!(!report.sub_score("referring_domains").unwrap().no_data);
}

#[test]
fn weak_sub_scores_drive_insights() {
    let mut bundle = healthy_bundle();
    bundle.heuristics.ai_crawlers_blocked = true;
    bundle.snapshot.meta.robots = Some("noindex".into());
    bundle.snapshot.technical.has_robots_txt = false;
    let geo = rule_set(AuthorityKind::Geo);
    let report = score_authority(&geo, &bundle, &BandTable::default());

    let crawl = geo
        .sub_scorers
        .iter()
        .find(|s| s.key == "crawl_access")
        .unwrap();
    assert_eq!(report.sub_score("crawl_access").unwrap().score, 0);
    assert!(report.insights.contains(&crawl.weak_insight.to_string()));
    assert!(!report.insights.contains(&geo.strong_insight.to_string()));
}
