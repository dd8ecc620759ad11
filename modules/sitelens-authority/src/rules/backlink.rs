use sitelens_common::{AuditBundle, AuthorityKind, BacklinkProfile};

use crate::protocol::{ActionPlans, Earned, RuleSet, SubScoreOutcome, SubScorer, VerdictThresholds};

pub(super) fn rules() -> RuleSet {
    RuleSet {
        kind: AuthorityKind::Backlink,
        title: "Backlink Profile",
        sub_scorers: vec![
            SubScorer {
                key: "referring_domains",
                label: "Referring domains",
                max: 35,
                weak_insight: "Too few distinct sites link here.",
                evaluate: referring_domains,
            },
            SubScorer {
                key: "link_quality",
                label: "Link quality",
                max: 25,
                weak_insight: "Inbound links are mostly nofollow or from low-authority sites.",
                evaluate: link_quality,
            },
            SubScorer {
                key: "internal_linking",
                label: "Internal linking",
                max: 15,
                weak_insight: "The page passes little authority to the rest of the site.",
                evaluate: internal_linking,
            },
            SubScorer {
                key: "outbound_citations",
                label: "Outbound citations",
                max: 10,
                weak_insight: "The page cites no external sources.",
                evaluate: outbound_citations,
            },
            SubScorer {
                key: "link_health",
                label: "Link health",
                max: 15,
                weak_insight: "Many outbound links are broken.",
                evaluate: link_health,
            },
        ],
        weak_ratio: 0.5,
        strong_insight: "The link profile is broad, healthy and well connected.",
        action_plans: ActionPlans {
            approve: vec![
                "Audit new inbound links monthly for spam.",
                "Keep internal links pointing at priority pages.",
            ],
            strengthen: vec![
                "Pitch original data or guides to industry publications.",
                "Reclaim unlinked brand mentions.",
                "Repair or replace broken outbound links.",
            ],
            rebuild: vec![
                "Create one linkable asset such as a study, tool or definitive guide.",
                "List the business in reputable directories for its industry.",
                "Build an internal link structure from the homepage to every key page.",
            ],
        },
        thresholds: VerdictThresholds::default(),
    }
}

fn backlinks(bundle: &AuditBundle) -> Option<&BacklinkProfile> {
    bundle.online_presence.as_ref()?.backlinks.as_ref()
}

fn no_backlinks() -> SubScoreOutcome {
    SubScoreOutcome::NoData("No backlink data available".into())
}

fn referring_domains(bundle: &AuditBundle) -> SubScoreOutcome {
    let Some(profile) = backlinks(bundle) else {
        return no_backlinks();
    };
    let mut e = Earned::default();
    let n = profile.referring_domains;
    let points = match n {
        n if n >= 500 => 35,
        n if n >= 100 => 28,
        n if n >= 25 => 18,
        n if n >= 5 => 10,
        n if n >= 1 => 4,
        _ => 0,
    };
    e.award(points, format!("{n} referring domains ({} backlinks)", profile.total_backlinks));
    e.done()
}

fn link_quality(bundle: &AuditBundle) -> SubScoreOutcome {
    let Some(profile) = backlinks(bundle) else {
        return no_backlinks();
    };
    let mut e = Earned::default();
    let dofollow = profile.dofollow_ratio.clamp(0.0, 1.0);
    e.award(
        (dofollow * 10.0).round() as u32,
        format!("{:.0}% dofollow", dofollow * 100.0),
    );
    match profile.domain_rating {
        Some(rating) => e.award(
            (rating.min(100) as f64 * 15.0 / 100.0).round() as u32,
            format!("Domain rating {rating}"),
        ),
        None => e.note("Domain rating unknown"),
    }
    e.done()
}

fn internal_linking(bundle: &AuditBundle) -> SubScoreOutcome {
    let mut e = Earned::default();
    match bundle.snapshot.links.internal.len() {
        n if n >= 10 => e.award(15, format!("{n} internal links")),
        n if n >= 3 => e.award(10, format!("{n} internal links")),
        n if n >= 1 => e.award(5, format!("{n} internal links")),
        _ => e.note("No internal links"),
    }
    e.done()
}

fn outbound_citations(bundle: &AuditBundle) -> SubScoreOutcome {
    let mut e = Earned::default();
    match bundle.snapshot.links.external.len() {
        n if n >= 3 => e.award(10, format!("{n} outbound links")),
        n if n >= 1 => e.award(5, format!("{n} outbound links")),
        _ => e.note("No outbound links"),
    }
    e.done()
}

fn link_health(bundle: &AuditBundle) -> SubScoreOutcome {
    let Some(rot) = bundle.heuristics.link_rot_ratio else {
        return SubScoreOutcome::NoData("External links were not probed".into());
    };
    let healthy = 1.0 - rot.clamp(0.0, 1.0);
    let mut e = Earned::default();
    e.award(
        (healthy * 15.0).round() as u32,
        format!("{:.0}% of sampled outbound links resolve", healthy * 100.0),
    );
    e.done()
}
