use sitelens_common::{AuditBundle, AuthorityKind};

use super::no_presence;
use crate::protocol::{ActionPlans, Earned, RuleSet, SubScoreOutcome, SubScorer, VerdictThresholds};

pub(super) fn rules() -> RuleSet {
    RuleSet {
        kind: AuthorityKind::Seo,
        title: "Search Authority",
        sub_scorers: vec![
            SubScorer {
                key: "technical",
                label: "Technical foundation",
                max: 25,
                weak_insight: "Crawl and delivery basics (HTTPS, sitemap, robots.txt, speed) are holding rankings back.",
                evaluate: technical,
            },
            SubScorer {
                key: "on_page",
                label: "On-page signals",
                max: 25,
                weak_insight: "Titles, descriptions, headings or canonicals are missing or malformed.",
                evaluate: on_page,
            },
            SubScorer {
                key: "content",
                label: "Content depth",
                max: 20,
                weak_insight: "The page is too shallow to compete for its topic.",
                evaluate: content,
            },
            SubScorer {
                key: "indexation",
                label: "Indexation",
                max: 15,
                weak_insight: "Search engines are not indexing the site well.",
                evaluate: indexation,
            },
            SubScorer {
                key: "trust",
                label: "Domain trust",
                max: 15,
                weak_insight: "The domain lacks age or security signals search engines reward.",
                evaluate: trust,
            },
        ],
        weak_ratio: 0.6,
        strong_insight: "Search fundamentals are in place across the board.",
        action_plans: ActionPlans {
            approve: vec![
                "Track rankings for priority keywords monthly.",
                "Publish new supporting content on a regular cadence.",
            ],
            strengthen: vec![
                "Fix the weakest sub-score first, starting with technical issues.",
                "Rewrite titles and meta descriptions for the top landing pages.",
                "Expand thin pages into complete topic guides.",
            ],
            rebuild: vec![
                "Remove crawl blockers and serve every page over HTTPS.",
                "Submit an XML sitemap and verify the site in Search Console.",
                "Rebuild core pages around clear titles, one H1 and substantive copy.",
            ],
        },
        thresholds: VerdictThresholds::default(),
    }
}

fn technical(bundle: &AuditBundle) -> SubScoreOutcome {
    let snap = &bundle.snapshot;
    let mut e = Earned::default();
    e.check(snap.uses_https(), 5, "Served over HTTPS", "Not served over HTTPS");
    e.check(snap.technical.has_sitemap, 5, "XML sitemap", "No XML sitemap");
    e.check(snap.technical.has_robots_txt, 5, "robots.txt", "No robots.txt");
    e.check(
        snap.status_code == 200,
        5,
        "HTTP 200",
        &format!("HTTP {}", snap.status_code),
    );
    match &bundle.speed {
        Some(speed) => e.check(
            speed.performance_score >= 50,
            5,
            &format!("Performance score {}", speed.performance_score),
            &format!("Slow page: performance score {}", speed.performance_score),
        ),
        None => e.note("No speed test result"),
    }
    e.done()
}

fn on_page(bundle: &AuditBundle) -> SubScoreOutcome {
    let meta = &bundle.snapshot.meta;
    let mut e = Earned::default();
    match meta.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) if (30..=60).contains(&t.chars().count()) => e.award(7, "Well-sized title"),
        Some(_) => e.award(4, "Title present but poorly sized"),
        None => e.note("No title"),
    }
    match meta.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) if (70..=160).contains(&d.chars().count()) => {
            e.award(6, "Well-sized meta description")
        }
        Some(_) => e.award(3, "Meta description present but poorly sized"),
        None => e.note("No meta description"),
    }
    e.check(
        bundle.snapshot.heading_count(1) == 1,
        6,
        "Single H1",
        "H1 missing or duplicated",
    );
    e.check(meta.canonical.is_some(), 6, "Canonical declared", "No canonical");
    e.done()
}

fn content(bundle: &AuditBundle) -> SubScoreOutcome {
    let snap = &bundle.snapshot;
    let mut e = Earned::default();
    match snap.content.word_count {
        w if w >= 1500 => e.award(10, format!("{w} words")),
        w if w >= 600 => e.award(7, format!("{w} words")),
        w if w >= 300 => e.award(4, format!("{w} words")),
        w => e.note(format!("Only {w} words")),
    }
    e.check(snap.heading_count(2) >= 2, 5, "Sectioned with H2s", "Few H2 sections");
    match (snap.content.has_author, snap.content.has_published_date) {
        (true, true) => e.award(5, "Author and date shown"),
        (true, false) | (false, true) => e.award(3, "Partial authorship signals"),
        (false, false) => e.note("No author or date"),
    }
    e.done()
}

fn indexation(bundle: &AuditBundle) -> SubScoreOutcome {
    let Some(presence) = &bundle.online_presence else {
        return no_presence();
    };
    let mut e = Earned::default();
    e.check(presence.indexed, 8, "Indexed", "Not indexed");
    match presence.indexed_pages {
        Some(n) if n >= 10 => e.award(4, format!("{n} indexed pages")),
        Some(n) if n >= 1 => e.award(2, format!("{n} indexed pages")),
        Some(_) | None => e.note("No indexed page count"),
    }
    e.check(
        presence.search_console_verified,
        3,
        "Search Console verified",
        "Search Console not verified",
    );
    e.done()
}

fn trust(bundle: &AuditBundle) -> SubScoreOutcome {
    let Some(domain) = &bundle.domain else {
        return SubScoreOutcome::NoData("No domain registration data available".into());
    };
    let mut e = Earned::default();
    match domain.age_years(bundle.snapshot.fetched_at) {
        Some(age) if age >= 5.0 => e.award(8, format!("Domain is {age:.0} years old")),
        Some(age) if age >= 2.0 => e.award(5, format!("Domain is {age:.0} years old")),
        Some(age) if age >= 1.0 => e.award(2, format!("Domain is {age:.0} years old")),
        Some(_) => e.note("Domain is under a year old"),
        None => e.note("Registration date unknown"),
    }
    let secure = bundle.snapshot.uses_https() && bundle.tls.as_ref().is_some_and(|t| t.valid);
    e.check(secure, 4, "Valid HTTPS", "HTTPS missing or certificate invalid");
    e.check(!bundle.is_threat_listed(), 3, "No threat listings", "Threat-listed");
    e.done()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::Snapshot;

    #[test]
    fn indexation_needs_presence_data() {
        let bundle = AuditBundle::from_snapshot(Snapshot::new("https://example.com"));
        assert!(matches!(indexation(&bundle), SubScoreOutcome::NoData(_)));
        assert!(matches!(trust(&bundle), SubScoreOutcome::NoData(_)));
    }

    #[test]
    fn on_page_tops_out_at_its_max() {
        let mut snap = Snapshot::new("https://example.com");
        snap.meta.title = Some("A".repeat(45));
        snap.meta.description = Some("B".repeat(100));
        snap.meta.canonical = Some("https://example.com/".into());
        snap.headings.push(sitelens_common::Heading { level: 1, text: "Hi".into() });
        match on_page(&AuditBundle::from_snapshot(snap)) {
            SubScoreOutcome::Scored { points, .. } => assert_eq!(points, 25),
            other => panic!("unexpected {other:?}"),
        }
    }
}
