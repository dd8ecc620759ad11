use sitelens_common::{AuditBundle, AuthorityKind};

use super::no_presence;
use crate::protocol::{ActionPlans, Earned, RuleSet, SubScoreOutcome, SubScorer, VerdictThresholds};

const ENTITY_TYPES: &[&str] = &["Organization", "LocalBusiness", "Corporation", "Person", "Brand"];
const CITABLE_TYPES: &[&str] = &[
    "Article",
    "BlogPosting",
    "NewsArticle",
    "FAQPage",
    "HowTo",
    "Product",
];

pub(super) fn rules() -> RuleSet {
    RuleSet {
        kind: AuthorityKind::Geo,
        title: "AI Search Visibility",
        sub_scorers: vec![
            SubScorer {
                key: "entity_clarity",
                label: "Entity clarity",
                max: 20,
                weak_insight: "AI assistants cannot tell clearly who is behind this site.",
                evaluate: entity_clarity,
            },
            SubScorer {
                key: "citation_worthiness",
                label: "Citation worthiness",
                max: 25,
                weak_insight: "Content lacks the depth, attribution or sourcing that gets it cited in AI answers.",
                evaluate: citation_worthiness,
            },
            SubScorer {
                key: "structured_data",
                label: "Structured data",
                max: 20,
                weak_insight: "Little machine-readable markup is available for generative engines to ground on.",
                evaluate: structured_data,
            },
            SubScorer {
                key: "crawl_access",
                label: "AI crawler access",
                max: 15,
                weak_insight: "AI crawlers are blocked or discouraged from reading the site.",
                evaluate: crawl_access,
            },
            SubScorer {
                key: "brand_footprint",
                label: "Brand footprint",
                max: 20,
                weak_insight: "The brand is rarely mentioned elsewhere on the web.",
                evaluate: brand_footprint,
            },
        ],
        weak_ratio: 0.5,
        strong_insight: "The site is well positioned to be cited by AI search engines.",
        action_plans: ActionPlans {
            approve: vec![
                "Monitor how AI assistants describe the brand each quarter.",
                "Keep Organization markup and sameAs links current.",
            ],
            strengthen: vec![
                "Add Organization JSON-LD with sameAs links to every official profile.",
                "Attribute articles to named authors with publication dates.",
                "Cite primary sources with outbound links.",
            ],
            rebuild: vec![
                "Unblock AI crawlers in robots.txt.",
                "Publish an About page that names the organisation, founders and location.",
                "Add structured data for the organisation and its key pages.",
                "Earn mentions on industry sites and directories.",
            ],
        },
        thresholds: VerdictThresholds::default(),
    }
}

fn entity_clarity(bundle: &AuditBundle) -> SubScoreOutcome {
    let snap = &bundle.snapshot;
    let mut e = Earned::default();
    e.check(
        ENTITY_TYPES.iter().any(|t| snap.has_schema_type(t)),
        8,
        "Entity schema declared",
        "No Organization or Person schema",
    );
    e.check(
        snap.meta.open_graph.is_complete(),
        4,
        "Open Graph identity complete",
        "Open Graph identity incomplete",
    );
    match snap.social_profiles.len() {
        0 => e.note("No linked social profiles"),
        1 => e.award(2, "One linked social profile"),
        n => e.award(4, format!("{n} linked social profiles")),
    }
    e.check(
        bundle.heuristics.has_contact_info,
        4,
        "Contact details published",
        "No contact details",
    );
    e.done()
}

fn citation_worthiness(bundle: &AuditBundle) -> SubScoreOutcome {
    let snap = &bundle.snapshot;
    let mut e = Earned::default();
    match snap.content.word_count {
        w if w >= 1500 => e.award(10, format!("{w} words of substance")),
        w if w >= 600 => e.award(6, format!("{w} words")),
        w if w >= 300 => e.award(3, format!("{w} words")),
        w => e.note(format!("Only {w} words")),
    }
    e.check(snap.content.has_author, 5, "Named author", "No named author");
    e.check(snap.content.has_published_date, 5, "Dated content", "Undated content");
    let external = snap.links.external.len();
    e.check(
        external >= 2,
        5,
        &format!("{external} outbound citations"),
        &format!("Only {external} outbound citations"),
    );
    e.done()
}

fn structured_data(bundle: &AuditBundle) -> SubScoreOutcome {
    let snap = &bundle.snapshot;
    let mut e = Earned::default();
    let types = snap.technical.schema_types.len();
    e.check(types > 0, 10, "Structured data present", "No structured data");
    e.check(types >= 2, 5, &format!("{types} schema types"), "Single or no schema type");
    e.check(
        CITABLE_TYPES.iter().any(|t| snap.has_schema_type(t)),
        5,
        "Content schema (Article, FAQ, HowTo or Product)",
        "No content-level schema",
    );
    e.done()
}

fn crawl_access(bundle: &AuditBundle) -> SubScoreOutcome {
    let mut e = Earned::default();
    e.check(
        !bundle.heuristics.ai_crawlers_blocked,
        8,
        "AI crawlers allowed",
        "AI crawlers blocked in robots.txt",
    );
    e.check(!bundle.snapshot.is_noindex(), 4, "Indexable", "noindex directive");
    e.check(
        bundle.snapshot.technical.has_robots_txt,
        3,
        "robots.txt published",
        "No robots.txt",
    );
    e.done()
}

fn brand_footprint(bundle: &AuditBundle) -> SubScoreOutcome {
    let Some(presence) = &bundle.online_presence else {
        return no_presence();
    };
    let mut e = Earned::default();
    match presence.brand_mentions {
        Some(n) if n >= 100 => e.award(10, format!("{n} brand mentions")),
        Some(n) if n >= 10 => e.award(6, format!("{n} brand mentions")),
        Some(n) if n >= 1 => e.award(3, format!("{n} brand mentions")),
        Some(_) | None => e.note("No brand mentions found"),
    }
    match presence.archive_snapshots {
        Some(n) if n >= 50 => e.award(5, format!("{n} archive snapshots")),
        Some(n) if n >= 1 => e.award(2, format!("{n} archive snapshots")),
        Some(_) | None => e.note("No archive history"),
    }
    match presence.backlinks.as_ref().map(|b| b.referring_domains) {
        Some(n) if n >= 50 => e.award(5, format!("{n} referring domains")),
        Some(n) if n >= 1 => e.award(2, format!("{n} referring domains")),
        Some(_) | None => e.note("No referring domain data"),
    }
    e.done()
}
