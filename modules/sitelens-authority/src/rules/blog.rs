use sitelens_common::{AuditBundle, AuthorityKind, BlogInventory};

use crate::protocol::{ActionPlans, Earned, RuleSet, SubScoreOutcome, SubScorer, VerdictThresholds};

pub(super) fn rules() -> RuleSet {
    RuleSet {
        kind: AuthorityKind::Blog,
        title: "Blog Authority",
        sub_scorers: vec![
            SubScorer {
                key: "publishing_volume",
                label: "Publishing volume",
                max: 25,
                weak_insight: "Too few posts to build topical authority.",
                evaluate: publishing_volume,
            },
            SubScorer {
                key: "freshness",
                label: "Freshness",
                max: 25,
                weak_insight: "The blog has not been updated recently.",
                evaluate: freshness,
            },
            SubScorer {
                key: "depth",
                label: "Post depth",
                max: 20,
                weak_insight: "Posts are short and unlikely to rank.",
                evaluate: depth,
            },
            SubScorer {
                key: "authorship",
                label: "Authorship",
                max: 15,
                weak_insight: "Posts lack visible, credible authors.",
                evaluate: authorship,
            },
            SubScorer {
                key: "distribution",
                label: "Distribution",
                max: 15,
                weak_insight: "Readers have no feed or social channel to follow new posts.",
                evaluate: distribution,
            },
        ],
        weak_ratio: 0.5,
        strong_insight: "The blog is active, deep and well attributed.",
        action_plans: ActionPlans {
            approve: vec![
                "Keep the publishing cadence and refresh top posts yearly.",
                "Interlink related posts into topic clusters.",
            ],
            strengthen: vec![
                "Commit to a fixed publishing schedule.",
                "Expand the best-performing posts into long-form guides.",
                "Add author bios with credentials.",
            ],
            rebuild: vec![
                "Start a blog on the questions customers ask most.",
                "Publish at least two in-depth posts a month.",
                "Offer an RSS feed and share each post on social channels.",
            ],
        },
        thresholds: VerdictThresholds::default(),
    }
}

fn blog(bundle: &AuditBundle) -> Result<&BlogInventory, SubScoreOutcome> {
    bundle
        .snapshot
        .blog
        .as_ref()
        .ok_or_else(|| SubScoreOutcome::NoData("No blog found".into()))
}

fn publishing_volume(bundle: &AuditBundle) -> SubScoreOutcome {
    let blog = match blog(bundle) {
        Ok(b) => b,
        Err(no_data) => return no_data,
    };
    let mut e = Earned::default();
    let n = blog.post_count;
    let points = match n {
        n if n >= 50 => 25,
        n if n >= 20 => 18,
        n if n >= 5 => 10,
        n if n >= 1 => 4,
        _ => 0,
    };
    e.award(points, format!("{n} posts"));
    e.done()
}

fn freshness(bundle: &AuditBundle) -> SubScoreOutcome {
    let blog = match blog(bundle) {
        Ok(b) => b,
        Err(no_data) => return no_data,
    };
    let mut e = Earned::default();
    match blog.latest_post_at {
        Some(latest) => {
            let days = (bundle.snapshot.fetched_at - latest).num_days().max(0);
            let points = match days {
                d if d <= 30 => 25,
                d if d <= 90 => 18,
                d if d <= 365 => 8,
                _ => 0,
            };
            e.award(points, format!("Last post {days} days ago"));
        }
        None => e.note("Post dates unknown"),
    }
    e.done()
}

fn depth(bundle: &AuditBundle) -> SubScoreOutcome {
    let blog = match blog(bundle) {
        Ok(b) => b,
        Err(no_data) => return no_data,
    };
    let mut e = Earned::default();
    match blog.avg_word_count {
        w if w >= 1500 => e.award(20, format!("Posts average {w} words")),
        w if w >= 800 => e.award(14, format!("Posts average {w} words")),
        w if w >= 300 => e.award(6, format!("Posts average {w} words")),
        w => e.note(format!("Posts average only {w} words")),
    }
    e.done()
}

fn authorship(bundle: &AuditBundle) -> SubScoreOutcome {
    let blog = match blog(bundle) {
        Ok(b) => b,
        Err(no_data) => return no_data,
    };
    let mut e = Earned::default();
    e.check(blog.has_author_bios, 10, "Author bios", "No author bios");
    e.check(
        bundle.snapshot.content.has_author,
        5,
        "Bylines shown",
        "No bylines",
    );
    e.done()
}

fn distribution(bundle: &AuditBundle) -> SubScoreOutcome {
    let blog = match blog(bundle) {
        Ok(b) => b,
        Err(no_data) => return no_data,
    };
    let mut e = Earned::default();
    e.check(blog.has_rss, 8, "RSS feed", "No RSS feed");
    e.check(
        !bundle.snapshot.social_profiles.is_empty(),
        7,
        "Social channels linked",
        "No social channels",
    );
    e.done()
}
