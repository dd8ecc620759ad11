use sitelens_common::{AuditBundle, AuthorityKind};

use super::{no_presence, question_headings};
use crate::protocol::{ActionPlans, Earned, RuleSet, SubScoreOutcome, SubScorer, VerdictThresholds};

pub(super) fn rules() -> RuleSet {
    RuleSet {
        kind: AuthorityKind::Aeo,
        title: "Answer Engine Readiness",
        sub_scorers: vec![
            SubScorer {
                key: "question_coverage",
                label: "Question coverage",
                max: 25,
                weak_insight: "The page rarely addresses the questions visitors ask.",
                evaluate: question_coverage,
            },
            SubScorer {
                key: "concise_answers",
                label: "Concise answers",
                max: 20,
                weak_insight: "Answers are buried in long text instead of short paragraphs and lists.",
                evaluate: concise_answers,
            },
            SubScorer {
                key: "faq_schema",
                label: "FAQ and HowTo markup",
                max: 20,
                weak_insight: "No FAQ or HowTo markup tells answer engines where the answers are.",
                evaluate: faq_schema,
            },
            SubScorer {
                key: "snippet_readiness",
                label: "Snippet readiness",
                max: 20,
                weak_insight: "Page structure makes featured snippets unlikely.",
                evaluate: snippet_readiness,
            },
            SubScorer {
                key: "search_visibility",
                label: "Search visibility",
                max: 15,
                weak_insight: "The site is not visible enough in search to be picked as an answer.",
                evaluate: search_visibility,
            },
        ],
        weak_ratio: 0.5,
        strong_insight: "Content is structured to be lifted directly into answers.",
        action_plans: ActionPlans {
            approve: vec![
                "Refresh FAQ answers when products or policies change.",
                "Track featured snippet wins for target questions.",
            ],
            strengthen: vec![
                "Rephrase section headings as the questions customers ask.",
                "Open each section with a two-sentence direct answer.",
                "Mark up question-and-answer sections with FAQPage schema.",
            ],
            rebuild: vec![
                "Collect the top questions from support and sales.",
                "Publish an FAQ page answering each in under fifty words.",
                "Add FAQPage and HowTo structured data.",
            ],
        },
        thresholds: VerdictThresholds::default(),
    }
}

fn question_coverage(bundle: &AuditBundle) -> SubScoreOutcome {
    let mut e = Earned::default();
    match question_headings(bundle) {
        n if n >= 5 => e.award(15, format!("{n} question headings")),
        n if n >= 2 => e.award(10, format!("{n} question headings")),
        1 => e.award(5, "One question heading"),
        _ => e.note("No question headings"),
    }
    e.check(
        bundle.heuristics.faq_detected,
        10,
        "FAQ section detected",
        "No FAQ section",
    );
    e.done()
}

fn concise_answers(bundle: &AuditBundle) -> SubScoreOutcome {
    let snap = &bundle.snapshot;
    let mut e = Earned::default();
    e.check(
        snap.content.paragraph_count >= 5,
        8,
        "Content broken into paragraphs",
        "Few paragraphs",
    );
    e.check(snap.content.list_count >= 1, 6, "Uses lists", "No lists");
    let summary_len = snap
        .meta
        .description
        .as_deref()
        .map(|d| d.trim().chars().count())
        .unwrap_or(0);
    e.check(
        (70..=160).contains(&summary_len),
        6,
        "Concise page summary",
        "No concise page summary",
    );
    e.done()
}

fn faq_schema(bundle: &AuditBundle) -> SubScoreOutcome {
    let snap = &bundle.snapshot;
    let mut e = Earned::default();
    e.check(snap.has_schema_type("FAQPage"), 12, "FAQPage schema", "No FAQPage schema");
    e.check(
        snap.has_schema_type("HowTo") || snap.has_schema_type("QAPage"),
        8,
        "HowTo or QAPage schema",
        "No HowTo or QAPage schema",
    );
    e.done()
}

fn snippet_readiness(bundle: &AuditBundle) -> SubScoreOutcome {
    let snap = &bundle.snapshot;
    let mut e = Earned::default();
    e.check(snap.heading_count(1) == 1, 5, "Single H1", "H1 missing or duplicated");
    e.check(snap.heading_count(2) >= 2, 5, "Sectioned with H2s", "Few H2 sections");
    let title_len = snap
        .meta
        .title
        .as_deref()
        .map(|t| t.trim().chars().count())
        .unwrap_or(0);
    e.check(
        (30..=60).contains(&title_len),
        5,
        "Snippet-sized title",
        "Title missing or poorly sized",
    );
    match &bundle.speed {
        Some(speed) => e.check(
            speed.performance_score >= 50,
            5,
            "Fast enough to be featured",
            "Slow page",
        ),
        None => e.note("No speed test result"),
    }
    e.done()
}

fn search_visibility(bundle: &AuditBundle) -> SubScoreOutcome {
    let Some(presence) = &bundle.online_presence else {
        return no_presence();
    };
    let mut e = Earned::default();
    e.check(presence.indexed, 8, "Indexed", "Not indexed");
    e.check(
        presence.search_console_verified,
        4,
        "Search Console verified",
        "Search Console not verified",
    );
    e.check(presence.bing_verified, 3, "Bing verified", "Bing not verified");
    e.done()
}
