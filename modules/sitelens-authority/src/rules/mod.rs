//! The five authority lenses. Each module only declares data; scoring goes
//! through [`crate::protocol::score_authority`].

mod aeo;
mod backlink;
mod blog;
mod geo;
mod seo;

use sitelens_common::{AuditBundle, AuthorityKind, AuthorityReport, BandTable};

use crate::protocol::{score_authority, RuleSet, SubScoreOutcome};

/// Rule set for one authority lens.
pub fn rule_set(kind: AuthorityKind) -> RuleSet {
    match kind {
        AuthorityKind::Seo => seo::rules(),
        AuthorityKind::Geo => geo::rules(),
        AuthorityKind::Aeo => aeo::rules(),
        AuthorityKind::Backlink => backlink::rules(),
        AuthorityKind::Blog => blog::rules(),
    }
}

/// Score all five lenses, in [`AuthorityKind::ALL`] order.
pub fn score_all_authorities(bundle: &AuditBundle, bands: &BandTable) -> Vec<AuthorityReport> {
    AuthorityKind::ALL
        .iter()
        .map(|kind| score_authority(&rule_set(*kind), bundle, bands))
        .collect()
}

fn no_presence() -> SubScoreOutcome {
    SubScoreOutcome::NoData("No online-presence data available".into())
}

/// Headings phrased as a question.
pub(crate) fn question_headings(bundle: &AuditBundle) -> usize {
    const QUESTION_WORDS: &[&str] = &[
        "how", "what", "why", "when", "where", "who", "which", "can", "does", "is", "should",
    ];
    bundle
        .snapshot
        .headings
        .iter()
        .filter(|h| h.level > 1)
        .filter(|h| {
            let text = h.text.trim().to_lowercase();
            text.ends_with('?')
                || text
                    .split_whitespace()
                    .next()
                    .is_some_and(|w| QUESTION_WORDS.contains(&w))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::{Heading, Snapshot};

    #[test]
    fn every_rule_set_declares_a_hundred_points() {
        for kind in AuthorityKind::ALL {
            let rules = rule_set(kind);
            assert_eq!(rules.kind, kind);
            assert_eq!(rules.max_total(), 100, "{kind}");
            assert!(!rules.action_plans.approve.is_empty());
            assert!(!rules.action_plans.strengthen.is_empty());
            assert!(!rules.action_plans.rebuild.is_empty());
        }
    }

    #[test]
    fn sub_score_keys_are_unique_per_rule_set() {
        for kind in AuthorityKind::ALL {
            let rules = rule_set(kind);
            let mut keys: Vec<_> = rules.sub_scorers.iter().map(|s| s.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), rules.sub_scorers.len(), "{kind}");
        }
    }

    #[test]
    fn question_headings_match_phrasing() {
        let mut snap = Snapshot::new("https://example.com");
        snap.headings = vec![
            Heading { level: 1, text: "How it works".into() },
            Heading { level: 2, text: "How do I clean a widget?".into() },
            Heading { level: 2, text: "Shipping".into() },
            Heading { level: 3, text: "Returns policy?".into() },
            Heading { level: 2, text: "What is included".into() },
        ];
        assert_eq!(question_headings(&AuditBundle::from_snapshot(snap)), 3);
    }
}
