//! Authority reports: one scoring protocol shared by five declarative rule sets.

pub mod protocol;
pub mod rules;

pub use protocol::{
    score_authority, verdict_for, ActionPlans, RuleSet, SubScoreOutcome, SubScorer,
    VerdictThresholds,
};
pub use rules::{rule_set, score_all_authorities};
