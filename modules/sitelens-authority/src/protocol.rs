use tracing::debug;

use sitelens_common::{
    AuditBundle, AuthorityKind, AuthorityReport, AuthoritySubScore, BandTable, Verdict,
};

/// Result of one sub-scorer.
#[derive(Debug, Clone, PartialEq)]
pub enum SubScoreOutcome {
    /// Inputs missing; excluded from the total and rescaled around.
    NoData(String),
    Scored { points: u32, details: Vec<String> },
}

/// One named, bounded component of an authority report.
pub struct SubScorer {
    pub key: &'static str,
    pub label: &'static str,
    pub max: u32,
    /// Insight emitted when this sub-score lands below `weak_ratio * max`.
    pub weak_insight: &'static str,
    pub evaluate: fn(&AuditBundle) -> SubScoreOutcome,
}

/// Step function from overall to verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictThresholds {
    pub approve: u32,
    pub strengthen: u32,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            approve: 70,
            strengthen: 50,
        }
    }
}

/// Action plan template per verdict.
#[derive(Debug, Clone, Default)]
pub struct ActionPlans {
    pub approve: Vec<&'static str>,
    pub strengthen: Vec<&'static str>,
    pub rebuild: Vec<&'static str>,
}

impl ActionPlans {
    fn for_verdict(&self, verdict: Verdict) -> &[&'static str] {
        match verdict {
            Verdict::Approve => &self.approve,
            Verdict::Strengthen => &self.strengthen,
            Verdict::Rebuild => &self.rebuild,
        }
    }
}

/// Declarative description of one authority lens.
pub struct RuleSet {
    pub kind: AuthorityKind,
    pub title: &'static str,
    pub sub_scorers: Vec<SubScorer>,
    /// A sub-score below this share of its max counts as weak.
    pub weak_ratio: f64,
    /// Emitted when no sub-score is weak.
    pub strong_insight: &'static str,
    pub action_plans: ActionPlans,
    pub thresholds: VerdictThresholds,
}

impl RuleSet {
    /// Sum of declared maxima.
    pub fn max_total(&self) -> u32 {
        self.sub_scorers.iter().map(|s| s.max).sum()
    }
}

pub fn verdict_for(overall: u32, thresholds: &VerdictThresholds) -> Verdict {
    if overall >= thresholds.approve {
        Verdict::Approve
    } else if overall >= thresholds.strengthen {
        Verdict::Strengthen
    } else {
        Verdict::Rebuild
    }
}

/// Run every sub-scorer of `rules` against `bundle` and assemble the report.
pub fn score_authority(
    rules: &RuleSet,
    bundle: &AuditBundle,
    bands: &BandTable,
) -> AuthorityReport {
    let outcomes: Vec<(&SubScorer, SubScoreOutcome)> = rules
        .sub_scorers
        .iter()
        .map(|s| (s, (s.evaluate)(bundle)))
        .collect();

    let computable: Vec<u32> = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, SubScoreOutcome::Scored { .. }))
        .map(|(s, _)| s.max)
        .collect();
    let mut scaled_maxima = rescale_maxima(&computable).into_iter();

    let categories: Vec<AuthoritySubScore> = outcomes
        .into_iter()
        .map(|(scorer, outcome)| match outcome {
            SubScoreOutcome::NoData(reason) => AuthoritySubScore {
                key: scorer.key.to_string(),
                label: scorer.label.to_string(),
                score: 0,
                max: 0,
                details: vec![reason],
                no_data: true,
            },
            SubScoreOutcome::Scored { points, details } => {
                let max = scaled_maxima.next().unwrap_or(scorer.max);
                AuthoritySubScore {
                    key: scorer.key.to_string(),
                    label: scorer.label.to_string(),
                    score: scale_points(points, scorer.max, max),
                    max,
                    details,
                    no_data: false,
                }
            }
        })
        .collect();

    let overall: u32 = categories.iter().map(|c| c.score).sum();
    let verdict = verdict_for(overall, &rules.thresholds);
    let (_, color) = bands.classify(overall.min(100) as u8);
    let insights = select_insights(rules, &categories);
    let action_plan = rules
        .action_plans
        .for_verdict(verdict)
        .iter()
        .map(|s| s.to_string())
        .collect();

    debug!(
        kind = %rules.kind,
        overall,
        %verdict,
        no_data = categories.iter().filter(|c| c.no_data).count(),
        "Scored authority report"
    );

    AuthorityReport {
        kind: rules.kind,
        title: rules.title.to_string(),
        overall,
        color,
        verdict,
        categories,
        insights,
        action_plan,
    }
}

/// Scale computable maxima so they sum to 100. The rounding remainder goes
/// to the last entry. Identity when they already sum to 100.
fn rescale_maxima(maxima: &[u32]) -> Vec<u32> {
    let total: u32 = maxima.iter().sum();
    if total == 0 {
        return maxima.iter().map(|_| 0).collect();
    }
    let mut scaled: Vec<u32> = maxima.iter().map(|m| m * 100 / total).collect();
    let remainder = 100 - scaled.iter().sum::<u32>();
    if let Some(last) = scaled.last_mut() {
        *last += remainder;
    }
    scaled
}

fn scale_points(points: u32, declared_max: u32, scaled_max: u32) -> u32 {
    if declared_max == 0 {
        return 0;
    }
    let points = points.min(declared_max);
    if declared_max == scaled_max {
        return points;
    }
    let scaled = (points as f64 * scaled_max as f64 / declared_max as f64).round() as u32;
    scaled.min(scaled_max)
}

fn select_insights(rules: &RuleSet, categories: &[AuthoritySubScore]) -> Vec<String> {
    let mut insights: Vec<String> = rules
        .sub_scorers
        .iter()
        .zip(categories)
        .filter(|(_, c)| !c.no_data && (c.score as f64) < rules.weak_ratio * c.max as f64)
        .map(|(s, _)| s.weak_insight.to_string())
        .collect();

    if insights.is_empty() && categories.iter().any(|c| !c.no_data) {
        insights.push(rules.strong_insight.to_string());
    }

    insights.extend(
        categories
            .iter()
            .filter(|c| c.no_data)
            .map(|c| format!("{} could not be evaluated: {}", c.label, c.details.join("; "))),
    );
    insights
}

/// Points accumulator for sub-scorers.
#[derive(Debug, Default)]
pub(crate) struct Earned {
    points: u32,
    details: Vec<String>,
}

impl Earned {
    pub(crate) fn award(&mut self, points: u32, detail: impl Into<String>) {
        self.points += points;
        self.details.push(detail.into());
    }

    pub(crate) fn note(&mut self, detail: impl Into<String>) {
        self.details.push(detail.into());
    }

    pub(crate) fn check(&mut self, condition: bool, points: u32, pass: &str, fail: &str) {
        if condition {
            self.award(points, pass);
        } else {
            self.note(fail);
        }
    }

    pub(crate) fn done(self) -> SubScoreOutcome {
        SubScoreOutcome::Scored {
            points: self.points,
            details: self.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::Snapshot;

    fn full(_: &AuditBundle) -> SubScoreOutcome {
        SubScoreOutcome::Scored {
            points: 40,
            details: vec![],
        }
    }

    fn half(_: &AuditBundle) -> SubScoreOutcome {
        SubScoreOutcome::Scored {
            points: 10,
            details: vec![],
        }
    }

    fn missing(_: &AuditBundle) -> SubScoreOutcome {
        SubScoreOutcome::NoData("no presence data".into())
    }

    fn rules(third: fn(&AuditBundle) -> SubScoreOutcome) -> RuleSet {
        RuleSet {
            kind: AuthorityKind::Seo,
            title: "Test",
            sub_scorers: vec![
                SubScorer {
                    key: "a",
                    label: "A",
                    max: 40,
                    weak_insight: "A is weak",
                    evaluate: full,
                },
                SubScorer {
                    key: "b",
                    label: "B",
                    max: 20,
                    weak_insight: "B is weak",
                    evaluate: half,
                },
                SubScorer {
                    key: "c",
                    label: "C",
                    max: 40,
                    weak_insight: "C is weak",
                    evaluate: third,
                },
            ],
            weak_ratio: 0.6,
            strong_insight: "All strong",
            action_plans: ActionPlans {
                approve: vec!["keep going"],
                strengthen: vec!["tighten up"],
                rebuild: vec!["start over"],
            },
            thresholds: VerdictThresholds::default(),
        }
    }

    fn bundle() -> AuditBundle {
        AuditBundle::from_snapshot(Snapshot::new("https://example.com"))
    }

    #[test]
    fn verdict_breakpoints() {
        let t = VerdictThresholds::default();
        assert_eq!(verdict_for(100, &t), Verdict::Approve);
        assert_eq!(verdict_for(70, &t), Verdict::Approve);
        assert_eq!(verdict_for(69, &t), Verdict::Strengthen);
        assert_eq!(verdict_for(50, &t), Verdict::Strengthen);
        assert_eq!(verdict_for(49, &t), Verdict::Rebuild);
        assert_eq!(verdict_for(0, &t), Verdict::Rebuild);
    }

    #[test]
    fn overall_is_sum_of_sub_scores() {
        let report = score_authority(&rules(full), &bundle(), &BandTable::default());
        assert_eq!(report.overall, 40 + 10 + 40);
        assert_eq!(report.overall, report.categories.iter().map(|c| c.score).sum::<u32>());
        assert_eq!(report.verdict, Verdict::Approve);
        assert_eq!(report.action_plan, vec!["keep going"]);
        assert_eq!(report.insights, vec!["B is weak"]);
    }

    #[test]
    fn no_data_rescales_remaining_maxima() {
        let report = score_authority(&rules(missing), &bundle(), &BandTable::default());
        let c = report.sub_score("c").unwrap();
        assert!(c.no_data);
        assert_eq!(c.score, 0);

        // 40 + 20 computable -> 66 + 34 (remainder on the last)
        let a = report.sub_score("a").unwrap();
        let b = report.sub_score("b").unwrap();
        assert_eq!((a.max, b.max), (66, 34));
        assert_eq!(a.score, 66);
        assert_eq!(b.score, 17);
        assert_eq!(report.overall, 83);
        assert!(report
            .insights
            .iter()
            .any(|i| i.starts_with("C could not be evaluated")));
    }

    #[test]
    fn strong_insight_when_nothing_is_weak() {
        let mut set = rules(full);
        set.sub_scorers.remove(1);
        let report = score_authority(&set, &bundle(), &BandTable::default());
        assert_eq!(report.insights, vec!["All strong"]);
    }

    #[test]
    fn rescale_is_identity_at_hundred() {
        assert_eq!(rescale_maxima(&[25, 25, 20, 15, 15]), vec![25, 25, 20, 15, 15]);
        assert!(rescale_maxima(&[]).is_empty());
    }

    #[test]
    fn points_are_clamped_to_declared_max() {
        assert_eq!(scale_points(50, 40, 40), 40);
        assert_eq!(scale_points(50, 40, 80), 80);
    }
}
