use sitelens_common::{Phase, PhaseId, Recommendation, TreatmentPlan};

/// Partition recommendations into urgent / foundational / advanced phases.
/// Input order is kept within each phase; empty phases are omitted.
pub fn build_plan(recommendations: &[Recommendation]) -> TreatmentPlan {
    let phases = [PhaseId::Urgent, PhaseId::Foundational, PhaseId::Advanced]
        .into_iter()
        .filter_map(|id| {
            let steps: Vec<Recommendation> = recommendations
                .iter()
                .filter(|r| PhaseId::for_priority(r.priority) == id)
                .cloned()
                .collect();
            (!steps.is_empty()).then_some(Phase { id, steps })
        })
        .collect();

    TreatmentPlan {
        phases,
        total_steps: recommendations.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::{Axis, Effort, Priority};

    fn rec(title: &str, priority: Priority) -> Recommendation {
        Recommendation {
            category: Axis::Seo,
            priority,
            title: title.to_string(),
            description: String::new(),
            remediation: String::new(),
            effort: Effort::Easy,
        }
    }

    #[test]
    fn critical_and_high_share_the_urgent_phase() {
        let plan = build_plan(&[
            rec("a", Priority::Critical),
            rec("b", Priority::High),
            rec("c", Priority::Low),
        ]);
        assert_eq!(plan.total_steps, 3);
        assert_eq!(plan.phases.len(), 2);
        assert_eq!(plan.phases[0].id, PhaseId::Urgent);
        assert_eq!(plan.phases[0].steps.len(), 2);
        assert_eq!(plan.phases[1].id, PhaseId::Advanced);
    }

    #[test]
    fn empty_input_has_no_phases() {
        let plan = build_plan(&[]);
        assert!(plan.phases.is_empty());
        assert_eq!(plan.total_steps, 0);
    }

    #[test]
    fn steps_keep_input_order() {
        let plan = build_plan(&[rec("first", Priority::Medium), rec("second", Priority::Medium)]);
        let titles: Vec<_> = plan.phases[0].steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
