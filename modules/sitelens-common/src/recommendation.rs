use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scores::Axis;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: critical=0 < high=1 < medium=2 < low=3.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    pub category: Axis,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub remediation: String,
    pub effort: Effort,
}

impl Recommendation {
    /// Stable key an external sync layer uses to match the same issue across runs.
    pub fn identity_key(&self) -> String {
        format!("{}::{}", self.category, normalize_title(&self.title))
    }
}

fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

// --- Treatment plan ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhaseId {
    Urgent,
    Foundational,
    Advanced,
}

impl PhaseId {
    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::Critical | Priority::High => PhaseId::Urgent,
            Priority::Medium => PhaseId::Foundational,
            Priority::Low => PhaseId::Advanced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Phase {
    pub id: PhaseId,
    pub steps: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TreatmentPlan {
    pub phases: Vec<Phase>,
    pub total_steps: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str) -> Recommendation {
        Recommendation {
            category: Axis::Seo,
            priority: Priority::High,
            title: title.to_string(),
            description: String::new(),
            remediation: String::new(),
            effort: Effort::Easy,
        }
    }

    #[test]
    fn identity_key_normalizes_case_and_whitespace() {
        assert_eq!(rec("Add a  Page Title ").identity_key(), "seo::add a page title");
        assert_eq!(
            rec("Add a page title").identity_key(),
            rec("add A   page title").identity_key()
        );
    }

    #[test]
    fn priority_rank_order() {
        assert!(Priority::Critical.rank() < Priority::High.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert!(Priority::Critical < Priority::Low);
    }

    #[test]
    fn phase_is_pure_function_of_priority() {
        assert_eq!(PhaseId::for_priority(Priority::Critical), PhaseId::Urgent);
        assert_eq!(PhaseId::for_priority(Priority::High), PhaseId::Urgent);
        assert_eq!(PhaseId::for_priority(Priority::Medium), PhaseId::Foundational);
        assert_eq!(PhaseId::for_priority(Priority::Low), PhaseId::Advanced);
    }
}
