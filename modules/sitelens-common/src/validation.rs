use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const CORRECTED_PREFIX: &str = "corrected: ";
const REMOVED_PREFIX: &str = "removed: ";

/// One atomic fact re-checked by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationCheckResult {
    pub field: String,
    pub verified: bool,
    pub reason: String,
}

impl ValidationCheckResult {
    pub fn verified(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            verified: true,
            reason: reason.into(),
        }
    }

    /// Could not confirm, value left as-is.
    pub fn unverified(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            verified: false,
            reason: reason.into(),
        }
    }

    /// Value was wrong and has been replaced.
    pub fn corrected(field: &str, reason: impl AsRef<str>) -> Self {
        Self::unverified(field, format!("{CORRECTED_PREFIX}{}", reason.as_ref()))
    }

    /// Value was unconfirmable and has been dropped.
    pub fn removed(field: &str, reason: impl AsRef<str>) -> Self {
        Self::unverified(field, format!("{REMOVED_PREFIX}{}", reason.as_ref()))
    }

    pub fn is_correction(&self) -> bool {
        !self.verified
            && (self.reason.starts_with(CORRECTED_PREFIX)
                || self.reason.starts_with(REMOVED_PREFIX))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationSummary {
    pub total_checks: usize,
    pub verified: usize,
    pub unverified: usize,
    /// Unverified checks that resulted in a correction or removal.
    pub filtered: usize,
    pub verification_score: u8,
    pub duration_ms: u64,
    pub checks: Vec<ValidationCheckResult>,
}

impl ValidationSummary {
    pub fn from_checks(checks: Vec<ValidationCheckResult>, duration_ms: u64) -> Self {
        let total_checks = checks.len();
        let verified = checks.iter().filter(|c| c.verified).count();
        let filtered = checks.iter().filter(|c| c.is_correction()).count();
        Self {
            total_checks,
            verified,
            unverified: total_checks - verified,
            filtered,
            verification_score: verification_score(verified, total_checks),
            duration_ms,
            checks,
        }
    }
}

/// `round(100 * verified / total)`; an empty check list is vacuously 100.
pub fn verification_score(verified: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((verified as f64 * 100.0) / total as f64).round().clamp(0.0, 100.0) as u8
}

// --- Redirect chain ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectVerdict {
    Ok,
    RedirectLoop,
    TooManyHops,
    Unreachable,
}

impl std::fmt::Display for RedirectVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectVerdict::Ok => write!(f, "ok"),
            RedirectVerdict::RedirectLoop => write!(f, "redirect-loop"),
            RedirectVerdict::TooManyHops => write!(f, "too-many-hops"),
            RedirectVerdict::Unreachable => write!(f, "unreachable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RedirectHop {
    pub url: String,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RedirectChain {
    pub start_url: String,
    pub hops: Vec<RedirectHop>,
    /// Where the chain settled when `verdict` is `Ok`.
    pub final_url: Option<String>,
    pub verdict: RedirectVerdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_is_vacuously_verified() {
        let summary = ValidationSummary::from_checks(vec![], 0);
        assert_eq!(summary.total_checks, 0);
        assert_eq!(summary.verification_score, 100);
    }

    #[test]
    fn filtered_counts_only_corrections() {
        let checks = vec![
            ValidationCheckResult::verified("title", "found in markup"),
            ValidationCheckResult::unverified("favicon", "timed out"),
            ValidationCheckResult::corrected("canonical", "not present in markup"),
            ValidationCheckResult::removed("social_profiles", "https://x.test unreachable"),
        ];
        let summary = ValidationSummary::from_checks(checks, 12);
        assert_eq!(summary.total_checks, 4);
        assert_eq!(summary.verified, 1);
        assert_eq!(summary.unverified, 3);
        assert_eq!(summary.filtered, 2);
        assert_eq!(summary.verification_score, 25);
    }

    #[test]
    fn verification_score_rounds() {
        assert_eq!(verification_score(2, 3), 67);
        assert_eq!(verification_score(1, 3), 33);
        assert_eq!(verification_score(1, 8), 13);
    }

    #[test]
    fn redirect_verdict_serializes_kebab_case() {
        let json = serde_json::to_string(&RedirectVerdict::RedirectLoop).unwrap();
        assert_eq!(json, "\"redirect-loop\"");
    }
}
