//! End-to-end audit pipeline: score, validate, recommend, plan, and run the
//! authority lenses over the corrected bundle.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use sitelens_authority::score_all_authorities;
use sitelens_common::recover::parse_object;
use sitelens_common::{
    AuditBundle, AuthorityReport, Config, OnlinePresence, Recommendation, RedirectChain,
    ScoringResult, TreatmentPlan, ValidationSummary,
};
use sitelens_scoring::{build_plan, generate, score_all, ScoringConfig};
use sitelens_validator::{validate, Prober, ValidatorConfig};

/// Knobs for one audit run.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct AuditOptions {
    #[builder(default)]
    pub validator: ValidatorConfig,
    #[builder(default)]
    pub scoring: ScoringConfig,
}

impl From<&Config> for AuditOptions {
    fn from(config: &Config) -> Self {
        Self {
            validator: ValidatorConfig::from(config),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Validator output as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    /// Scores recomputed from the corrected bundle.
    pub scores: ScoringResult,
    pub summary: ValidationSummary,
    pub redirect_chain: Option<RedirectChain>,
    pub snapshot_reliable: bool,
}

/// Everything one audit run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub url: String,
    /// Scores as first computed, before validation.
    pub scores: ScoringResult,
    pub validation: ValidationReport,
    pub recommendations: Vec<Recommendation>,
    pub treatment_plan: TreatmentPlan,
    pub authority: Vec<AuthorityReport>,
}

/// Run the whole pipeline. Individual failures degrade single facts or
/// axes; the report shape is always complete.
pub async fn run_audit(
    bundle: &AuditBundle,
    options: &AuditOptions,
    prober: &dyn Prober,
) -> AuditReport {
    let run_id = Uuid::new_v4();
    let url = bundle.snapshot.url.clone();
    info!(%run_id, url = url.as_str(), offline = options.validator.offline, "Starting audit");

    let scores = score_all(bundle, &options.scoring);
    let outcome = validate(bundle, &scores, prober, &options.validator, &options.scoring).await;

    if !outcome.snapshot_reliable {
        warn!(
            url = url.as_str(),
            "Snapshot judged unreliable; markup-derived recommendations skipped"
        );
    }

    let recommendations = generate(&outcome.bundle, &outcome.scores, outcome.snapshot_reliable);
    let treatment_plan = build_plan(&recommendations);
    let authority = score_all_authorities(&outcome.bundle, &options.scoring.bands);

    info!(
        %run_id,
        url = url.as_str(),
        overall = outcome.scores.overall,
        recommendations = recommendations.len(),
        verification_score = outcome.summary.verification_score,
        "Audit complete"
    );

    AuditReport {
        run_id,
        generated_at: Utc::now(),
        url,
        scores,
        validation: ValidationReport {
            scores: outcome.scores,
            summary: outcome.summary,
            redirect_chain: outcome.redirect_chain,
            snapshot_reliable: outcome.snapshot_reliable,
        },
        recommendations,
        treatment_plan,
        authority,
    }
}

/// Parse a bundle document, optionally overlaying an online-presence payload
/// recovered from free-form upstream text.
pub fn load_bundle(raw: &str, presence: Option<&str>) -> Result<AuditBundle> {
    let mut bundle: AuditBundle =
        serde_json::from_str(raw).context("Failed to parse audit bundle")?;

    if let Some(presence) = presence {
        let recovered = parse_object::<OnlinePresence>(presence)
            .context("Failed to recover online-presence payload")?;
        info!(stage = ?recovered.stage, "Loaded online presence");
        bundle.online_presence = Some(recovered.value);
    }

    Ok(bundle)
}

/// JSON schema of [`AuditReport`].
pub fn report_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(AuditReport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::testing::healthy_bundle;

    #[test]
    fn options_follow_environment_config() {
        let config = Config {
            probe_batch_size: 0,
            offline: true,
            ..Config::default()
        };
        let options = AuditOptions::from(&config);
        assert!(options.validator.offline);
        assert_eq!(options.validator.batch_size, 1);
    }

    #[test]
    fn bundle_round_trips_through_loader() {
        let bundle = healthy_bundle();
        let raw = serde_json::to_string(&bundle).unwrap();
        assert_eq!(load_bundle(&raw, None).unwrap(), bundle);
    }

    #[test]
    fn fenced_presence_payload_is_recovered() {
        let mut bundle = healthy_bundle();
        bundle.online_presence = None;
        let raw = serde_json::to_string(&bundle).unwrap();
        let presence = "Here you go:\n```json\n{\"indexed\": true, \"indexed_pages\": 12}\n```";

        let loaded = load_bundle(&raw, Some(presence)).unwrap();
        let presence = loaded.online_presence.unwrap();
        assert!(presence.indexed);
        assert_eq!(presence.indexed_pages, Some(12));
    }

    #[test]
    fn garbage_bundle_is_an_error() {
        assert!(load_bundle("not json", None).is_err());
    }

    #[test]
    fn schema_names_top_level_sections() {
        let schema = serde_json::to_value(report_schema()).unwrap();
        let props = schema["properties"].as_object().unwrap();
        for key in [
            "run_id",
            "scores",
            "validation",
            "recommendations",
            "treatment_plan",
            "authority",
        ] {
            assert!(props.contains_key(key), "missing {key}");
        }
    }
}
