use std::time::Instant;

use tracing::info;

use sitelens_common::{
    AuditBundle, RedirectChain, RedirectVerdict, ScoringResult, ValidationCheckResult,
    ValidationSummary,
};
use sitelens_scoring::{score_all, ScoringConfig};

use crate::config::ValidatorConfig;
use crate::prober::Prober;
use crate::{consistency, markup, reachability, redirect, sanity};

/// Corrected copy of the inputs plus the evidence trail.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub bundle: AuditBundle,
    pub scores: ScoringResult,
    pub summary: ValidationSummary,
    /// `None` when network passes were skipped.
    pub redirect_chain: Option<RedirectChain>,
    /// Markup present, status below 400, and no bot challenge.
    pub snapshot_reliable: bool,
}

/// Re-check `scores` and the bundle they were computed from.
///
/// The input bundle is never mutated. Network failures degrade individual
/// checks to unverified; this function cannot fail.
pub async fn validate(
    bundle: &AuditBundle,
    scores: &ScoringResult,
    prober: &dyn Prober,
    config: &ValidatorConfig,
    scoring: &ScoringConfig,
) -> ValidationOutcome {
    let started = Instant::now();
    let mut working = bundle.clone();
    let mut checks: Vec<ValidationCheckResult> = Vec::new();

    markup::rederive(&mut working, &mut checks);

    let redirect_chain = if config.offline {
        None
    } else {
        let targets = reachability::collect_targets(&working, config);
        let urls: Vec<String> = targets.iter().map(|t| t.url.clone()).collect();

        let (outcomes, chain) = tokio::join!(
            reachability::probe_batched(prober, &urls, config),
            redirect::walk_redirects(
                prober,
                &bundle.snapshot.url,
                config.max_redirect_hops,
                config.status_timeout,
            ),
        );

        reachability::apply(&mut working, &targets, &outcomes, prober, config, &mut checks).await;
        check_final_url(&mut working, &chain, &mut checks);
        Some(chain)
    };

    consistency::check(&mut working, &mut checks);

    let sane = sanity::check(scores, scoring, config.overall_tolerance, &mut checks);
    let corrected_scores = if working != *bundle {
        score_all(&working, scoring)
    } else {
        sane
    };

    let snapshot_reliable = !working.raw_markup.trim().is_empty()
        && working.snapshot.status_code < 400
        && !working.heuristics.bot_challenge_detected;

    let summary =
        ValidationSummary::from_checks(checks, started.elapsed().as_millis() as u64);

    info!(
        url = bundle.snapshot.url.as_str(),
        total = summary.total_checks,
        verified = summary.verified,
        filtered = summary.filtered,
        verification_score = summary.verification_score,
        overall_before = scores.overall,
        overall_after = corrected_scores.overall,
        snapshot_reliable,
        duration_ms = summary.duration_ms,
        "Validation complete"
    );

    ValidationOutcome {
        bundle: working,
        scores: corrected_scores,
        summary,
        redirect_chain,
        snapshot_reliable,
    }
}

/// Compare the walked chain's destination with the crawler's final URL.
fn check_final_url(
    working: &mut AuditBundle,
    chain: &RedirectChain,
    checks: &mut Vec<ValidationCheckResult>,
) {
    let claimed = working.snapshot.effective_url().to_string();
    match (chain.verdict, chain.final_url.as_deref()) {
        (RedirectVerdict::Ok, Some(settled)) if same_url(settled, &claimed) => {
            checks.push(ValidationCheckResult::verified(
                "final_url",
                format!("settled after {} hop(s)", chain.hops.len()),
            ));
        }
        (RedirectVerdict::Ok, Some(settled)) => {
            checks.push(ValidationCheckResult::corrected(
                "final_url",
                format!("snapshot claimed {claimed}, redirects settle on {settled}"),
            ));
            working.snapshot.final_url = settled.to_string();
        }
        (verdict, _) => checks.push(ValidationCheckResult::unverified(
            "final_url",
            format!("redirect chain from {} is {verdict}", chain.start_url),
        )),
    }
}

fn same_url(a: &str, b: &str) -> bool {
    match (url::Url::parse(a), url::Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProber;
    use sitelens_common::testing::{healthy_bundle, thin_noindex_bundle};
    use sitelens_common::{Axis, RedirectHop};

    fn offline() -> ValidatorConfig {
        ValidatorConfig::builder().offline(true).build()
    }

    #[tokio::test]
    async fn offline_run_skips_the_network() {
        let bundle = healthy_bundle();
        let scoring = ScoringConfig::default();
        let scores = score_all(&bundle, &scoring);
        let prober = MockProber::new();

        let outcome = validate(&bundle, &scores, &prober, &offline(), &scoring).await;

        assert!(prober.calls().is_empty());
        assert_eq!(outcome.redirect_chain, None);
        assert_eq!(outcome.bundle, bundle);
        assert_eq!(outcome.scores, scores);
        assert_eq!(outcome.summary.filtered, 0);
        assert_eq!(outcome.summary.verification_score, 100);
        assert!(outcome.snapshot_reliable);
    }

    #[tokio::test]
    async fn input_bundle_is_left_untouched() {
        let bundle = thin_noindex_bundle();
        let mut tampered = bundle.clone();
        tampered.snapshot.meta.robots = None;
        let snapshot_before = tampered.clone();
        let scoring = ScoringConfig::default();
        let scores = score_all(&tampered, &scoring);

        let outcome = validate(&tampered, &scores, &MockProber::new(), &offline(), &scoring).await;

        assert_eq!(tampered, snapshot_before);
        assert!(outcome.bundle.snapshot.is_noindex());
        assert!(outcome.scores.score_of(Axis::Seo) < scores.score_of(Axis::Seo));
    }

    #[tokio::test]
    async fn unreliable_when_blocked_or_empty() {
        let scoring = ScoringConfig::default();
        let mut bundle = healthy_bundle();
        bundle.heuristics.bot_challenge_detected = true;
        let scores = score_all(&bundle, &scoring);
        let outcome = validate(&bundle, &scores, &MockProber::new(), &offline(), &scoring).await;
        assert!(!outcome.snapshot_reliable);

        let mut bundle = healthy_bundle();
        bundle.raw_markup.clear();
        let scores = score_all(&bundle, &scoring);
        let outcome = validate(&bundle, &scores, &MockProber::new(), &offline(), &scoring).await;
        assert!(!outcome.snapshot_reliable);
    }

    #[test]
    fn final_url_drift_is_corrected() {
        let mut bundle = healthy_bundle();
        let chain = RedirectChain {
            start_url: "https://example.com/".into(),
            hops: vec![
                RedirectHop { url: "https://example.com/".into(), status: 301 },
                RedirectHop { url: "https://www.example.com/".into(), status: 200 },
            ],
            final_url: Some("https://www.example.com/".into()),
            verdict: RedirectVerdict::Ok,
        };
        let mut checks = Vec::new();
        check_final_url(&mut bundle, &chain, &mut checks);
        assert_eq!(bundle.snapshot.final_url, "https://www.example.com/");
        assert!(checks[0].is_correction());
    }

    #[test]
    fn trailing_slash_is_not_drift() {
        assert!(same_url("https://example.com", "https://example.com/"));
        assert!(!same_url("https://example.com/", "https://www.example.com/"));
    }
}
