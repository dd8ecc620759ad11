//! Live reachability probing of externally observable claims.
//!
//! Probes run in fixed-size batches; each batch completes before the next
//! starts, so worst-case wall clock is `ceil(n / batch) * probe_timeout`.

use futures::future::join_all;
use tracing::{debug, info};

use sitelens_common::{AuditBundle, ValidationCheckResult};

use crate::config::ValidatorConfig;
use crate::prober::{ProbeOutcome, Prober};

/// What a probed URL stands for in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Favicon,
    SocialProfile,
    ExternalLink,
    Image,
    OgImage,
    Canonical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: TargetKind,
    /// Value as it appears in the snapshot.
    pub claimed: String,
    /// Absolute URL actually probed.
    pub url: String,
}

/// Probe one URL under the configured timeout. Never fails.
pub async fn probe_with_timeout(
    prober: &dyn Prober,
    url: &str,
    config: &ValidatorConfig,
) -> ProbeOutcome {
    match tokio::time::timeout(config.probe_timeout, prober.probe(url)).await {
        Ok(outcome) => outcome,
        Err(_) => ProbeOutcome::Unreachable("timed out".to_string()),
    }
}

/// Probe `urls` in batches of `config.batch_size`. Output order matches input.
pub async fn probe_batched(
    prober: &dyn Prober,
    urls: &[String],
    config: &ValidatorConfig,
) -> Vec<ProbeOutcome> {
    let mut outcomes = Vec::with_capacity(urls.len());
    for (i, batch) in urls.chunks(config.batch_size.max(1)).enumerate() {
        let results = join_all(
            batch
                .iter()
                .map(|url| probe_with_timeout(prober, url, config)),
        )
        .await;
        debug!(
            batch = i,
            size = batch.len(),
            reachable = results.iter().filter(|r| r.is_reachable()).count(),
            "Probe batch complete"
        );
        outcomes.extend(results);
    }
    outcomes
}

/// Resolve `href` against `base`; only http(s) results are probeable.
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = match url::Url::parse(href) {
        Ok(u) => u,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(base).ok()?.join(href).ok()?
        }
        Err(_) => return None,
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Every reachability target claimed by the snapshot, in probe order.
pub fn collect_targets(bundle: &AuditBundle, config: &ValidatorConfig) -> Vec<Target> {
    let snap = &bundle.snapshot;
    let base = snap.effective_url();
    let mut targets = Vec::new();

    let mut push = |kind: TargetKind, claimed: &str| {
        if let Some(url) = absolutize(base, claimed) {
            targets.push(Target {
                kind,
                claimed: claimed.to_string(),
                url,
            });
        }
    };

    if let Some(favicon) = &snap.meta.favicon {
        push(TargetKind::Favicon, favicon);
    }
    for profile in &snap.social_profiles {
        push(TargetKind::SocialProfile, profile);
    }
    for link in snap.links.external.iter().take(config.max_external_links) {
        push(TargetKind::ExternalLink, &link.href);
    }
    for image in snap.images.iter().take(config.max_images) {
        push(TargetKind::Image, &image.src);
    }
    if let Some(og) = &snap.meta.open_graph.image {
        push(TargetKind::OgImage, og);
    }
    if let Some(canonical) = &snap.meta.canonical {
        push(TargetKind::Canonical, canonical);
    }
    targets
}

/// Apply probe outcomes to the working copy. A failed favicon gets one more
/// probe at `<origin>/favicon.ico` before it is dropped.
pub async fn apply(
    working: &mut AuditBundle,
    targets: &[Target],
    outcomes: &[ProbeOutcome],
    prober: &dyn Prober,
    config: &ValidatorConfig,
    checks: &mut Vec<ValidationCheckResult>,
) {
    let mut dead_profiles = Vec::new();
    let (mut links_probed, mut links_dead) = (0u32, 0u32);
    let (mut images_probed, mut images_dead) = (0u32, 0u32);

    for (target, outcome) in targets.iter().zip(outcomes) {
        let reachable = outcome.is_reachable();
        let reason = outcome.describe();
        match target.kind {
            TargetKind::Favicon if reachable => {
                checks.push(ValidationCheckResult::verified("meta.favicon", reason));
            }
            TargetKind::Favicon => {
                let fallback = working.snapshot.origin().map(|o| format!("{o}/favicon.ico"));
                let mut replaced = None;
                if let Some(f) = fallback.filter(|f| *f != target.url) {
                    if probe_with_timeout(prober, &f, config).await.is_reachable() {
                        replaced = Some(f);
                    }
                }
                match replaced {
                    Some(f) => {
                        checks.push(ValidationCheckResult::corrected(
                            "meta.favicon",
                            format!("{} {reason}; replaced with {f}", target.url),
                        ));
                        working.snapshot.meta.favicon = Some(f);
                    }
                    None => {
                        checks.push(ValidationCheckResult::removed(
                            "meta.favicon",
                            format!("{} {reason}", target.url),
                        ));
                        working.snapshot.meta.favicon = None;
                    }
                }
            }
            TargetKind::SocialProfile if reachable => {
                checks.push(ValidationCheckResult::verified(
                    "social_profiles",
                    format!("{} {reason}", target.url),
                ));
            }
            TargetKind::SocialProfile => {
                checks.push(ValidationCheckResult::removed(
                    "social_profiles",
                    format!("{} {reason}", target.url),
                ));
                dead_profiles.push(target.claimed.clone());
            }
            TargetKind::ExternalLink => {
                links_probed += 1;
                if reachable {
                    checks.push(ValidationCheckResult::verified(
                        "links.external",
                        format!("{} {reason}", target.url),
                    ));
                } else {
                    links_dead += 1;
                    checks.push(ValidationCheckResult::unverified(
                        "links.external",
                        format!("{} {reason}", target.url),
                    ));
                }
            }
            TargetKind::Image => {
                images_probed += 1;
                if reachable {
                    checks.push(ValidationCheckResult::verified(
                        "images",
                        format!("{} {reason}", target.url),
                    ));
                } else {
                    images_dead += 1;
                    checks.push(ValidationCheckResult::unverified(
                        "images",
                        format!("{} {reason}", target.url),
                    ));
                }
            }
            TargetKind::OgImage if reachable => {
                checks.push(ValidationCheckResult::verified("meta.open_graph.image", reason));
            }
            TargetKind::OgImage => {
                checks.push(ValidationCheckResult::removed(
                    "meta.open_graph.image",
                    format!("{} {reason}", target.url),
                ));
                working.snapshot.meta.open_graph.image = None;
            }
            TargetKind::Canonical if reachable => {
                checks.push(ValidationCheckResult::verified("meta.canonical", reason));
            }
            TargetKind::Canonical => {
                checks.push(ValidationCheckResult::removed(
                    "meta.canonical",
                    format!("{} {reason}", target.url),
                ));
                working.snapshot.meta.canonical = None;
            }
        }
    }

    working
        .snapshot
        .social_profiles
        .retain(|p| !dead_profiles.contains(p));

    if links_probed > 0 {
        working.heuristics.link_rot_ratio = Some(links_dead as f64 / links_probed as f64);
    }
    if images_probed > 0 {
        working.heuristics.broken_image_count = Some(images_dead);
    }

    info!(
        url = working.snapshot.url.as_str(),
        targets = targets.len(),
        links_dead,
        images_dead,
        profiles_dropped = dead_profiles.len(),
        "Reachability pass complete"
    );
}
