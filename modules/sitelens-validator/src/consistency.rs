//! Cross-field consistency rules. A derived claim with no independent
//! corroborating signal is downgraded or dropped; live markup evidence beats
//! heuristic classification.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use sitelens_common::{AuditBundle, Maturity, RevenueModel, ValidationCheckResult};

use crate::markup;

// =============================================================================
// Regex Patterns
// =============================================================================

static RE_COMMERCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)add[\s_-]?to[\s_-]?(?:cart|basket|bag)|checkout|shopping[\s_-]?(?:cart|bag)|/cart\b").unwrap()
});
static RE_CONSENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cookie|consent|gdpr|onetrust|cookiebot|usercentrics").unwrap()
});

const COMMERCE_PLATFORMS: &[&str] = &[
    "shopify",
    "woocommerce",
    "magento",
    "bigcommerce",
    "prestashop",
    "salesforce commerce",
    "ecwid",
    "wix stores",
    "squarespace commerce",
];

/// Known analytics vendors and the markup fingerprints that prove them.
const ANALYTICS_SIGNATURES: &[(&str, &[&str])] = &[
    ("google analytics", &["gtag(", "googletagmanager.com", "google-analytics.com"]),
    ("google tag manager", &["googletagmanager.com"]),
    ("plausible", &["plausible.io"]),
    ("matomo", &["matomo"]),
    ("facebook pixel", &["fbq(", "connect.facebook.net"]),
    ("meta pixel", &["fbq(", "connect.facebook.net"]),
    ("hotjar", &["hotjar"]),
];

/// Infrastructure fingerprints that corroborate a hosting provider anywhere.
fn provider_fingerprints(provider: &str) -> &'static [&'static str] {
    match provider.to_ascii_lowercase().as_str() {
        "aws" | "amazon" | "amazon web services" => &["awsdns", "amazonaws", "cloudfront"],
        "google cloud" | "gcp" => &["googledomains", "googleusercontent", "storage.googleapis"],
        "azure" | "microsoft azure" => &["azure-dns", "azurewebsites", "azureedge"],
        "digitalocean" => &["digitalocean"],
        _ => &[],
    }
}

/// The provider name as a whole word, so "aws" never matches inside "laws".
fn provider_name_pattern(provider: &str) -> Option<Regex> {
    let name = provider.trim();
    if name.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name))).ok()
}

/// Apply every consistency rule to the working copy. Markup-backed rules
/// are skipped when there is no markup to consult.
pub fn check(working: &mut AuditBundle, checks: &mut Vec<ValidationCheckResult>) {
    let has_markup = !working.raw_markup.trim().is_empty();
    let before = checks.len();

    check_maturity(working, checks);
    check_revenue_model(working, has_markup, checks);
    check_hosting_provider(working, has_markup, checks);
    if has_markup {
        check_cookie_banner(working, checks);
        check_analytics(working, checks);
        check_structured_data(working, checks);
    }

    debug!(
        url = working.snapshot.url.as_str(),
        checks = checks.len() - before,
        corrections = checks[before..].iter().filter(|c| c.is_correction()).count(),
        "Consistency rules applied"
    );
}

/// Minimum registration age in calendar years for a maturity tier, if any.
fn minimum_age(maturity: Maturity) -> Option<u32> {
    match maturity {
        Maturity::LongEstablished => Some(2),
        Maturity::Established => Some(1),
        Maturity::Growing | Maturity::Startup => None,
    }
}

fn check_maturity(working: &mut AuditBundle, checks: &mut Vec<ValidationCheckResult>) {
    let now = working.snapshot.fetched_at;
    let domain = working.domain.clone();
    let Some(classification) = working.classification.as_mut() else {
        return;
    };
    let claimed = classification.maturity;
    let Some(required) = minimum_age(claimed) else {
        return;
    };
    let old_enough = domain.as_ref().and_then(|d| d.registered_for(required, now));
    let years = domain
        .as_ref()
        .and_then(|d| d.age_years(now))
        .unwrap_or_default();

    match old_enough {
        None => checks.push(ValidationCheckResult::unverified(
            "classification.maturity",
            format!("{claimed} claimed but registration age is unknown"),
        )),
        Some(true) => checks.push(ValidationCheckResult::verified(
            "classification.maturity",
            format!("{claimed} consistent with {years:.2} years registered"),
        )),
        Some(false) => {
            let downgraded = claimed.downgraded();
            checks.push(ValidationCheckResult::corrected(
                "classification.maturity",
                format!("{claimed} needs {required} years, domain is {years:.2}; now {downgraded}"),
            ));
            classification.maturity = downgraded;
        }
    }
}

fn check_revenue_model(
    working: &mut AuditBundle,
    has_markup: bool,
    checks: &mut Vec<ValidationCheckResult>,
) {
    let platform = working.snapshot.technologies.iter().find(|t| {
        t.category.eq_ignore_ascii_case("ecommerce") || {
            let name = t.name.to_ascii_lowercase();
            COMMERCE_PLATFORMS.iter().any(|p| name.contains(p))
        }
    });
    let platform = platform.map(|t| t.name.clone());
    let vocabulary = RE_COMMERCE
        .find(&working.raw_markup)
        .map(|m| m.as_str().to_string());

    let Some(classification) = working.classification.as_mut() else {
        return;
    };
    if classification.revenue_model != RevenueModel::Ecommerce {
        return;
    }

    if let Some(name) = platform {
        checks.push(ValidationCheckResult::verified(
            "classification.revenue_model",
            format!("commerce platform {name} detected"),
        ));
    } else if let Some(found) = vocabulary {
        checks.push(ValidationCheckResult::verified(
            "classification.revenue_model",
            format!("commerce vocabulary {found:?} in markup"),
        ));
    } else if has_markup {
        checks.push(ValidationCheckResult::corrected(
            "classification.revenue_model",
            "ecommerce claimed without a commerce platform or cart vocabulary; now unknown",
        ));
        classification.revenue_model = RevenueModel::Unknown;
    } else {
        checks.push(ValidationCheckResult::unverified(
            "classification.revenue_model",
            "no commerce platform detected and no markup to corroborate",
        ));
    }
}

fn check_hosting_provider(
    working: &mut AuditBundle,
    has_markup: bool,
    checks: &mut Vec<ValidationCheckResult>,
) {
    let Some(provider) = working
        .classification
        .as_ref()
        .and_then(|c| c.hosting_provider.clone())
    else {
        return;
    };
    let fingerprints = provider_fingerprints(&provider);
    let name = provider_name_pattern(&provider);
    let matches = |haystack: &str| {
        let lower = haystack.to_ascii_lowercase();
        fingerprints.iter().any(|f| lower.contains(f))
            || name.as_ref().is_some_and(|re| re.is_match(haystack))
    };

    let via_ns = working
        .dns
        .as_ref()
        .and_then(|d| d.ns.iter().find(|ns| matches(ns)).cloned());
    let via_tech = working
        .snapshot
        .technologies
        .iter()
        .find(|t| matches(&t.name))
        .map(|t| t.name.clone());
    let via_markup = has_markup && matches(&working.raw_markup);

    let evidence = via_ns
        .map(|ns| format!("nameserver {ns}"))
        .or_else(|| via_tech.map(|t| format!("technology {t}")))
        .or_else(|| via_markup.then(|| "markup reference".to_string()));

    match evidence {
        Some(evidence) => checks.push(ValidationCheckResult::verified(
            "classification.hosting_provider",
            format!("{provider} corroborated by {evidence}"),
        )),
        None if working.dns.is_none() && !has_markup => {
            checks.push(ValidationCheckResult::unverified(
                "classification.hosting_provider",
                format!("{provider} claimed with nothing to corroborate against"),
            ))
        }
        None => {
            checks.push(ValidationCheckResult::removed(
                "classification.hosting_provider",
                format!("{provider} not found in nameservers, technologies or markup"),
            ));
            if let Some(c) = working.classification.as_mut() {
                c.hosting_provider = None;
            }
        }
    }
}

fn check_cookie_banner(working: &mut AuditBundle, checks: &mut Vec<ValidationCheckResult>) {
    if !working.heuristics.has_cookie_banner {
        return;
    }
    if RE_CONSENT.is_match(&working.raw_markup) {
        checks.push(ValidationCheckResult::verified(
            "heuristics.has_cookie_banner",
            "consent vocabulary present in markup",
        ));
    } else {
        checks.push(ValidationCheckResult::corrected(
            "heuristics.has_cookie_banner",
            "no consent vocabulary in markup; now false",
        ));
        working.heuristics.has_cookie_banner = false;
    }
}

fn check_analytics(working: &mut AuditBundle, checks: &mut Vec<ValidationCheckResult>) {
    let markup = working.raw_markup.to_ascii_lowercase();
    let mut rejected = Vec::new();

    for tag in &working.heuristics.analytics_tags {
        let name = tag.to_ascii_lowercase();
        // Unknown vendors have no fingerprint to test.
        let Some((_, signatures)) = ANALYTICS_SIGNATURES.iter().find(|(k, _)| name.contains(k))
        else {
            continue;
        };
        match signatures.iter().find(|s| markup.contains(*s)) {
            Some(sig) => checks.push(ValidationCheckResult::verified(
                "heuristics.analytics_tags",
                format!("{tag} signature {sig:?} in markup"),
            )),
            None => {
                checks.push(ValidationCheckResult::removed(
                    "heuristics.analytics_tags",
                    format!("{tag} has no signature in markup"),
                ));
                rejected.push(tag.clone());
            }
        }
    }

    working
        .heuristics
        .analytics_tags
        .retain(|t| !rejected.contains(t));
}

fn check_structured_data(working: &mut AuditBundle, checks: &mut Vec<ValidationCheckResult>) {
    let claims_types = !working.snapshot.technical.schema_types.is_empty();
    let claims_completeness = working
        .online_presence
        .as_ref()
        .is_some_and(|p| p.structured_data_completeness.is_some());
    if !claims_types && !claims_completeness {
        return;
    }

    if markup::has_structured_data(&working.raw_markup) {
        checks.push(ValidationCheckResult::verified(
            "technical.schema_types",
            "JSON-LD or microdata present in markup",
        ));
        return;
    }

    if claims_types {
        checks.push(ValidationCheckResult::removed(
            "technical.schema_types",
            format!(
                "{} claimed but markup has no JSON-LD or microdata",
                working.snapshot.technical.schema_types.join(", ")
            ),
        ));
        working.snapshot.technical.schema_types.clear();
    }
    if claims_completeness {
        checks.push(ValidationCheckResult::removed(
            "online_presence.structured_data_completeness",
            "markup has no JSON-LD or microdata",
        ));
        if let Some(p) = working.online_presence.as_mut() {
            p.structured_data_completeness = None;
        }
    }
}
