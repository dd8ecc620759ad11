use sitelens_common::{AuditBundle, BandTable, CategoryScore};

use super::Tally;

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    if bundle.tls.is_none() && bundle.security_headers.is_none() {
        return CategoryScore::no_data("No certificate or security header data available");
    }

    let mut t = Tally::default();
    t.check(
        bundle.snapshot.uses_https(),
        20,
        "Served over HTTPS",
        "Not served over HTTPS",
    );

    match &bundle.tls {
        Some(tls) => {
            t.check(tls.valid, 20, "TLS certificate is valid", "TLS certificate is invalid");
            match tls.days_until_expiry {
                Some(days) if days > 30 => {
                    t.award(5, format!("Certificate expires in {days} days"))
                }
                Some(days) => t.note(format!("Certificate expires in {days} days")),
                None => t.note("Certificate expiry unknown"),
            }
        }
        None => t.note("No certificate data"),
    }

    match &bundle.security_headers {
        Some(h) => {
            t.check(
                h.hsts,
                15,
                "Strict-Transport-Security set",
                "Strict-Transport-Security missing",
            );
            t.check(h.csp, 10, "Content-Security-Policy set", "Content-Security-Policy missing");
            t.check(h.x_frame_options, 5, "X-Frame-Options set", "X-Frame-Options missing");
            t.check(
                h.x_content_type_options,
                5,
                "X-Content-Type-Options set",
                "X-Content-Type-Options missing",
            );
            t.check(h.referrer_policy, 5, "Referrer-Policy set", "Referrer-Policy missing");
            t.check(
                h.permissions_policy,
                5,
                "Permissions-Policy set",
                "Permissions-Policy missing",
            );
        }
        None => t.note("No security header data"),
    }

    match &bundle.threat {
        Some(threat) if threat.listed => {
            t.note(format!("Listed on threat lists: {}", threat.threats.join(", ")));
            t.cap(10, "Score capped: domain is threat-listed");
        }
        Some(_) => t.award(10, "Not present on threat lists"),
        None => t.note("Threat list status unknown"),
    }

    t.finish(bands)
}
