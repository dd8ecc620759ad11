use sitelens_common::{AuditBundle, BandTable, CategoryScore};

use super::Tally;

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    if bundle.domain.is_none() && bundle.dns.is_none() {
        return CategoryScore::no_data("No registration or DNS data available");
    }

    let now = bundle.snapshot.fetched_at;
    let h = &bundle.heuristics;
    let mut t = Tally::default();

    match bundle.domain.as_ref().and_then(|d| d.age_years(now)) {
        Some(age) if age >= 5.0 => t.award(25, format!("Domain registered {age:.1} years ago")),
        Some(age) if age >= 2.0 => t.award(15, format!("Domain registered {age:.1} years ago")),
        Some(age) if age >= 1.0 => t.award(8, format!("Domain registered {age:.1} years ago")),
        Some(age) => t.note(format!("Domain registered only {age:.1} years ago")),
        None => t.note("Domain registration date unknown"),
    }

    match bundle.domain.as_ref().and_then(|d| d.days_until_expiry(now)) {
        Some(days) if days > 365 => t.award(10, format!("Registration valid for {days} more days")),
        Some(days) if days > 30 => t.award(5, format!("Registration expires in {days} days")),
        Some(days) => t.note(format!("Registration expires in {days} days")),
        None => t.note("Registration expiry unknown"),
    }

    match &bundle.dns {
        Some(dns) => {
            t.check(dns.has_spf(), 10, "SPF record published", "No SPF record");
            t.check(dns.has_dmarc(), 10, "DMARC policy published", "No DMARC policy");
            t.check(!dns.mx.is_empty(), 5, "Mail exchangers configured", "No MX records");
        }
        None => t.note("No DNS data"),
    }

    t.check(h.has_privacy_policy, 10, "Privacy policy linked", "No privacy policy");
    t.check(h.has_terms, 5, "Terms of service linked", "No terms of service");
    t.check(h.has_contact_info, 10, "Contact information shown", "No contact information");
    t.check(
        h.has_physical_address,
        5,
        "Physical address shown",
        "No physical address",
    );

    match &bundle.threat {
        Some(threat) if threat.listed => t.note("Domain is threat-listed"),
        Some(_) => t.award(10, "Clean threat-list record"),
        None => t.note("Threat list status unknown"),
    }

    t.finish(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sitelens_common::{DnsRecords, DomainInfo, Snapshot};

    #[test]
    fn requires_domain_or_dns() {
        let bundle = AuditBundle::from_snapshot(Snapshot::new("https://example.com"));
        assert!(score(&bundle, &BandTable::default()).no_data);
    }

    #[test]
    fn age_is_measured_from_fetch_time() {
        let mut bundle = AuditBundle::from_snapshot(Snapshot::new("https://example.com"));
        let fetched = bundle.snapshot.fetched_at;
        bundle.domain = Some(DomainInfo {
            registered_at: Some(fetched - Duration::days(365 * 6)),
            expires_at: Some(fetched + Duration::days(400)),
            registrar: None,
        });
        bundle.dns = Some(DnsRecords::default());
        let c = score(&bundle, &BandTable::default());
        assert_eq!(c.score, 35);
        assert!(c.details[0].starts_with("Domain registered 6.0"));
    }
}
