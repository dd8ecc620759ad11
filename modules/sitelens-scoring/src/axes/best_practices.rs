use sitelens_common::{AuditBundle, BandTable, CategoryScore};

use super::Tally;

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    let snap = &bundle.snapshot;
    let h = &bundle.heuristics;
    let mut t = Tally::default();

    t.check(snap.uses_https(), 15, "HTTPS in use", "HTTPS not in use");
    t.check(
        h.mixed_content_count == 0,
        15,
        "No mixed content",
        &format!("{} mixed-content resources", h.mixed_content_count),
    );

    match &bundle.markup_validation {
        Some(v) if v.errors == 0 => t.award(20, "Markup validates without errors"),
        Some(v) if v.errors <= 10 => t.award(10, format!("{} markup validation errors", v.errors)),
        Some(v) => t.note(format!("{} markup validation errors", v.errors)),
        None => t.note("Markup validation not available"),
    }

    t.check(
        snap.meta.charset.is_some(),
        10,
        "Character set declared",
        "Character set not declared",
    );
    t.check(snap.meta.viewport.is_some(), 10, "Responsive viewport", "No responsive viewport");
    t.check(
        h.console_error_count == 0,
        10,
        "No console errors",
        &format!("{} console errors", h.console_error_count),
    );

    if h.analytics_tags.is_empty() {
        t.award(10, "No tracking requiring consent");
    } else {
        t.check(
            h.has_cookie_banner,
            10,
            "Consent banner shown for analytics",
            "Analytics run without a consent banner",
        );
    }

    t.check(snap.meta.favicon.is_some(), 10, "Favicon present", "No favicon");

    t.finish(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::{MarkupValidation, Snapshot};

    #[test]
    fn analytics_without_consent_loses_points() {
        let mut bundle = AuditBundle::from_snapshot(Snapshot::new("https://example.com"));
        bundle.markup_validation = Some(MarkupValidation::default());
        bundle.snapshot.meta.charset = Some("utf-8".into());
        bundle.snapshot.meta.viewport = Some("width=device-width".into());
        bundle.snapshot.meta.favicon = Some("/favicon.ico".into());
        assert_eq!(score(&bundle, &BandTable::default()).score, 100);

        bundle.heuristics.analytics_tags = vec!["Google Analytics".into()];
        assert_eq!(score(&bundle, &BandTable::default()).score, 90);
    }
}
