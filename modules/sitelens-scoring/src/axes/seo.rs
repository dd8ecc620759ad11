use sitelens_common::{AuditBundle, BandTable, CategoryScore};

use super::Tally;

pub const TITLE_LEN: std::ops::RangeInclusive<usize> = 30..=60;
pub const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 70..=160;

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    let snap = &bundle.snapshot;
    let mut t = Tally::default();

    match snap.meta.title.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(title) => {
            t.award(10, "Page has a title");
            let len = title.chars().count();
            t.check(
                TITLE_LEN.contains(&len),
                5,
                &format!("Title length {len} is within 30-60 characters"),
                &format!("Title length {len} is outside 30-60 characters"),
            );
        }
        None => t.note("Missing page title"),
    }

    match snap.meta.description.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(desc) => {
            t.award(10, "Page has a meta description");
            let len = desc.chars().count();
            t.check(
                DESCRIPTION_LEN.contains(&len),
                5,
                &format!("Meta description length {len} is within 70-160 characters"),
                &format!("Meta description length {len} is outside 70-160 characters"),
            );
        }
        None => t.note("Missing meta description"),
    }

    match snap.heading_count(1) {
        1 => t.award(10, "Exactly one H1 heading"),
        0 => t.note("No H1 heading"),
        n => t.award(5, format!("{n} H1 headings (one expected)")),
    }

    t.check(snap.meta.canonical.is_some(), 10, "Canonical URL declared", "No canonical URL");
    t.check(snap.technical.has_sitemap, 10, "XML sitemap found", "No XML sitemap");
    t.check(snap.technical.has_robots_txt, 5, "robots.txt found", "No robots.txt");
    t.check(
        snap.has_structured_data(),
        10,
        "Structured data present",
        "No structured data",
    );
    t.check(
        !snap.is_noindex(),
        10,
        "Page is indexable",
        "Page carries a noindex directive",
    );
    t.check(
        snap.status_code == 200,
        5,
        "HTTP 200 response",
        &format!("HTTP {} response", snap.status_code),
    );

    match snap.alt_coverage() {
        Some(ratio) if ratio >= 0.9 => {
            t.award(5, format!("{:.0}% of images have alt text", ratio * 100.0))
        }
        Some(ratio) => t.note(format!("Only {:.0}% of images have alt text", ratio * 100.0)),
        None => t.award(5, "No images requiring alt text"),
    }

    let internal = snap.links.internal.len();
    t.check(
        internal >= 3,
        5,
        &format!("{internal} internal links"),
        &format!("Only {internal} internal links"),
    );

    if snap.is_noindex() {
        t.cap(20, "Score capped: page is excluded from search indexes");
    }

    t.finish(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::{ColorBand, Heading, Snapshot};

    fn strong_snapshot() -> Snapshot {
        let mut snap = Snapshot::new("https://example.com");
        snap.meta.title = Some("Example Widgets - Handmade widgets since 1999".into());
        snap.meta.description = Some(
            "Example Widgets builds durable handmade widgets for workshops, schools and hobbyists worldwide."
                .into(),
        );
        snap.meta.canonical = Some("https://example.com/".into());
        snap.headings = vec![Heading { level: 1, text: "Widgets".into() }];
        snap.technical.has_sitemap = true;
        snap.technical.has_robots_txt = true;
        snap.technical.schema_types = vec!["Organization".into()];
        snap.links.internal = (0..5)
            .map(|i| sitelens_common::Link {
                href: format!("/p{i}"),
                text: format!("Page {i}"),
                nofollow: false,
            })
            .collect();
        snap
    }

    #[test]
    fn well_formed_page_scores_full() {
        let bundle = AuditBundle::from_snapshot(strong_snapshot());
        let c = score(&bundle, &BandTable::default());
        assert_eq!(c.score, 100);
    }

    #[test]
    fn noindex_caps_into_lowest_band() {
        let mut snap = strong_snapshot();
        snap.meta.robots = Some("noindex".into());
        let c = score(&AuditBundle::from_snapshot(snap), &BandTable::default());
        assert_eq!(c.score, 20);
        assert_eq!(c.color, ColorBand::Red);
    }

    #[test]
    fn multiple_h1_gets_partial_credit() {
        let mut snap = strong_snapshot();
        snap.headings.push(Heading { level: 1, text: "Again".into() });
        let c = score(&AuditBundle::from_snapshot(snap), &BandTable::default());
        assert_eq!(c.score, 95);
    }
}
