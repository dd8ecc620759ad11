use sitelens_common::{AuditBundle, BandTable, CategoryScore, Snapshot};

use super::{proportional, Tally};

const VAGUE_LINK_TEXT: &[&str] = &["click here", "here", "read more", "more", "link", "this"];

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    let snap = &bundle.snapshot;
    let mut t = Tally::default();

    t.check(
        snap.meta.lang.as_deref().is_some_and(|l| !l.trim().is_empty()),
        15,
        "Page language declared",
        "Page language not declared",
    );

    match snap.alt_coverage() {
        Some(ratio) => t.award(
            proportional(ratio, 30),
            format!("{:.0}% of images have alt text", ratio * 100.0),
        ),
        None => t.award(30, "No images requiring alt text"),
    }

    t.check(
        heading_hierarchy_ok(snap),
        15,
        "Heading levels are sequential",
        "Heading levels skip or lack an H1",
    );

    match snap.meta.viewport.as_deref() {
        Some(vp) => {
            t.award(10, "Viewport meta tag present");
            let lowered = vp.to_ascii_lowercase().replace(' ', "");
            t.check(
                !lowered.contains("user-scalable=no") && !lowered.contains("maximum-scale=1"),
                5,
                "Zoom is not disabled",
                "Viewport disables zoom",
            );
        }
        None => t.note("No viewport meta tag"),
    }

    match descriptive_link_ratio(snap) {
        Some(ratio) => t.award(
            proportional(ratio, 15),
            format!("{:.0}% of links have descriptive text", ratio * 100.0),
        ),
        None => t.award(15, "No links to evaluate"),
    }

    t.check(
        snap.meta.title.as_deref().is_some_and(|s| !s.trim().is_empty()),
        10,
        "Document title present",
        "Document title missing",
    );

    t.finish(bands)
}

/// An H1 exists and no level is skipped on the way down (h2 -> h4 is a skip).
pub fn heading_hierarchy_ok(snap: &Snapshot) -> bool {
    if snap.heading_count(1) == 0 {
        return false;
    }
    let mut previous = 0u8;
    for heading in &snap.headings {
        if heading.level > previous + 1 {
            return false;
        }
        previous = heading.level;
    }
    true
}

fn descriptive_link_ratio(snap: &Snapshot) -> Option<f64> {
    let links: Vec<_> = snap
        .links
        .internal
        .iter()
        .chain(snap.links.external.iter())
        .collect();
    if links.is_empty() {
        return None;
    }
    let descriptive = links
        .iter()
        .filter(|l| {
            let text = l.text.trim().to_lowercase();
            !text.is_empty() && !VAGUE_LINK_TEXT.contains(&text.as_str())
        })
        .count();
    Some(descriptive as f64 / links.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::{Heading, Image, Link};

    fn heading(level: u8) -> Heading {
        Heading { level, text: format!("h{level}") }
    }

    #[test]
    fn skipped_heading_level_fails_hierarchy() {
        let mut snap = Snapshot::new("https://example.com");
        snap.headings = vec![heading(1), heading(2), heading(4)];
        assert!(!heading_hierarchy_ok(&snap));
        snap.headings = vec![heading(1), heading(2), heading(3), heading(2)];
        assert!(heading_hierarchy_ok(&snap));
    }

    #[test]
    fn vague_link_text_lowers_score() {
        let mut snap = Snapshot::new("https://example.com");
        snap.meta.lang = Some("en".into());
        snap.meta.title = Some("Title".into());
        snap.meta.viewport = Some("width=device-width, initial-scale=1".into());
        snap.headings = vec![heading(1)];
        snap.images = vec![Image { src: "/a.png".into(), alt: Some("A".into()) }];
        snap.links.internal = vec![
            Link { href: "/a".into(), text: "Pricing".into(), nofollow: false },
            Link { href: "/b".into(), text: "click here".into(), nofollow: false },
        ];
        let c = score(&AuditBundle::from_snapshot(snap), &BandTable::default());
        assert_eq!(c.score, 93);
    }
}
