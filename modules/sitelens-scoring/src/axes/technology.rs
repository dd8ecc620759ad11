use sitelens_common::{AuditBundle, BandTable, CategoryScore};

use super::Tally;

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    let snap = &bundle.snapshot;
    let mut t = Tally::default();

    t.check(
        !snap.technologies.is_empty(),
        10,
        &format!("{} technologies detected", snap.technologies.len()),
        "No technologies detected",
    );
    t.check(snap.has_technology_category("cdn"), 20, "Served through a CDN", "No CDN detected");
    t.check(
        !bundle.heuristics.analytics_tags.is_empty() || snap.has_technology_category("analytics"),
        20,
        "Analytics installed",
        "No analytics detected",
    );
    t.check(
        snap.has_technology_category("tag_manager"),
        10,
        "Tag manager in use",
        "No tag manager",
    );

    let outdated: Vec<&str> = snap
        .technologies
        .iter()
        .filter(|tech| tech.outdated)
        .map(|tech| tech.name.as_str())
        .collect();
    if outdated.is_empty() {
        t.award(20, "No outdated components detected");
    } else {
        t.note(format!("Outdated components: {}", outdated.join(", ")));
    }

    t.check(snap.technical.compression, 10, "Responses are compressed", "No response compression");
    t.check(snap.technical.http2, 10, "HTTP/2 or newer", "HTTP/1.x only");

    t.finish(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelens_common::{Snapshot, Technology};

    #[test]
    fn outdated_component_is_named_in_evidence() {
        let mut snap = Snapshot::new("https://example.com");
        snap.technologies = vec![Technology {
            name: "jQuery".into(),
            category: "javascript_library".into(),
            version: Some("1.8.3".into()),
            outdated: true,
        }];
        let c = score(&AuditBundle::from_snapshot(snap), &BandTable::default());
        assert_eq!(c.score, 10);
        assert!(c.details.iter().any(|d| d == "Outdated components: jQuery"));
    }
}
