use sitelens_common::{AuditBundle, BandTable, CategoryScore};

use super::{proportional, Tally};

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    let Some(presence) = &bundle.online_presence else {
        return CategoryScore::no_data("No online presence data available");
    };

    let mut t = Tally::default();
    t.check(presence.indexed, 30, "Indexed by search engines", "Not indexed by search engines");

    match presence.indexed_pages {
        Some(n) if n >= 10 => t.award(10, format!("{n} pages indexed")),
        Some(n) if n >= 1 => t.award(5, format!("{n} pages indexed")),
        Some(_) => t.note("No pages indexed"),
        None => t.note("Indexed page count unknown"),
    }

    t.check(
        presence.search_console_verified,
        15,
        "Verified in Google Search Console",
        "Not verified in Google Search Console",
    );
    t.check(
        presence.bing_verified,
        5,
        "Verified in Bing Webmaster Tools",
        "Not verified in Bing Webmaster Tools",
    );

    match presence.archive_snapshots {
        Some(n) if n >= 50 => t.award(15, format!("{n} web archive snapshots")),
        Some(n) if n >= 1 => t.award(8, format!("{n} web archive snapshots")),
        Some(_) => t.note("No web archive history"),
        None => t.note("Web archive history unknown"),
    }

    match presence.structured_data_completeness {
        Some(ratio) => t.award(
            proportional(ratio, 15),
            format!("Structured data {:.0}% complete", ratio.clamp(0.0, 1.0) * 100.0),
        ),
        None => t.note("Structured data completeness unknown"),
    }

    match bundle.snapshot.social_profiles.len() {
        n if n >= 2 => t.award(10, format!("{n} social profiles linked")),
        1 => t.award(5, "1 social profile linked"),
        _ => t.note("No social profiles linked"),
    }

    t.finish(bands)
}
