use sitelens_common::{AuditBundle, BandTable, CategoryScore};

use super::Tally;

/// Below this word count a page is thin content and capped.
pub const THIN_CONTENT_WORDS: u32 = 100;

pub fn score(bundle: &AuditBundle, bands: &BandTable) -> CategoryScore {
    let snap = &bundle.snapshot;
    let c = &snap.content;
    let mut t = Tally::default();

    match c.word_count {
        w if w >= 1500 => t.award(30, format!("{w} words of content")),
        w if w >= 600 => t.award(22, format!("{w} words of content")),
        w if w >= 300 => t.award(12, format!("{w} words of content")),
        w => t.note(format!("Only {w} words of content")),
    }

    t.check(
        c.paragraph_count >= 5,
        10,
        &format!("{} paragraphs", c.paragraph_count),
        &format!("Only {} paragraphs", c.paragraph_count),
    );
    let h2 = snap.heading_count(2);
    t.check(
        h2 >= 2,
        10,
        &format!("{h2} H2 sections"),
        &format!("Only {h2} H2 sections"),
    );
    t.check(!snap.images.is_empty(), 5, "Supporting images present", "No images");
    t.check(c.has_author, 10, "Author attribution", "No author attribution");
    t.check(c.has_published_date, 10, "Publication date shown", "No publication date");
    t.check(
        snap.meta.open_graph.is_complete(),
        10,
        "Open Graph tags complete",
        "Open Graph tags incomplete",
    );
    t.check(
        snap.meta.description.is_some(),
        5,
        "Meta description summarises the page",
        "No meta description",
    );
    let internal = snap.links.internal.len();
    t.check(
        internal >= 3,
        10,
        &format!("{internal} internal links"),
        &format!("Only {internal} internal links"),
    );

    if c.word_count < THIN_CONTENT_WORDS {
        t.cap(20, "Score capped: thin content");
    }

    t.finish(bands)
}
