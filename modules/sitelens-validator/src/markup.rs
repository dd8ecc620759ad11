//! Independent re-scan of raw markup. Catches extractor bugs by re-deriving
//! the facts the scorer leaned on hardest; when the two disagree, markup wins.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use sitelens_common::{AuditBundle, Heading, ValidationCheckResult};

// =============================================================================
// Regex Patterns
// =============================================================================

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static RE_META: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<meta\s[^>]*>").unwrap());
static RE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<link\s[^>]*>").unwrap());
static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])(?:\s[^>]*)?>(.*?)</h[1-6]\s*>").unwrap()
});
static RE_HTML_LANG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<html\s[^>]*?\slang\s*=\s*["']([^"']+)["']"#).unwrap()
});
static RE_JSON_LD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script[^>]*type\s*=\s*["']application/ld\+json["']"#).unwrap()
});
static RE_MICRODATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<[a-z][^>]*\sitemscope[\s>=]").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

// Attribute names must follow whitespace so `data-name=` never reads as `name=`.
static RE_ATTR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\sname\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static RE_ATTR_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\scontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static RE_ATTR_REL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\srel\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static RE_ATTR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\shref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Quoted value of one attribute inside a single tag.
fn attr(tag: &str, re: &Regex) -> Option<String> {
    let caps = re.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Facts re-derived from raw markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupFacts {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub lang: Option<String>,
    pub headings: Vec<Heading>,
    pub has_structured_data: bool,
}

impl MarkupFacts {
    pub fn heading_count(&self, level: u8) -> usize {
        self.headings.iter().filter(|h| h.level == level).count()
    }

    pub fn is_noindex(&self) -> bool {
        self.robots
            .as_deref()
            .is_some_and(|r| r.to_ascii_lowercase().contains("noindex"))
    }
}

/// Re-scan raw markup.
pub fn scan(markup: &str) -> MarkupFacts {
    let mut facts = MarkupFacts {
        title: RE_TITLE
            .captures(markup)
            .map(|c| normalize(&c[1]))
            .filter(|t| !t.is_empty()),
        ..MarkupFacts::default()
    };

    for m in RE_META.find_iter(markup) {
        let tag = m.as_str();
        let Some(name) = attr(tag, &RE_ATTR_NAME) else {
            continue;
        };
        match name.to_ascii_lowercase().as_str() {
            "description" if facts.description.is_none() => {
                facts.description = attr(tag, &RE_ATTR_CONTENT).map(|c| normalize(&c));
            }
            "robots" if facts.robots.is_none() => facts.robots = attr(tag, &RE_ATTR_CONTENT),
            _ => {}
        }
    }

    facts.canonical = RE_LINK.find_iter(markup).find_map(|m| {
        let tag = m.as_str();
        let rel = attr(tag, &RE_ATTR_REL)?;
        rel.eq_ignore_ascii_case("canonical")
            .then(|| attr(tag, &RE_ATTR_HREF))
            .flatten()
            .map(|h| h.trim().to_string())
    });

    facts.lang = RE_HTML_LANG
        .captures(markup)
        .map(|c| c[1].trim().to_string());

    facts.headings = RE_HEADING
        .captures_iter(markup)
        .filter_map(|c| {
            let level = c[1].parse().ok()?;
            Some(Heading {
                level,
                text: normalize(&RE_TAG.replace_all(&c[2], " ")),
            })
        })
        .collect();

    facts.has_structured_data = has_structured_data(markup);
    facts
}

/// JSON-LD or microdata anywhere in the markup.
pub fn has_structured_data(markup: &str) -> bool {
    RE_JSON_LD.is_match(markup) || RE_MICRODATA.is_match(markup)
}

/// Collapse whitespace and decode the handful of entities extractors commonly emit.
pub fn normalize(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compare the snapshot's claimed structural facts against the markup and
/// correct the working copy where they disagree.
pub fn rederive(working: &mut AuditBundle, checks: &mut Vec<ValidationCheckResult>) {
    if working.raw_markup.trim().is_empty() {
        checks.push(ValidationCheckResult::unverified(
            "markup",
            "no raw markup available; structural facts not re-derived",
        ));
        return;
    }

    let facts = scan(&working.raw_markup);
    let meta = &mut working.snapshot.meta;

    reconcile_text("meta.title", &mut meta.title, facts.title.clone(), checks);
    reconcile_text(
        "meta.description",
        &mut meta.description,
        facts.description.clone(),
        checks,
    );
    reconcile_text("meta.canonical", &mut meta.canonical, facts.canonical.clone(), checks);
    reconcile_text("meta.lang", &mut meta.lang, facts.lang.clone(), checks);

    let claimed_noindex = working.snapshot.is_noindex();
    if claimed_noindex == facts.is_noindex() {
        checks.push(ValidationCheckResult::verified(
            "meta.robots",
            format!("noindex={claimed_noindex} matches markup"),
        ));
    } else {
        checks.push(ValidationCheckResult::corrected(
            "meta.robots",
            format!(
                "snapshot noindex={claimed_noindex}, markup noindex={}",
                facts.is_noindex()
            ),
        ));
        working.snapshot.meta.robots = facts.robots.clone();
    }

    let snap = &working.snapshot;
    let claimed = (snap.heading_count(1), snap.heading_count(2));
    let found = (facts.heading_count(1), facts.heading_count(2));
    if claimed == found {
        checks.push(ValidationCheckResult::verified(
            "headings",
            format!("{} H1 / {} H2 match markup", found.0, found.1),
        ));
    } else {
        checks.push(ValidationCheckResult::corrected(
            "headings",
            format!(
                "snapshot claimed {} H1 / {} H2, markup has {} H1 / {} H2",
                claimed.0, claimed.1, found.0, found.1
            ),
        ));
        working.snapshot.headings = facts.headings;
    }

    debug!(
        url = working.snapshot.url.as_str(),
        structured_data = facts.has_structured_data,
        "Re-derived structural facts from markup"
    );
}

fn reconcile_text(
    field: &str,
    claimed: &mut Option<String>,
    found: Option<String>,
    checks: &mut Vec<ValidationCheckResult>,
) {
    let claimed_norm = claimed.as_deref().map(normalize).filter(|s| !s.is_empty());
    match (claimed_norm, found) {
        (None, None) => {}
        (Some(c), Some(f)) if c == f => {
            checks.push(ValidationCheckResult::verified(field, "present in markup"));
        }
        (Some(c), Some(f)) => {
            checks.push(ValidationCheckResult::corrected(
                field,
                format!("snapshot had {c:?}, markup has {f:?}"),
            ));
            *claimed = Some(f);
        }
        (None, Some(f)) => {
            checks.push(ValidationCheckResult::corrected(
                field,
                format!("missing from snapshot, markup has {f:?}"),
            ));
            *claimed = Some(f);
        }
        (Some(c), None) => {
            checks.push(ValidationCheckResult::removed(
                field,
                format!("{c:?} not present in markup"),
            ));
            *claimed = None;
        }
    }
}
