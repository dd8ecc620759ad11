//! Test fixtures shared across crates. Enabled by the `test-support` feature.

use chrono::{DateTime, TimeZone, Utc};

use crate::types::*;

/// Fixed crawl instant used by every fixture.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn link(href: &str, text: &str) -> Link {
    Link {
        href: href.to_string(),
        text: text.to_string(),
        nofollow: false,
    }
}

fn heading(level: u8, text: &str) -> Heading {
    Heading {
        level,
        text: text.to_string(),
    }
}

fn tech(name: &str, category: &str) -> Technology {
    Technology {
        name: name.to_string(),
        category: category.to_string(),
        version: None,
        outdated: false,
    }
}

/// A well-maintained storefront at `https://example.com/`.
pub fn healthy_snapshot() -> Snapshot {
    let mut snap = Snapshot::new("https://example.com/");
    snap.fetched_at = fixed_now();
    snap.meta = PageMeta {
        title: Some("Example Widgets - Handmade Widgets for Every Home".into()),
        description: Some(
            "Handmade widgets built to last, shipped worldwide with free returns and a lifetime repair guarantee."
                .into(),
        ),
        canonical: Some("https://example.com/".into()),
        lang: Some("en".into()),
        viewport: Some("width=device-width, initial-scale=1".into()),
        charset: Some("utf-8".into()),
        robots: Some("index, follow".into()),
        favicon: Some("https://example.com/favicon.ico".into()),
        open_graph: OpenGraph {
            title: Some("Example Widgets".into()),
            description: Some("Handmade widgets built to last.".into()),
            image: Some("https://example.com/og.png".into()),
        },
        hreflang: vec![],
    };
    snap.headings = vec![
        heading(1, "Handmade Widgets"),
        heading(2, "Our Story"),
        heading(2, "Shop the Range"),
        heading(3, "Caring for Your Widget"),
    ];
    snap.links = LinkInventory {
        internal: vec![
            link("https://example.com/about", "About our workshop"),
            link("https://example.com/shop", "Browse all widgets"),
            link("https://example.com/contact", "Contact the team"),
            link("https://example.com/blog", "Read the journal"),
        ],
        external: vec![
            link("https://en.wikipedia.org/wiki/Widget", "History of widgets"),
            link("https://github.com/example/widgets", "Widget firmware source"),
        ],
    };
    snap.images = vec![
        Image {
            src: "https://example.com/img/hero.jpg".into(),
            alt: Some("A walnut widget on a workbench".into()),
        },
        Image {
            src: "https://example.com/img/range.jpg".into(),
            alt: Some("The full widget range".into()),
        },
    ];
    snap.technical = TechnicalFlags {
        has_sitemap: true,
        has_robots_txt: true,
        schema_types: vec!["Organization".into(), "FAQPage".into()],
        compression: true,
        http2: true,
    };
    snap.content = ContentStats {
        word_count: 1600,
        paragraph_count: 12,
        list_count: 2,
        has_author: true,
        has_published_date: true,
    };
    snap.social_profiles = vec![
        "https://twitter.com/example".into(),
        "https://www.linkedin.com/company/example".into(),
    ];
    snap.technologies = vec![
        tech("Cloudflare", "cdn"),
        tech("Google Analytics", "analytics"),
        tech("Google Tag Manager", "tag_manager"),
        tech("Shopify", "ecommerce"),
    ];
    snap.blog = Some(BlogInventory {
        post_count: 40,
        latest_post_at: Some(at(2026, 1, 5)),
        avg_word_count: 1200,
        has_rss: true,
        has_author_bios: true,
    });
    snap
}

/// Render HTML that agrees with every markup-derived field of `snap`.
pub fn markup_for(snap: &Snapshot) -> String {
    let mut head = String::new();
    if let Some(charset) = &snap.meta.charset {
        head.push_str(&format!("<meta charset=\"{charset}\">\n"));
    }
    if let Some(title) = &snap.meta.title {
        head.push_str(&format!("<title>{title}</title>\n"));
    }
    if let Some(description) = &snap.meta.description {
        head.push_str(&format!("<meta name=\"description\" content=\"{description}\">\n"));
    }
    if let Some(robots) = &snap.meta.robots {
        head.push_str(&format!("<meta name=\"robots\" content=\"{robots}\">\n"));
    }
    if let Some(canonical) = &snap.meta.canonical {
        head.push_str(&format!("<link rel=\"canonical\" href=\"{canonical}\">\n"));
    }
    if let Some(viewport) = &snap.meta.viewport {
        head.push_str(&format!("<meta name=\"viewport\" content=\"{viewport}\">\n"));
    }
    if !snap.technical.schema_types.is_empty() {
        let types: Vec<String> = snap
            .technical
            .schema_types
            .iter()
            .map(|t| format!("{{\"@type\":\"{t}\"}}"))
            .collect();
        head.push_str(&format!(
            "<script type=\"application/ld+json\">[{}]</script>\n",
            types.join(",")
        ));
    }
    head.push_str(
        "<script async src=\"https://www.googletagmanager.com/gtag/js?id=G-TEST\"></script>\n",
    );

    let mut body = String::new();
    for h in &snap.headings {
        body.push_str(&format!("<h{0}>{1}</h{0}>\n", h.level, h.text));
    }
    for l in snap.links.internal.iter().chain(&snap.links.external) {
        body.push_str(&format!("<a href=\"{}\">{}</a>\n", l.href, l.text));
    }
    for i in &snap.images {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            i.src,
            i.alt.as_deref().unwrap_or_default()
        ));
    }
    body.push_str("<button class=\"add-to-cart\">Add to cart</button>\n");
    body.push_str("<div id=\"cookie-consent\">We use cookies. Accept?</div>\n");

    let lang = snap.meta.lang.as_deref().unwrap_or("en");
    format!("<!doctype html>\n<html lang=\"{lang}\">\n<head>\n{head}</head>\n<body>\n{body}</body>\n</html>\n")
}

/// Every collaborator present and agreeing with the markup.
pub fn healthy_bundle() -> AuditBundle {
    let snapshot = healthy_snapshot();
    let raw_markup = markup_for(&snapshot);
    let mut bundle = AuditBundle::from_snapshot(snapshot);
    bundle.raw_markup = raw_markup;
    bundle.speed = Some(SpeedResult {
        performance_score: 92,
        lcp_ms: Some(1800),
        cls: Some(0.02),
        tbt_ms: Some(100),
        ttfb_ms: Some(300),
    });
    bundle.tls = Some(TlsInfo {
        valid: true,
        issuer: Some("Let's Encrypt".into()),
        days_until_expiry: Some(60),
    });
    bundle.domain = Some(DomainInfo {
        registered_at: Some(at(2015, 3, 1)),
        expires_at: Some(at(2027, 3, 1)),
        registrar: Some("Example Registrar".into()),
    });
    bundle.security_headers = Some(SecurityHeaders {
        hsts: true,
        csp: true,
        x_frame_options: true,
        x_content_type_options: true,
        referrer_policy: true,
        permissions_policy: true,
    });
    bundle.threat = Some(ThreatListResult::default());
    bundle.dns = Some(DnsRecords {
        a: vec!["23.227.38.65".into()],
        aaaa: vec![],
        mx: vec!["10 mx.example.com".into()],
        ns: vec!["ns1.shopify.com".into(), "ns2.shopify.com".into()],
        txt: vec!["v=spf1 include:_spf.example.com ~all".into()],
        dmarc: Some("v=DMARC1; p=reject".into()),
        caa: vec!["0 issue \"letsencrypt.org\"".into()],
    });
    bundle.markup_validation = Some(MarkupValidation {
        errors: 0,
        warnings: 3,
    });
    bundle.heuristics = PageHeuristics {
        analytics_tags: vec!["Google Analytics".into()],
        has_cookie_banner: true,
        has_privacy_policy: true,
        has_terms: true,
        has_contact_info: true,
        has_physical_address: true,
        faq_detected: true,
        ..PageHeuristics::default()
    };
    bundle.online_presence = Some(OnlinePresence {
        indexed: true,
        indexed_pages: Some(120),
        search_console_verified: true,
        bing_verified: true,
        archive_snapshots: Some(300),
        first_archived_at: Some(at(2015, 6, 1)),
        structured_data_completeness: Some(0.9),
        brand_mentions: Some(150),
        backlinks: Some(BacklinkProfile {
            referring_domains: 250,
            total_backlinks: 4000,
            dofollow_ratio: 0.7,
            domain_rating: Some(55),
        }),
    });
    bundle.classification = Some(Classification {
        maturity: Maturity::LongEstablished,
        revenue_model: RevenueModel::Ecommerce,
        hosting_provider: Some("Shopify".into()),
        industry: Some("Retail".into()),
    });
    bundle
}

/// The healthy bundle, but noindexed with twenty words and no canonical.
pub fn thin_noindex_bundle() -> AuditBundle {
    let mut bundle = healthy_bundle();
    let snap = &mut bundle.snapshot;
    snap.meta.robots = Some("noindex, nofollow".into());
    snap.meta.canonical = None;
    snap.content.word_count = 20;
    snap.content.paragraph_count = 1;
    bundle.raw_markup = markup_for(&bundle.snapshot);
    bundle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_now_is_deterministic() {
        assert_eq!(fixed_now(), fixed_now());
        assert_eq!(fixed_now().to_rfc3339(), "2026-01-15T12:00:00+00:00");
    }

    #[test]
    fn markup_mirrors_snapshot_fields() {
        let bundle = thin_noindex_bundle();
        assert!(bundle.raw_markup.contains("noindex, nofollow"));
        assert!(!bundle.raw_markup.contains("rel=\"canonical\""));
        assert_eq!(bundle.raw_markup.matches("<h2>").count(), 2);
    }
}
