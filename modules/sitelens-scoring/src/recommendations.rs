//! Ordered remediation rules. Each rule inspects the corrected bundle and
//! conditionally emits one recommendation with fixed wording; the output is
//! stably sorted by priority so ties keep declaration order.

use tracing::debug;

use sitelens_common::{AuditBundle, Axis, Effort, Priority, Recommendation, ScoringResult};

use crate::axes::accessibility::heading_hierarchy_ok;
use crate::axes::content::THIN_CONTENT_WORDS;
use crate::axes::seo::{DESCRIPTION_LEN, TITLE_LEN};

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub bundle: &'a AuditBundle,
    pub scores: &'a ScoringResult,
    pub snapshot_reliable: bool,
}

/// One remediation rule. `detect` returns the issue description when it fires.
pub struct Rule {
    pub category: Axis,
    pub priority: Priority,
    pub effort: Effort,
    /// Depends on facts extracted from page markup; skipped for unreliable crawls.
    pub markup_derived: bool,
    pub title: &'static str,
    pub remediation: &'static str,
    pub detect: fn(&RuleContext<'_>) -> Option<String>,
}

impl Rule {
    fn apply(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        if self.markup_derived && !ctx.snapshot_reliable {
            return None;
        }
        let description = (self.detect)(ctx)?;
        Some(Recommendation {
            category: self.category,
            priority: self.priority,
            title: self.title.to_string(),
            description,
            remediation: self.remediation.to_string(),
            effort: self.effort,
        })
    }
}

/// Generate recommendations with the default rule list.
pub fn generate(
    bundle: &AuditBundle,
    scores: &ScoringResult,
    snapshot_reliable: bool,
) -> Vec<Recommendation> {
    generate_with(&default_rules(), bundle, scores, snapshot_reliable)
}

/// Generate recommendations from an explicit rule list.
pub fn generate_with(
    rules: &[Rule],
    bundle: &AuditBundle,
    scores: &ScoringResult,
    snapshot_reliable: bool,
) -> Vec<Recommendation> {
    let ctx = RuleContext {
        bundle,
        scores,
        snapshot_reliable,
    };

    let mut recs: Vec<Recommendation> = rules.iter().filter_map(|r| r.apply(&ctx)).collect();
    // sort_by_key is stable: equal priorities keep rule order
    recs.sort_by_key(|r| r.priority.rank());

    debug!(
        url = bundle.snapshot.url.as_str(),
        count = recs.len(),
        snapshot_reliable,
        "Generated recommendations"
    );
    recs
}

fn when(condition: bool, description: impl FnOnce() -> String) -> Option<String> {
    condition.then(description)
}

/// The built-in rule list, in declaration order.
pub fn default_rules() -> Vec<Rule> {
    use Axis::*;
    use Effort::{Easy, Hard, Medium as Moderate};
    use Priority::*;

    vec![
        // --- Crawl reliability ---
        Rule {
            category: BestPractices,
            priority: High,
            effort: Moderate,
            markup_derived: false,
            title: "Allow the audit crawler to read the page",
            remediation: "Whitelist the audit user agent in bot protection or firewall rules and make sure the page returns HTML to non-browser clients.",
            detect: |ctx| {
                when(!ctx.snapshot_reliable, || {
                    "The crawl was blocked or returned no usable markup, so markup-based checks were skipped.".to_string()
                })
            },
        },
        // --- Transport and reputation (externally verified) ---
        Rule {
            category: Security,
            priority: Critical,
            effort: Hard,
            markup_derived: false,
            title: "Remove threat-list flags",
            remediation: "Clean the compromised content, then request a review from every list that flags the domain.",
            detect: |ctx| {
                let threat = ctx.bundle.threat.as_ref().filter(|t| t.listed)?;
                Some(format!("The domain is listed for: {}.", threat.threats.join(", ")))
            },
        },
        Rule {
            category: Security,
            priority: Critical,
            effort: Moderate,
            markup_derived: false,
            title: "Enable HTTPS",
            remediation: "Install a certificate and redirect every HTTP request to HTTPS with a 301.",
            detect: |ctx| {
                when(!ctx.bundle.snapshot.uses_https(), || {
                    format!("{} is served over plain HTTP.", ctx.bundle.snapshot.effective_url())
                })
            },
        },
        Rule {
            category: Security,
            priority: Critical,
            effort: Easy,
            markup_derived: false,
            title: "Replace the invalid TLS certificate",
            remediation: "Issue a certificate that matches the hostname and chains to a trusted root.",
            detect: |ctx| {
                let tls = ctx.bundle.tls.as_ref().filter(|t| !t.valid)?;
                Some(format!(
                    "Browsers reject the current certificate{}.",
                    tls.issuer.as_deref().map(|i| format!(" issued by {i}")).unwrap_or_default()
                ))
            },
        },
        Rule {
            category: Security,
            priority: High,
            effort: Easy,
            markup_derived: false,
            title: "Renew the TLS certificate",
            remediation: "Renew the certificate now and enable automatic renewal.",
            detect: |ctx| {
                let tls = ctx.bundle.tls.as_ref().filter(|t| t.valid)?;
                let days = tls.days_until_expiry.filter(|d| *d < 14)?;
                Some(format!("The certificate expires in {days} days."))
            },
        },
        // --- Indexability and content depth ---
        Rule {
            category: Seo,
            priority: Critical,
            effort: Easy,
            markup_derived: true,
            title: "Remove the noindex directive",
            remediation: "Delete `noindex` from the robots meta tag and X-Robots-Tag header unless the page must stay out of search.",
            detect: |ctx| {
                when(ctx.bundle.snapshot.is_noindex(), || {
                    "The page tells search engines not to index it.".to_string()
                })
            },
        },
        Rule {
            category: Content,
            priority: Critical,
            effort: Moderate,
            markup_derived: true,
            title: "Fix thin content",
            remediation: "Rewrite the page with substantive, original copy that answers the visitor's question in depth.",
            detect: |ctx| {
                let words = ctx.bundle.snapshot.content.word_count;
                when(words < THIN_CONTENT_WORDS, || {
                    format!("The page has only {words} words of content.")
                })
            },
        },
        Rule {
            category: Content,
            priority: High,
            effort: Moderate,
            markup_derived: true,
            title: "Expand page content",
            remediation: "Add supporting sections, examples and FAQs until the page covers its topic thoroughly.",
            detect: |ctx| {
                let words = ctx.bundle.snapshot.content.word_count;
                when((THIN_CONTENT_WORDS..300).contains(&words), || {
                    format!("The page has {words} words; competitive pages usually exceed 300.")
                })
            },
        },
        // --- On-page SEO ---
        Rule {
            category: Seo,
            priority: High,
            effort: Easy,
            markup_derived: true,
            title: "Add a page title",
            remediation: "Add a unique, descriptive <title> of 30-60 characters.",
            detect: |ctx| {
                when(title(ctx).is_none(), || "The page has no <title> element.".to_string())
            },
        },
        Rule {
            category: Seo,
            priority: Medium,
            effort: Easy,
            markup_derived: true,
            title: "Adjust the title length",
            remediation: "Rewrite the title to 30-60 characters with the primary keyword first.",
            detect: |ctx| {
                let len = title(ctx)?.chars().count();
                when(!TITLE_LEN.contains(&len), || format!("The title is {len} characters long."))
            },
        },
        Rule {
            category: Seo,
            priority: High,
            effort: Easy,
            markup_derived: true,
            title: "Add a meta description",
            remediation: "Write a 70-160 character meta description that summarises the page and invites the click.",
            detect: |ctx| {
                when(description(ctx).is_none(), || "The page has no meta description.".to_string())
            },
        },
        Rule {
            category: Seo,
            priority: Medium,
            effort: Easy,
            markup_derived: true,
            title: "Adjust the meta description length",
            remediation: "Rewrite the meta description to 70-160 characters.",
            detect: |ctx| {
                let len = description(ctx)?.chars().count();
                when(!DESCRIPTION_LEN.contains(&len), || {
                    format!("The meta description is {len} characters long.")
                })
            },
        },
        Rule {
            category: Seo,
            priority: High,
            effort: Easy,
            markup_derived: true,
            title: "Add a main heading",
            remediation: "Add one H1 that states the page topic.",
            detect: |ctx| {
                when(ctx.bundle.snapshot.heading_count(1) == 0, || {
                    "The page has no H1 heading.".to_string()
                })
            },
        },
        Rule {
            category: Seo,
            priority: Low,
            effort: Easy,
            markup_derived: true,
            title: "Use a single main heading",
            remediation: "Keep one H1 and demote the others to H2.",
            detect: |ctx| {
                let n = ctx.bundle.snapshot.heading_count(1);
                when(n > 1, || format!("The page has {n} H1 headings."))
            },
        },
        Rule {
            category: Seo,
            priority: Medium,
            effort: Easy,
            markup_derived: true,
            title: "Declare a canonical URL",
            remediation: "Add <link rel=\"canonical\"> pointing at the preferred URL of this page.",
            detect: |ctx| {
                when(ctx.bundle.snapshot.meta.canonical.is_none(), || {
                    "No canonical URL is declared, so duplicate URLs may split ranking signals.".to_string()
                })
            },
        },
        Rule {
            category: Seo,
            priority: Medium,
            effort: Easy,
            markup_derived: false,
            title: "Publish an XML sitemap",
            remediation: "Generate /sitemap.xml, reference it from robots.txt and submit it to search consoles.",
            detect: |ctx| {
                when(!ctx.bundle.snapshot.technical.has_sitemap, || {
                    "No XML sitemap was found.".to_string()
                })
            },
        },
        Rule {
            category: Seo,
            priority: Low,
            effort: Easy,
            markup_derived: false,
            title: "Add a robots.txt file",
            remediation: "Serve /robots.txt with crawl rules and the sitemap location.",
            detect: |ctx| {
                when(!ctx.bundle.snapshot.technical.has_robots_txt, || {
                    "No robots.txt was found.".to_string()
                })
            },
        },
        Rule {
            category: Seo,
            priority: Medium,
            effort: Moderate,
            markup_derived: true,
            title: "Add structured data",
            remediation: "Describe the page with schema.org JSON-LD (Organization, Article, Product or FAQPage as appropriate).",
            detect: |ctx| {
                when(!ctx.bundle.snapshot.has_structured_data(), || {
                    "No structured data was found.".to_string()
                })
            },
        },
        // --- Performance ---
        Rule {
            category: Performance,
            priority: High,
            effort: Hard,
            markup_derived: false,
            title: "Improve page speed",
            remediation: "Defer non-critical JavaScript, compress and resize images, and cache static assets.",
            detect: |ctx| {
                let speed = ctx.bundle.speed.as_ref().filter(|s| s.performance_score < 50)?;
                Some(format!("The lab performance score is {}/100.", speed.performance_score))
            },
        },
        Rule {
            category: Performance,
            priority: High,
            effort: Moderate,
            markup_derived: false,
            title: "Reduce Largest Contentful Paint",
            remediation: "Preload the hero image, inline critical CSS and serve the main content from a CDN.",
            detect: |ctx| {
                let lcp = ctx.bundle.speed.as_ref()?.lcp_ms.filter(|l| *l > 4000)?;
                Some(format!("Largest Contentful Paint is {lcp}ms (target 2500ms)."))
            },
        },
        Rule {
            category: Performance,
            priority: Medium,
            effort: Moderate,
            markup_derived: false,
            title: "Reduce layout shift",
            remediation: "Reserve space for images, ads and embeds with explicit dimensions.",
            detect: |ctx| {
                let cls = ctx.bundle.speed.as_ref()?.cls.filter(|c| *c > 0.25)?;
                Some(format!("Cumulative Layout Shift is {cls:.2} (target 0.1)."))
            },
        },
        Rule {
            category: Performance,
            priority: Medium,
            effort: Hard,
            markup_derived: false,
            title: "Reduce main-thread blocking",
            remediation: "Split long JavaScript tasks and remove unused third-party scripts.",
            detect: |ctx| {
                let tbt = ctx.bundle.speed.as_ref()?.tbt_ms.filter(|t| *t > 600)?;
                Some(format!("Total Blocking Time is {tbt}ms (target 200ms)."))
            },
        },
        Rule {
            category: Performance,
            priority: Low,
            effort: Easy,
            markup_derived: false,
            title: "Run a speed test",
            remediation: "Run a lab speed test so performance can be scored.",
            detect: |ctx| {
                let no_data = ctx.scores.category(Axis::Performance).is_some_and(|c| c.no_data);
                when(no_data, || "No speed test result was available for this audit.".to_string())
            },
        },
        // --- Security headers ---
        Rule {
            category: Security,
            priority: High,
            effort: Easy,
            markup_derived: false,
            title: "Enable HSTS",
            remediation: "Send Strict-Transport-Security with max-age of at least one year.",
            detect: |ctx| {
                ctx.bundle.security_headers.as_ref().filter(|h| !h.hsts)?;
                Some("Strict-Transport-Security is not set.".to_string())
            },
        },
        Rule {
            category: Security,
            priority: Medium,
            effort: Moderate,
            markup_derived: false,
            title: "Add a Content-Security-Policy",
            remediation: "Start with a report-only policy, then enforce a restrictive CSP.",
            detect: |ctx| {
                ctx.bundle.security_headers.as_ref().filter(|h| !h.csp)?;
                Some("Content-Security-Policy is not set.".to_string())
            },
        },
        Rule {
            category: Security,
            priority: Low,
            effort: Easy,
            markup_derived: false,
            title: "Set X-Frame-Options",
            remediation: "Send X-Frame-Options: SAMEORIGIN or a frame-ancestors CSP directive.",
            detect: |ctx| {
                ctx.bundle.security_headers.as_ref().filter(|h| !h.x_frame_options)?;
                Some("The page can be framed by any origin.".to_string())
            },
        },
        Rule {
            category: Security,
            priority: Low,
            effort: Easy,
            markup_derived: false,
            title: "Set X-Content-Type-Options",
            remediation: "Send X-Content-Type-Options: nosniff.",
            detect: |ctx| {
                ctx.bundle.security_headers.as_ref().filter(|h| !h.x_content_type_options)?;
                Some("Browsers may MIME-sniff responses.".to_string())
            },
        },
        Rule {
            category: Security,
            priority: High,
            effort: Moderate,
            markup_derived: true,
            title: "Remove mixed content",
            remediation: "Load every script, stylesheet and image over HTTPS.",
            detect: |ctx| {
                let n = ctx.bundle.heuristics.mixed_content_count;
                when(n > 0, || format!("{n} resources are loaded over plain HTTP."))
            },
        },
        // --- Domain trust ---
        Rule {
            category: DomainTrust,
            priority: High,
            effort: Easy,
            markup_derived: false,
            title: "Renew the domain registration",
            remediation: "Renew the domain for several years and enable auto-renew.",
            detect: |ctx| {
                let now = ctx.bundle.snapshot.fetched_at;
                let days = ctx.bundle.domain.as_ref()?.days_until_expiry(now).filter(|d| *d < 30)?;
                Some(format!("The domain registration expires in {days} days."))
            },
        },
        Rule {
            category: DomainTrust,
            priority: Medium,
            effort: Easy,
            markup_derived: false,
            title: "Publish an SPF record",
            remediation: "Add a v=spf1 TXT record listing every service that sends mail for the domain.",
            detect: |ctx| {
                when(ctx.bundle.dns.as_ref().is_some_and(|d| !d.has_spf()), || {
                    "No SPF record is published, so spoofed mail is easier to send.".to_string()
                })
            },
        },
        Rule {
            category: DomainTrust,
            priority: Medium,
            effort: Easy,
            markup_derived: false,
            title: "Publish a DMARC policy",
            remediation: "Publish a _dmarc TXT record, starting at p=none with reporting.",
            detect: |ctx| {
                when(ctx.bundle.dns.as_ref().is_some_and(|d| !d.has_dmarc()), || {
                    "No DMARC policy is published.".to_string()
                })
            },
        },
        Rule {
            category: DomainTrust,
            priority: Medium,
            effort: Easy,
            markup_derived: true,
            title: "Publish a privacy policy",
            remediation: "Publish a privacy policy and link it from the footer.",
            detect: |ctx| {
                when(!ctx.bundle.heuristics.has_privacy_policy, || {
                    "No privacy policy link was found.".to_string()
                })
            },
        },
        Rule {
            category: DomainTrust,
            priority: Low,
            effort: Easy,
            markup_derived: true,
            title: "Show contact information",
            remediation: "Add a contact page with email, phone or a form, linked from every page.",
            detect: |ctx| {
                when(!ctx.bundle.heuristics.has_contact_info, || {
                    "No contact information was found.".to_string()
                })
            },
        },
        // --- Accessibility ---
        Rule {
            category: Accessibility,
            priority: Medium,
            effort: Easy,
            markup_derived: true,
            title: "Add alt text to images",
            remediation: "Describe every meaningful image in its alt attribute; use alt=\"\" for decorative ones.",
            detect: |ctx| {
                let coverage = ctx.bundle.snapshot.alt_coverage().filter(|c| *c < 0.9)?;
                Some(format!("Only {:.0}% of images have alt text.", coverage * 100.0))
            },
        },
        Rule {
            category: Accessibility,
            priority: Medium,
            effort: Easy,
            markup_derived: true,
            title: "Declare the page language",
            remediation: "Set the lang attribute on the <html> element.",
            detect: |ctx| {
                when(ctx.bundle.snapshot.meta.lang.is_none(), || {
                    "The page language is not declared.".to_string()
                })
            },
        },
        Rule {
            category: Accessibility,
            priority: Low,
            effort: Moderate,
            markup_derived: true,
            title: "Fix the heading hierarchy",
            remediation: "Nest headings in order (H1, then H2, then H3) without skipping levels.",
            detect: |ctx| {
                let snap = &ctx.bundle.snapshot;
                when(snap.heading_count(1) > 0 && !heading_hierarchy_ok(snap), || {
                    "Heading levels are skipped.".to_string()
                })
            },
        },
        // --- Best practices ---
        Rule {
            category: BestPractices,
            priority: High,
            effort: Easy,
            markup_derived: true,
            title: "Add a responsive viewport",
            remediation: "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.",
            detect: |ctx| {
                when(ctx.bundle.snapshot.meta.viewport.is_none(), || {
                    "The page has no viewport meta tag and will render poorly on mobile.".to_string()
                })
            },
        },
        Rule {
            category: BestPractices,
            priority: Medium,
            effort: Easy,
            markup_derived: true,
            title: "Add a cookie consent banner",
            remediation: "Ask for consent before loading analytics or advertising tags.",
            detect: |ctx| {
                let h = &ctx.bundle.heuristics;
                when(!h.analytics_tags.is_empty() && !h.has_cookie_banner, || {
                    format!("{} run without a consent banner.", h.analytics_tags.join(", "))
                })
            },
        },
        Rule {
            category: BestPractices,
            priority: Low,
            effort: Moderate,
            markup_derived: true,
            title: "Fix markup validation errors",
            remediation: "Run the page through an HTML validator and fix structural errors.",
            detect: |ctx| {
                let errors = ctx.bundle.markup_validation.as_ref()?.errors;
                when(errors > 10, || format!("The markup has {errors} validation errors."))
            },
        },
        Rule {
            category: BestPractices,
            priority: Low,
            effort: Easy,
            markup_derived: true,
            title: "Add a favicon",
            remediation: "Serve a favicon and reference it with <link rel=\"icon\">.",
            detect: |ctx| {
                when(ctx.bundle.snapshot.meta.favicon.is_none(), || {
                    "No reachable favicon was found.".to_string()
                })
            },
        },
        // --- Link health (validator-probed) ---
        Rule {
            category: Content,
            priority: Medium,
            effort: Moderate,
            markup_derived: false,
            title: "Fix broken external links",
            remediation: "Update or remove outbound links that no longer resolve.",
            detect: |ctx| {
                let ratio = ctx.bundle.heuristics.link_rot_ratio.filter(|r| *r > 0.2)?;
                Some(format!("{:.0}% of sampled external links are unreachable.", ratio * 100.0))
            },
        },
        Rule {
            category: Content,
            priority: Low,
            effort: Easy,
            markup_derived: false,
            title: "Fix broken images",
            remediation: "Restore or remove images whose source no longer loads.",
            detect: |ctx| {
                let n = ctx.bundle.heuristics.broken_image_count.filter(|n| *n > 0)?;
                Some(format!("{n} sampled images failed to load."))
            },
        },
        Rule {
            category: Content,
            priority: Low,
            effort: Easy,
            markup_derived: true,
            title: "Add Open Graph tags",
            remediation: "Add og:title, og:description and og:image so shares render a rich preview.",
            detect: |ctx| {
                when(!ctx.bundle.snapshot.meta.open_graph.is_complete(), || {
                    "Open Graph tags are missing or incomplete.".to_string()
                })
            },
        },
        // --- Technology ---
        Rule {
            category: Technology,
            priority: Medium,
            effort: Moderate,
            markup_derived: true,
            title: "Update outdated components",
            remediation: "Upgrade outdated libraries and platforms to supported versions.",
            detect: |ctx| {
                let outdated: Vec<&str> = ctx
                    .bundle
                    .snapshot
                    .technologies
                    .iter()
                    .filter(|t| t.outdated)
                    .map(|t| t.name.as_str())
                    .collect();
                when(!outdated.is_empty(), || {
                    format!("Outdated components: {}.", outdated.join(", "))
                })
            },
        },
        Rule {
            category: Technology,
            priority: Low,
            effort: Easy,
            markup_derived: true,
            title: "Install analytics",
            remediation: "Install a privacy-respecting analytics tool to measure traffic.",
            detect: |ctx| {
                when(ctx.bundle.heuristics.analytics_tags.is_empty(), || {
                    "No analytics tag was detected.".to_string()
                })
            },
        },
        // --- Online presence ---
        Rule {
            category: OnlinePresence,
            priority: Critical,
            effort: Moderate,
            markup_derived: false,
            title: "Get the site indexed",
            remediation: "Submit the sitemap in Search Console and fix any crawl blocks.",
            detect: |ctx| {
                when(ctx.bundle.online_presence.as_ref().is_some_and(|p| !p.indexed), || {
                    "Search engines report no indexed pages for this site.".to_string()
                })
            },
        },
        Rule {
            category: OnlinePresence,
            priority: Low,
            effort: Easy,
            markup_derived: false,
            title: "Verify the site in Search Console",
            remediation: "Verify ownership in Google Search Console and Bing Webmaster Tools.",
            detect: |ctx| {
                when(
                    ctx.bundle.online_presence.as_ref().is_some_and(|p| !p.search_console_verified),
                    || "The site is not verified in Google Search Console.".to_string(),
                )
            },
        },
        Rule {
            category: OnlinePresence,
            priority: Low,
            effort: Easy,
            markup_derived: true,
            title: "Link social profiles",
            remediation: "Link the organisation's social profiles from the footer and sameAs markup.",
            detect: |ctx| {
                when(ctx.bundle.snapshot.social_profiles.is_empty(), || {
                    "No social profiles are linked.".to_string()
                })
            },
        },
    ]
}

fn title<'a>(ctx: &RuleContext<'a>) -> Option<&'a str> {
    ctx.bundle
        .snapshot
        .meta
        .title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn description<'a>(ctx: &RuleContext<'a>) -> Option<&'a str> {
    ctx.bundle
        .snapshot
        .meta
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{score_all, ScoringConfig};
    use sitelens_common::{SecurityHeaders, Snapshot, ThreatListResult};

    fn recs_for(bundle: &AuditBundle, reliable: bool) -> Vec<Recommendation> {
        let scores = score_all(bundle, &ScoringConfig::default());
        generate(bundle, &scores, reliable)
    }

    #[test]
    fn output_is_sorted_by_priority_rank() {
        let bundle = AuditBundle::from_snapshot(Snapshot::new("http://example.com"));
        let recs = recs_for(&bundle, true);
        assert!(!recs.is_empty());
        assert!(recs.windows(2).all(|w| w[0].priority.rank() <= w[1].priority.rank()));
    }

    #[test]
    fn ties_keep_declaration_order() {
        let bundle = AuditBundle::from_snapshot(Snapshot::new("http://example.com"));
        let recs = recs_for(&bundle, true);
        let critical: Vec<_> = recs
            .iter()
            .filter(|r| r.priority == Priority::Critical)
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(critical, vec!["Enable HTTPS", "Fix thin content"]);
    }

    #[test]
    fn unreliable_crawl_skips_markup_rules_but_keeps_external_ones() {
        let mut bundle = AuditBundle::from_snapshot(Snapshot::new("http://example.com"));
        bundle.threat = Some(ThreatListResult {
            listed: true,
            threats: vec!["malware".into()],
        });
        bundle.security_headers = Some(SecurityHeaders::default());
        let recs = recs_for(&bundle, false);
        let titles: Vec<_> = recs.iter().map(|r| r.title.as_str()).collect();

        assert!(titles.contains(&"Remove threat-list flags"));
        assert!(titles.contains(&"Enable HTTPS"));
        assert!(titles.contains(&"Enable HSTS"));
        assert!(titles.contains(&"Allow the audit crawler to read the page"));
        assert!(!titles.contains(&"Fix thin content"));
        assert!(!titles.contains(&"Add a page title"));
    }

    #[test]
    fn titles_carry_no_measurements() {
        let mut snap = Snapshot::new("https://example.com");
        snap.content.word_count = 150;
        snap.meta.title = Some("Short".into());
        let recs = recs_for(&AuditBundle::from_snapshot(snap), true);
        for rec in &recs {
            assert!(
                !rec.title.chars().any(|c| c.is_ascii_digit()),
                "title embeds a number: {}",
                rec.title
            );
        }
        assert!(recs.iter().any(|r| r.title == "Expand page content"));
        assert!(recs.iter().any(|r| r.description.contains("150 words")));
    }
}
