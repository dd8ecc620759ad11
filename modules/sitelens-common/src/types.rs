use chrono::{DateTime, Months, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Snapshot ---

/// Read-only description of one crawled page/domain at one instant.
/// Produced by the crawler; every stage borrows it, the validator returns a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    pub url: String,
    #[serde(default)]
    pub final_url: String,
    #[serde(default = "default_status")]
    pub status_code: u16,
    #[serde(default = "chrono::Utc::now")]
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub meta: PageMeta,
    #[serde(default)]
    pub headings: Vec<Heading>,
    #[serde(default)]
    pub links: LinkInventory,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub technical: TechnicalFlags,
    #[serde(default)]
    pub content: ContentStats,
    #[serde(default)]
    pub social_profiles: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<Technology>,
    #[serde(default)]
    pub blog: Option<BlogInventory>,
}

fn default_status() -> u16 {
    200
}

impl Snapshot {
    /// Minimal snapshot for a URL with every inventory empty.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            status_code: 200,
            fetched_at: Utc::now(),
            meta: PageMeta::default(),
            headings: Vec::new(),
            links: LinkInventory::default(),
            images: Vec::new(),
            technical: TechnicalFlags::default(),
            content: ContentStats::default(),
            social_profiles: Vec::new(),
            technologies: Vec::new(),
            blog: None,
        }
    }

    /// The URL the crawl ended on, falling back to the requested URL.
    pub fn effective_url(&self) -> &str {
        if self.final_url.is_empty() {
            &self.url
        } else {
            &self.final_url
        }
    }

    pub fn uses_https(&self) -> bool {
        self.effective_url().starts_with("https://")
    }

    pub fn is_noindex(&self) -> bool {
        self.meta
            .robots
            .as_deref()
            .is_some_and(|r| r.to_ascii_lowercase().contains("noindex"))
    }

    pub fn headings_at(&self, level: u8) -> impl Iterator<Item = &Heading> {
        self.headings.iter().filter(move |h| h.level == level)
    }

    pub fn heading_count(&self, level: u8) -> usize {
        self.headings_at(level).count()
    }

    /// Fraction of images carrying non-empty alt text. `None` when there are no images.
    pub fn alt_coverage(&self) -> Option<f64> {
        if self.images.is_empty() {
            return None;
        }
        let with_alt = self
            .images
            .iter()
            .filter(|i| i.alt.as_deref().is_some_and(|a| !a.trim().is_empty()))
            .count();
        Some(with_alt as f64 / self.images.len() as f64)
    }

    pub fn has_structured_data(&self) -> bool {
        !self.technical.schema_types.is_empty()
    }

    pub fn has_schema_type(&self, name: &str) -> bool {
        self.technical
            .schema_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(name))
    }

    pub fn has_technology_category(&self, category: &str) -> bool {
        self.technologies
            .iter()
            .any(|t| t.category.eq_ignore_ascii_case(category))
    }

    /// Scheme + host (+ port) of the effective URL, e.g. `https://example.com`.
    pub fn origin(&self) -> Option<String> {
        let origin = url::Url::parse(self.effective_url()).ok()?.origin();
        origin.is_tuple().then(|| origin.ascii_serialization())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub lang: Option<String>,
    pub viewport: Option<String>,
    pub charset: Option<String>,
    /// Raw `<meta name="robots">` content.
    pub robots: Option<String>,
    pub favicon: Option<String>,
    pub open_graph: OpenGraph,
    pub hreflang: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OpenGraph {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl OpenGraph {
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.description.is_some() && self.image.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LinkInventory {
    pub internal: Vec<Link>,
    pub external: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Link {
    pub href: String,
    pub text: String,
    pub nofollow: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Image {
    pub src: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TechnicalFlags {
    pub has_sitemap: bool,
    pub has_robots_txt: bool,
    /// schema.org types found in JSON-LD or microdata.
    pub schema_types: Vec<String>,
    pub compression: bool,
    pub http2: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ContentStats {
    pub word_count: u32,
    pub paragraph_count: u32,
    pub list_count: u32,
    pub has_author: bool,
    pub has_published_date: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Technology {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub outdated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BlogInventory {
    pub post_count: u32,
    pub latest_post_at: Option<DateTime<Utc>>,
    pub avg_word_count: u32,
    pub has_rss: bool,
    pub has_author_bios: bool,
}

// --- Collaborator records ---

/// Speed test output. Absence of the whole record means "no speed test ran".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SpeedResult {
    pub performance_score: u8,
    pub lcp_ms: Option<u32>,
    pub cls: Option<f64>,
    pub tbt_ms: Option<u32>,
    pub ttfb_ms: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TlsInfo {
    pub valid: bool,
    pub issuer: Option<String>,
    pub days_until_expiry: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DomainInfo {
    pub registered_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub registrar: Option<String>,
}

impl DomainInfo {
    /// Registration age in whole years as of `now`.
    pub fn age_years(&self, now: DateTime<Utc>) -> Option<f64> {
        let registered = self.registered_at?;
        let days = (now - registered).num_days().max(0);
        Some(days as f64 / 365.25)
    }

    /// Whether at least `years` calendar years have passed since registration.
    pub fn registered_for(&self, years: u32, now: DateTime<Utc>) -> Option<bool> {
        let registered = self.registered_at?;
        let anniversary = registered.checked_add_months(Months::new(years * 12))?;
        Some(anniversary <= now)
    }

    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|e| (e - now).num_days())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SecurityHeaders {
    pub hsts: bool,
    pub csp: bool,
    pub x_frame_options: bool,
    pub x_content_type_options: bool,
    pub referrer_policy: bool,
    pub permissions_policy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ThreatListResult {
    pub listed: bool,
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DnsRecords {
    pub a: Vec<String>,
    pub aaaa: Vec<String>,
    pub mx: Vec<String>,
    pub ns: Vec<String>,
    pub txt: Vec<String>,
    pub dmarc: Option<String>,
    pub caa: Vec<String>,
}

impl DnsRecords {
    pub fn has_spf(&self) -> bool {
        self.txt
            .iter()
            .any(|t| t.trim_matches('"').to_ascii_lowercase().starts_with("v=spf1"))
    }

    pub fn has_dmarc(&self) -> bool {
        self.dmarc
            .as_deref()
            .is_some_and(|d| d.to_ascii_lowercase().contains("v=dmarc1"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MarkupValidation {
    pub errors: u32,
    pub warnings: u32,
}

/// Derived page-level signals from the heuristics collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PageHeuristics {
    pub analytics_tags: Vec<String>,
    pub has_cookie_banner: bool,
    pub has_privacy_policy: bool,
    pub has_terms: bool,
    pub has_contact_info: bool,
    pub has_physical_address: bool,
    pub mixed_content_count: u32,
    pub console_error_count: u32,
    pub bot_challenge_detected: bool,
    pub faq_detected: bool,
    pub ai_crawlers_blocked: bool,
    /// Share of probed external links that were unreachable. Set by the validator.
    pub link_rot_ratio: Option<f64>,
    /// Probed images that were unreachable. Set by the validator.
    pub broken_image_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OnlinePresence {
    pub indexed: bool,
    pub indexed_pages: Option<u64>,
    pub search_console_verified: bool,
    pub bing_verified: bool,
    pub archive_snapshots: Option<u64>,
    pub first_archived_at: Option<DateTime<Utc>>,
    /// 0.0-1.0 share of recommended structured-data properties present.
    pub structured_data_completeness: Option<f64>,
    pub brand_mentions: Option<u64>,
    pub backlinks: Option<BacklinkProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BacklinkProfile {
    pub referring_domains: u64,
    pub total_backlinks: u64,
    /// 0.0-1.0
    pub dofollow_ratio: f64,
    /// 0-100 third-party domain rating.
    pub domain_rating: Option<u8>,
}

// --- Classification ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Maturity {
    Startup,
    Growing,
    Established,
    LongEstablished,
}

impl Maturity {
    /// One tier lower; `Startup` is the floor.
    pub fn downgraded(self) -> Self {
        match self {
            Maturity::LongEstablished => Maturity::Established,
            Maturity::Established => Maturity::Growing,
            Maturity::Growing | Maturity::Startup => Maturity::Startup,
        }
    }
}

impl std::fmt::Display for Maturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Maturity::Startup => write!(f, "startup"),
            Maturity::Growing => write!(f, "growing"),
            Maturity::Established => write!(f, "established"),
            Maturity::LongEstablished => write!(f, "long_established"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RevenueModel {
    Ecommerce,
    Saas,
    Advertising,
    LeadGeneration,
    Services,
    Nonprofit,
    Unknown,
}

impl std::fmt::Display for RevenueModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevenueModel::Ecommerce => write!(f, "ecommerce"),
            RevenueModel::Saas => write!(f, "saas"),
            RevenueModel::Advertising => write!(f, "advertising"),
            RevenueModel::LeadGeneration => write!(f, "lead_generation"),
            RevenueModel::Services => write!(f, "services"),
            RevenueModel::Nonprofit => write!(f, "nonprofit"),
            RevenueModel::Unknown => write!(f, "unknown"),
        }
    }
}

/// Best-effort site classification from the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Classification {
    pub maturity: Maturity,
    pub revenue_model: RevenueModel,
    #[serde(default)]
    pub hosting_provider: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

// --- Bundle ---

/// Everything the collaborators supplied for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditBundle {
    pub snapshot: Snapshot,
    #[serde(default)]
    pub raw_markup: String,
    #[serde(default)]
    pub speed: Option<SpeedResult>,
    #[serde(default)]
    pub tls: Option<TlsInfo>,
    #[serde(default)]
    pub domain: Option<DomainInfo>,
    #[serde(default)]
    pub security_headers: Option<SecurityHeaders>,
    #[serde(default)]
    pub threat: Option<ThreatListResult>,
    #[serde(default)]
    pub dns: Option<DnsRecords>,
    #[serde(default)]
    pub markup_validation: Option<MarkupValidation>,
    #[serde(default)]
    pub heuristics: PageHeuristics,
    #[serde(default)]
    pub online_presence: Option<OnlinePresence>,
    #[serde(default)]
    pub classification: Option<Classification>,
}

impl AuditBundle {
    /// Bundle with only a snapshot; every collaborator record absent.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            raw_markup: String::new(),
            speed: None,
            tls: None,
            domain: None,
            security_headers: None,
            threat: None,
            dns: None,
            markup_validation: None,
            heuristics: PageHeuristics::default(),
            online_presence: None,
            classification: None,
        }
    }

    pub fn is_threat_listed(&self) -> bool {
        self.threat.as_ref().is_some_and(|t| t.listed)
    }
}
