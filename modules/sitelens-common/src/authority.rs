use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scores::ColorBand;

/// Strategic lens an authority report is scored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityKind {
    /// General search engine optimisation.
    Seo,
    /// Generative / AI-search visibility.
    Geo,
    /// Answer-engine (featured snippet, voice) readiness.
    Aeo,
    Backlink,
    Blog,
}

impl AuthorityKind {
    pub const ALL: [AuthorityKind; 5] = [
        AuthorityKind::Seo,
        AuthorityKind::Geo,
        AuthorityKind::Aeo,
        AuthorityKind::Backlink,
        AuthorityKind::Blog,
    ];
}

impl std::fmt::Display for AuthorityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorityKind::Seo => write!(f, "seo"),
            AuthorityKind::Geo => write!(f, "geo"),
            AuthorityKind::Aeo => write!(f, "aeo"),
            AuthorityKind::Backlink => write!(f, "backlink"),
            AuthorityKind::Blog => write!(f, "blog"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approve,
    Strengthen,
    Rebuild,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Approve => write!(f, "approve"),
            Verdict::Strengthen => write!(f, "strengthen"),
            Verdict::Rebuild => write!(f, "rebuild"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuthoritySubScore {
    pub key: String,
    pub label: String,
    pub score: u32,
    pub max: u32,
    pub details: Vec<String>,
    #[serde(default)]
    pub no_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuthorityReport {
    pub kind: AuthorityKind,
    pub title: String,
    /// Sum of every sub-score's `score`.
    pub overall: u32,
    pub color: ColorBand,
    pub verdict: Verdict,
    pub categories: Vec<AuthoritySubScore>,
    pub insights: Vec<String>,
    pub action_plan: Vec<String>,
}

impl AuthorityReport {
    pub fn sub_score(&self, key: &str) -> Option<&AuthoritySubScore> {
        self.categories.iter().find(|c| c.key == key)
    }
}
