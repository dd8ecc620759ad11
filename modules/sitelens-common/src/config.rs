use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::error::SiteLensError;

pub const DEFAULT_USER_AGENT: &str = "SiteLensBot/1.0 (+audit)";

/// Runtime configuration loaded from `SITELENS_*` environment variables.
/// Every setting has a default; CLI flags override individual values.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Probing
    pub probe_timeout: Duration,
    pub status_timeout: Duration,
    pub probe_batch_size: usize,
    pub max_redirect_hops: usize,
    pub user_agent: String,

    // Sampling
    pub max_external_links: usize,
    pub max_images: usize,

    /// Skip every network pass; structural and consistency checks still run.
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
            status_timeout: Duration::from_secs(10),
            probe_batch_size: 5,
            max_redirect_hops: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_external_links: 10,
            max_images: 10,
            offline: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, SiteLensError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SiteLensError> {
        let defaults = Self::default();
        Ok(Self {
            probe_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SITELENS_PROBE_TIMEOUT_SECS",
                defaults.probe_timeout.as_secs(),
            )?),
            status_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SITELENS_STATUS_TIMEOUT_SECS",
                defaults.status_timeout.as_secs(),
            )?),
            probe_batch_size: parse_or(
                &lookup,
                "SITELENS_PROBE_BATCH_SIZE",
                defaults.probe_batch_size,
            )?
            .max(1),
            max_redirect_hops: parse_or(
                &lookup,
                "SITELENS_MAX_REDIRECT_HOPS",
                defaults.max_redirect_hops,
            )?,
            user_agent: lookup("SITELENS_USER_AGENT").unwrap_or(defaults.user_agent),
            max_external_links: parse_or(
                &lookup,
                "SITELENS_MAX_EXTERNAL_LINKS",
                defaults.max_external_links,
            )?,
            max_images: parse_or(&lookup, "SITELENS_MAX_IMAGES", defaults.max_images)?,
            offline: parse_or(&lookup, "SITELENS_OFFLINE", defaults.offline)?,
        })
    }

    pub fn log_settings(&self) {
        info!(
            probe_timeout_secs = self.probe_timeout.as_secs(),
            status_timeout_secs = self.status_timeout.as_secs(),
            batch_size = self.probe_batch_size,
            max_redirect_hops = self.max_redirect_hops,
            offline = self.offline,
            "Loaded config"
        );
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, SiteLensError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SiteLensError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
