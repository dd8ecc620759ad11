use std::time::Duration;

use typed_builder::TypedBuilder;

use sitelens_common::config::DEFAULT_USER_AGENT;
use sitelens_common::Config;

/// Budgets and limits for one validation run.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ValidatorConfig {
    /// Concurrent probes per batch. A batch completes before the next starts.
    #[builder(default = 5)]
    pub batch_size: usize,
    #[builder(default = Duration::from_secs(5))]
    pub probe_timeout: Duration,
    /// Per-hop budget for the redirect walk.
    #[builder(default = Duration::from_secs(10))]
    pub status_timeout: Duration,
    #[builder(default = 10)]
    pub max_redirect_hops: usize,
    #[builder(default = 10)]
    pub max_external_links: usize,
    #[builder(default = 10)]
    pub max_images: usize,
    /// Allowed drift between reported and recomputed overall before it is replaced.
    #[builder(default = 2.0)]
    pub overall_tolerance: f64,
    #[builder(default = DEFAULT_USER_AGENT.to_string(), setter(into))]
    pub user_agent: String,
    /// Skip the reachability and redirect passes.
    #[builder(default)]
    pub offline: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&Config> for ValidatorConfig {
    fn from(config: &Config) -> Self {
        Self::builder()
            .batch_size(config.probe_batch_size.max(1))
            .probe_timeout(config.probe_timeout)
            .status_timeout(config.status_timeout)
            .max_redirect_hops(config.max_redirect_hops)
            .max_external_links(config.max_external_links)
            .max_images(config.max_images)
            .user_agent(config.user_agent.clone())
            .offline(config.offline)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_probe_budget() {
        let c = ValidatorConfig::default();
        assert_eq!(c.batch_size, 5);
        assert_eq!(c.probe_timeout, Duration::from_secs(5));
        assert_eq!(c.max_redirect_hops, 10);
        assert_eq!(c.overall_tolerance, 2.0);
        assert!(c.user_agent.starts_with("SiteLensBot/1.0"));
        assert!(!c.offline);
    }

    #[test]
    fn zero_batch_size_from_env_is_raised_to_one() {
        let mut config = Config::default();
        config.probe_batch_size = 0;
        config.offline = true;
        let v = ValidatorConfig::from(&config);
        assert_eq!(v.batch_size, 1);
        assert!(v.offline);
    }
}
