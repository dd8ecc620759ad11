use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use sitelens_common::SiteLensError;

use crate::config::ValidatorConfig;

/// Result of a reachability probe. Network failures are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable { status: u16 },
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }

    /// Human-readable reason for check output.
    pub fn describe(&self) -> String {
        match self {
            ProbeOutcome::Reachable { status } => format!("HTTP {status}"),
            ProbeOutcome::Unreachable(reason) => reason.clone(),
        }
    }
}

/// One response in a manually-followed redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopResponse {
    pub status: u16,
    pub location: Option<String>,
}

impl HopResponse {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status) && self.location.is_some()
    }
}

/// Network access used by the validator.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Is the resource at `url` retrievable?
    async fn probe(&self, url: &str) -> ProbeOutcome;

    /// Issue one request without following redirects.
    async fn hop(&self, url: &str) -> Result<HopResponse, SiteLensError>;
}

/// reqwest-backed prober. Reachability follows a few redirects; hops follow none.
pub struct HttpProber {
    probe_client: reqwest::Client,
    hop_client: reqwest::Client,
}

impl HttpProber {
    pub fn new(config: &ValidatorConfig) -> Result<Self, SiteLensError> {
        let probe_client = reqwest::Client::builder()
            .timeout(config.probe_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SiteLensError::Probe(format!("Failed to build probe client: {e}")))?;

        let hop_client = reqwest::Client::builder()
            .timeout(config.status_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SiteLensError::Probe(format!("Failed to build hop client: {e}")))?;

        Ok(Self {
            probe_client,
            hop_client,
        })
    }

    async fn get(&self, url: &str) -> ProbeOutcome {
        match self.probe_client.get(url).send().await {
            Ok(resp) => classify(resp.status()),
            Err(e) => ProbeOutcome::Unreachable(transport_reason(&e)),
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.probe_client.head(url).send().await {
            Ok(resp)
                if resp.status() == StatusCode::METHOD_NOT_ALLOWED
                    || resp.status() == StatusCode::NOT_IMPLEMENTED =>
            {
                debug!(url, status = resp.status().as_u16(), "HEAD rejected, retrying with GET");
                self.get(url).await
            }
            Ok(resp) => classify(resp.status()),
            Err(e) => {
                debug!(url, error = %e, "HEAD failed, retrying with GET");
                self.get(url).await
            }
        }
    }

    async fn hop(&self, url: &str) -> Result<HopResponse, SiteLensError> {
        let resp = self
            .hop_client
            .get(url)
            .send()
            .await
            .map_err(|e| SiteLensError::Probe(transport_reason(&e)))?;

        let location = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(HopResponse {
            status: resp.status().as_u16(),
            location,
        })
    }
}

fn classify(status: StatusCode) -> ProbeOutcome {
    if status.is_success() {
        ProbeOutcome::Reachable {
            status: status.as_u16(),
        }
    } else {
        ProbeOutcome::Unreachable(format!("HTTP {}", status.as_u16()))
    }
}

fn transport_reason(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "timed out".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        format!("request failed: {e}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_success_is_reachable() {
        assert!(classify(StatusCode::OK).is_reachable());
        assert!(classify(StatusCode::NO_CONTENT).is_reachable());
        assert_eq!(
            classify(StatusCode::NOT_FOUND),
            ProbeOutcome::Unreachable("HTTP 404".into())
        );
    }

    #[test]
    fn redirect_needs_a_location() {
        let bare = HopResponse { status: 301, location: None };
        let moved = HopResponse { status: 301, location: Some("/next".into()) };
        assert!(!bare.is_redirect());
        assert!(moved.is_redirect());
    }

    #[test]
    fn builds_with_default_config() {
        assert!(HttpProber::new(&ValidatorConfig::default()).is_ok());
    }
}
