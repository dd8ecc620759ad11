//! In-memory prober for tests. Enabled by the `test-support` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use sitelens_common::SiteLensError;

use crate::prober::{HopResponse, ProbeOutcome, Prober};

// ---------------------------------------------------------------------------
// MockProber
// ---------------------------------------------------------------------------

/// HashMap-based prober. Unregistered URLs are unreachable.
/// Builder pattern: `.reachable()`, `.unreachable()`, `.redirect()`, `.slow()`.
#[derive(Default)]
pub struct MockProber {
    probes: HashMap<String, ProbeOutcome>,
    hops: HashMap<String, HopResponse>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// `url` answers 200 to probes and hops.
    pub fn reachable(mut self, url: &str) -> Self {
        self.probes
            .insert(url.to_string(), ProbeOutcome::Reachable { status: 200 });
        self.hops.insert(
            url.to_string(),
            HopResponse {
                status: 200,
                location: None,
            },
        );
        self
    }

    pub fn unreachable(mut self, url: &str, reason: &str) -> Self {
        self.probes
            .insert(url.to_string(), ProbeOutcome::Unreachable(reason.to_string()));
        self
    }

    /// `from` answers a 301 pointing at `location`.
    pub fn redirect(mut self, from: &str, location: &str) -> Self {
        self.hops.insert(
            from.to_string(),
            HopResponse {
                status: 301,
                location: Some(location.to_string()),
            },
        );
        self
    }

    /// `url` answers hops with `status` and no location.
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.hops.insert(
            url.to_string(),
            HopResponse {
                status,
                location: None,
            },
        );
        self
    }

    /// Delay every response for `url`.
    pub fn slow(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Every URL probed or hopped, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Highest number of concurrent calls observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, url: &str) -> InFlight<'_> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        guard
    }
}

/// Decrements the in-flight counter even when the call is cancelled by a timeout.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let _guard = self.enter(url).await;
        self.probes.get(url).cloned().unwrap_or_else(|| {
            ProbeOutcome::Unreachable(format!("MockProber: no response registered for {url}"))
        })
    }

    async fn hop(&self, url: &str) -> Result<HopResponse, SiteLensError> {
        let _guard = self.enter(url).await;
        self.hops.get(url).cloned().ok_or_else(|| {
            SiteLensError::Probe(format!("MockProber: no hop registered for {url}"))
        })
    }
}
