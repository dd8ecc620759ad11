use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, warn};

use sitelens_common::{RedirectChain, RedirectHop, RedirectVerdict};

use crate::prober::Prober;

/// Follow redirects from `start_url` one hop at a time.
///
/// Stops on the first non-redirect response, on a revisited URL
/// (`RedirectLoop`), after `max_hops` redirects (`TooManyHops`), or when a
/// hop fails, times out, or settles on a status of 400 or above
/// (`Unreachable`). Every visited URL is recorded in `hops`.
pub async fn walk_redirects(
    prober: &dyn Prober,
    start_url: &str,
    max_hops: usize,
    timeout: Duration,
) -> RedirectChain {
    let mut visited: HashSet<String> = HashSet::new();
    let mut hops = Vec::new();
    // Later hops come back normalized by `resolve`; the start must match them.
    let mut current = url::Url::parse(start_url.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| start_url.to_string());

    let verdict = loop {
        if !visited.insert(current.clone()) {
            break RedirectVerdict::RedirectLoop;
        }

        let response = match tokio::time::timeout(timeout, prober.hop(&current)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!(url = current.as_str(), error = %e, "Redirect hop failed");
                break RedirectVerdict::Unreachable;
            }
            Err(_) => {
                debug!(url = current.as_str(), "Redirect hop timed out");
                break RedirectVerdict::Unreachable;
            }
        };

        hops.push(RedirectHop {
            url: current.clone(),
            status: response.status,
        });

        if !response.is_redirect() {
            break if response.status >= 400 {
                RedirectVerdict::Unreachable
            } else {
                RedirectVerdict::Ok
            };
        }

        if hops.len() > max_hops {
            break RedirectVerdict::TooManyHops;
        }

        let location = response.location.unwrap_or_default();
        match resolve(&current, &location) {
            Some(next) => current = next,
            None => {
                debug!(
                    url = current.as_str(),
                    location = location.as_str(),
                    "Unresolvable Location header"
                );
                break RedirectVerdict::Unreachable;
            }
        }
    };

    let final_url = (verdict == RedirectVerdict::Ok).then(|| current.clone());
    if verdict != RedirectVerdict::Ok {
        warn!(
            start_url,
            %verdict,
            hops = hops.len(),
            "Redirect chain did not settle"
        );
    }

    RedirectChain {
        start_url: start_url.to_string(),
        hops,
        final_url,
        verdict,
    }
}

fn resolve(base: &str, location: &str) -> Option<String> {
    let base = url::Url::parse(base).ok()?;
    let next = base.join(location.trim()).ok()?;
    matches!(next.scheme(), "http" | "https").then(|| next.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProber;

    const T: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn direct_hit_is_ok() {
        let prober = MockProber::new().reachable("https://a.test/");
        let chain = walk_redirects(&prober, "https://a.test/", 10, T).await;
        assert_eq!(chain.verdict, RedirectVerdict::Ok);
        assert_eq!(chain.final_url.as_deref(), Some("https://a.test/"));
        assert_eq!(chain.hops.len(), 1);
    }

    #[tokio::test]
    async fn relative_location_is_followed() {
        let prober = MockProber::new()
            .redirect("http://a.test/", "https://a.test/")
            .redirect("https://a.test/", "/home")
            .reachable("https://a.test/home");
        let chain = walk_redirects(&prober, "http://a.test/", 10, T).await;
        assert_eq!(chain.verdict, RedirectVerdict::Ok);
        assert_eq!(chain.final_url.as_deref(), Some("https://a.test/home"));
        let statuses: Vec<u16> = chain.hops.iter().map(|h| h.status).collect();
        assert_eq!(statuses, vec![301, 301, 200]);
    }

    #[tokio::test]
    async fn loop_is_detected() {
        let prober = MockProber::new()
            .redirect("https://a.test/", "https://b.test/")
            .redirect("https://b.test/", "https://a.test/");
        let chain = walk_redirects(&prober, "https://a.test/", 10, T).await;
        assert_eq!(chain.verdict, RedirectVerdict::RedirectLoop);
        assert_eq!(chain.final_url, None);
        assert_eq!(chain.hops.len(), 2);
    }

    #[tokio::test]
    async fn loop_back_to_unnormalized_start_is_detected() {
        let prober = MockProber::new()
            .redirect("https://a.test/", "https://b.test/")
            .redirect("https://b.test/", "https://a.test/");
        let chain = walk_redirects(&prober, "https://a.test", 10, T).await;
        assert_eq!(chain.verdict, RedirectVerdict::RedirectLoop);
        assert_eq!(chain.hops.len(), 2);
        assert_eq!(chain.hops[0].url, "https://a.test/");
        assert_eq!(prober.calls().len(), 2);
    }

    #[tokio::test]
    async fn long_chain_stops_at_hop_limit() {
        let prober = (0..20).fold(MockProber::new(), |p, i| {
            p.redirect(
                &format!("https://a.test/{i}"),
                &format!("https://a.test/{}", i + 1),
            )
        });
        let chain = walk_redirects(&prober, "https://a.test/0", 3, T).await;
        assert_eq!(chain.verdict, RedirectVerdict::TooManyHops);
        assert_eq!(prober.calls().len(), 4);
    }

    #[tokio::test]
    async fn error_status_and_failures_are_unreachable() {
        let prober = MockProber::new().status("https://a.test/", 503);
        let chain = walk_redirects(&prober, "https://a.test/", 10, T).await;
        assert_eq!(chain.verdict, RedirectVerdict::Unreachable);

        let chain = walk_redirects(&MockProber::new(), "https://gone.test/", 10, T).await;
        assert_eq!(chain.verdict, RedirectVerdict::Unreachable);
        assert!(chain.hops.is_empty());
    }

    #[tokio::test]
    async fn slow_hop_times_out() {
        let prober = MockProber::new()
            .reachable("https://a.test/")
            .slow("https://a.test/", Duration::from_secs(30));
        let chain = walk_redirects(&prober, "https://a.test/", 10, Duration::from_millis(50)).await;
        assert_eq!(chain.verdict, RedirectVerdict::Unreachable);
    }
}
