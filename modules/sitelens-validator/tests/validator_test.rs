use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::Router;

use sitelens_common::testing::healthy_bundle;
use sitelens_common::{Axis, RedirectVerdict};
use sitelens_scoring::{score_all, ScoringConfig};
use sitelens_validator::testing::MockProber;
use sitelens_validator::{
    validate, walk_redirects, HttpProber, ProbeOutcome, Prober, ValidatorConfig,
};

// ---------------------------------------------------------------------------
// Fixture server
// ---------------------------------------------------------------------------

async fn moved_to(location: &'static str) -> impl IntoResponse {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)])
}

async fn no_head(method: Method) -> impl IntoResponse {
    if method == Method::HEAD {
        StatusCode::METHOD_NOT_ALLOWED
    } else {
        StatusCode::OK
    }
}

async fn serve() -> SocketAddr {
    let app = Router::new()
        .route("/a", get(|| moved_to("/b")))
        .route("/b", get(|| moved_to("/a")))
        .route("/start", get(|| moved_to("/ok")))
        .route("/ok", get(|| async { "ok" }))
        .route("/no-head", any(no_head));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn http_prober() -> HttpProber {
    let config = ValidatorConfig::builder()
        .probe_timeout(Duration::from_secs(2))
        .status_timeout(Duration::from_secs(2))
        .build();
    HttpProber::new(&config).unwrap()
}

// ---------------------------------------------------------------------------
// Live HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn live_redirect_loop_terminates() {
    let addr = serve().await;
    let chain = walk_redirects(
        &http_prober(),
        &format!("http://{addr}/a"),
        10,
        Duration::from_secs(2),
    )
    .await;

    assert_eq!(chain.verdict, RedirectVerdict::RedirectLoop);
    assert_eq!(chain.hops.len(), 2);
    assert!(chain.hops.iter().all(|h| h.status == 301));
}

#[tokio::test]
async fn live_redirect_settles() {
    let addr = serve().await;
    let chain = walk_redirects(
        &http_prober(),
        &format!("http://{addr}/start"),
        10,
        Duration::from_secs(2),
    )
    .await;

    assert_eq!(chain.verdict, RedirectVerdict::Ok);
    assert_eq!(chain.final_url, Some(format!("http://{addr}/ok")));
}

#[tokio::test]
async fn head_rejection_falls_back_to_get() {
    let addr = serve().await;
    let outcome = http_prober().probe(&format!("http://{addr}/no-head")).await;
    assert_eq!(outcome, ProbeOutcome::Reachable { status: 200 });
}

#[tokio::test]
async fn missing_resource_is_unreachable() {
    let addr = serve().await;
    let outcome = http_prober().probe(&format!("http://{addr}/missing")).await;
    assert_eq!(outcome, ProbeOutcome::Unreachable("HTTP 404".into()));
}

#[tokio::test]
async fn refused_connection_is_unreachable_not_an_error() {
    let outcome = http_prober().probe("http://127.0.0.1:9/").await;
    assert!(!outcome.is_reachable());
}

// ---------------------------------------------------------------------------
// Full validation with a mock network
// ---------------------------------------------------------------------------

fn healthy_network() -> MockProber {
    [
        "https://example.com/",
        "https://example.com/favicon.ico",
        "https://twitter.com/example",
        "https://en.wikipedia.org/wiki/Widget",
        "https://github.com/example/widgets",
        "https://example.com/img/hero.jpg",
        "https://example.com/img/range.jpg",
        "https://example.com/og.png",
    ]
    .into_iter()
    .fold(MockProber::new(), |p, url| p.reachable(url))
}

#[tokio::test]
async fn dead_social_profile_is_filtered_and_bundle_rescored() {
    let bundle = healthy_bundle();
    let scoring = ScoringConfig::default();
    let scores = score_all(&bundle, &scoring);
    let prober = healthy_network();

    let outcome = validate(&bundle, &scores, &prober, &ValidatorConfig::default(), &scoring).await;

    let chain = outcome.redirect_chain.as_ref().unwrap();
    assert_eq!(chain.verdict, RedirectVerdict::Ok);
    assert_eq!(
        outcome.bundle.snapshot.social_profiles,
        vec!["https://twitter.com/example"]
    );
    assert_eq!(outcome.bundle.heuristics.link_rot_ratio, Some(0.0));
    assert_eq!(outcome.bundle.heuristics.broken_image_count, Some(0));
    assert_eq!(outcome.summary.filtered, 1);
    assert!(outcome.summary.verification_score >= 90);
    assert!(outcome.snapshot_reliable);

    let summary = &outcome.summary;
    assert_eq!(summary.total_checks, summary.verified + summary.unverified);
    assert!(outcome.scores.score_of(Axis::Security).is_some());
}

#[tokio::test]
async fn slow_favicon_times_out_and_is_removed() {
    let bundle = healthy_bundle();
    let scoring = ScoringConfig::default();
    let scores = score_all(&bundle, &scoring);
    let prober = healthy_network()
        .reachable("https://www.linkedin.com/company/example")
        .slow("https://example.com/favicon.ico", Duration::from_secs(30));
    let config = ValidatorConfig::builder()
        .probe_timeout(Duration::from_millis(100))
        .build();

    let outcome = validate(&bundle, &scores, &prober, &config, &scoring).await;

    assert_eq!(outcome.bundle.snapshot.meta.favicon, None);
    let favicon = outcome
        .summary
        .checks
        .iter()
        .find(|c| c.field == "meta.favicon")
        .unwrap();
    assert!(favicon.reason.contains("timed out"));
    assert!(prober.peak_in_flight() <= 5);
}

#[tokio::test]
async fn redirect_loop_is_reported_without_aborting() {
    let bundle = healthy_bundle();
    let scoring = ScoringConfig::default();
    let scores = score_all(&bundle, &scoring);
    let prober = healthy_network()
        .redirect("https://example.com/", "https://www.example.com/")
        .redirect("https://www.example.com/", "https://example.com/");

    let outcome = validate(&bundle, &scores, &prober, &ValidatorConfig::default(), &scoring).await;

    let chain = outcome.redirect_chain.unwrap();
    assert_eq!(chain.verdict, RedirectVerdict::RedirectLoop);
    let check = outcome
        .summary
        .checks
        .iter()
        .find(|c| c.field == "final_url")
        .unwrap();
    assert!(!check.verified);
    assert!(check.reason.contains("redirect-loop"));
    assert_eq!(outcome.bundle.snapshot.final_url, bundle.snapshot.final_url);
}
