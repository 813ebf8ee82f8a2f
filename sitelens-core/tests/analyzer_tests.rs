// Tests for the analyzer fetch/validate/render flow

use serde_json::json;
use sitelens_core::analyzer::Analyzer;
use sitelens_core::options::AnalyzerOptions;
use sitelens_core::view::{ItemsView, NO_RESULTS};
use sitelens_fetch::{FetchError, SiteDescriptor, SiteFetcher, SiteSource};
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Source that records requested URLs and answers with a fixed body.
struct RecordingSource {
    requested: Mutex<Vec<String>>,
    body: serde_json::Value,
}

impl RecordingSource {
    fn new(body: serde_json::Value) -> Self {
        Self {
            requested: Mutex::new(Vec::new()),
            body,
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl SiteSource for RecordingSource {
    async fn fetch_site(&self, url: &str) -> sitelens_fetch::error::Result<SiteDescriptor> {
        self.requested.lock().unwrap().push(url.to_string());
        SiteDescriptor::from_value(self.body.clone())
    }
}

async fn serve(body: serde_json::Value, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/site.json"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn fetcher() -> SiteFetcher {
    SiteFetcher::with_timeout(5).expect("failed to build test fetcher")
}

// ============================================================================
// Input Validation
// ============================================================================

#[tokio::test]
async fn test_empty_query_sets_error_without_fetching() {
    let source = RecordingSource::new(json!({"metadata": {}, "items": []}));
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());

    assert!(!analyzer.analyze(&source).await);
    assert!(analyzer.state().error);
    assert!(!analyzer.state().loading);
    assert!(source.requested().is_empty());
}

#[tokio::test]
async fn test_query_without_http_prefix_sets_error_without_fetching() {
    let source = RecordingSource::new(json!({"metadata": {}, "items": []}));
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());
    analyzer.set_query("example.com");

    assert!(!analyzer.analyze(&source).await);
    assert!(analyzer.state().error);
    assert!(source.requested().is_empty());
}

#[tokio::test]
async fn test_rejected_query_keeps_previous_results() {
    let source = RecordingSource::new(json!({"metadata": {"name": "A"}, "items": [{"title": "X"}]}));
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());
    analyzer.set_query("https://example.com");
    assert!(analyzer.analyze(&source).await);

    analyzer.set_query("");
    assert!(!analyzer.analyze(&source).await);

    let view = analyzer.view();
    assert!(view.error_notice().is_some());
    assert_eq!(view.cards().len(), 1);
    assert_eq!(source.requested().len(), 1);
}

// ============================================================================
// Normalization
// ============================================================================

#[tokio::test]
async fn test_fetch_target_appends_site_json() {
    let source = RecordingSource::new(json!({"metadata": {}, "items": []}));
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());

    analyzer.set_query("https://example.com/docs");
    analyzer.analyze(&source).await;
    analyzer.set_query("https://example.com/docs/site.json");
    analyzer.analyze(&source).await;

    assert_eq!(
        source.requested(),
        vec![
            "https://example.com/docs/site.json".to_string(),
            "https://example.com/docs/site.json".to_string(),
        ]
    );
}

// ============================================================================
// Fetch Outcomes (over HTTP)
// ============================================================================

#[tokio::test]
async fn test_successful_fetch_populates_state() {
    let server = serve(
        json!({"metadata": {"name": "Site A"}, "items": [{"title": "X"}]}),
        200,
    )
    .await;
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());
    analyzer.set_query(server.uri());

    assert!(analyzer.analyze(&fetcher()).await);

    let state = analyzer.state();
    assert!(!state.error);
    assert!(!state.loading);
    assert_eq!(
        state.metadata.as_ref().and_then(|m| m.name()).as_deref(),
        Some("Site A")
    );
    assert_eq!(state.items.len(), 1);

    let view = analyzer.view();
    assert_eq!(view.cards()[0].title, "X");
    assert_eq!(view.cards()[0].description, "No description");
}

#[tokio::test]
async fn test_missing_items_is_an_error() {
    let server = serve(json!({"metadata": {}}), 200).await;
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());
    analyzer.set_query(server.uri());

    assert!(!analyzer.analyze(&fetcher()).await);

    let state = analyzer.state();
    assert!(state.error);
    assert!(!state.loading);
    assert!(state.items.is_empty());
}

#[tokio::test]
async fn test_non_success_status_clears_state() {
    let good = serve(json!({"metadata": {"name": "A"}, "items": [{}, {}]}), 200).await;
    let bad = serve(json!({"metadata": {}, "items": []}), 503).await;
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());

    analyzer.set_query(good.uri());
    assert!(analyzer.analyze(&fetcher()).await);

    analyzer.set_query(bad.uri());
    assert!(!analyzer.analyze(&fetcher()).await);

    let state = analyzer.state();
    assert!(state.error);
    assert!(!state.loading);
    assert!(state.metadata.is_none());
    assert!(state.items.is_empty());

    let view = analyzer.view();
    assert!(view.overview.is_none());
    assert_eq!(view.items, ItemsView::Empty);
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/site.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());
    analyzer.set_query(server.uri());

    assert!(!analyzer.analyze(&fetcher()).await);
    assert!(analyzer.state().error);
}

#[tokio::test]
async fn test_repeated_analysis_is_idempotent() {
    let server = serve(
        json!({"metadata": {"name": "Same"}, "items": [{"title": "a"}, {"title": "b"}]}),
        200,
    )
    .await;
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());
    analyzer.set_query(server.uri());

    analyzer.analyze(&fetcher()).await;
    let first_view = analyzer.view();
    let first_items = analyzer.state().items.clone();

    analyzer.analyze(&fetcher()).await;
    assert_eq!(analyzer.view(), first_view);
    assert_eq!(analyzer.state().items, first_items);
}

#[tokio::test]
async fn test_empty_items_render_no_results() {
    let server = serve(json!({"metadata": {"name": "Empty"}, "items": []}), 200).await;
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());
    analyzer.set_query(server.uri());
    analyzer.analyze(&fetcher()).await;

    let view = analyzer.view();
    assert_eq!(view.items, ItemsView::Empty);
    assert_eq!(NO_RESULTS, "No results found.");
    assert_eq!(view.overview.unwrap().name, "Empty");
}

// ============================================================================
// Overlapping Attempts
// ============================================================================

#[test]
fn test_manual_ticket_flow_discards_stale_error() {
    let mut analyzer = Analyzer::new(AnalyzerOptions::default());
    analyzer.set_query("https://a.example.com");
    let first = analyzer.begin().unwrap();
    analyzer.set_query("https://b.example.com");
    let second = analyzer.begin().unwrap();
    assert!(second.generation() > first.generation());

    let descriptor =
        SiteDescriptor::from_value(json!({"metadata": {"name": "B"}, "items": []})).unwrap();
    assert!(analyzer.complete(&second, Ok(descriptor)));
    assert!(!analyzer.complete(
        &first,
        Err(FetchError::InvalidUrl("late failure".to_string()))
    ));

    assert!(!analyzer.state().error);
    assert_eq!(
        analyzer.state().last_target.as_deref(),
        Some("https://b.example.com/site.json")
    );
}
