use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use labfeeds::config::{Config, Credentials, FetchConfig};
use labfeeds::domain::{Fetched, SourceType};
use labfeeds::errors::SourceResult;
use labfeeds::sources::{
    DocumentFetcher, FeedSource, TwitterV1Source, TwitterV2Source, WikipediaSource,
};
use labfeeds::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Answers by URL suffix and keeps every request it saw
struct StubTransport {
    routes: Vec<(&'static str, u16, String)>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    fn new() -> Self {
        Self {
            routes: Vec::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn route(mut self, suffix: &'static str, status: u16, body: impl Into<String>) -> Self {
        self.routes.push((suffix, status, body.into()));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl HttpTransport for StubTransport {
    fn get(&self, request: &HttpRequest) -> SourceResult<HttpResponse> {
        self.seen.lock().unwrap().push(request.clone());

        let response = self
            .routes
            .iter()
            .find(|(suffix, _, _)| request.url.ends_with(suffix))
            .map(|(_, status, body)| HttpResponse::new(*status, body.clone()))
            .unwrap_or_else(|| HttpResponse::new(404, "Not Found"));
        Ok(response)
    }
}

fn twitter_config() -> FetchConfig {
    FetchConfig::new("https://api.twitter.com", "labhandle")
        .with_credentials(Credentials::Bearer("token".to_string()))
}

#[test]
fn test_missing_timeline_names_the_handle() {
    let transport = Arc::new(StubTransport::new());
    let source = TwitterV1Source::new(transport, twitter_config());

    assert_eq!(
        source.fetch_feed(20),
        Fetched::Unavailable("No response from Twitter. Are you sure labhandle is valid?".to_string())
    );
}

#[test]
fn test_document_body_is_returned_exactly() {
    let transport = Arc::new(StubTransport::new().route("/lab-rules.md", 200, "Lab Rules v2"));
    let fetcher = DocumentFetcher::new(transport);

    assert_eq!(
        fetcher.fetch_document("Lab Rules", "https://raw.example.org/lab-rules.md"),
        Fetched::Available("Lab Rules v2".to_string())
    );
}

#[test]
fn test_ascending_items_keep_their_order() {
    let body = r#"{"query": {"usercontribs": [
        {"revid": 1, "title": "Graph theory", "timestamp": "2013-01-01T08:00:00Z"},
        {"revid": 2, "title": "Bridges of Königsberg", "timestamp": "2013-01-02T09:30:00Z"},
        {"revid": 3, "title": "Euler path", "timestamp": "2013-01-03T10:45:00Z"}
    ]}}"#;
    let transport = Arc::new(StubTransport::new().route("/w/api.php", 200, body));
    let source = WikipediaSource::new(
        transport,
        FetchConfig::new("https://en.wikipedia.org", "LabBot"),
    );

    let items = source.fetch_feed(3).available().unwrap();

    let revisions: Vec<_> = items.iter().map(|i| i.get("revid").cloned().unwrap()).collect();
    assert_eq!(revisions, vec![1, 2, 3]);

    let day = |d| NaiveDate::from_ymd_opt(2013, 1, d).unwrap();
    assert_eq!(items[0].timestamp, day(1).and_hms_opt(8, 0, 0).unwrap());
    assert_eq!(items[1].timestamp, day(2).and_hms_opt(9, 30, 0).unwrap());
    assert_eq!(items[2].timestamp, day(3).and_hms_opt(10, 45, 0).unwrap());

    let json = serde_json::to_value(&items[0]).unwrap();
    assert_eq!(json["normalized_at"], "2013-01-01T08:00:00");
    assert_eq!(json["title"], "Graph theory");
}

#[test]
fn test_descending_upstream_order_is_not_resorted() {
    let body = r#"[
        {"id": 30, "text": "newest", "created_at": "Wed Oct 10 20:19:24 +0000 2018"},
        {"id": 20, "text": "older", "created_at": "Tue Oct 09 08:00:00 +0000 2018"},
        {"id": 10, "text": "oldest", "created_at": "Mon Oct 08 12:30:00 +0000 2018"}
    ]"#;
    let transport = Arc::new(StubTransport::new().route("/user_timeline.json", 200, body));
    let source = TwitterV1Source::new(transport, twitter_config());

    let items = source.fetch_feed(3).available().unwrap();
    let texts: Vec<_> = items.iter().filter_map(|i| i.get_str("text")).collect();

    assert_eq!(texts, vec!["newest", "older", "oldest"]);
    assert_eq!(
        items[0].timestamp,
        NaiveDate::from_ymd_opt(2018, 10, 10)
            .unwrap()
            .and_hms_opt(20, 19, 24)
            .unwrap()
    );
}

#[test]
fn test_requested_counts_are_capped() {
    let transport = Arc::new(
        StubTransport::new()
            .route("/2/users/by/username/labhandle", 200, r#"{"data": {"id": "42"}}"#)
            .route("/2/users/42/tweets", 200, r#"{"data": []}"#)
            .route("/w/api.php", 200, r#"{"query": {"usercontribs": []}}"#),
    );

    let twitter = TwitterV2Source::new(transport.clone(), twitter_config());
    let wikipedia = WikipediaSource::new(
        transport.clone(),
        FetchConfig::new("https://en.wikipedia.org", "LabBot"),
    );

    assert!(twitter.fetch_feed(5000).is_available());
    assert!(wikipedia.fetch_feed(5000).is_available());
    assert!(wikipedia.fetch_feed(25).is_available());

    let requests = transport.requests();
    let timeline = requests
        .iter()
        .find(|r| r.url.ends_with("/tweets"))
        .unwrap();
    assert_eq!(timeline.query_value("max_results"), Some("100"));
    assert_eq!(timeline.bearer_token.as_deref(), Some("token"));

    let limits: Vec<_> = requests
        .iter()
        .filter_map(|r| r.query_value("uclimit"))
        .collect();
    assert_eq!(limits, vec!["500", "25"]);
}

#[test]
fn test_registry_from_config_uses_transport() {
    let transport = Arc::new(StubTransport::new().route("/w/api.php", 200, r#"{"query": {"usercontribs": []}}"#));
    let config = Config::from_lookup(|key| match key {
        "WIKIPEDIA_USERNAME" => Some("LabBot".to_string()),
        "WIKIPEDIA_COUNT" => Some("12".to_string()),
        _ => None,
    })
    .unwrap();

    let registry = labfeeds::sources::SourceRegistry::from_config(&config, transport.clone());

    assert_eq!(registry.source_types(), vec![SourceType::Wikipedia]);
    assert_eq!(registry.fetch_feed(SourceType::Wikipedia, None), Fetched::Available(Vec::new()));
    assert_eq!(transport.requests()[0].query_value("uclimit"), Some("12"));
}
