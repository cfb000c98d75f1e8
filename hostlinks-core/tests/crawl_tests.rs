// Tests for crawl orchestration and listing output

use hostlinks_core::crawl::{CrawlOptions, execute_crawl, generate_host_listing};
use hostlinks_scanner::CancellationToken;
use hostlinks_scanner::result::{Completion, CrawlReport, Observation};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn report(observations: Vec<Observation>) -> CrawlReport {
    CrawlReport {
        seed: "https://example.com/".to_string(),
        base_domain: "example.com".to_string(),
        observations,
        pages_visited: 3,
        completion: Completion::Drained,
        elapsed: Duration::from_millis(250),
    }
}

fn options(seed: String) -> CrawlOptions {
    CrawlOptions {
        seed,
        threads: 4,
        request_timeout: Duration::from_secs(5),
        drain_timeout: Duration::from_secs(10),
        cancel_timeout: Duration::from_secs(2),
        show_progress_bars: false,
        interrupt: None,
    }
}

// ============================================================================
// Listing Tests
// ============================================================================

#[test]
fn test_listing_shows_hosts_only() {
    let listing = generate_host_listing(&report(vec![
        Observation::new("other.org", "Other"),
        Observation::new("example.com", "Pricing"),
    ]));

    assert_eq!(
        listing,
        "Collection of links for: https://example.com/\n[other.org, example.com]\n"
    );
    assert!(!listing.contains("Pricing"));
}

#[test]
fn test_listing_empty_result() {
    let listing = generate_host_listing(&report(Vec::new()));
    assert!(listing.ends_with("[]\n"));
}

// ============================================================================
// Orchestration Tests
// ============================================================================

#[tokio::test]
async fn test_execute_crawl_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/team">Team</a><a href="https://github.com/acme">Code</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/team"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="https://linkedin.com/acme">Careers</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let callback = Arc::new(move |msg: String| messages_clone.lock().unwrap().push(msg));

    let report = execute_crawl(options(mock_server.uri()), Some(callback))
        .await
        .unwrap();

    assert_eq!(report.completion, Completion::Drained);
    assert_eq!(report.hosts(), vec!["linkedin.com", "github.com", "127.0.0.1"]);
    assert_eq!(messages.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_execute_crawl_invalid_seed() {
    let result = execute_crawl(options("::nope::".to_string()), None).await;

    let error = result.unwrap_err();
    assert!(error.contains("Invalid seed URL"));
}

#[tokio::test]
async fn test_execute_crawl_pre_cancelled_interrupt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let interrupt = CancellationToken::new();
    interrupt.cancel();
    let mut crawl_options = options(mock_server.uri());
    crawl_options.interrupt = Some(interrupt);

    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let callback = Arc::new(move |msg: String| messages_clone.lock().unwrap().push(msg));

    let report = execute_crawl(crawl_options, Some(callback)).await.unwrap();

    assert_eq!(report.completion, Completion::Interrupted);
    assert!(
        messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.contains("interrupted"))
    );
}
