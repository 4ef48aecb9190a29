#![cfg(feature = "ddgs")]

use reqwest::StatusCode;
use serde_json::Value;
use synaptic_duckduckgo::{
    Backend, BackendError, DdgsClient, DdgsError, DuckDuckGoConfig, Region, SafeSearch,
    TextSearch, TextSearchRequest,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(backend: Backend, max_results: Option<usize>) -> TextSearchRequest {
    TextSearchRequest {
        keywords: "rust".into(),
        region: Region::Worldwide,
        safesearch: SafeSearch::Moderate,
        timelimit: None,
        backend,
        max_results,
    }
}

/// HTML endpoint page with one result per slug and an optional "Next" form
/// posting offset `next`.
fn html_page(slugs: &[&str], next: Option<u32>) -> String {
    let mut body = String::from("<html><body>");
    for slug in slugs {
        body.push_str(&format!(
            r#"<div class="result results_links web-result">
                 <h2 class="result__title"><a class="result__a" href="https://example.com/{slug}">Title {slug}</a></h2>
                 <a class="result__snippet">Snippet {slug}</a>
               </div>"#
        ));
    }
    if let Some(offset) = next {
        body.push_str(&format!(
            r#"<div class="nav-link"><form action="/html/" method="post">
                 <input type="submit" class="btn btn--alt" value="Next" />
                 <input type="hidden" name="q" value="rust" />
                 <input type="hidden" name="s" value="{offset}" />
               </form></div>"#
        ));
    }
    body.push_str("</body></html>");
    body
}

fn lite_page(slugs: &[&str]) -> String {
    let mut body = String::from("<html><body><table>");
    for slug in slugs {
        body.push_str(&format!(
            r#"<tr><td><a rel="nofollow" href="https://example.org/{slug}" class='result-link'>Lite {slug}</a></td></tr>
               <tr><td class='result-snippet'>Lite snippet {slug}</td></tr>"#
        ));
    }
    body.push_str("</table></body></html>");
    body
}

async fn mount_page(server: &MockServer, endpoint: &str, marker: &str, body: String) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, endpoint: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> DuckDuckGoConfig {
    DuckDuckGoConfig::new()
        .with_html_url(format!("{}/html/", server.uri()))
        .with_lite_url(format!("{}/lite/", server.uri()))
}

// The blocking client is built, used and dropped on the blocking pool.
async fn run(
    config: DuckDuckGoConfig,
    request: TextSearchRequest,
) -> Result<Vec<Value>, BackendError> {
    tokio::task::spawn_blocking(move || -> Result<Vec<Value>, BackendError> {
        let client = DdgsClient::from_config(&config)?;
        client.text(&request)
    })
    .await
    .unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

fn hrefs(records: &[Value]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r["href"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn first_page_only_without_bound() {
    let server = MockServer::start().await;
    mount_page(&server, "/html/", "kp=-1", html_page(&["a", "b", "c"], Some(10))).await;
    mount_page(&server, "/html/", "s=10", html_page(&["d"], None)).await;

    let records = run(config_for(&server), request(Backend::Html, None)).await.unwrap();

    assert_eq!(
        hrefs(&records),
        vec!["https://example.com/a", "https://example.com/b", "https://example.com/c"]
    );
    assert_eq!(records[0]["title"], "Title a");
    assert_eq!(records[0]["body"], "Snippet a");
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn initial_form_carries_request_parameters() {
    let server = MockServer::start().await;
    mount_page(&server, "/html/", "kp=-1", html_page(&["a"], None)).await;

    run(config_for(&server), request(Backend::Html, None)).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    assert!(body.contains("q=rust"), "{body}");
    assert!(body.contains("kl=wt-wt"), "{body}");
    assert!(!body.contains("df="), "{body}");
}

#[tokio::test]
async fn follows_pages_until_bound_then_truncates() {
    let server = MockServer::start().await;
    mount_page(&server, "/html/", "kp=-1", html_page(&["a", "b"], Some(10))).await;
    mount_page(&server, "/html/", "s=10", html_page(&["c", "d"], Some(20))).await;
    mount_page(&server, "/html/", "s=20", html_page(&["e", "f"], None)).await;

    let records = run(config_for(&server), request(Backend::Html, Some(3))).await.unwrap();

    assert_eq!(
        hrefs(&records),
        vec!["https://example.com/a", "https://example.com/b", "https://example.com/c"]
    );
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn stops_when_page_adds_nothing_new() {
    let server = MockServer::start().await;
    mount_page(&server, "/html/", "kp=-1", html_page(&["a", "b"], Some(10))).await;
    mount_page(&server, "/html/", "s=10", html_page(&["b", "a"], Some(20))).await;
    mount_page(&server, "/html/", "s=20", html_page(&["c"], None)).await;

    let records = run(config_for(&server), request(Backend::Html, Some(10))).await.unwrap();

    assert_eq!(hrefs(&records), vec!["https://example.com/a", "https://example.com/b"]);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn duplicate_hrefs_are_dropped() {
    let server = MockServer::start().await;
    mount_page(&server, "/html/", "kp=-1", html_page(&["a", "b"], Some(10))).await;
    mount_page(&server, "/html/", "s=10", html_page(&["b", "c"], None)).await;

    let records = run(config_for(&server), request(Backend::Html, Some(5))).await.unwrap();

    assert_eq!(
        hrefs(&records),
        vec!["https://example.com/a", "https://example.com/b", "https://example.com/c"]
    );
}

#[tokio::test]
async fn rate_limit_statuses() {
    for status in [202, 403, 429] {
        let server = MockServer::start().await;
        mount_status(&server, "/html/", status).await;

        let err = run(config_for(&server), request(Backend::Html, None)).await.unwrap_err();

        match err.downcast_ref::<DdgsError>() {
            Some(DdgsError::RateLimited(code)) => assert_eq!(code.as_u16(), status),
            other => panic!("status {status}: expected rate limit, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn other_failure_status() {
    let server = MockServer::start().await;
    mount_status(&server, "/lite/", 500).await;

    let err = run(config_for(&server), request(Backend::Lite, None)).await.unwrap_err();

    match err.downcast_ref::<DdgsError>() {
        Some(DdgsError::Status(code)) => assert_eq!(*code, StatusCode::INTERNAL_SERVER_ERROR),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn auto_falls_back_to_lite() {
    let server = MockServer::start().await;
    mount_status(&server, "/html/", 500).await;
    mount_page(&server, "/lite/", "kp=-1", lite_page(&["x", "y"])).await;

    let records = run(config_for(&server), request(Backend::Auto, None)).await.unwrap();

    assert_eq!(
        hrefs(&records),
        vec!["https://example.org/x", "https://example.org/y"]
    );
    assert_eq!(records[1]["body"], "Lite snippet y");
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn auto_uses_html_when_it_succeeds() {
    let server = MockServer::start().await;
    mount_page(&server, "/html/", "kp=-1", html_page(&["a"], None)).await;
    mount_page(&server, "/lite/", "kp=-1", lite_page(&["x"])).await;

    let records = run(config_for(&server), request(Backend::Auto, None)).await.unwrap();

    assert_eq!(hrefs(&records), vec!["https://example.com/a"]);
    assert_eq!(request_count(&server).await, 1);
}
