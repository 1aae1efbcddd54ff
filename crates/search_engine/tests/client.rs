use std::time::Duration;

use pretty_assertions::assert_eq;
use search_engine::{ClientSettings, FailureKind, ReqwestSearchClient, SearchClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, tweak: impl FnOnce(&mut ClientSettings)) -> ReqwestSearchClient {
    let mut settings = ClientSettings::parse(&format!("{}/api/search", server.uri())).unwrap();
    tweak(&mut settings);
    ReqwestSearchClient::new(settings).unwrap()
}

fn sample_body() -> serde_json::Value {
    json!({"document": {"extension": "pdf"}, "location": {}, "packet": {}, "size": 100})
}

#[tokio::test]
async fn posts_json_with_system_id_and_returns_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(header("SystemId", "25"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(sample_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{"content_id": "C-1"}, {"_id": "abc", "extension": "pdf"}],
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, |_| {});
    let output = client.search(&sample_body()).await.expect("search ok");

    assert_eq!(
        output.hits,
        vec![json!({"content_id": "C-1"}), json!({"_id": "abc", "extension": "pdf"})]
    );
    assert_eq!(output.metadata.status, 200);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("application/json"));
}

#[tokio::test]
async fn configured_system_id_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("SystemId", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, |settings| settings.system_id = "77".to_string());
    let output = client.search(&sample_body()).await.expect("search ok");
    assert!(output.hits.is_empty());
}

#[tokio::test]
async fn body_without_hits_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server, |_| {});
    let output = client.search(&sample_body()).await.expect("search ok");
    assert!(output.hits.is_empty());
}

#[tokio::test]
async fn non_success_status_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"hits": [{"_id": "x"}]})))
        .mount(&server)
        .await;

    let client = client_for(&server, |_| {});
    let err = client.search(&sample_body()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert!(err.to_string().starts_with("http status 500"));
}

#[tokio::test]
async fn non_json_body_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, |_| {});
    let err = client.search(&sample_body()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidBody);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"hits": []})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, |settings| {
        settings.request_timeout = Some(Duration::from_millis(50));
    });
    let err = client.search(&sample_body()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"hits": [1, 2, 3]}"#))
        .mount(&server)
        .await;

    let client = client_for(&server, |settings| settings.max_bytes = 10);
    let err = client.search(&sample_body()).await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 10, .. }
    ));
}

#[test]
fn settings_reject_non_http_endpoints() {
    let err = ClientSettings::parse("ftp://example.com/search").unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
    let err = ClientSettings::parse("not a url").unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
