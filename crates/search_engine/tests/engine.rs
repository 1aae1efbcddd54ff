use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use search_engine::{
    EngineEvent, EngineHandle, FailureKind, ResponseMetadata, SearchClient, SearchError,
    SearchOutput,
};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(search_logging::initialize_for_tests);
}

/// Answers with the `size` field of each request as the only hit.
#[derive(Default)]
struct EchoClient {
    seen: Mutex<Vec<serde_json::Value>>,
}

#[async_trait::async_trait]
impl SearchClient for EchoClient {
    async fn search(&self, body: &serde_json::Value) -> Result<SearchOutput, SearchError> {
        self.seen.lock().unwrap().push(body.clone());
        if body.get("panic").is_some() {
            panic!("client crashed");
        }
        if body.get("fail").is_some() {
            return Err(SearchError {
                kind: FailureKind::HttpStatus(502),
                message: "bad gateway".to_string(),
            });
        }
        Ok(SearchOutput {
            hits: vec![json!({"size": body["size"]})],
            metadata: ResponseMetadata {
                status: 200,
                content_type: None,
                byte_len: 0,
            },
        })
    }
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine running")
        .expect("engine event")
}

#[test]
fn completion_carries_request_id_and_hits() {
    init_logging();
    let client = Arc::new(EchoClient::default());
    let engine = EngineHandle::with_client(client.clone()).unwrap();

    engine.search(7, json!({"size": 100})).unwrap();

    match next_event(&engine) {
        EngineEvent::SearchCompleted { request_id, result } => {
            assert_eq!(request_id, 7);
            assert_eq!(result.unwrap().hits, vec![json!({"size": 100})]);
        }
    }
    assert_eq!(client.seen.lock().unwrap().len(), 1);
}

#[test]
fn failures_are_reported_as_events() {
    init_logging();
    let engine = EngineHandle::with_client(Arc::new(EchoClient::default())).unwrap();

    engine.search(3, json!({"fail": true})).unwrap();

    match next_event(&engine) {
        EngineEvent::SearchCompleted { request_id, result } => {
            assert_eq!(request_id, 3);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(502));
        }
    }
    assert!(engine.try_recv().is_none());
}

#[test]
fn crashed_request_still_completes() {
    init_logging();
    let engine = EngineHandle::with_client(Arc::new(EchoClient::default())).unwrap();

    engine.search(9, json!({"panic": true})).unwrap();

    match next_event(&engine) {
        EngineEvent::SearchCompleted { request_id, result } => {
            assert_eq!(request_id, 9);
            assert_eq!(result.unwrap_err().kind, FailureKind::Aborted);
        }
    }

    engine.search(10, json!({"size": 5})).unwrap();
    match next_event(&engine) {
        EngineEvent::SearchCompleted { request_id, result } => {
            assert_eq!(request_id, 10);
            assert!(result.is_ok());
        }
    }
}

#[test]
fn idle_engine_times_out_without_event() {
    init_logging();
    let engine = EngineHandle::with_client(Arc::new(EchoClient::default())).unwrap();
    assert!(engine
        .recv_timeout(Duration::from_millis(20))
        .unwrap()
        .is_none());
}
