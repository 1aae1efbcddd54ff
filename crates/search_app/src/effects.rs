use std::time::Duration;

use search_core::{Effect, Msg, RequestId, SearchResultKind};
use search_engine::{EngineError, EngineEvent, EngineHandle};
use search_logging::{search_debug, search_info, search_warn};

use crate::render;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Runs the effects; a search that could not be submitted comes back as
    /// its failed completion.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::SubmitSearch {
                    request_id,
                    payload,
                } => {
                    search_info!(
                        "SubmitSearch request_id={} general_query={}",
                        request_id,
                        payload.general_query.is_some()
                    );
                    let submitted = payload
                        .to_json()
                        .map_err(|err| err.to_string())
                        .and_then(|body| {
                            self.engine
                                .search(request_id, body)
                                .map_err(|err| err.to_string())
                        });
                    if let Err(message) = submitted {
                        search_warn!("Search {} not submitted: {}", request_id, message);
                        follow_ups.push(failed(request_id, message));
                    }
                }
                Effect::NotifyFailure { message } => {
                    render::notify_failure(&message);
                }
            }
        }
        follow_ups
    }

    /// Waits up to `timeout` for the next engine completion.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineError> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }
}

pub fn failed(request_id: RequestId, message: impl Into<String>) -> Msg {
    Msg::SearchFinished {
        request_id,
        result: SearchResultKind::Failed {
            message: message.into(),
        },
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchCompleted { request_id, result } => match result {
            Ok(output) => {
                search_debug!(
                    "Search {} status={} bytes={}",
                    request_id,
                    output.metadata.status,
                    output.metadata.byte_len
                );
                Msg::SearchFinished {
                    request_id,
                    result: SearchResultKind::Hits(output.hits),
                }
            }
            Err(err) => failed(request_id, err.to_string()),
        },
    }
}
