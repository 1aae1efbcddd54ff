use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use search_logging::{search_debug, search_warn};
use thiserror::Error;

use crate::client::{ClientSettings, ReqwestSearchClient, SearchClient};
use crate::{EngineEvent, FailureKind, RequestId, SearchError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build search client: {0}")]
    Client(#[from] SearchError),
    #[error("search engine stopped")]
    Disconnected,
}

enum EngineCommand {
    Search {
        request_id: RequestId,
        body: serde_json::Value,
    },
}

/// Runs search requests on a background tokio runtime.
///
/// Commands go in through [`EngineHandle::search`]; completions come back as
/// [`EngineEvent`]s in submission-independent order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ReqwestSearchClient::new(settings)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn SearchClient>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(handle_command(client, command, event_tx));
            }
            search_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    /// Queues a search; fails only when the engine thread is gone.
    pub fn search(
        &self,
        request_id: RequestId,
        body: serde_json::Value,
    ) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::Search { request_id, body })
            .map_err(|_| {
                search_warn!("Engine thread gone; search {} dropped", request_id);
                EngineError::Disconnected
            })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// `Ok(None)` on timeout; `Disconnected` once no completion can arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }
}

async fn handle_command(
    client: Arc<dyn SearchClient>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Search { request_id, body } => {
            // A panicking client still yields a completion.
            let task = tokio::spawn(async move { client.search(&body).await });
            let result = task.await.unwrap_or_else(|err| {
                Err(SearchError::new(FailureKind::Aborted, err.to_string()))
            });
            if let Err(err) = &result {
                search_warn!("Search {} failed: {}", request_id, err);
            }
            let _ = event_tx.send(EngineEvent::SearchCompleted { request_id, result });
        }
    }
}
