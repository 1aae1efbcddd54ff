//! Search engine: HTTP client for the search endpoint and background execution.
mod client;
mod engine;
mod hits;
mod types;

pub use client::{
    ClientSettings, ReqwestSearchClient, SearchClient, DEFAULT_ENDPOINT, DEFAULT_SYSTEM_ID,
    SYSTEM_ID_HEADER,
};
pub use engine::{EngineError, EngineHandle};
pub use hits::extract_hits;
pub use types::{EngineEvent, FailureKind, RequestId, ResponseMetadata, SearchError, SearchOutput};
