use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use search_logging::{search_debug, search_info, search_warn};
use url::Url;

use crate::hits::extract_hits;
use crate::{FailureKind, ResponseMetadata, SearchError, SearchOutput};

pub const DEFAULT_ENDPOINT: &str = "https://localhost:7194/api/search";
pub const DEFAULT_SYSTEM_ID: &str = "25";
/// Header carrying the tenant/system identifier.
pub const SYSTEM_ID_HEADER: &str = "SystemId";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: Url,
    pub system_id: String,
    pub connect_timeout: Duration,
    /// `None` waits for the backend indefinitely.
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
    pub accept_invalid_certs: bool,
}

impl ClientSettings {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            system_id: DEFAULT_SYSTEM_ID.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Some(Duration::from_secs(30)),
            max_bytes: 16 * 1024 * 1024,
            accept_invalid_certs: false,
        }
    }

    pub fn parse(endpoint: &str) -> Result<Self, SearchError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| SearchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        match endpoint.scheme() {
            "http" | "https" => Ok(Self::new(endpoint)),
            other => Err(SearchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {other}"),
            )),
        }
    }
}

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, body: &serde_json::Value) -> Result<SearchOutput, SearchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSearchClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestSearchClient {
    pub fn new(settings: ClientSettings) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| SearchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl SearchClient for ReqwestSearchClient {
    async fn search(&self, body: &serde_json::Value) -> Result<SearchOutput, SearchError> {
        let encoded = serde_json::to_vec(body)
            .map_err(|err| SearchError::new(FailureKind::InvalidBody, err.to_string()))?;
        search_debug!("POST {} payload={}", self.settings.endpoint, body);

        let response = self
            .client
            .post(self.settings.endpoint.clone())
            .header(SYSTEM_ID_HEADER, self.settings.system_id.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(encoded)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            search_warn!("Search endpoint answered {}", status);
            return Err(SearchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let parsed: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|err| SearchError::new(FailureKind::InvalidBody, err.to_string()))?;
        let hits = extract_hits(parsed);
        search_info!("Search returned {} hits ({} bytes)", hits.len(), bytes.len());

        Ok(SearchOutput {
            hits,
            metadata: ResponseMetadata {
                status: status.as_u16(),
                content_type,
                byte_len: bytes.len() as u64,
            },
        })
    }
}

fn too_large(max_bytes: u64, actual: u64) -> SearchError {
    SearchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        return SearchError::new(FailureKind::Timeout, err.to_string());
    }
    SearchError::new(FailureKind::Network, err.to_string())
}
