use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use search_core::DEFAULT_PAGE_SIZE;
use search_engine::{ClientSettings, SearchError, DEFAULT_ENDPOINT, DEFAULT_SYSTEM_ID};
use serde::Deserialize;
use thiserror::Error;

use crate::logging::LogDestination;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid log level `{0}`")]
    LogLevel(String),
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] SearchError),
}

/// Client configuration, read from an optional RON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub endpoint: String,
    pub system_id: String,
    pub page_size: u32,
    pub connect_timeout_secs: u64,
    /// `None` waits for the backend indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub max_response_bytes: u64,
    pub accept_invalid_certs: bool,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            system_id: DEFAULT_SYSTEM_ID.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_secs: 10,
            request_timeout_secs: Some(30),
            max_response_bytes: 16 * 1024 * 1024,
            accept_invalid_certs: false,
            log_destination: LogDestination::Terminal,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    /// Base level from the config, raised one step per `-v`.
    pub fn level_filter(&self, verbose: u8) -> Result<LevelFilter, ConfigError> {
        let base: LevelFilter = self
            .log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))?;
        let levels = LevelFilter::iter().collect::<Vec<_>>();
        let index = levels.iter().position(|level| *level == base).unwrap_or(0);
        let raised = (index + usize::from(verbose)).min(levels.len() - 1);
        Ok(levels[raised])
    }

    pub fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        let mut settings = ClientSettings::parse(&self.endpoint)?;
        settings.system_id = self.system_id.clone();
        settings.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        settings.max_bytes = self.max_response_bytes;
        settings.accept_invalid_certs = self.accept_invalid_certs;
        Ok(settings)
    }
}
