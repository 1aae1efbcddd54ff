use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use search_core::{update, AppState, FilterSet, Msg, SearchPhase};
use search_engine::EngineHandle;
use search_logging::{search_info, search_trace};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::effects::{self, EffectRunner};
use crate::render;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(cli: &Cli, config: &AppConfig) -> Result<ExitCode> {
    let preset = cli.filters.as_deref().map(load_preset).transpose()?;
    let state = build_form(cli, config, preset)?;

    if cli.dry_run {
        let payload = state.payload().to_json()?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(ExitCode::SUCCESS);
    }

    let settings = config.client_settings()?;
    search_info!("Searching {} as system {}", settings.endpoint, settings.system_id);
    let engine = EngineHandle::new(settings).context("failed to start search engine")?;
    let state = execute_search(state, &EffectRunner::new(engine));

    if cli.json {
        println!("{}", render::render_json(state.results()));
    } else {
        print!("{}", render::render(&state.view(), &Utc::now().to_rfc3339()));
    }

    Ok(exit_code(&state))
}

/// Submits one search and drives the state until it leaves `InFlight`.
fn execute_search(state: AppState, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, Msg::SearchClicked);
    if state.view().loading {
        eprintln!("Searching...");
    }
    let mut pending = VecDeque::from(runner.enqueue(effects));

    while let SearchPhase::InFlight { request_id } = state.phase() {
        let msg = match pending.pop_front() {
            Some(msg) => msg,
            None => match runner.next_msg(POLL_INTERVAL) {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    search_trace!("Still waiting for search {}", request_id);
                    continue;
                }
                Err(err) => effects::failed(request_id, err.to_string()),
            },
        };
        let (next, effects) = update(state, msg);
        state = next;
        pending.extend(runner.enqueue(effects));
    }
    state
}

fn exit_code(state: &AppState) -> ExitCode {
    match state.phase() {
        SearchPhase::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

/// Applies the command-line edits; the first rejected edit aborts.
fn build_form(cli: &Cli, config: &AppConfig, preset: Option<FilterSet>) -> Result<AppState> {
    let mut state = AppState::with_page_size(cli.size.unwrap_or(config.page_size));
    for msg in cli.form_messages(preset) {
        // Form edits never produce effects.
        let (next, _effects) = update(state, msg);
        state = next;
        if let Some(notice) = state.view().notice {
            bail!("{notice}");
        }
    }
    Ok(state)
}

fn load_preset(path: &Path) -> Result<FilterSet> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read filters {path:?}"))?;
    let filters = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse filters {path:?}"))?;
    search_info!("Loaded filter preset from {:?}", path);
    Ok(filters)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use clap::Parser;
    use search_engine::{FailureKind, ResponseMetadata, SearchClient, SearchError, SearchOutput};
    use serde_json::json;

    use super::*;

    /// Replays canned answers in order and records every request body.
    struct ScriptedClient {
        answers: Mutex<VecDeque<Result<SearchOutput, SearchError>>>,
        seen: Mutex<Vec<serde_json::Value>>,
    }

    impl ScriptedClient {
        fn new(answers: Vec<Result<SearchOutput, SearchError>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl SearchClient for ScriptedClient {
        async fn search(&self, body: &serde_json::Value) -> Result<SearchOutput, SearchError> {
            self.seen.lock().unwrap().push(body.clone());
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra search")
        }
    }

    fn hits(hits: Vec<serde_json::Value>) -> Result<SearchOutput, SearchError> {
        Ok(SearchOutput {
            hits,
            metadata: ResponseMetadata {
                status: 200,
                content_type: Some("application/json".to_string()),
                byte_len: 0,
            },
        })
    }

    fn bad_gateway() -> Result<SearchOutput, SearchError> {
        Err(SearchError {
            kind: FailureKind::HttpStatus(502),
            message: "bad gateway".to_string(),
        })
    }

    fn runner_for(client: Arc<ScriptedClient>) -> EffectRunner {
        EffectRunner::new(EngineHandle::with_client(client).unwrap())
    }

    #[test]
    fn successful_search_exits_zero() {
        let client = ScriptedClient::new(vec![hits(vec![json!({"_id": "a"})])]);
        let runner = runner_for(client.clone());
        let cli = Cli::parse_from(["docsearch", "-q", " reports "]);
        let state = build_form(&cli, &AppConfig::default(), None).unwrap();

        let state = execute_search(state, &runner);

        assert_eq!(state.phase(), SearchPhase::Succeeded);
        assert_eq!(state.results(), &[json!({"_id": "a"})]);
        assert_eq!(exit_code(&state), ExitCode::SUCCESS);
        assert_eq!(
            client.seen.lock().unwrap().as_slice(),
            &[json!({
                "document": {}, "location": {}, "packet": {},
                "generalQuery": "reports", "size": 100
            })]
        );
    }

    #[test]
    fn failed_search_exits_non_zero_and_keeps_results() {
        let client = ScriptedClient::new(vec![hits(vec![json!({"_id": "a"})]), bad_gateway()]);
        let runner = runner_for(client.clone());
        let cli = Cli::parse_from(["docsearch"]);
        let state = build_form(&cli, &AppConfig::default(), None).unwrap();

        let state = execute_search(state, &runner);
        let state = execute_search(state, &runner);

        assert_eq!(state.phase(), SearchPhase::Failed);
        assert_eq!(exit_code(&state), ExitCode::FAILURE);
        assert_eq!(state.results(), &[json!({"_id": "a"})]);
        assert_eq!(
            state.view().notice.as_deref(),
            Some("Search failed: http status 502: bad gateway")
        );
        assert_eq!(client.seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn crashed_request_ends_as_failure() {
        // An empty script panics inside the request task.
        let client = ScriptedClient::new(Vec::new());
        let runner = runner_for(client.clone());
        let state = build_form(&Cli::parse_from(["docsearch"]), &AppConfig::default(), None)
            .unwrap();

        let state = execute_search(state, &runner);

        assert_eq!(state.phase(), SearchPhase::Failed);
        assert_eq!(exit_code(&state), ExitCode::FAILURE);
        assert!(state.results().is_empty());
    }

    #[test]
    fn config_page_size_applies_without_flag() {
        let config = AppConfig {
            page_size: 25,
            ..AppConfig::default()
        };
        let state = build_form(&Cli::parse_from(["docsearch"]), &config, None).unwrap();
        assert_eq!(state.payload().size, 25);

        let cli = Cli::parse_from(["docsearch", "--size", "5"]);
        let state = build_form(&cli, &config, None).unwrap();
        assert_eq!(state.payload().size, 5);
    }

    #[test]
    fn form_is_built_from_arguments() {
        let cli = Cli::parse_from([
            "docsearch",
            "-d",
            "content_id=  ",
            "-d",
            "extension=pdf",
            "--item",
            "document.attributes",
            "--size",
            "5",
        ]);
        let state = build_form(&cli, &AppConfig::default(), None).unwrap();
        assert_eq!(
            state.payload().to_json().unwrap(),
            json!({"document": {"extension": "pdf"}, "location": {}, "packet": {}, "size": 5})
        );
    }

    #[test]
    fn unknown_field_aborts() {
        let cli = Cli::parse_from(["docsearch", "-p", "locationId=1"]);
        let err = build_form(&cli, &AppConfig::default(), None).unwrap_err();
        assert_eq!(err.to_string(), "unknown packet field `locationId`");
    }

    #[test]
    fn preset_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"location": {{"locationId": "42"}}}}"#).unwrap();

        let preset = load_preset(file.path()).unwrap();
        let cli = Cli::parse_from(["docsearch"]);
        let state = build_form(&cli, &AppConfig::default(), Some(preset)).unwrap();
        assert_eq!(
            state.payload().to_json().unwrap(),
            json!({"document": {}, "location": {"locationId": "42"}, "packet": {}, "size": 100})
        );
    }

    #[test]
    fn malformed_preset_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_preset(file.path()).is_err());
    }
}
