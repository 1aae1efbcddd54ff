use std::fmt::Write;

use search_core::{AppViewModel, SearchPhase};

const EMPTY_RESULTS: &str = "No results found. Try adjusting your search filters.";

pub fn render(view: &AppViewModel, searched_at: &str) -> String {
    let mut out = String::new();
    let status = match view.phase {
        SearchPhase::Idle => "idle",
        SearchPhase::InFlight { .. } => "searching...",
        SearchPhase::Succeeded => "done",
        SearchPhase::Failed => "failed",
    };
    let _ = writeln!(
        out,
        "Search Results ({}) | {} | {}",
        view.result_count, status, searched_at
    );

    if view.results.is_empty() {
        let _ = writeln!(out, "{EMPTY_RESULTS}");
        return out;
    }

    for hit in &view.results {
        let _ = writeln!(out);
        let _ = writeln!(out, "== {}", hit.title);
        for line in hit.body.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// Raw hits as a pretty JSON array.
pub fn render_json(hits: &[serde_json::Value]) -> String {
    serde_json::to_string_pretty(hits).unwrap_or_else(|_| "[]".to_string())
}

pub fn notify_failure(message: &str) {
    eprintln!("Search failed: {message}");
}
