//! Recursive removal of unset values from a filter tree.
//!
//! Empty or whitespace-only strings, empty sequences and records without any
//! remaining property count as unset. Only the value decides; field names are
//! never inspected.

use crate::value::{FilterValue, Record};

/// Where in the tree a node sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// One of the payload sections; survives as `{}` when empty.
    Section,
    /// Anything below a section.
    Nested,
}

/// Sanitizes an optional node. `None` stays absent.
pub fn sanitize_opt(value: Option<&FilterValue>, level: Level) -> Option<FilterValue> {
    value.and_then(|value| sanitize(value, level))
}

/// Returns the sanitized copy of `value`, or `None` when nothing is left.
///
/// Non-empty strings come back trimmed.
pub fn sanitize(value: &FilterValue, level: Level) -> Option<FilterValue> {
    match value {
        FilterValue::String(s) => sanitize_str(s).map(FilterValue::string),
        FilterValue::Sequence(items) => {
            let kept: Vec<FilterValue> = items
                .iter()
                .filter_map(|item| sanitize(item, Level::Nested))
                .collect();
            (!kept.is_empty()).then_some(FilterValue::Sequence(kept))
        }
        FilterValue::Record(record) => {
            let kept = sanitize_record(record);
            match level {
                Level::Section => Some(FilterValue::Record(kept)),
                Level::Nested => (!kept.is_empty()).then_some(FilterValue::Record(kept)),
            }
        }
        FilterValue::Number(_) | FilterValue::Bool(_) => Some(value.clone()),
    }
}

/// Sanitizes a section record; the result is always a record, possibly empty.
pub fn sanitize_section(record: &Record) -> Record {
    sanitize_record(record)
}

/// Trimmed string, or `None` when blank.
pub fn sanitize_str(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn sanitize_record(record: &Record) -> Record {
    record
        .iter()
        .filter_map(|(key, value)| sanitize(value, Level::Nested).map(|v| (key.clone(), v)))
        .collect()
}
