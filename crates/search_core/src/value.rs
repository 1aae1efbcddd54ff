use std::collections::BTreeMap;

use serde::Serialize;

/// Property map of a record node.
pub type Record = BTreeMap<String, FilterValue>;

/// A node in a filter tree.
///
/// JSON `null` has no variant; an unset value is represented by its absence
/// (`Option::None` or a missing record key).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    Sequence(Vec<FilterValue>),
    Record(Record),
}

impl FilterValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn record<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FilterValue)>,
    {
        Self::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn strings<S: AsRef<str>>(items: &[S]) -> Self {
        Self::Sequence(items.iter().map(|s| Self::string(s.as_ref())).collect())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}
