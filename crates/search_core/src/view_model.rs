use serde_json::Value;

use crate::SearchPhase;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: SearchPhase,
    /// Disables the search trigger and shows the spinner.
    pub loading: bool,
    pub result_count: usize,
    pub results: Vec<HitView>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitView {
    pub title: String,
    /// Pretty-printed JSON of the whole hit.
    pub body: String,
}

impl HitView {
    pub fn from_hit(index: usize, hit: &Value) -> Self {
        Self {
            title: hit_title(index, hit),
            body: serde_json::to_string_pretty(hit).unwrap_or_else(|_| hit.to_string()),
        }
    }
}

/// First truthy of `content_id`, `_id`; otherwise `Document {index + 1}`.
pub fn hit_title(index: usize, hit: &Value) -> String {
    ["content_id", "_id"]
        .iter()
        .filter_map(|key| hit.get(key))
        .find_map(truthy_label)
        .unwrap_or_else(|| format!("Document {}", index + 1))
}

fn truthy_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::hit_title;

    #[test]
    fn title_prefers_content_id() {
        assert_eq!(hit_title(0, &json!({"content_id": "C-1", "_id": "x"})), "C-1");
        assert_eq!(hit_title(0, &json!({"content_id": 42})), "42");
    }

    #[test]
    fn title_skips_falsy_values() {
        assert_eq!(hit_title(0, &json!({"content_id": "", "_id": "abc"})), "abc");
        assert_eq!(hit_title(2, &json!({"content_id": 0})), "Document 3");
        assert_eq!(hit_title(0, &json!("not an object")), "Document 1");
    }
}
