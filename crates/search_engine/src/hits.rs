use serde_json::Value;

/// Pulls the `hits` array out of a response body.
///
/// A missing or non-array `hits` is not an error; it yields no results.
pub fn extract_hits(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove("hits") {
            Some(Value::Array(hits)) => hits,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
