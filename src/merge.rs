//! JSON deep merge for `multi_merge`
//!
//! Stored values are opaque strings; merging treats both the stored value
//! and the incoming one as JSON objects.

use serde_json::{Map, Value};

use crate::error::{FlatKvError, Result};

/// Merge `patch` into `target`
///
/// Keys whose values are objects on both sides merge recursively; any other
/// value in `patch` replaces the one in `target`.
pub fn deep_merge_into(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, patch_value) in patch {
        let nested = match patch_value {
            Value::Object(nested) => nested,
            other => {
                target.insert(key, other);
                continue;
            }
        };

        if let Some(Value::Object(existing)) = target.get_mut(&key) {
            deep_merge_into(existing, nested);
            continue;
        }
        target.insert(key, Value::Object(nested));
    }
}

/// Merge the JSON object `incoming` into the JSON object `stored`
///
/// Returns the compact serialization of the merged object.
pub fn merge_json(key: &str, stored: &str, incoming: &str) -> Result<String> {
    let mut target = parse_object(key, stored, "stored")?;
    let patch = parse_object(key, incoming, "new")?;

    deep_merge_into(&mut target, patch);

    serde_json::to_string(&Value::Object(target)).map_err(|e| FlatKvError::Merge {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn parse_object(key: &str, text: &str, which: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(FlatKvError::Merge {
            key: key.to_string(),
            reason: format!("{} value is a JSON {}, not an object", which, json_kind(&other)),
        }),
        Err(e) => Err(FlatKvError::Merge {
            key: key.to_string(),
            reason: format!("{} value is not valid JSON: {}", which, e),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
