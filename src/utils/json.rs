//! JSON helpers shared by request building and stream parsing.

use serde_json::{Map, Value};

/// Whether `text` is a complete JSON document.
pub fn is_parsable_json(text: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
}

/// Shallow-merge the fields of `extra` into `target`; `extra` wins.
///
/// Non-object `extra` values are ignored.
pub fn merge_object(target: &mut Map<String, Value>, extra: &Value) {
    if let Value::Object(fields) = extra {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Drop `null` fields so absent options are omitted from the request.
pub fn strip_nulls(target: &mut Map<String, Value>) {
    target.retain(|_, value| !value.is_null());
}
