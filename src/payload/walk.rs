use log::warn;
use serde_json::{Map, Value};

/// Returns the mapping stored at `value`, or `None` after logging when the
/// level holds something else. Callers treat `None` as an empty mapping.
pub(super) fn mapping<'a>(value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(object) => Some(object),
        Value::Null => None,
        other => {
            warn!(
                "expected a mapping at {path}, found {}; treating it as empty",
                json_kind(other)
            );
            None
        }
    }
}

/// Walks the entries of the mapping at `value` in JavaScript property order:
/// array-index keys (`"0"`, `"17"`, ...) first in ascending numeric order,
/// then every other key in document order.
pub(super) fn entries<'a>(
    value: &'a Value,
    path: &'a str,
) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
    let mut ordered = mapping(value, path)
        .map(|object| object.iter().collect::<Vec<_>>())
        .unwrap_or_default();
    // Stable, so non-index keys keep their document order.
    ordered.sort_by_key(|(key, _)| array_index(key).map_or((1, 0), |index| (0, index)));
    ordered.into_iter()
}

/// Keys a JS object enumerates first: canonical integers below `u32::MAX`.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

/// Collects the string members of a list, skipping anything else.
pub(super) fn string_list(value: Option<&Value>, path: &str) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };

    let Value::Array(items) = value else {
        if !value.is_null() {
            warn!("expected a list at {path}, found {}", json_kind(value));
        }
        return Vec::new();
    };

    let mut skipped = 0usize;
    let strings = items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text.clone()),
            _ => {
                skipped += 1;
                None
            }
        })
        .collect::<Vec<_>>();

    if skipped > 0 {
        warn!("skipped {skipped} non-string entries in {path}");
    }

    strings
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
