//! Deep key renaming between the export casing (`snake_case`) and the
//! in-editor casing (`camelCase`).
//!
//! Only object keys are renamed. String values, numbers and array order are
//! left untouched, so `{"image_url": "a_b"}` becomes `{"imageUrl": "a_b"}`.

use serde_json::{Map, Value};

/// Rename every object key in `value` from `snake_case` to `camelCase`
pub fn to_camel_case(value: &Value) -> Value {
    rename_keys(value, &camel_key)
}

/// Rename every object key in `value` from `camelCase` to `snake_case`
pub fn to_snake_case(value: &Value) -> Value {
    rename_keys(value, &snake_key)
}

fn rename_keys(value: &Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => {
            let renamed: Map<String, Value> = map
                .iter()
                .map(|(key, nested)| (rename(key.as_str()), rename_keys(nested, rename)))
                .collect();
            Value::Object(renamed)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| rename_keys(item, rename)).collect()),
        other => other.clone(),
    }
}

/// `avatar_url` -> `avatarUrl`. Leading and trailing underscores are kept.
pub(crate) fn camel_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;

    for ch in key.chars() {
        if ch == '_' {
            if out.chars().all(|c| c == '_') {
                out.push(ch);
            } else {
                upper_next = true;
            }
            continue;
        }

        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }

    if upper_next {
        out.push('_');
    }
    out
}

/// `avatarUrl` -> `avatar_url`
pub(crate) fn snake_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);

    for ch in key.chars() {
        if ch.is_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
