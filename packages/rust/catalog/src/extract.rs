//! Safe nested lookups over untyped catalog responses.
//!
//! Catalog payloads are deep, loosely shaped JSON trees; the sprite we want
//! sits several optional levels down. Rather than modeling the whole
//! response, we walk an explicit key path and treat any miss as a normal
//! "not there" outcome.

use serde_json::Value;

/// Follow `path` through `value`, key by key.
///
/// Objects are indexed by key, arrays by numeric key. Returns `None` the
/// moment a key is absent or the current value is not indexable by it.
/// An empty path returns the input unchanged. Never panics.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = match current {
            Value::Object(map) => map.get(*key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Like [`lookup`], but only yields a non-empty string value.
///
/// The catalog encodes "no sprite" as JSON `null` (and occasionally `""`),
/// so both fall through to `None` here.
pub fn lookup_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
