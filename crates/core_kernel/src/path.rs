//! Dotted-path lookup over JSON values
//!
//! Paths such as `venue.capacity` or `items.0.sku` walk nested objects one
//! segment at a time. A numeric segment indexes into an array. Lookup stops
//! with `None` as soon as a segment is missing or the current value cannot be
//! descended into, so a missing intermediate object never panics.

use serde_json::{Map, Value};

/// Resolves a dotted path against a JSON value
///
/// # Arguments
///
/// * `root` - The value to walk
/// * `path` - Segments separated by `.`
///
/// # Returns
///
/// The value at the path, or `None` if any segment is absent
///
/// # Example
///
/// ```
/// use core_kernel::path::resolve_path;
/// use serde_json::json;
///
/// let answers = json!({ "user": { "name": "Ada" } });
/// assert_eq!(resolve_path(&answers, "user.name"), Some(&json!("Ada")));
/// assert_eq!(resolve_path(&answers, "user.email"), None);
/// ```
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |current, segment| descend(current, segment))
}

/// Resolves a dotted path whose first segment is a key of `map`
pub fn resolve_in_map<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let head = segments.next()?;
    let first = map.get(head)?;
    segments.try_fold(first, |current, segment| descend(current, segment))
}

fn descend<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
