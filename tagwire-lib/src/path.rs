//! Dot-path access into JSON values.

use serde_json::Value;

/// Walks a dot-delimited path into a JSON value.
///
/// Splits `path` on `.` and folds over the segments: object segments index
/// by key, and segments that parse as an integer index into arrays. Returns
/// `None` as soon as a segment is missing or the intermediate value is not
/// indexable.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tagwire_lib::path::walk;
///
/// let body = json!({"data": {"results": [{"id": 1}]}});
/// assert_eq!(walk(&body, "data.results.0.id"), Some(&json!(1)));
/// assert_eq!(walk(&body, "data.missing"), None);
/// ```
pub fn walk<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_walk_nested_object() {
        let value = json!({"data": {"results": {"inner": "found"}}});
        assert_eq!(walk(&value, "data.results.inner"), Some(&json!("found")));
    }

    #[test]
    fn test_walk_single_segment() {
        let value = json!({"name": "Cat"});
        assert_eq!(walk(&value, "name"), Some(&json!("Cat")));
    }

    #[test]
    fn test_walk_missing_segment() {
        let value = json!({"data": {"results": []}});
        assert_eq!(walk(&value, "data.items"), None);
    }

    #[test]
    fn test_walk_array_index() {
        let value = json!({"items": [{"id": 10}, {"id": 20}]});
        assert_eq!(walk(&value, "items.1.id"), Some(&json!(20)));
        assert_eq!(walk(&value, "items.2.id"), None);
    }

    #[test]
    fn test_walk_non_numeric_segment_on_array() {
        let value = json!([1, 2, 3]);
        assert_eq!(walk(&value, "first"), None);
    }

    #[test]
    fn test_walk_through_scalar() {
        let value = json!({"name": "Cat"});
        assert_eq!(walk(&value, "name.length"), None);
    }

    #[test]
    fn test_walk_null_leaf_is_found() {
        let value = json!({"value": null});
        assert_eq!(walk(&value, "value"), Some(&Value::Null));
    }

    #[test]
    fn test_walk_empty_path() {
        let value = json!({"a": 1});
        assert_eq!(walk(&value, ""), None);
    }
}
