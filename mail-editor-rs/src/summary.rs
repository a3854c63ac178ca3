//! Context summarizer
//!
//! Turns a sample render context into a depth-bounded display tree for the
//! admin UI. This is a lossy debug view, not a faithful serialization: past
//! the depth limit the remaining subtree is carried over unexpanded instead
//! of being walked further.

use serde_json::{Map, Value};

/// Summarize a render context down to `max_depth` levels of nesting.
///
/// Nested objects below the limit are recursed into under their outer key.
/// At the limit the value is inserted as-is and the walk stops there.
/// Primitives and arrays are copied unchanged at any depth.
pub fn summarize(context: &Map<String, Value>, max_depth: usize) -> Value {
    walk(context, 0, max_depth)
}

fn walk(item: &Map<String, Value>, depth: usize, max_depth: usize) -> Value {
    let mut result = Map::new();
    for (key, value) in item {
        match value {
            Value::Object(inner) if depth < max_depth => {
                result.insert(key.clone(), walk(inner, depth + 1, max_depth));
            }
            _ => {
                result.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    /// Builds `{"level": {"level": ... {"leaf": 1}}}` nested `depth` deep.
    fn deep_value(depth: usize) -> Value {
        let mut value = json!({ "leaf": 1 });
        for _ in 0..depth {
            value = json!({ "level": value });
        }
        value
    }

    #[test]
    fn test_primitives_copied_unchanged() {
        let context = as_map(json!({
            "name": "Ada",
            "count": 3,
            "tags": ["a", "b"],
        }));

        let summary = summarize(&context, 3);
        assert_eq!(summary, json!({ "name": "Ada", "count": 3, "tags": ["a", "b"] }));
    }

    #[test]
    fn test_nested_objects_recursed_under_outer_key() {
        let context = as_map(json!({
            "user": { "profile": { "email": "ada@example.com" } }
        }));

        let summary = summarize(&context, 3);
        assert_eq!(
            summary,
            json!({ "user": { "profile": { "email": "ada@example.com" } } })
        );
    }

    #[test]
    fn test_walk_stops_at_max_depth() {
        let context = as_map(deep_value(10));
        let summary = summarize(&context, 3);

        // Walked levels 0..3, then the remaining subtree is carried raw.
        let mut node = &summary;
        for _ in 0..3 {
            node = &node["level"];
        }
        // The level-3 value equals the untouched remainder of the input.
        assert_eq!(*node, deep_value(6));
    }

    #[test]
    fn test_terminates_on_very_deep_input() {
        let context = as_map(deep_value(500));
        let summary = summarize(&context, 3);
        assert!(summary.is_object());
    }

    #[test]
    fn test_max_depth_zero_copies_top_level_raw() {
        let context = as_map(json!({ "a": { "b": 1 }, "c": 2 }));
        let summary = summarize(&context, 0);
        assert_eq!(summary, json!({ "a": { "b": 1 }, "c": 2 }));
    }
}
