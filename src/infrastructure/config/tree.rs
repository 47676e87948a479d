//! Helpers over the parsed settings tree
//!
//! The tree is a `serde_json` object whose keys are lower-cased at load time,
//! so every lookup lower-cases the dotted key before walking it.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Separator between path segments in a dotted key
pub const KEY_DELIMITER: &str = ".";

/// Find the value stored at a dotted key
///
/// Keys that themselves contain the delimiter (`"log.level": debug`) are
/// reachable too: at each level the longest run of segments that names an
/// existing key is taken first.
///
/// An empty key addresses nothing; the root is only reachable through
/// [`ConfigInstance::all`](crate::ConfigInstance::all).
pub fn find<'a>(tree: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let key = key.to_lowercase();
    if key.is_empty() {
        return None;
    }

    let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();
    search(tree, &segments)
}

fn search<'a>(map: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    (1..=path.len()).rev().find_map(|len| {
        let value = map.get(&path[..len].join(KEY_DELIMITER))?;
        match &path[len..] {
            [] => Some(value),
            rest => search(value.as_object()?, rest),
        }
    })
}

/// Lower-case every object key, recursively
///
/// When two keys differ only by case the later one in document order wins.
pub fn lowercase_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (key.to_lowercase(), lowercase_value(value)))
        .collect()
}

fn lowercase_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(lowercase_keys(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_value).collect()),
        other => other,
    }
}

/// Flatten the tree into `dotted.key -> leaf value`
///
/// Arrays and empty objects are leaves.
pub fn flatten(tree: &Map<String, Value>) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    flatten_into(&mut flat, None, tree);
    flat
}

fn flatten_into(flat: &mut BTreeMap<String, Value>, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{KEY_DELIMITER}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => {
                flatten_into(flat, Some(&path), nested);
            }
            leaf => {
                flat.insert(path, leaf.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Map<String, Value> {
        match json!({
            "server": {"port": 8080, "tls": {"enabled": true}},
            "hosts": ["a", "b"],
            "empty": {},
            "name": "svc"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_find_nested_key() {
        let tree = sample();
        assert_eq!(find(&tree, "server.port"), Some(&json!(8080)));
        assert_eq!(find(&tree, "server.tls.enabled"), Some(&json!(true)));
        assert_eq!(find(&tree, "server"), tree.get("server"));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let tree = sample();
        assert_eq!(find(&tree, "Server.PORT"), Some(&json!(8080)));
    }

    #[test]
    fn test_find_missing_or_through_leaf() {
        let tree = sample();
        assert_eq!(find(&tree, "server.missing"), None);
        assert_eq!(find(&tree, "name.inner"), None);
        assert_eq!(find(&tree, ""), None);
    }

    #[test]
    fn test_find_keys_containing_delimiter() {
        let tree = match json!({
            "log.level": "debug",
            "a": {"b.c": 2, "b": {"d": 3}},
            "x.y": {"z": 4}
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        assert_eq!(find(&tree, "log.level"), Some(&json!("debug")));
        assert_eq!(find(&tree, "a.b.c"), Some(&json!(2)));
        assert_eq!(find(&tree, "a.b.d"), Some(&json!(3)));
        assert_eq!(find(&tree, "x.y.z"), Some(&json!(4)));
        assert_eq!(find(&tree, "log"), None);

        // Every flattened key resolves back to its value
        for (key, value) in flatten(&tree) {
            assert_eq!(find(&tree, &key), Some(&value), "key {key}");
        }
    }

    #[test]
    fn test_lowercase_keys_recurses_into_arrays() {
        let map = match json!({"Outer": {"Inner": [{"DeepKey": 1}]}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let lowered = Value::Object(lowercase_keys(map));
        assert_eq!(lowered, json!({"outer": {"inner": [{"deepkey": 1}]}}));
    }

    #[test]
    fn test_flatten_leaf_keys() {
        let flat = flatten(&sample());
        let keys: Vec<_> = flat.keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["empty", "hosts", "name", "server.port", "server.tls.enabled"]
        );
        assert_eq!(flat["hosts"], json!(["a", "b"]));
    }
}
