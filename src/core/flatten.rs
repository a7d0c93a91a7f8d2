//! Flattener: nested JSON object → ordered single-level map
//!
//! Objects are descended, arrays are leaves. The walk uses an explicit
//! stack so deeply nested documents cannot exhaust the call stack.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::error::PipelineError;
use super::path::FlatPath;
use super::value::{FlatValue, Scalar};

/// Flattened document: encounter-ordered entries with two indexes
#[derive(Debug, Clone)]
pub struct FlatMap {
    separator: String,
    entries: Vec<(FlatPath, FlatValue)>,
    /// Maps joined key to entry index; also guards key uniqueness
    index: HashMap<String, usize>,
    /// Maps structured path to entry index
    path_index: HashMap<FlatPath, usize>,
}

impl FlatMap {
    pub fn new(separator: &str) -> Self {
        Self {
            separator: separator.to_string(),
            entries: Vec::new(),
            index: HashMap::new(),
            path_index: HashMap::new(),
        }
    }

    fn insert(&mut self, path: FlatPath, value: FlatValue) -> Result<(), PipelineError> {
        let key = path.join(&self.separator);
        if self.index.contains_key(&key) {
            return Err(PipelineError::malformed(format!(
                "duplicate flattened key `{key}`"
            )));
        }
        trace!(key = %key, depth = path.depth(), "Flattened entry");
        let idx = self.entries.len();
        self.index.insert(key, idx);
        self.path_index.insert(path.clone(), idx);
        self.entries.push((path, value));
        Ok(())
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Look up by joined key, e.g. `"signal/HV"`
    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn get_path(&self, path: &FlatPath) -> Option<&FlatValue> {
        self.path_index.get(path).map(|&idx| &self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FlatPath, &FlatValue)> {
        self.entries.iter().map(|(p, v)| (p, v))
    }

    /// Joined keys in encounter order
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|(p, _)| p.join(&self.separator))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Single-level JSON object keyed by joined paths
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(p, v)| (p.join(&self.separator), v.to_json()))
            .collect()
    }
}

/// Flatten a document root into a `FlatMap`.
///
/// The root must be one JSON object. Arrays at the root (batches of
/// records) are rejected, even when they hold exactly one element.
pub fn flatten(doc: &Value, separator: &str) -> Result<FlatMap, PipelineError> {
    if separator.is_empty() {
        return Err(PipelineError::malformed("path separator must not be empty"));
    }

    let root = match doc {
        Value::Object(map) => map,
        Value::Array(items) => {
            return Err(PipelineError::malformed(format!(
                "expected a single object, found an array of {} records",
                items.len()
            )))
        }
        other => {
            return Err(PipelineError::malformed(format!(
                "expected an object at the root, found {}",
                json_kind(other)
            )))
        }
    };

    let mut flat = FlatMap::new(separator);
    // Invariant: prefix.len() == stack.len() - 1
    let mut prefix: Vec<&str> = Vec::new();
    let mut stack: Vec<serde_json::map::Iter<'_>> = vec![root.iter()];

    while let Some(children) = stack.last_mut() {
        let Some((key, value)) = children.next() else {
            stack.pop();
            prefix.pop();
            continue;
        };

        match value {
            Value::Object(nested) => {
                prefix.push(key.as_str());
                stack.push(nested.iter());
            }
            Value::Array(items) => {
                flat.insert(FlatPath::leaf(&prefix, key), FlatValue::Sequence(items.clone()))?
            }
            leaf => {
                if let Some(scalar) = Scalar::from_json(leaf) {
                    flat.insert(FlatPath::leaf(&prefix, key), FlatValue::Scalar(scalar))?;
                }
            }
        }
    }

    debug!(entries = flat.len(), "Flattened document");
    Ok(flat)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_objects() {
        let doc = json!({
            "timestamp": [0, 1, 2],
            "meta": {"id": "abc", "rig": {"name": "bench"}},
            "signal": {"HV": [1, 2, 3]}
        });
        let flat = flatten(&doc, "/").unwrap();

        let keys: Vec<String> = flat.keys().collect();
        assert_eq!(keys, vec!["timestamp", "meta/id", "meta/rig/name", "signal/HV"]);
        assert_eq!(
            flat.get("meta/rig/name"),
            Some(&FlatValue::Scalar(Scalar::String("bench".into())))
        );
        assert_eq!(
            flat.get("signal/HV").and_then(|v| v.as_sequence()).map(|s| s.len()),
            Some(3)
        );
    }

    #[test]
    fn test_arrays_are_leaves() {
        let doc = json!({"runs": [{"a": 1}, {"a": 2}], "grid": [[1, 2], [3]]});
        let flat = flatten(&doc, "/").unwrap();
        assert_eq!(flat.len(), 2);
        assert_eq!(
            flat.get("runs"),
            Some(&FlatValue::Sequence(vec![json!({"a": 1}), json!({"a": 2})]))
        );
        assert!(flat.get("runs/a").is_none());
    }

    #[test]
    fn test_custom_separator() {
        let doc = json!({"a": {"b": {"c": 1}}});
        let flat = flatten(&doc, ".").unwrap();
        assert!(flat.get("a.b.c").is_some());
        assert_eq!(flat.separator(), ".");
    }

    #[test]
    fn test_null_leaf_is_kept() {
        let doc = json!({"meta": {"operator": null}});
        let flat = flatten(&doc, "/").unwrap();
        assert_eq!(flat.get("meta/operator"), Some(&FlatValue::Scalar(Scalar::Null)));
    }

    #[test]
    fn test_empty_object_has_no_leaves() {
        let doc = json!({"meta": {}, "x": 1});
        let flat = flatten(&doc, "/").unwrap();
        let keys: Vec<String> = flat.keys().collect();
        assert_eq!(keys, vec!["x"]);
    }

    #[test]
    fn test_reject_non_object_root() {
        for doc in [json!([{"timestamp": [0]}]), json!([]), json!(3), json!("x"), json!(null)] {
            let err = flatten(&doc, "/").unwrap_err();
            assert!(matches!(err, PipelineError::MalformedInput { .. }), "{doc}");
        }
    }

    #[test]
    fn test_reject_colliding_keys() {
        let doc = json!({"a/b": [1], "a": {"b": [2]}});
        let err = flatten(&doc, "/").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn test_path_lookup_is_structural() {
        let doc = json!({"sig/A": [1], "meta": {"id": "x"}});
        let flat = flatten(&doc, "/").unwrap();
        assert!(flat.get_path(&FlatPath::root("sig/A")).is_some());
        assert!(flat.get_path(&FlatPath::leaf(&["sig"], "A")).is_none());
        assert!(flat.get_path(&FlatPath::leaf(&["meta"], "id")).is_some());
        // Joined-key lookup sees the text only
        assert!(flat.get("sig/A").is_some());
    }

    #[test]
    fn test_sibling_paths_after_deep_branch() {
        let doc = json!({"a": {"b": {"c": 1}, "d": 2}, "e": 3});
        let flat = flatten(&doc, "/").unwrap();
        let keys: Vec<String> = flat.keys().collect();
        assert_eq!(keys, vec!["a/b/c", "a/d", "e"]);
    }

    #[test]
    fn test_reject_empty_separator() {
        assert!(flatten(&json!({"a": 1}), "").is_err());
    }

    #[test]
    fn test_deep_nesting() {
        let mut doc = json!([1, 2]);
        for i in (0..2000).rev() {
            let mut wrapper = Map::new();
            wrapper.insert(format!("k{i}"), doc);
            doc = Value::Object(wrapper);
        }
        let flat = flatten(&doc, "/").unwrap();
        assert_eq!(flat.len(), 1);
        let (path, _) = flat.iter().next().unwrap();
        assert_eq!(path.depth(), 2000);
        assert_eq!(path.first(), "k0");
        assert_eq!(path.last(), "k1999");
    }
}
