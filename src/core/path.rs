//! Structured flattening paths
//!
//! A `FlatPath` is built once by the flattener and consumed by segment
//! (first / rest) afterwards. Object keys may themselves contain the
//! separator; grouping and labeling go by the joined key text, so a
//! literal `"sig/A"` behaves like `{"sig": {"A": ..}}`.

use std::fmt;

/// Default separator used when joining path segments.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Ordered, non-empty list of object keys leading to a leaf value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlatPath {
    segments: Vec<String>,
}

impl FlatPath {
    /// Single-segment path (a top-level key).
    pub fn root(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    /// Path from explicit segments. Returns `None` for an empty list.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Leaf path below the object keys in `prefix`
    pub fn leaf(prefix: &[&str], key: &str) -> Self {
        let mut segments = Vec::with_capacity(prefix.len() + 1);
        segments.extend(prefix.iter().map(|s| s.to_string()));
        segments.push(key.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn first(&self) -> &str {
        &self.segments[0]
    }

    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Everything after the first segment (empty for depth 1)
    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }

    /// Pieces of the joined key, split on every `separator`.
    ///
    /// A literal key such as `"meta/id"` yields `meta`, `id`, the same as
    /// the nested `{"meta": {"id": ..}}`.
    pub fn key_segments<'a>(&'a self, separator: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.segments.iter().flat_map(move |s| s.split(separator))
    }

    /// Split the joined key into `(group, sub_key)` at its first separator.
    ///
    /// Returns `None` when the key contains no separator at all.
    pub fn split_group(&self, separator: &str) -> Option<(&str, String)> {
        let first = self.first();
        match first.split_once(separator) {
            Some((group, head)) => {
                let mut sub_key = head.to_string();
                for segment in self.rest() {
                    sub_key.push_str(separator);
                    sub_key.push_str(segment);
                }
                Some((group, sub_key))
            }
            None if self.depth() >= 2 => Some((first, self.rest().join(separator))),
            None => None,
        }
    }

    pub fn join(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

impl fmt::Display for FlatPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_SEPARATOR))
    }
}
