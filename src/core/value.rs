//! Tagged leaf values produced by the flattener

use serde_json::{Number, Value};

/// A single non-container JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Convert a JSON leaf. Containers are not scalars.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => Some(Scalar::Number(n.clone())),
            Value::String(s) => Some(Scalar::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Text shown in the attribute table.
    ///
    /// Null renders as `None` and booleans as `True`/`False`, matching the
    /// tables users already compare against.
    pub fn display_text(&self) -> String {
        match self {
            Scalar::Null => "None".to_string(),
            Scalar::Bool(true) => "True".to_string(),
            Scalar::Bool(false) => "False".to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::String(s) => s.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

/// Flattened leaf: decided once, matched on everywhere after.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Scalar(Scalar),
    /// Array leaf, elements kept as-is (arrays are never recursed into)
    Sequence(Vec<Value>),
}

impl FlatValue {
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            FlatValue::Sequence(items) => Some(items),
            FlatValue::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FlatValue::Scalar(s) => Some(s),
            FlatValue::Sequence(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FlatValue::Scalar(s) => s.to_json(),
            FlatValue::Sequence(items) => Value::Array(items.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_text() {
        assert_eq!(Scalar::Null.display_text(), "None");
        assert_eq!(Scalar::Bool(true).display_text(), "True");
        assert_eq!(Scalar::Bool(false).display_text(), "False");
        assert_eq!(Scalar::from_json(&json!(42)).unwrap().display_text(), "42");
        assert_eq!(Scalar::from_json(&json!(1.5)).unwrap().display_text(), "1.5");
        assert_eq!(Scalar::String("abc".into()).display_text(), "abc");
    }

    #[test]
    fn test_containers_are_not_scalars() {
        assert!(Scalar::from_json(&json!([1, 2])).is_none());
        assert!(Scalar::from_json(&json!({"a": 1})).is_none());
    }

    #[test]
    fn test_accessors() {
        let seq = FlatValue::Sequence(vec![json!(1), json!(null)]);
        assert_eq!(seq.as_sequence().map(|s| s.len()), Some(2));
        assert!(seq.as_scalar().is_none());
        assert_eq!(seq.to_json(), json!([1, null]));
    }
}
