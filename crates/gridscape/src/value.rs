//! Dynamic property values.
//!
//! Cells carry an open property bag and queries carry untyped parameter bags.
//! [`Value`] is the tagged-union type behind both: it round-trips through
//! JSON-style data and offers permissive typed accessors so evaluators can
//! read declaratively instead of repeating null checks.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A dynamically typed property or parameter value.
///
/// Serialized untagged: booleans, numbers, strings, 3-element numeric arrays
/// (as vectors), general arrays, and nested maps all parse directly from
/// their natural JSON forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f32),
    /// World-space vector
    Vec3(Vec3),
    /// UTF-8 string
    Str(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// Nested string-keyed map
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Read as a boolean. Integers 0/1 coerce; everything else is `None`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Read as a float. Integers coerce.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    /// Read as an integer. Floats with no fractional part coerce.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Read as a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a vector. A 3-element list of numbers coerces.
    #[must_use]
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(*v),
            Value::List(items) if items.len() == 3 => {
                let x = items[0].as_f32()?;
                let y = items[1].as_f32()?;
                let z = items[2].as_f32()?;
                Some(Vec3::new(x, y, z))
            }
            _ => None,
        }
    }

    /// Read as a list of values.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Read as a nested map.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Name of the contained type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Vec3(_) => "vec3",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Loose equality: numeric variants compare by value, everything else
    /// compares structurally.
    #[must_use]
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self.as_f32(), other.as_f32()) {
            (Some(a), Some(b)) => (a - b).abs() < 1e-6,
            _ => self == other,
        }
    }

    /// Containment test: substring for strings, membership (loose) for
    /// lists, key presence for maps, loose equality otherwise.
    #[must_use]
    pub fn contains(&self, needle: &Value) -> bool {
        match self {
            Value::Str(s) => needle.as_str().is_some_and(|n| s.contains(n)),
            Value::List(items) => items.iter().any(|item| item.loose_eq(needle)),
            Value::Map(map) => needle.as_str().is_some_and(|n| map.contains_key(n)),
            _ => self.loose_eq(needle),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::Int(3).as_f32(), Some(3.0));
        assert_eq!(Value::Float(2.0).as_i64(), Some(2));
        assert_eq!(Value::Float(2.5).as_i64(), None);
        assert_eq!(Value::Str("3".into()).as_f32(), None);
    }

    #[test]
    fn test_vec3_from_list() {
        let v = Value::List(vec![Value::Int(1), Value::Float(2.0), Value::Int(3)]);
        assert_eq!(v.as_vec3(), Some(Vec3::new(1.0, 2.0, 3.0)));

        let short = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(short.as_vec3(), None);
    }

    #[test]
    fn test_loose_eq() {
        assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
        assert!(Value::Str("a".into()).loose_eq(&Value::Str("a".into())));
        assert!(!Value::Str("a".into()).loose_eq(&Value::Str("b".into())));
    }

    #[test]
    fn test_contains() {
        assert!(Value::Str("sniper_tower".into()).contains(&Value::Str("tower".into())));
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert!(list.contains(&Value::Float(2.0)));
        assert!(!list.contains(&Value::Int(3)));
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{"enabled": true, "radius": 2.5, "target": [1.0, 0.0, -1.0], "tag": "cover"}"#;
        let map: BTreeMap<String, Value> = serde_json::from_str(json).unwrap();
        assert_eq!(map["enabled"].as_bool(), Some(true));
        assert_eq!(map["radius"].as_f32(), Some(2.5));
        assert_eq!(map["target"].as_vec3(), Some(Vec3::new(1.0, 0.0, -1.0)));
        assert_eq!(map["tag"].as_str(), Some("cover"));
    }
}
