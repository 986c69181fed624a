//! Untyped parameter bags with permissive typed accessors.
//!
//! Conditions and criteria carry free-form key/value parameters. [`Params`]
//! wraps the underlying map and encapsulates the permissive-default policy:
//! a missing or wrongly typed key yields the caller's default rather than an
//! error, so evaluators read declaratively and never throw on malformed
//! input.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use gridscape::Value;

/// Ordered string-keyed parameter bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, builder-style.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Insert a value in place.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Raw value lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether the bag holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Float accessor with default; integers coerce.
    #[must_use]
    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.get(key).and_then(Value::as_f32).unwrap_or(default)
    }

    /// Non-negative integer accessor with default.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.get(key)
            .and_then(Value::as_i64)
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(default)
    }

    /// Boolean accessor with default.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// String accessor; `None` when missing or not a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Vector accessor; accepts a vector value or a 3-element numeric list.
    #[must_use]
    pub fn get_vec3(&self, key: &str) -> Option<Vec3> {
        self.get(key).and_then(Value::as_vec3)
    }

    /// Vector accessor with default.
    #[must_use]
    pub fn get_vec3_or(&self, key: &str, default: Vec3) -> Vec3 {
        self.get_vec3(key).unwrap_or(default)
    }

    /// List-of-vectors accessor; entries that do not parse are skipped.
    #[must_use]
    pub fn get_vec3_list(&self, key: &str) -> Vec<Vec3> {
        self.get(key)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_vec3).collect())
            .unwrap_or_default()
    }

    /// List-of-floats accessor; entries that do not parse are skipped.
    #[must_use]
    pub fn get_f32_list(&self, key: &str) -> Vec<f32> {
        self.get(key)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_f32).collect())
            .unwrap_or_default()
    }

    /// List-of-strings accessor; entries that are not strings are skipped.
    #[must_use]
    pub fn get_str_list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
