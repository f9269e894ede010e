//! Config tree value model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Nested configuration keyed by field name.
///
/// Sorted map, so iteration order (and every report built from it) is stable.
pub type ConfigTree = BTreeMap<String, ConfigValue>;

/// Floats at or beyond this magnitude are not exactly representable as
/// integers and keep their float form.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single value inside a [`ConfigTree`].
///
/// Numbers compare by value: `7` and `7.0` are equal and both render as `7`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit null
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(#[serde(deserialize_with = "deserialize_number")] Number),
    /// String scalar; may itself hold an encoded JSON document
    Text(String),
    /// Ordered sequence of values
    Sequence(Vec<ConfigValue>),
    /// Nested tree
    Mapping(ConfigTree),
}

impl ConfigValue {
    /// Borrow the nested tree, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&ConfigTree> {
        match self {
            Self::Mapping(tree) => Some(tree),
            _ => None,
        }
    }

    /// Consume into the nested tree, if this is a mapping.
    pub fn into_mapping(self) -> Option<ConfigTree> {
        match self {
            Self::Mapping(tree) => Some(tree),
            _ => None,
        }
    }

    /// Borrow the string, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the boolean, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Check for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Decode a text value holding a JSON document.
    ///
    /// Returns `None` for non-text values and for text that is not valid JSON.
    pub fn embedded_json(&self) -> Option<ConfigValue> {
        let text = self.as_text()?;
        serde_json::from_str::<Value>(text).ok().map(ConfigValue::from)
    }

    /// Render as compact JSON with object keys in sorted order.
    pub fn to_canonical_json(&self) -> String {
        serde_json::to_string(&Value::from(self.clone())).unwrap_or_default()
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

#[allow(clippy::float_cmp, reason = "exact value equality is the intent")]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        a.as_f64() == b.as_f64()
    } else {
        a == b
    }
}

/// Integral floats collapse to integers so `30.0` renders as `30`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    reason = "bounded by MAX_EXACT_INTEGER and integral"
)]
fn canonical_number(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            Number::from(f as i64)
        },
        _ => n,
    }
}

fn deserialize_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
    Number::deserialize(deserializer).map(canonical_number)
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(canonical_number(n)),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            },
        }
    }
}

impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Null => Self::Null,
            ConfigValue::Bool(b) => Self::Bool(b),
            ConfigValue::Number(n) => Self::Number(canonical_number(n)),
            ConfigValue::Text(s) => Self::String(s),
            ConfigValue::Sequence(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            },
            ConfigValue::Mapping(tree) => {
                Self::Object(tree.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            },
        }
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(tree: ConfigTree) -> Self {
        Self::Mapping(tree)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_json())
    }
}

/// Re-serialize a JSON document compactly with sorted keys.
///
/// Empty input stays empty and text that does not parse is returned
/// unchanged, so the result is always safe to store.
pub fn normalize_json(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => ConfigValue::from(value).to_canonical_json(),
        Err(_) => text.to_string(),
    }
}

/// Build a [`ConfigTree`] from a JSON object value.
///
/// Returns `None` when the value is not an object.
pub fn tree_from_json(value: Value) -> Option<ConfigTree> {
    ConfigValue::from(value).into_mapping()
}
