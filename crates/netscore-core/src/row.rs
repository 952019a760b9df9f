//! Raw rows as delivered by the ingestion boundary.
//!
//! A [`RawRow`] is an opaque mapping from free-form column names to a small
//! tagged union, [`RawValue`]. Nothing is coerced at this layer: the
//! normalizer decides how each canonical field interprets text vs. numbers.

use serde::Deserialize;
use std::collections::HashMap;

/// A single cell of a raw row.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Absent,
}

impl RawValue {
    /// `Number`s and non-blank `Text` are present; `Absent` and blank text
    /// are treated as missing so the next alias gets a chance.
    pub fn is_present(&self) -> bool {
        match self {
            RawValue::Text(s) => !s.trim().is_empty(),
            RawValue::Number(_) => true,
            RawValue::Absent => false,
        }
    }

    /// Text form of the value, trimmed. Numbers are rendered without a
    /// trailing `.0` when integral.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.trim().to_string()),
            RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::Absent => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => RawValue::Absent,
            Value::Bool(b) => RawValue::Text(b.to_string()),
            Value::Number(n) => n.as_f64().map_or(RawValue::Absent, RawValue::Number),
            Value::String(s) => RawValue::Text(s),
            other @ (Value::Array(_) | Value::Object(_)) => RawValue::Text(other.to_string()),
        }
    }
}

/// An arbitrarily-keyed input row. Keys are matched exactly; spelling
/// variants are handled by alias lists, not by case folding.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct RawRow {
    cells: HashMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.cells.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.cells.get(key)
    }

    /// Ordered alias lookup: the first key in `aliases` whose value is
    /// present wins.
    pub fn first_present(&self, aliases: &[&str]) -> Option<&RawValue> {
        aliases
            .iter()
            .filter_map(|key| self.cells.get(*key))
            .find(|value| value.is_present())
    }

    /// Whether any alias holds a present value.
    pub fn has_any(&self, aliases: &[&str]) -> bool {
        self.first_present(aliases).is_some()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for RawRow {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
