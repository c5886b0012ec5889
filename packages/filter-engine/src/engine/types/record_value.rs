use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use smol_str::SmolStr;
use std::hash::BuildHasherDefault;

pub type FastMap<K, V> = std::collections::HashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A candidate record's value as seen by the evaluator: the JSON-shaped row
/// the managed backend returns for a lead/customer, with string keys interned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(SmolStr),
    Array(Vec<RecordValue>),
    Object(FastMap<SmolStr, RecordValue>),
}

impl Default for RecordValue {
    fn default() -> Self {
        RecordValue::Null
    }
}

impl RecordValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RecordValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RecordValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RecordValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&FastMap<SmolStr, RecordValue>> {
        match self {
            RecordValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<RecordValue>> {
        match self {
            RecordValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get nested value by key (for objects)
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RecordValue::Null)
    }
}

impl From<Value> for RecordValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => RecordValue::Null,
            Value::Bool(b) => RecordValue::Bool(b),
            Value::Number(n) => RecordValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => RecordValue::Str(SmolStr::from(s)),
            Value::Array(arr) => {
                RecordValue::Array(arr.into_iter().map(RecordValue::from).collect())
            }
            Value::Object(obj) => RecordValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), RecordValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<RecordValue> for Value {
    fn from(val: RecordValue) -> Self {
        match val {
            RecordValue::Null => Value::Null,
            RecordValue::Bool(b) => Value::Bool(b),
            RecordValue::Number(n) => json!(n),
            RecordValue::Str(s) => Value::String(s.to_string()),
            RecordValue::Array(arr) => Value::Array(arr.into_iter().map(|v| v.into()).collect()),
            RecordValue::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

/// Build a [`RecordValue`] from JSON literal syntax. Test fixture helper.
#[macro_export]
macro_rules! record {
    ($($json:tt)+) => {
        $crate::engine::types::RecordValue::from(::serde_json::json!($($json)+))
    };
}
