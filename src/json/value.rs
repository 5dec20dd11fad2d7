//! Generic JSON value model
//!
//! The intermediate representation between the hotel mapper and the text
//! serializer. Objects keep their keys unique and in insertion order, which
//! the serializer preserves (keys are never sorted).

use indexmap::IndexMap;
use rust_decimal::Decimal;

/// A JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// null
    Null,
    /// true / false
    Bool(bool),
    /// A decimal-preserving number
    Number(Decimal),
    /// A string
    String(String),
    /// An ordered array
    Array(Vec<JsonValue>),
    /// An object with unique keys in insertion order
    Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
    /// Create an empty object
    pub fn object() -> Self {
        JsonValue::Object(IndexMap::new())
    }

    /// Create an empty array
    pub fn array() -> Self {
        JsonValue::Array(Vec::new())
    }

    /// Insert a key into an object value; no-op on other variants
    ///
    /// Re-inserting an existing key replaces its value in place, keeping
    /// the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        if let JsonValue::Object(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Push an element onto an array value; no-op on other variants
    pub fn push(&mut self, value: impl Into<JsonValue>) {
        if let JsonValue::Array(items) = self {
            items.push(value.into());
        }
    }

    /// Get a member of an object value
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Borrow the string content, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the array items, if this is an array
    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<Decimal> for JsonValue {
    fn from(d: Decimal) -> Self {
        JsonValue::Number(d)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }
}
