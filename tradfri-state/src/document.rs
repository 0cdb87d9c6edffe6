//! Attribute document - the wire-level state of one device
//!
//! A gateway document is a JSON object with an envelope (instance id,
//! reachability, general device info) and an attribute array keyed by the
//! device type code:
//!
//! ```text
//! {
//!   "9003": 65537,
//!   "9019": 1,
//!   "3": { "0": "IKEA of Sweden", "1": "STARKVIND Air purifier", "3": "1.0.033" },
//!   "15025": [ { "5900": 1, "5908": 20 } ]
//! }
//! ```
//!
//! `AttributeDocument` splits that object into the envelope and the
//! attribute map and reassembles it on serialization.

use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Result, StateError};
use crate::keys;
use crate::model::DeviceType;

/// Wire document of one device, split into envelope and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDocument {
    device_type: DeviceType,
    envelope: Map<String, Value>,
    attributes: Map<String, Value>,
}

impl AttributeDocument {
    /// Create an empty document for building an outbound request
    pub fn new(device_type: DeviceType) -> Self {
        Self {
            device_type,
            envelope: Map::new(),
            attributes: Map::new(),
        }
    }

    /// Parse a document from its textual wire form
    ///
    /// Returns `Ok(None)` for a top-level `null`, which means the device had
    /// nothing to report.
    pub fn parse(device_type: DeviceType, text: &str) -> Result<Option<Self>> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| StateError::MalformedDocument(e.to_string()))?;
        Self::from_value(device_type, value)
    }

    /// Build a document from an already parsed JSON value
    ///
    /// Same contract as [`AttributeDocument::parse`]. A document without an
    /// entry for the device type is valid and has no attributes.
    pub fn from_value(device_type: DeviceType, value: Value) -> Result<Option<Self>> {
        let mut envelope = match value {
            Value::Null => return Ok(None),
            Value::Object(map) => map,
            other => {
                return Err(StateError::MalformedDocument(format!(
                    "expected an object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let attributes = match envelope.remove(device_type.code()) {
            Some(entry) => extract_attributes(device_type, entry)?,
            None => Map::new(),
        };

        Ok(Some(Self {
            device_type,
            envelope,
            attributes,
        }))
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Raw attribute value, `None` when the key is absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Insert or overwrite an attribute, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Top-level envelope value (instance id, reachability, ...)
    pub fn envelope(&self, key: &str) -> Option<&Value> {
        self.envelope.get(key)
    }

    /// Value from the general device info object (vendor, model, firmware, ...)
    pub fn general_info(&self, key: &str) -> Option<&Value> {
        self.envelope
            .get(keys::DEVICE)
            .and_then(Value::as_object)
            .and_then(|info| info.get(key))
    }

    /// True when no attribute has been set
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Whole document, envelope plus attribute array
    pub fn root(&self) -> Value {
        let mut root = self.envelope.clone();
        root.insert(
            self.device_type.code().to_string(),
            Value::Array(vec![Value::Object(self.attributes.clone())]),
        );
        Value::Object(root)
    }

    /// Compact textual wire form
    pub fn serialize(&self) -> String {
        self.root().to_string()
    }
}

impl fmt::Display for AttributeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root())
    }
}

fn extract_attributes(device_type: DeviceType, entry: Value) -> Result<Map<String, Value>> {
    let malformed = |found: &str| {
        StateError::MalformedDocument(format!(
            "entry '{}' must be an array holding an attribute object, found {}",
            device_type.code(),
            found
        ))
    };

    match entry {
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(attributes)) => Ok(attributes),
            Some(other) => Err(malformed(json_kind(&other))),
            None => Err(malformed("an empty array")),
        },
        other => Err(malformed(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Interpret a JSON value as an integer
///
/// Integral floats (`20.0`) are accepted; strings, booleans and fractional
/// numbers are not.
pub(crate) fn integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }

    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}
