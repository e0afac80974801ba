//! Serialization layer: the in-memory object to/from JSON text.
//!
//! Implement [`Serializer`] if you need a different on-disk format
//! (RON, YAML, etc.) — the store only cares about bytes.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Converts the store's object to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode the object to bytes.
    fn serialize(&self, data: &Map<String, Value>) -> Result<Vec<u8>>;

    /// Decode bytes back into an object. Content that parses as JSON but
    /// is not an object at the top level is rejected as corrupt.
    fn deserialize(&self, bytes: &[u8]) -> Result<Map<String, Value>>;
}

/// JSON serializer with a configurable indentation width.
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    indent: usize,
}

impl JsonSerializer {
    /// Indent with `width` spaces per level. A width of `0` produces
    /// compact single-line JSON.
    pub fn with_indent(width: usize) -> Self {
        Self { indent: width }
    }

    /// Configured indentation width.
    #[must_use]
    pub fn indent(&self) -> usize {
        self.indent
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, data: &Map<String, Value>) -> Result<Vec<u8>> {
        if self.indent == 0 {
            return serde_json::to_vec(data).map_err(Error::from);
        }
        let indent = vec![b' '; self.indent];
        let mut buf = Vec::with_capacity(128);
        let fmt = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
        data.serialize(&mut ser).map_err(Error::from)?;
        Ok(buf)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Map<String, Value>> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::Corrupt(format!(
                "expected a JSON object at the top level, found {}",
                type_name(&other)
            ))),
            Err(e) => Err(Error::Corrupt(format!("content is not valid JSON: {e}"))),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
