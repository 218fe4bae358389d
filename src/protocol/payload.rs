//! Raw request bodies and stream messages

use serde_json::Value;

use crate::error::Result;

/// A body as it arrives: serialized text or bytes, or JSON some layer already decoded
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),

    /// Raw bytes; must be UTF-8 JSON
    Bytes(Vec<u8>),

    Json(Value),
}

impl Payload {
    /// Decode into a JSON value; text or bytes that are not JSON are an error
    pub fn into_value(self) -> Result<Value> {
        match self {
            Payload::Text(text) => Ok(serde_json::from_str(&text)?),
            Payload::Bytes(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Payload::Json(value) => Ok(value),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}
