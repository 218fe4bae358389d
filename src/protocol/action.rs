//! Inbound stream actions

use serde::Deserialize;
use serde_json::Value;

use crate::model::BookId;

/// What an inbound message asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Create a record from `data` (may be absent or malformed; create decides)
    Write(Option<Value>),

    /// Read one record, local first then catalog
    ReadOne(BookId),

    /// Read every local and catalog record
    ReadAll,

    /// Missing or unrecognised `action`
    Unknown,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    action: Option<String>,

    #[serde(default)]
    id: Option<Value>,

    #[serde(default)]
    data: Option<Value>,
}

impl Action {
    /// Classify a decoded message
    ///
    /// Anything that is not an object with a known `action` is `Unknown`.
    /// For `read`, an id that is absent, null, an empty string or not a
    /// string/number means "read all".
    pub fn from_value(message: Value) -> Action {
        let envelope: Envelope = match serde_json::from_value(message) {
            Ok(envelope) => envelope,
            Err(_) => return Action::Unknown,
        };

        match envelope.action.as_deref() {
            Some("write") => Action::Write(envelope.data),
            Some("read") => match envelope.id.and_then(id_from_value) {
                Some(id) => Action::ReadOne(id),
                None => Action::ReadAll,
            },
            _ => Action::Unknown,
        }
    }
}

fn id_from_value(value: Value) -> Option<BookId> {
    match value {
        Value::String(s) if !s.is_empty() => Some(BookId::from(s)),
        Value::Number(n) => Some(BookId::from(n.to_string())),
        _ => None,
    }
}
