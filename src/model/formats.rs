//! Download formats of a book
//!
//! Gutendex ships `formats` as a `{ media_type: url }` mapping; everything
//! this crate hands out carries the normalized `[{ key, value }]` list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One downloadable representation of a book (media type -> URL)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatEntry {
    pub key: String,
    pub value: String,
}

impl FormatEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The `formats` attribute, either normalized or as received from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Formats {
    /// Ordered `{ key, value }` list
    Entries(Vec<FormatEntry>),

    /// Raw media-type -> URL mapping, in document order
    Mapping(Map<String, Value>),
}

impl Default for Formats {
    fn default() -> Self {
        Formats::Entries(Vec::new())
    }
}

impl Formats {
    /// Convert into the list form. A list passes through unchanged.
    pub fn normalize(self) -> Formats {
        match self {
            Formats::Entries(entries) => Formats::Entries(entries),
            Formats::Mapping(map) => Formats::Entries(
                map.into_iter()
                    .map(|(key, value)| {
                        let value = match value {
                            Value::String(url) => url,
                            other => other.to_string(),
                        };
                        FormatEntry { key, value }
                    })
                    .collect(),
            ),
        }
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, Formats::Entries(_))
    }

    /// Entries of a normalized value; `None` while still a mapping
    pub fn entries(&self) -> Option<&[FormatEntry]> {
        match self {
            Formats::Entries(entries) => Some(entries),
            Formats::Mapping(_) => None,
        }
    }
}

impl From<Vec<FormatEntry>> for Formats {
    fn from(entries: Vec<FormatEntry>) -> Self {
        Formats::Entries(entries)
    }
}
