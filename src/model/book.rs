//! Book record definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{BookId, Formats};

/// An author or translator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub birth_year: Option<i32>,

    #[serde(default)]
    pub death_year: Option<i32>,
}

/// A book record, local or from the catalog
///
/// Every attribute is defaultable so partial payloads still parse; attributes
/// this type does not name are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Book {
    /// Assigned by the table on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub authors: Vec<Person>,

    #[serde(default)]
    pub summaries: Vec<String>,

    #[serde(default)]
    pub translators: Vec<Person>,

    #[serde(default)]
    pub subjects: Vec<String>,

    #[serde(default)]
    pub bookshelves: Vec<String>,

    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default)]
    pub formats: Formats,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Book {
    /// Parse a record from an already-decoded JSON value
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Same record with `formats` in list form
    pub fn with_normalized_formats(mut self) -> Self {
        self.formats = self.formats.normalize();
        self
    }
}
