//! Book identifiers
//!
//! Gutendex and the load generator use numeric ids, the table assigns
//! UUID strings. Both are held as text; canonical decimal ids go back out
//! as JSON numbers.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a book record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as a number, if it is a canonical decimal (no sign, no leading zeros)
    pub fn as_number(&self) -> Option<u64> {
        let n: u64 = self.0.parse().ok()?;
        (n.to_string() == self.0).then_some(n)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for BookId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(BookIdVisitor)
    }
}

struct BookIdVisitor;

impl<'de> Visitor<'de> for BookIdVisitor {
    type Value = BookId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer book id")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<BookId, E> {
        Ok(BookId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<BookId, E> {
        Ok(BookId(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<BookId, E> {
        Ok(BookId::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<BookId, E> {
        Ok(BookId(v))
    }
}
