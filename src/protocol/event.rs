//! Outbound stream events

use serde::Serialize;

use crate::model::Book;
use super::{RECORD_NOT_FOUND, WELCOME_MESSAGE};

/// An event sent to the stream peer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Connected { message: String },
    WriteAck { record: Book },
    ReadAck(ReadAck),
    Error { message: String },
}

/// Body of a `read_ack` event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReadAck {
    Record {
        record: Book,
    },
    All {
        #[serde(rename = "localBooks")]
        local_books: Vec<Book>,
        #[serde(rename = "externalBooks")]
        external_books: Vec<Book>,
    },
    Missing {
        error: String,
    },
}

impl Event {
    pub fn connected() -> Self {
        Event::Connected {
            message: WELCOME_MESSAGE.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Event::Error {
            message: message.into(),
        }
    }

    pub fn record(record: Book) -> Self {
        Event::ReadAck(ReadAck::Record { record })
    }

    pub fn all(local_books: Vec<Book>, external_books: Vec<Book>) -> Self {
        Event::ReadAck(ReadAck::All {
            local_books,
            external_books,
        })
    }

    pub fn not_found() -> Self {
        Event::ReadAck(ReadAck::Missing {
            error: RECORD_NOT_FOUND.to_string(),
        })
    }

    /// Serialize for a text frame
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
