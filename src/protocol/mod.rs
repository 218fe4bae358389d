//! Protocol Module
//!
//! Message shapes for the Books duplex stream (JSON over WebSocket).
//!
//! ## Inbound
//! ```text
//! { "action": "write", "data": { ...book... } }
//! { "action": "read", "id": 84 }
//! { "action": "read" }
//! ```
//!
//! ## Outbound
//! ```text
//! { "event": "connected",  "message": "..." }
//! { "event": "write_ack",  "record": { ... } }
//! { "event": "read_ack",   "record": { ... } }
//! { "event": "read_ack",   "localBooks": [...], "externalBooks": [...] }
//! { "event": "read_ack",   "error": "Record not found" }
//! { "event": "error",      "message": "..." }
//! ```

mod action;
mod event;
mod payload;

pub use action::Action;
pub use event::{Event, ReadAck};
pub use payload::Payload;

/// Greeting sent when a stream opens
pub const WELCOME_MESSAGE: &str = "Welcome to the Books resource via WS!";

/// Error event text for an undecodable inbound message
pub const INVALID_MESSAGE: &str = "Invalid JSON in message";

/// Error event text for a missing or unrecognised `action`
pub const UNKNOWN_ACTION: &str = "Unknown action";

/// Error event text for a `write` without a usable record
pub const INVALID_RECORD: &str = "Invalid record payload";

/// `read_ack` error text when neither source has the id
pub const RECORD_NOT_FOUND: &str = "Record not found";
