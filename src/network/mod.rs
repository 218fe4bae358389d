//! Network Module
//!
//! HTTP routes and WebSocket sessions for the Books resource.
//!
//! ## Routes
//! - `GET  /Books`      - all records, or a WebSocket upgrade
//! - `GET  /Books/{id}` - one record with catalog fallback
//! - `POST /Books`      - create a record
//!
//! Every route is served by the shared [`BooksResource`](crate::resource::BooksResource).

mod server;
mod connection;

pub use server::{router, Server, NOT_FOUND_IN_EITHER_SOURCE};
pub use connection::Connection;
