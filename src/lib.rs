//! # Bookhub
//!
//! A "Books" resource served over HTTP and WebSocket:
//! - Local records kept in a table (in memory, or durable via a WAL)
//! - Catalog fallback to Gutendex when a record is not held locally
//! - Listing of local and catalog records side by side
//! - A duplex message stream for reads and writes
//! - Load-generating clients for both surfaces
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              HTTP routes  /  WebSocket sessions              │
//! │                    (network::Server)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   BooksResource                              │
//! │        (local first, catalog on miss, stream dispatch)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Table    │          │  Gutendex   │
//!   │  (RwLock)   │          │   client    │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │     WAL     │
//!   │  (Append)   │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod wal;
pub mod store;
pub mod catalog;
pub mod protocol;
pub mod resource;
pub mod network;
pub mod loadgen;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BookError, Result};
pub use config::Config;
pub use model::{Book, BookId};
pub use resource::{BooksResource, ReadOutcome};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Bookhub
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
