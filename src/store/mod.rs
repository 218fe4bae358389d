//! Store Module
//!
//! The local system of record for created books.
//!
//! ## Contract
//! - `get(id)`  - one record, or `None`
//! - `list()`   - every record
//! - `post(book)` - assign an id, persist, return the stored record
//!
//! The resource handler only sees [`BookStore`]; [`Table`] is the bundled
//! implementation (in-memory map, optionally WAL-backed).

mod table;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Book, BookId};

pub use table::Table;

/// Key-value collaborator holding local book records
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Look up one record by id
    async fn get(&self, id: &BookId) -> Result<Option<Book>>;

    /// All records
    async fn list(&self) -> Result<Vec<Book>>;

    /// Store a new record. Any id on `book` is replaced by a store-assigned one.
    async fn post(&self, book: Book) -> Result<Book>;
}
