//! Catalog Module
//!
//! Read-only access to the external Gutendex catalog.
//!
//! ## Fault policy
//! Both lookups return `Result`: transport failures, non-success statuses and
//! undecodable bodies are `BookError::Catalog`/`BookError::Json`. An empty
//! result set is never a fault (`Ok(None)` / `Ok(vec![])`).

mod gutendex;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Book, BookId};

pub use gutendex::{GutendexClient, DEFAULT_BASE_URL};

/// Source of external book records
#[async_trait]
pub trait Catalog: Send + Sync {
    /// First record matching `id`, formats normalized
    async fn fetch_by_id(&self, id: &BookId) -> Result<Option<Book>>;

    /// Every record of the default listing, formats normalized
    async fn fetch_all(&self) -> Result<Vec<Book>>;
}

/// Convert a record's `formats` mapping into the ordered `{key, value}` list
///
/// Records whose formats are already a list are returned unchanged.
pub fn normalize_formats(book: Book) -> Book {
    book.with_normalized_formats()
}
