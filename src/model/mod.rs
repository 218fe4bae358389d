//! Model Module
//!
//! The Book record and its parts, shared by the table, the catalog client
//! and the wire protocol.
//!
//! ## Shape
//! ```text
//! Book
//!   ├── id            BookId (store-assigned; number or string on the wire)
//!   ├── title
//!   ├── authors       [Person { name, birth_year, death_year }]
//!   ├── translators   [Person]
//!   ├── summaries / subjects / bookshelves / languages   [String]
//!   ├── copyright / media_type / download_count
//!   ├── formats       Formats::Entries([{ key, value }]) | Formats::Mapping({ key: url })
//!   └── extra         unknown attributes, passed through untouched
//! ```

mod book;
mod formats;
mod id;

pub use book::{Book, Person};
pub use formats::{FormatEntry, Formats};
pub use id::BookId;
