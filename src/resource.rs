//! Resource Module
//!
//! The Books resource: local table first, catalog on miss.
//!
//! ## Responsibilities
//! - Read one record (local hit returned as-is, otherwise catalog lookup)
//! - Read everything (local list + catalog list, no merging by identity)
//! - Create records (client ids stripped, the store assigns identity)
//! - Drive the duplex message stream, one message at a time

use std::sync::Arc;

use futures::future;
use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{BookError, Result};
use crate::catalog::Catalog;
use crate::model::{Book, BookId};
use crate::protocol::{Action, Event, Payload, INVALID_MESSAGE, INVALID_RECORD, UNKNOWN_ACTION};
use crate::store::BookStore;

/// Result of [`BooksResource::read`]
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The requested record, from whichever source had it
    Found(Book),

    /// Neither the table nor the catalog knows the id
    NotFound,

    /// Both collections, side by side
    All { local: Vec<Book>, external: Vec<Book> },
}

/// The Books resource handler
///
/// Holds no state of its own beyond its two collaborators.
pub struct BooksResource {
    store: Arc<dyn BookStore>,
    catalog: Arc<dyn Catalog>,
}

impl BooksResource {
    pub fn new(store: Arc<dyn BookStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Read one record by id, or everything when `id` is `None`
    pub async fn read(&self, id: Option<&BookId>) -> Result<ReadOutcome> {
        match id {
            Some(id) => Ok(match self.read_one(id).await? {
                Some(book) => ReadOutcome::Found(book),
                None => ReadOutcome::NotFound,
            }),
            None => {
                let (local, external) = self.read_all().await?;
                Ok(ReadOutcome::All { local, external })
            }
        }
    }

    /// Local record if present, otherwise the catalog's
    pub async fn read_one(&self, id: &BookId) -> Result<Option<Book>> {
        if let Some(record) = self.store.get(id).await? {
            debug!("Found local record for id {}", id);
            return Ok(Some(record));
        }

        debug!("No local record for id {}; asking the catalog", id);
        self.catalog.fetch_by_id(id).await
    }

    /// Local and catalog collections, fetched concurrently
    ///
    /// Fails as a whole if either side fails.
    pub async fn read_all(&self) -> Result<(Vec<Book>, Vec<Book>)> {
        let (local, external) = tokio::try_join!(self.store.list(), self.catalog.fetch_all())?;
        debug!(
            "Read {} local and {} external records",
            local.len(),
            external.len()
        );
        Ok((local, external))
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Create a record from a text or pre-decoded JSON payload
    ///
    /// Undecodable payloads and non-object records are `InvalidPayload`;
    /// store failures pass through unchanged.
    pub async fn create(&self, payload: Payload) -> Result<Book> {
        let mut value = payload
            .into_value()
            .map_err(|e| BookError::InvalidPayload(e.to_string()))?;

        let record = value
            .as_object_mut()
            .ok_or_else(|| BookError::InvalidPayload("record must be a JSON object".to_string()))?;
        if record.remove("id").is_some() {
            debug!("Dropped client-supplied id");
        }

        let book = Book::from_value(value).map_err(|e| BookError::InvalidPayload(e.to_string()))?;
        let stored = self.store.post(book).await?;

        if let Some(id) = &stored.id {
            info!("Record {} created", id);
        }
        Ok(stored)
    }

    // =========================================================================
    // Duplex Stream
    // =========================================================================

    /// Event stream for one connection
    ///
    /// Emits the welcome first, then exactly one event per inbound message in
    /// arrival order. Each message is fully handled before the next one is
    /// pulled. Ends when `incoming` ends.
    pub fn connect<'a, S>(&'a self, incoming: S) -> impl Stream<Item = Event> + Send + 'a
    where
        S: Stream<Item = Payload> + Send + 'a,
    {
        stream::once(future::ready(Event::connected()))
            .chain(incoming.then(move |payload| self.dispatch(payload)))
    }

    /// Handle a single stream message. Never fails; problems become error events.
    pub async fn dispatch(&self, payload: Payload) -> Event {
        let message = match payload.into_value() {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping undecodable message: {}", e);
                return Event::error(INVALID_MESSAGE);
            }
        };

        match Action::from_value(message) {
            Action::Write(data) => self.write_event(data).await,
            Action::ReadOne(id) => match self.read_one(&id).await {
                Ok(Some(record)) => Event::record(record),
                Ok(None) => Event::not_found(),
                Err(e) => {
                    warn!("Read of {} failed: {}", id, e);
                    Event::error(e.to_string())
                }
            },
            Action::ReadAll => match self.read_all().await {
                Ok((local, external)) => Event::all(local, external),
                Err(e) => {
                    warn!("Read of all records failed: {}", e);
                    Event::error(e.to_string())
                }
            },
            Action::Unknown => Event::error(UNKNOWN_ACTION),
        }
    }

    async fn write_event(&self, data: Option<Value>) -> Event {
        let payload = match data {
            Some(Value::String(text)) => Payload::Text(text),
            other => Payload::Json(other.unwrap_or(Value::Null)),
        };

        match self.create(payload).await {
            Ok(record) => Event::WriteAck { record },
            Err(BookError::InvalidPayload(reason)) => {
                warn!("Rejected stream write: {}", reason);
                Event::error(INVALID_RECORD)
            }
            Err(e) => {
                warn!("Stream write failed: {}", e);
                Event::error(e.to_string())
            }
        }
    }
}
