//! Tests for BooksResource
//!
//! These tests verify:
//! - Read by id: local hit, catalog fallback, miss in both
//! - Read all: both lists, empty-safe, failure handling
//! - Create: id stripping, invalid payloads, store failures
//! - Duplex stream: welcome, ordering, per-message errors

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bookhub::catalog::{normalize_formats, Catalog};
use bookhub::model::{Book, BookId, FormatEntry, Formats};
use bookhub::protocol::{Event, Payload, ReadAck};
use bookhub::store::{BookStore, Table};
use bookhub::{BookError, BooksResource, ReadOutcome, Result};
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use serde_json::json;

// =============================================================================
// Test Collaborators
// =============================================================================

/// Catalog serving a fixed set of books and counting calls
#[derive(Default)]
struct FakeCatalog {
    books: Vec<Book>,
    offline: bool,
    by_id_calls: AtomicUsize,
    all_calls: AtomicUsize,
}

impl FakeCatalog {
    fn with(books: Vec<Book>) -> Self {
        Self {
            books,
            ..Self::default()
        }
    }

    fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.by_id_calls.load(Ordering::SeqCst) + self.all_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_by_id(&self, id: &BookId) -> Result<Option<Book>> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(BookError::Network("catalog offline".to_string()));
        }
        Ok(self
            .books
            .iter()
            .find(|b| b.id.as_ref() == Some(id))
            .cloned()
            .map(normalize_formats))
    }

    async fn fetch_all(&self) -> Result<Vec<Book>> {
        self.all_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(BookError::Network("catalog offline".to_string()));
        }
        Ok(self.books.iter().cloned().map(normalize_formats).collect())
    }
}

/// Table wrapper remembering exactly what `post` received
#[derive(Default)]
struct RecordingStore {
    inner: Table,
    posted: Mutex<Vec<Book>>,
}

#[async_trait]
impl BookStore for RecordingStore {
    async fn get(&self, id: &BookId) -> Result<Option<Book>> {
        self.inner.get(id).await
    }

    async fn list(&self) -> Result<Vec<Book>> {
        self.inner.list().await
    }

    async fn post(&self, book: Book) -> Result<Book> {
        self.posted.lock().push(book.clone());
        self.inner.post(book).await
    }
}

/// Store that fails every call
struct BrokenStore;

#[async_trait]
impl BookStore for BrokenStore {
    async fn get(&self, _id: &BookId) -> Result<Option<Book>> {
        Err(BookError::Store("table offline".to_string()))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        Err(BookError::Store("table offline".to_string()))
    }

    async fn post(&self, _book: Book) -> Result<Book> {
        Err(BookError::Store("table offline".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn catalog_book(id: u64, title: &str) -> Book {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "formats": { "text/html": format!("https://example.com/{}.html", id) }
    }))
    .unwrap()
}

fn setup(catalog: FakeCatalog) -> (Arc<RecordingStore>, Arc<FakeCatalog>, BooksResource) {
    let store = Arc::new(RecordingStore::default());
    let catalog = Arc::new(catalog);
    let resource = BooksResource::new(store.clone(), catalog.clone());
    (store, catalog, resource)
}

async fn run_stream(resource: &BooksResource, messages: Vec<Payload>) -> Vec<Event> {
    resource.connect(stream::iter(messages)).collect().await
}

// =============================================================================
// Read Path Tests
// =============================================================================

#[tokio::test]
async fn test_read_local_hit_skips_catalog() {
    let (store, catalog, resource) = setup(FakeCatalog::with(vec![catalog_book(84, "Remote")]));
    let local = store.post(Book {
        title: Some("Local".to_string()),
        formats: Formats::Entries(vec![FormatEntry::new("text/html", "u")]),
        ..Book::default()
    })
    .await
    .unwrap();
    let id = local.id.clone().unwrap();

    let outcome = resource.read(Some(&id)).await.unwrap();

    assert_eq!(outcome, ReadOutcome::Found(local));
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn test_read_local_miss_uses_catalog() {
    let (_, catalog, resource) = setup(FakeCatalog::with(vec![catalog_book(84, "Frankenstein")]));

    let outcome = resource.read(Some(&BookId::from(84))).await.unwrap();

    match outcome {
        ReadOutcome::Found(book) => {
            assert_eq!(book.title.as_deref(), Some("Frankenstein"));
            assert_eq!(
                book.formats,
                Formats::Entries(vec![FormatEntry::new("text/html", "https://example.com/84.html")])
            );
        }
        other => panic!("Expected catalog record, got {:?}", other),
    }
    assert_eq!(catalog.by_id_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_read_missing_everywhere() {
    let (_, _, resource) = setup(FakeCatalog::default());

    let outcome = resource.read(Some(&BookId::from(1))).await.unwrap();

    assert_eq!(outcome, ReadOutcome::NotFound);
}

#[tokio::test]
async fn test_read_one_catalog_failure_is_error() {
    let (_, _, resource) = setup(FakeCatalog::offline());

    assert!(resource.read_one(&BookId::from(84)).await.is_err());
}

#[tokio::test]
async fn test_read_all_returns_both_lists() {
    let (store, _, resource) = setup(FakeCatalog::with(vec![
        catalog_book(84, "Frankenstein"),
        catalog_book(11, "Alice"),
    ]));
    store.post(Book::default()).await.unwrap();

    match resource.read(None).await.unwrap() {
        ReadOutcome::All { local, external } => {
            assert_eq!(local.len(), 1);
            assert_eq!(external.len(), 2);
            assert!(external.iter().all(|b| b.formats.is_normalized()));
        }
        other => panic!("Expected both lists, got {:?}", other),
    }
}

#[tokio::test]
async fn test_read_all_empty_sources() {
    let (_, _, resource) = setup(FakeCatalog::default());

    assert_eq!(
        resource.read(None).await.unwrap(),
        ReadOutcome::All {
            local: vec![],
            external: vec![]
        }
    );
}

#[tokio::test]
async fn test_read_all_fails_as_a_whole() {
    let (store, _, resource) = setup(FakeCatalog::offline());
    store.post(Book::default()).await.unwrap();

    assert!(resource.read_all().await.is_err());

    let broken = BooksResource::new(Arc::new(BrokenStore), Arc::new(FakeCatalog::default()));
    assert!(broken.read_all().await.is_err());
}

// =============================================================================
// Write Path Tests
// =============================================================================

#[tokio::test]
async fn test_create_strips_client_id() {
    let (store, _, resource) = setup(FakeCatalog::default());

    let created = resource
        .create(Payload::from(r#"{"id":"x","title":"T"}"#))
        .await
        .unwrap();

    let posted = store.posted.lock().clone();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].id, None);
    assert_eq!(posted[0].title.as_deref(), Some("T"));

    let id = created.id.clone().expect("store-assigned id");
    assert_ne!(id, BookId::from("x"));
    assert_eq!(store.get(&id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn test_create_from_parsed_json() {
    let (_, _, resource) = setup(FakeCatalog::default());

    let created = resource
        .create(Payload::from(json!({ "title": "Parsed", "languages": ["en"] })))
        .await
        .unwrap();

    assert_eq!(created.title.as_deref(), Some("Parsed"));
    assert_eq!(created.languages, vec!["en"]);
}

#[tokio::test]
async fn test_create_rejects_bad_json() {
    let (store, _, resource) = setup(FakeCatalog::default());

    let result = resource.create(Payload::from("{title:")).await;

    assert!(matches!(result, Err(BookError::InvalidPayload(_))));
    assert!(store.posted.lock().is_empty());
}

#[tokio::test]
async fn test_create_rejects_non_object() {
    let (_, _, resource) = setup(FakeCatalog::default());

    let result = resource.create(Payload::from("[1, 2]")).await;

    assert!(matches!(result, Err(BookError::InvalidPayload(_))));
}

#[tokio::test]
async fn test_create_store_failure() {
    let resource = BooksResource::new(Arc::new(BrokenStore), Arc::new(FakeCatalog::default()));

    let result = resource.create(Payload::from(r#"{"title":"T"}"#)).await;

    match result {
        Err(e @ BookError::Store(_)) => assert!(e.to_string().contains("table offline")),
        other => panic!("Expected store error, got {:?}", other),
    }
}

// =============================================================================
// Duplex Stream Tests
// =============================================================================

#[tokio::test]
async fn test_stream_welcome_only() {
    let (_, _, resource) = setup(FakeCatalog::default());

    let events = run_stream(&resource, vec![]).await;

    assert_eq!(events, vec![Event::connected()]);
}

#[tokio::test]
async fn test_stream_bad_message_does_not_poison() {
    let (_, _, resource) = setup(FakeCatalog::with(vec![catalog_book(84, "Frankenstein")]));

    let events = run_stream(
        &resource,
        vec![Payload::from("not json"), Payload::from(r#"{"action":"read"}"#)],
    )
    .await;

    assert_eq!(events.len(), 3);
    assert_eq!(events[1], Event::error("Invalid JSON in message"));
    match &events[2] {
        Event::ReadAck(ReadAck::All {
            local_books,
            external_books,
        }) => {
            assert!(local_books.is_empty());
            assert_eq!(external_books.len(), 1);
        }
        other => panic!("Expected read_ack with lists, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_unknown_action() {
    let (_, _, resource) = setup(FakeCatalog::default());

    let events = run_stream(&resource, vec![Payload::from(r#"{"action":"bogus"}"#)]).await;

    assert_eq!(events[1], Event::error("Unknown action"));
    assert_eq!(
        serde_json::to_value(&events[1]).unwrap(),
        json!({ "event": "error", "message": "Unknown action" })
    );
}

#[tokio::test]
async fn test_stream_write_then_read_in_order() {
    let (store, _, resource) = setup(FakeCatalog::default());

    let events = run_stream(
        &resource,
        vec![
            Payload::from(json!({ "action": "write", "data": { "id": 5, "title": "First" } })),
            Payload::from(json!({ "action": "read" })),
        ],
    )
    .await;

    let record = match &events[1] {
        Event::WriteAck { record } => record.clone(),
        other => panic!("Expected write_ack, got {:?}", other),
    };
    assert_ne!(record.id, Some(BookId::from(5)));
    assert_eq!(store.posted.lock()[0].id, None);

    // The read sees the write that came before it
    assert_eq!(events[2], Event::all(vec![record], vec![]));
}

#[tokio::test]
async fn test_stream_write_accepts_serialized_record() {
    let (store, _, resource) = setup(FakeCatalog::default());

    let events = run_stream(
        &resource,
        vec![
            Payload::from(json!({ "action": "write", "data": r#"{"id":"x","title":"T"}"# })),
            Payload::from(json!({ "action": "write", "data": "{title:" })),
            Payload::from(json!({ "action": "write", "data": "[1, 2]" })),
        ],
    )
    .await;

    match &events[1] {
        Event::WriteAck { record } => {
            assert_eq!(record.title.as_deref(), Some("T"));
            assert_ne!(record.id, Some(BookId::from("x")));
        }
        other => panic!("Expected write_ack, got {:?}", other),
    }
    assert_eq!(events[2], Event::error("Invalid record payload"));
    assert_eq!(events[3], Event::error("Invalid record payload"));

    let posted = store.posted.lock().clone();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].id, None);
}

#[tokio::test]
async fn test_stream_rejects_non_utf8_bytes() {
    let (store, _, resource) = setup(FakeCatalog::default());
    let mut bytes = json!({ "action": "write", "data": { "title": "X" } })
        .to_string()
        .into_bytes();
    let at = bytes.iter().position(|&b| b == b'X').unwrap();
    bytes[at] = 0xFF;

    let events = run_stream(
        &resource,
        vec![
            Payload::from(bytes),
            Payload::from(br#"{"action":"read"}"#.to_vec()),
        ],
    )
    .await;

    assert_eq!(events[1], Event::error("Invalid JSON in message"));
    assert_eq!(events[2], Event::all(vec![], vec![]));
    assert!(store.posted.lock().is_empty());
}

#[tokio::test]
async fn test_stream_read_by_id() {
    let (_, _, resource) = setup(FakeCatalog::with(vec![catalog_book(84, "Frankenstein")]));

    let events = run_stream(
        &resource,
        vec![
            Payload::from(json!({ "action": "read", "id": 84 })),
            Payload::from(json!({ "action": "read", "id": 999 })),
        ],
    )
    .await;

    match &events[1] {
        Event::ReadAck(ReadAck::Record { record }) => {
            assert_eq!(record.title.as_deref(), Some("Frankenstein"))
        }
        other => panic!("Expected read_ack record, got {:?}", other),
    }
    assert_eq!(events[2], Event::not_found());
}

#[tokio::test]
async fn test_stream_failures_become_error_events() {
    let resource = BooksResource::new(Arc::new(BrokenStore), Arc::new(FakeCatalog::offline()));

    let events = run_stream(
        &resource,
        vec![
            Payload::from(json!({ "action": "write", "data": { "title": "T" } })),
            Payload::from(json!({ "action": "read", "id": "abc" })),
            Payload::from(json!({ "action": "read" })),
            Payload::from(json!({ "action": "write" })),
        ],
    )
    .await;

    assert_eq!(events.len(), 5);
    for event in &events[1..4] {
        match event {
            Event::Error { message } => assert!(message.contains("offline")),
            other => panic!("Expected error event, got {:?}", other),
        }
    }
    assert_eq!(events[4], Event::error("Invalid record payload"));
}
