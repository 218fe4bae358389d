//! Table Tests
//!
//! Tests verify:
//! - Post assigns ids and returns the stored record
//! - Get and list
//! - Durability across reopen
//! - Recovery from a torn WAL tail

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;

use bookhub::config::{Config, WalSyncStrategy};
use bookhub::model::{Book, BookId};
use bookhub::store::{BookStore, Table};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn titled(title: &str) -> Book {
    Book {
        title: Some(title.to_string()),
        ..Book::default()
    }
}

fn open_durable(dir: &TempDir) -> Table {
    Table::open_dir(dir.path(), WalSyncStrategy::EveryWrite).unwrap()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[tokio::test]
async fn test_new_table_is_empty() {
    let table = Table::in_memory();

    assert!(table.is_empty());
    assert!(table.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_post_then_get() {
    let table = Table::in_memory();

    let stored = table.post(titled("Moby Dick")).await.unwrap();
    let id = stored.id.clone().expect("store assigns an id");

    let fetched = table.get(&id).await.unwrap();
    assert_eq!(fetched, Some(stored));
}

#[tokio::test]
async fn test_get_unknown_id() {
    let table = Table::in_memory();

    assert_eq!(table.get(&BookId::from("nope")).await.unwrap(), None);
}

#[tokio::test]
async fn test_post_ignores_supplied_id() {
    let table = Table::in_memory();
    let book = Book {
        id: Some(BookId::from("mine")),
        ..titled("T")
    };

    let stored = table.post(book).await.unwrap();

    assert_ne!(stored.id, Some(BookId::from("mine")));
    assert_eq!(table.get(&BookId::from("mine")).await.unwrap(), None);
}

#[tokio::test]
async fn test_list_returns_every_record() {
    let table = Table::in_memory();
    for title in ["a", "b", "c"] {
        table.post(titled(title)).await.unwrap();
    }

    let mut titles: Vec<String> = table
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|b| b.title)
        .collect();
    titles.sort();

    assert_eq!(titles, vec!["a", "b", "c"]);
    assert_eq!(table.len(), 3);
}

#[test]
fn test_open_without_data_dir_is_memory_only() {
    let table = Table::open(&Config::default()).unwrap();
    assert!(!table.is_durable());
}

// =============================================================================
// Durability Tests
// =============================================================================

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();

    let stored = {
        let table = open_durable(&dir);
        assert!(table.is_durable());
        table.post(titled("Brave New World")).await.unwrap()
    };

    let reopened = open_durable(&dir);
    let id = stored.id.clone().unwrap();

    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(&id).await.unwrap(), Some(stored));
}

#[tokio::test]
async fn test_open_via_config() {
    let dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(dir.path().join("table"))
        .wal_sync_strategy(WalSyncStrategy::EveryNEntries { count: 4 })
        .build();

    {
        let table = Table::open(&config).unwrap();
        for i in 0..10 {
            table.post(titled(&format!("book {}", i))).await.unwrap();
        }
    }

    let reopened = Table::open(&config).unwrap();
    assert_eq!(reopened.len(), 10);
}

#[tokio::test]
async fn test_torn_tail_is_dropped_and_table_stays_writable() {
    let dir = TempDir::new().unwrap();
    {
        let table = open_durable(&dir);
        table.post(titled("kept")).await.unwrap();
    }

    let mut wal = OpenOptions::new()
        .append(true)
        .open(dir.path().join("books.wal"))
        .unwrap();
    wal.write_all(b"garbage").unwrap();
    drop(wal);

    {
        let table = open_durable(&dir);
        assert_eq!(table.len(), 1);
        table.post(titled("after recovery")).await.unwrap();
    }

    let reopened = open_durable(&dir);
    assert_eq!(reopened.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_durable_posts() {
    let dir = TempDir::new().unwrap();
    let table = Arc::new(open_durable(&dir));

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let table = Arc::clone(&table);
            tokio::spawn(async move { table.post(titled(&format!("book {}", i))).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert_eq!(table.len(), 32);
    drop(table);

    let reopened = open_durable(&dir);
    assert_eq!(reopened.len(), 32);
}
