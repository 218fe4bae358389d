//! Configuration for Bookhub
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a Bookhub instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP/WebSocket listen address
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Catalog Configuration
    // -------------------------------------------------------------------------
    /// Base URL of the Gutendex catalog (no trailing slash needed)
    pub catalog_base_url: String,

    /// Per-request timeout for catalog calls (milliseconds)
    pub catalog_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Table Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the table's WAL.
    ///
    /// `None` keeps records in memory only.
    ///   {data_dir}/
    ///     └── books.wal      (write-ahead log)
    pub data_dir: Option<PathBuf>,

    /// Sync strategy: how often to fsync the WAL
    pub wal_sync_strategy: WalSyncStrategy,
}

/// WAL sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalSyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N uncommitted entries (balanced durability/performance)
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:9926".to_string(),
            catalog_base_url: "https://gutendex.com".to_string(),
            catalog_timeout_ms: 10_000,
            data_dir: None,
            wal_sync_strategy: WalSyncStrategy::EveryWrite,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Catalog timeout as a `Duration`
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the HTTP/WebSocket listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the catalog base URL
    pub fn catalog_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.catalog_base_url = url.into();
        self
    }

    /// Set the catalog request timeout (in milliseconds)
    pub fn catalog_timeout_ms(mut self, ms: u64) -> Self {
        self.config.catalog_timeout_ms = ms;
        self
    }

    /// Persist the table under this directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = Some(path.into());
        self
    }

    /// Set the WAL sync strategy
    pub fn wal_sync_strategy(mut self, strategy: WalSyncStrategy) -> Self {
        self.config.wal_sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
