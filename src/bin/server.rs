//! Bookhub Server Binary
//!
//! Serves the Books resource over HTTP and WebSocket.

use std::sync::Arc;

use bookhub::catalog::GutendexClient;
use bookhub::config::WalSyncStrategy;
use bookhub::network::Server;
use bookhub::store::Table;
use bookhub::{BooksResource, Config};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Bookhub Server
#[derive(Parser, Debug)]
#[command(name = "bookhub-server")]
#[command(about = "Books resource backed by a local table and the Gutendex catalog")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, env = "BOOKHUB_LISTEN", default_value = "127.0.0.1:9926")]
    listen: String,

    /// Catalog base URL
    #[arg(short, long, env = "GUTENDEX_URL", default_value = "https://gutendex.com")]
    catalog: String,

    /// Catalog request timeout in milliseconds
    #[arg(long, default_value = "10000")]
    catalog_timeout_ms: u64,

    /// Data directory for the table's WAL; omit to keep records in memory
    #[arg(short, long)]
    data_dir: Option<String>,

    /// fsync the WAL every N writes instead of after each write
    #[arg(long)]
    sync_every: Option<usize>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bookhub=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Bookhub Server v{}", bookhub::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Catalog: {}", args.catalog);

    // Build config from args
    let mut builder = Config::builder()
        .listen_addr(&args.listen)
        .catalog_base_url(&args.catalog)
        .catalog_timeout_ms(args.catalog_timeout_ms);
    if let Some(dir) = &args.data_dir {
        tracing::info!("Data directory: {}", dir);
        builder = builder.data_dir(dir);
    }
    if let Some(count) = args.sync_every {
        builder = builder.wal_sync_strategy(WalSyncStrategy::EveryNEntries { count });
    }
    let config = builder.build();

    // Open table
    let table = match Table::open(&config) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            tracing::error!("Failed to open table: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Table ready with {} records ({})",
        table.len(),
        if table.is_durable() { "durable" } else { "in-memory" }
    );

    let catalog = match GutendexClient::from_config(&config) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("Failed to build catalog client: {}", e);
            std::process::exit(1);
        }
    };

    let resource = Arc::new(BooksResource::new(table, catalog));

    // Start server
    if let Err(e) = Server::new(config, resource).run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
