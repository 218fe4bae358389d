//! Bookhub Load Generator
//!
//! Periodically creates and reads books over HTTP or WebSocket.

use std::time::Duration;

use bookhub::loadgen::{HttpLoad, Schedule, WsLoad};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// Bookhub load generator
#[derive(Parser, Debug)]
#[command(name = "bookhub-load")]
#[command(about = "Interval-driven traffic for a Bookhub server")]
struct Args {
    #[command(flatten)]
    schedule: ScheduleArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug)]
struct ScheduleArgs {
    /// Seconds between write requests
    #[arg(long, global = true, default_value = "10")]
    write_every: u64,

    /// Seconds between read-all requests
    #[arg(long, global = true, default_value = "15")]
    read_all_every: u64,

    /// Seconds between read-by-id requests
    #[arg(long, global = true, default_value = "20")]
    read_by_id_every: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the HTTP surface
    Http {
        /// Books endpoint
        #[arg(long, env = "HTTP_ENDPOINT", default_value = "http://localhost:9926/Books")]
        endpoint: String,
    },

    /// Drive the WebSocket surface
    Ws {
        /// Books endpoint
        #[arg(long, env = "WS_ENDPOINT", default_value = "ws://localhost:9926/Books")]
        endpoint: String,
    },
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();
    let schedule = Schedule {
        write: Duration::from_secs(args.schedule.write_every.max(1)),
        read_all: Duration::from_secs(args.schedule.read_all_every.max(1)),
        read_by_id: Duration::from_secs(args.schedule.read_by_id_every.max(1)),
    };

    match args.command {
        Commands::Http { endpoint } => {
            let load = HttpLoad::new(endpoint);
            tracing::info!("HTTP load against {}", load.endpoint());
            load.run(schedule).await;
        }
        Commands::Ws { endpoint } => {
            let load = WsLoad::new(endpoint);
            tracing::info!("WebSocket load against {}", load.endpoint());
            if let Err(e) = load.run(schedule).await {
                tracing::error!("WebSocket load stopped: {}", e);
                std::process::exit(1);
            }
        }
    }
}
