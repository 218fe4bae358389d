//! Load Generator Module
//!
//! Interval-driven clients that keep a Books server busy.
//!
//! Each client runs three independent timers:
//! - write      - create a random record
//! - read all   - fetch both collections
//! - read by id - fetch one of the known Gutendex ids
//!
//! Responses are only logged; nothing is asserted.

mod generator;
mod http;
mod ws;

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub use generator::{book_for, random_book, random_id, KNOWN_IDS};
pub use http::HttpLoad;
pub use ws::WsLoad;

/// Timer periods for the three request kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub write: Duration,
    pub read_all: Duration,
    pub read_by_id: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            write: Duration::from_secs(10),
            read_all: Duration::from_secs(15),
            read_by_id: Duration::from_secs(20),
        }
    }
}

/// A timer whose first tick is one `period` from now
fn ticker(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
