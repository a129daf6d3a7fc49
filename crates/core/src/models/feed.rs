use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One watchlist entry in the live ticker feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerEntry {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}

/// Snapshot of the live ticker feed.
///
/// Replaced wholesale after every completed watchlist refresh cycle —
/// entries are never merged, and a partially finished cycle is never
/// published. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerFeed {
    /// Entries in watchlist order, minus any symbols that failed this cycle.
    pub entries: Vec<TickerEntry>,

    /// When the last cycle completed. `None` until the first cycle has run.
    pub refreshed_at: Option<DateTime<Utc>>,
}
