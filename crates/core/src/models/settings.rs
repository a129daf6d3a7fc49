use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed configuration for the tracker core, supplied by the embedding
/// application at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Finnhub API token, sent with every market-data request.
    pub api_key: String,

    /// Symbols shown in the live ticker feed, in display order.
    /// Independent of the user's actual holdings.
    pub watchlist: Vec<String>,

    /// Seconds between watchlist ticker refresh cycles.
    pub watchlist_refresh_secs: u64,

    /// Seconds between holdings price refresh cycles.
    pub holdings_refresh_secs: u64,

    /// Milliseconds of input quiet time before a symbol search fires.
    pub search_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            watchlist: ["AAPL", "GOOGL", "MSFT", "AMZN"]
                .map(String::from)
                .to_vec(),
            watchlist_refresh_secs: 30,
            holdings_refresh_secs: 60,
            search_debounce_ms: 500,
        }
    }
}

impl Settings {
    /// Settings with a given API key and everything else at defaults.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn watchlist_refresh(&self) -> Duration {
        Duration::from_secs(self.watchlist_refresh_secs)
    }

    pub fn holdings_refresh(&self) -> Duration {
        Duration::from_secs(self.holdings_refresh_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
