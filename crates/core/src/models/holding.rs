use serde::{Deserialize, Serialize};

/// One entry in the user's portfolio: a ticker symbol with the number of
/// shares held and the last price fetched for it.
///
/// `price` may be stale relative to the market — the holdings refresh task
/// overwrites it on every cycle that manages to fetch a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, uppercased (e.g., "AAPL"). Unique within the portfolio.
    pub symbol: String,

    /// Number of shares held (always positive).
    pub quantity: u32,

    /// Last known price per share in USD.
    pub price: f64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            quantity,
            price,
        }
    }

    /// Market value of this holding at its last known price.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}
