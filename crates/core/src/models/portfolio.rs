use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// The main data container: every holding the user has recorded. This is
/// what gets serialized to JSON and written to durable storage after each
/// mutation.
///
/// Invariant: at most one `Holding` per symbol. Insertion order is kept so
/// the display stays stable across price refreshes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record shares of a symbol. If the symbol is already held, the
    /// quantities are summed and the existing price is kept — a freshly
    /// fetched price is never applied to a holding that already has one.
    pub fn add_stock(&mut self, symbol: &str, quantity: u32, price: f64) {
        if let Some(existing) = self.holdings.iter_mut().find(|h| h.symbol == symbol) {
            existing.quantity += quantity;
        } else {
            self.holdings.push(Holding {
                symbol: symbol.to_string(),
                quantity,
                price,
            });
        }
    }

    /// Remove the holding for a symbol. No-op if the symbol isn't held.
    pub fn remove_stock(&mut self, symbol: &str) {
        self.holdings.retain(|h| h.symbol != symbol);
    }

    /// Replace the last known price of a held symbol. No-op if the symbol
    /// isn't held (it may have been removed between refresh cycles).
    pub fn update_price(&mut self, symbol: &str, price: f64) {
        if let Some(holding) = self.holdings.iter_mut().find(|h| h.symbol == symbol) {
            holding.price = price;
        }
    }

    /// Drop every holding.
    pub fn clear(&mut self) {
        self.holdings.clear();
    }

    /// Look up a holding by symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Total market value: Σ price × quantity over all holdings.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(Holding::value).sum()
    }

    /// Holdings whose symbol contains `query` (case-insensitive), in
    /// insertion order. An empty query matches everything.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&Holding> {
        let q = query.to_lowercase();
        self.holdings
            .iter()
            .filter(|h| h.symbol.to_lowercase().contains(&q))
            .collect()
    }
}
