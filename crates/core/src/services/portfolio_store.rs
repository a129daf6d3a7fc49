use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;
use crate::storage::manager::{StateStore, STORAGE_KEY};

/// Sole owner and mutator of the portfolio state.
///
/// State lives inside a `watch` channel: every mutation runs to completion
/// under `send_modify`, and consumers hold `watch::Receiver`s instead of
/// reaching into shared globals. A background writer task observes the same
/// channel and persists the full serialized state after every change —
/// mutators never wait on storage, bursts of mutations coalesce into fewer
/// writes, and the last snapshot wins.
///
/// Persistence is best-effort in both directions: absent or unreadable
/// stored state falls back to an empty portfolio, and save failures are
/// logged, never surfaced.
pub struct PortfolioStore {
    state: watch::Sender<Portfolio>,
}

impl PortfolioStore {
    /// Load previously persisted state (or start empty) and spawn the
    /// persistence writer. Must be called from within a tokio runtime.
    pub async fn open(storage: Arc<dyn StateStore>) -> Self {
        let initial = match storage.load(STORAGE_KEY).await {
            Ok(Some(text)) => match serde_json::from_str::<Portfolio>(&text) {
                Ok(portfolio) => portfolio,
                Err(e) => {
                    log::warn!("stored portfolio is unreadable, starting empty: {e}");
                    Portfolio::default()
                }
            },
            Ok(None) => Portfolio::default(),
            Err(e) => {
                log::warn!("failed to read stored portfolio, starting empty: {e}");
                Portfolio::default()
            }
        };

        let (state, receiver) = watch::channel(initial);
        Self::spawn_writer(receiver, storage);
        Self { state }
    }

    /// The writer drains change notifications and saves the latest
    /// snapshot. It exits when the store (the sender) is dropped.
    fn spawn_writer(mut receiver: watch::Receiver<Portfolio>, storage: Arc<dyn StateStore>) {
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let snapshot = receiver.borrow_and_update().clone();
                let text = match serde_json::to_string(&snapshot)
                    .map_err(|e| CoreError::Serialization(e.to_string()))
                {
                    Ok(text) => text,
                    Err(e) => {
                        log::warn!("failed to serialize portfolio: {e}");
                        continue;
                    }
                };
                if let Err(e) = storage.save(STORAGE_KEY, &text).await {
                    log::warn!("failed to persist portfolio: {e}");
                }
            }
        });
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Record shares of a symbol. The caller has already validated the
    /// input and uppercased the symbol. Merges into an existing holding by
    /// summing quantities; the existing price is kept.
    pub fn add_stock(&self, symbol: &str, quantity: u32, price: f64) {
        self.state
            .send_modify(|p| p.add_stock(symbol, quantity, price));
    }

    /// Delete the holding for a symbol. No-op if the symbol isn't held.
    pub fn remove_stock(&self, symbol: &str) {
        self.state.send_modify(|p| p.remove_stock(symbol));
    }

    /// Replace the last known price of a held symbol. No-op if the symbol
    /// isn't held.
    pub fn update_stock_price(&self, symbol: &str, price: f64) {
        self.state.send_modify(|p| p.update_price(symbol, price));
    }

    /// Empty the holdings collection.
    pub fn clear_portfolio(&self) {
        self.state.send_modify(Portfolio::clear);
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Snapshot of current holdings, in insertion order.
    #[must_use]
    pub fn holdings(&self) -> Vec<Holding> {
        self.state.borrow().holdings.clone()
    }

    /// Total portfolio value at last known prices.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.state.borrow().total_value()
    }

    /// Holdings whose symbol matches `query` (case-insensitive substring).
    #[must_use]
    pub fn search_holdings(&self, query: &str) -> Vec<Holding> {
        self.state
            .borrow()
            .filter(query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Subscribe to state changes. The receiver is notified on every
    /// committed mutation and can `borrow()` the current portfolio at any
    /// time.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Portfolio> {
        self.state.subscribe()
    }
}
