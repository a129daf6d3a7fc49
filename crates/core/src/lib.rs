pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;

use tokio::sync::watch;

use models::feed::TickerFeed;
use models::holding::Holding;
use models::portfolio::Portfolio;
use models::quote::SymbolMatch;
use models::settings::Settings;
use providers::finnhub::FinnhubProvider;
use providers::traits::MarketDataProvider;
use services::add_stock::{AddStockWorkflow, FormState};
use services::portfolio_store::PortfolioStore;
use services::refresh_service::RefreshScheduler;
use services::search_service::SymbolSearchDebouncer;
use storage::manager::StateStore;

/// Main entry point for the stock-portfolio core library.
/// Owns the portfolio store and the background services that keep it fresh;
/// the presentation layer holds one of these and the subscriptions it hands
/// out.
#[must_use]
pub struct PortfolioTracker {
    store: Arc<PortfolioStore>,
    scheduler: RefreshScheduler,
    search: SymbolSearchDebouncer,
    add_form: AddStockWorkflow,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("holdings", &self.store.holdings().len())
            .field("total_value", &self.store.total_value())
            .finish()
    }
}

impl PortfolioTracker {
    /// Open the tracker against a durable store, talking to Finnhub with
    /// the configured API key. Previously persisted holdings are loaded;
    /// absent or unreadable state starts empty.
    pub async fn open(storage: Arc<dyn StateStore>, settings: Settings) -> Self {
        let provider: Arc<dyn MarketDataProvider> =
            Arc::new(FinnhubProvider::new(settings.api_key.clone()));
        Self::build(storage, provider, settings).await
    }

    /// Open with an injected market-data provider (tests, alternative APIs).
    pub async fn open_with_provider(
        storage: Arc<dyn StateStore>,
        provider: Arc<dyn MarketDataProvider>,
        settings: Settings,
    ) -> Self {
        Self::build(storage, provider, settings).await
    }

    // ── Portfolio operations ────────────────────────────────────────

    /// Record shares of an already-validated, uppercased symbol. Merges by
    /// summing quantities when the symbol is already held.
    pub fn add_stock(&self, symbol: &str, quantity: u32, price: f64) {
        self.store.add_stock(symbol, quantity, price);
    }

    /// Delete a holding. No-op if the symbol isn't held.
    pub fn remove_stock(&self, symbol: &str) {
        self.store.remove_stock(symbol);
    }

    /// Replace a holding's last known price. No-op if the symbol isn't held.
    pub fn update_stock_price(&self, symbol: &str, price: f64) {
        self.store.update_stock_price(symbol, price);
    }

    /// Empty the portfolio.
    pub fn clear_portfolio(&self) {
        self.store.clear_portfolio();
    }

    /// Snapshot of current holdings, in insertion order.
    #[must_use]
    pub fn holdings(&self) -> Vec<Holding> {
        self.store.holdings()
    }

    /// Total portfolio value at last known prices.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.store.total_value()
    }

    /// Holdings whose symbol matches `query` (case-insensitive substring).
    #[must_use]
    pub fn search_holdings(&self, query: &str) -> Vec<Holding> {
        self.store.search_holdings(query)
    }

    /// Subscribe to portfolio state changes.
    #[must_use]
    pub fn subscribe_portfolio(&self) -> watch::Receiver<Portfolio> {
        self.store.subscribe()
    }

    // ── Refresh scheduling ──────────────────────────────────────────

    /// Activate background refresh (the owning screen became visible):
    /// both periodic tasks start with an immediate cycle.
    pub fn activate(&self) {
        self.scheduler.start();
    }

    /// Deactivate background refresh: both periodic tasks are canceled and
    /// no further fetches are issued until the next `activate`.
    pub fn deactivate(&self) {
        self.scheduler.stop();
    }

    /// Run a single watchlist ticker cycle right now.
    pub async fn refresh_watchlist_now(&self) {
        self.scheduler.refresh_watchlist_once().await;
    }

    /// Run a single holdings price cycle right now.
    pub async fn refresh_holdings_now(&self) {
        self.scheduler.refresh_holdings_once().await;
    }

    /// Subscribe to the live ticker feed.
    #[must_use]
    pub fn subscribe_ticker(&self) -> watch::Receiver<TickerFeed> {
        self.scheduler.subscribe_feed()
    }

    // ── Symbol search ───────────────────────────────────────────────

    /// Feed the current content of the symbol input field into the
    /// debounced search.
    pub fn set_symbol_input(&self, text: &str) {
        self.search.on_input(text);
    }

    /// Accept a suggestion: clears the suggestion list and returns the
    /// symbol to put into the input field. Does not fetch anything.
    pub fn select_suggestion(&self, symbol: &str) -> String {
        self.search.select(symbol)
    }

    /// Subscribe to the suggestion list.
    #[must_use]
    pub fn subscribe_suggestions(&self) -> watch::Receiver<Vec<SymbolMatch>> {
        self.search.subscribe()
    }

    // ── Add-stock form ──────────────────────────────────────────────

    /// Open the add-stock form.
    pub fn open_add_form(&self) {
        self.add_form.open();
    }

    /// Close the add-stock form without side effects.
    pub fn cancel_add_form(&self) {
        self.add_form.cancel();
    }

    /// Validate raw form input and, if valid, fetch a quote and add the
    /// holding. Outcomes are published on the form-state subscription.
    pub async fn submit_add_stock(&self, symbol_input: &str, quantity_input: &str) {
        self.add_form.submit(symbol_input, quantity_input).await;
    }

    /// Subscribe to the add-stock form state.
    #[must_use]
    pub fn subscribe_form(&self) -> watch::Receiver<FormState> {
        self.add_form.subscribe()
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn build(
        storage: Arc<dyn StateStore>,
        provider: Arc<dyn MarketDataProvider>,
        settings: Settings,
    ) -> Self {
        let store = Arc::new(PortfolioStore::open(storage).await);
        let scheduler = RefreshScheduler::new(
            Arc::clone(&store),
            Arc::clone(&provider),
            settings.watchlist.clone(),
            settings.watchlist_refresh(),
            settings.holdings_refresh(),
        );
        let search = SymbolSearchDebouncer::new(Arc::clone(&provider), settings.search_debounce());
        let add_form = AddStockWorkflow::new(Arc::clone(&store), provider);

        Self {
            store,
            scheduler,
            search,
            add_form,
        }
    }
}
