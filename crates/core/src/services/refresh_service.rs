use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use super::portfolio_store::PortfolioStore;
use crate::errors::CoreError;
use crate::models::feed::{TickerEntry, TickerFeed};
use crate::providers::traits::MarketDataProvider;

/// Periodic price refresh: a watchlist ticker cycle and a holdings price
/// cycle, each on its own interval, each tolerating per-symbol failure.
///
/// `start` spawns both loops with an immediate first cycle; `stop` aborts
/// them and nothing is fetched again until the next `start`. Each loop
/// awaits its cycle before sleeping, so a slow cycle delays the next tick
/// instead of overlapping it.
pub struct RefreshScheduler {
    store: Arc<PortfolioStore>,
    provider: Arc<dyn MarketDataProvider>,
    watchlist: Vec<String>,
    watchlist_interval: Duration,
    holdings_interval: Duration,
    feed: watch::Sender<TickerFeed>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(
        store: Arc<PortfolioStore>,
        provider: Arc<dyn MarketDataProvider>,
        watchlist: Vec<String>,
        watchlist_interval: Duration,
        holdings_interval: Duration,
    ) -> Self {
        let (feed, _) = watch::channel(TickerFeed::default());
        Self {
            store,
            provider,
            watchlist,
            watchlist_interval,
            holdings_interval,
            feed,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to the live ticker feed. The receiver sees every
    /// completed watchlist cycle.
    #[must_use]
    pub fn subscribe_feed(&self) -> watch::Receiver<TickerFeed> {
        self.feed.subscribe()
    }

    /// Start both periodic tasks. Each runs an immediate first cycle and
    /// then re-arms on its interval regardless of individual failures.
    /// Calling `start` while already running restarts both loops from a
    /// fresh immediate cycle.
    pub fn start(&self) {
        self.stop();

        let watchlist_loop = {
            let provider = Arc::clone(&self.provider);
            let watchlist = self.watchlist.clone();
            let feed = self.feed.clone();
            let interval = self.watchlist_interval;
            tokio::spawn(async move {
                let mut ticks = tokio::time::interval(interval);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticks.tick().await;
                    run_watchlist_cycle(provider.as_ref(), &watchlist, &feed).await;
                }
            })
        };

        let holdings_loop = {
            let store = Arc::clone(&self.store);
            let provider = Arc::clone(&self.provider);
            let interval = self.holdings_interval;
            tokio::spawn(async move {
                let mut ticks = tokio::time::interval(interval);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticks.tick().await;
                    run_holdings_cycle(&store, &provider).await;
                }
            })
        };

        *self.tasks.lock().unwrap() = vec![watchlist_loop, holdings_loop];
    }

    /// Stop both periodic tasks. An in-flight cycle is aborted at its next
    /// suspension point and its partial results are discarded.
    pub fn stop(&self) {
        for task in self.tasks.lock().unwrap().drain(..) {
            task.abort();
        }
    }

    /// Run one watchlist ticker cycle right now, outside the periodic loop.
    pub async fn refresh_watchlist_once(&self) {
        run_watchlist_cycle(self.provider.as_ref(), &self.watchlist, &self.feed).await;
    }

    /// Run one holdings price cycle right now, outside the periodic loop.
    pub async fn refresh_holdings_once(&self) {
        run_holdings_cycle(&self.store, &self.provider).await;
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One watchlist cycle: company profile then quote for each symbol in
/// declared order. A symbol that fails either fetch is logged and left out
/// of this cycle's entries without aborting the rest; the feed is replaced
/// only once the whole cycle is done.
async fn run_watchlist_cycle(
    provider: &dyn MarketDataProvider,
    watchlist: &[String],
    feed: &watch::Sender<TickerFeed>,
) {
    let mut entries = Vec::with_capacity(watchlist.len());
    for symbol in watchlist {
        match fetch_ticker_entry(provider, symbol).await {
            Ok(entry) => entries.push(entry),
            Err(e) => log::warn!("watchlist refresh failed for {symbol}: {e}"),
        }
    }

    log::debug!("watchlist cycle complete: {} entries", entries.len());
    feed.send_replace(TickerFeed {
        entries,
        refreshed_at: Some(Utc::now()),
    });
}

async fn fetch_ticker_entry(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> Result<TickerEntry, CoreError> {
    let profile = provider.get_company_profile(symbol).await?;
    let quote = provider.get_quote(symbol).await?;
    Ok(TickerEntry {
        symbol: symbol.to_string(),
        name: profile.name,
        price: quote.price,
    })
}

/// One holdings cycle: fetch a fresh quote for every held symbol. Fetches
/// are concurrently in flight; completions apply one at a time in arrival
/// order, each to its own symbol. A failed or unusable quote leaves that
/// holding's price untouched for this cycle.
async fn run_holdings_cycle(store: &PortfolioStore, provider: &Arc<dyn MarketDataProvider>) {
    let mut fetches = JoinSet::new();
    for holding in store.holdings() {
        let provider = Arc::clone(provider);
        fetches.spawn(async move {
            let result = provider.get_quote(&holding.symbol).await;
            (holding.symbol, result)
        });
    }

    while let Some(joined) = fetches.join_next().await {
        let Ok((symbol, result)) = joined else { continue };
        match result {
            Ok(quote) if quote.has_usable_price() => {
                store.update_stock_price(&symbol, quote.price);
            }
            Ok(_) => log::warn!("no usable price for {symbol}, keeping last known"),
            Err(e) => log::warn!("price refresh failed for {symbol}: {e}"),
        }
    }
}
