use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::quote::SymbolMatch;
use crate::providers::traits::MarketDataProvider;

/// Debounced symbol search: every keystroke cancels the pending lookup,
/// and only input that stays quiet for the debounce window reaches the
/// provider.
///
/// Search failures clear the suggestion list and log — they never surface
/// to the user.
pub struct SymbolSearchDebouncer {
    provider: Arc<dyn MarketDataProvider>,
    delay: Duration,
    suggestions: watch::Sender<Vec<SymbolMatch>>,
    /// The armed delayed lookup, if any. Replaced (and the old one
    /// aborted) on every keystroke.
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SymbolSearchDebouncer {
    pub fn new(provider: Arc<dyn MarketDataProvider>, delay: Duration) -> Self {
        let (suggestions, _) = watch::channel(Vec::new());
        Self {
            provider,
            delay,
            suggestions,
            pending: Mutex::new(None),
        }
    }

    /// Feed the current content of the symbol input field.
    ///
    /// Cancels any pending lookup. Input of one character or less clears
    /// the suggestions immediately without a request; anything longer arms
    /// a fresh delayed lookup for the full text.
    pub fn on_input(&self, text: &str) {
        let mut pending = self.pending.lock().unwrap();
        if let Some(task) = pending.take() {
            task.abort();
        }

        if text.chars().count() <= 1 {
            self.suggestions.send_replace(Vec::new());
            return;
        }

        let provider = Arc::clone(&self.provider);
        let suggestions = self.suggestions.clone();
        let delay = self.delay;
        let query = text.to_string();
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match provider.search_symbols(&query).await {
                Ok(matches) => {
                    suggestions.send_replace(matches);
                }
                Err(e) => {
                    log::warn!("symbol search failed for '{query}': {e}");
                    suggestions.send_replace(Vec::new());
                }
            }
        }));
    }

    /// Accept a suggestion: clears the list (and any pending lookup, so a
    /// stale result can't repopulate it) and hands back the symbol for the
    /// input field. Does not fetch anything by itself.
    pub fn select(&self, symbol: &str) -> String {
        if let Some(task) = self.pending.lock().unwrap().take() {
            task.abort();
        }
        self.suggestions.send_replace(Vec::new());
        symbol.to_string()
    }

    /// Subscribe to the suggestion list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<SymbolMatch>> {
        self.suggestions.subscribe()
    }
}
