use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use super::portfolio_store::PortfolioStore;
use crate::errors::CoreError;
use crate::providers::traits::MarketDataProvider;

// User-facing notice text.
const INVALID_INPUT_TITLE: &str = "Invalid Input";
const INVALID_INPUT_MESSAGE: &str =
    "Please enter a valid stock symbol and a quantity greater than 0.";
const FETCH_ERROR_TITLE: &str = "Error";
const FETCH_ERROR_MESSAGE: &str =
    "This stock requires a premium API plan or the stock symbol is invalid.";

/// Where the add-stock form currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Form not shown.
    Closed,
    /// Form open, waiting for input.
    Idle,
    /// Quote fetch in flight after a valid submit.
    Loading,
}

/// A blocking user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    fn invalid_input() -> Self {
        Self {
            title: INVALID_INPUT_TITLE.into(),
            message: INVALID_INPUT_MESSAGE.into(),
        }
    }

    fn fetch_error() -> Self {
        Self {
            title: FETCH_ERROR_TITLE.into(),
            message: FETCH_ERROR_MESSAGE.into(),
        }
    }
}

/// Observable state of the add-stock form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub phase: FormPhase,

    /// Set when the last submit failed; cleared on the next submit, open,
    /// or cancel.
    pub notice: Option<Notice>,

    /// Detail of the last provider failure, for diagnostic display.
    pub last_error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            phase: FormPhase::Closed,
            notice: None,
            last_error: None,
        }
    }
}

/// The add-stock workflow: validates raw text input, resolves a quote, and
/// commits the holding.
///
/// Drives the form state machine Closed → Idle → (Loading → Closed on
/// success, or back to Idle with a notice on failure). Invalid input never
/// reaches the store or the provider.
pub struct AddStockWorkflow {
    store: Arc<PortfolioStore>,
    provider: Arc<dyn MarketDataProvider>,
    state: watch::Sender<FormState>,
    /// Bumped on cancel. A submit whose generation is stale when its fetch
    /// completes discards the result instead of touching the store.
    generation: AtomicU64,
}

impl AddStockWorkflow {
    pub fn new(store: Arc<PortfolioStore>, provider: Arc<dyn MarketDataProvider>) -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self {
            store,
            provider,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Subscribe to the form state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Open the form.
    pub fn open(&self) {
        self.state.send_replace(FormState {
            phase: FormPhase::Idle,
            notice: None,
            last_error: None,
        });
    }

    /// Close the form without side effects. Any in-flight quote fetch is
    /// orphaned: its result is discarded when it completes.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(FormState::default());
    }

    /// Validate the raw input and, if it passes, fetch a quote and commit
    /// the holding.
    ///
    /// The symbol must be non-empty after trimming and the quantity must
    /// parse to an integer strictly greater than zero — `"0"`, `"-3"`, and
    /// `"abc"` all produce the same Invalid Input notice and nothing is
    /// fetched or stored.
    pub async fn submit(&self, symbol_input: &str, quantity_input: &str) {
        let phase = self.state.borrow().phase;
        if phase != FormPhase::Idle {
            // Submit is only reachable from an open, idle form.
            return;
        }

        let (symbol, quantity) = match validate(symbol_input, quantity_input) {
            Ok(valid) => valid,
            Err(e) => {
                log::debug!("add-stock input rejected: {e}");
                self.state.send_modify(|s| {
                    s.notice = Some(Notice::invalid_input());
                });
                return;
            }
        };

        let generation = self.generation.load(Ordering::SeqCst);
        self.state.send_replace(FormState {
            phase: FormPhase::Loading,
            notice: None,
            last_error: None,
        });

        let outcome = self.provider.get_quote(&symbol).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            // The form was dismissed while the fetch was in flight.
            log::debug!("discarding add-stock result for {symbol}: form dismissed");
            return;
        }

        match outcome {
            Ok(quote) if quote.has_usable_price() => {
                self.store.add_stock(&symbol, quantity, quote.price);
                self.state.send_replace(FormState::default());
            }
            Ok(_) => self.fail(CoreError::PriceNotAvailable { symbol }),
            Err(e) => self.fail(e),
        }
    }

    /// Record a failed submit: the form stays open with the inputs intact
    /// so the user can correct and retry.
    fn fail(&self, error: CoreError) {
        log::warn!("add-stock quote fetch failed: {error}");
        self.state.send_replace(FormState {
            phase: FormPhase::Idle,
            notice: Some(Notice::fetch_error()),
            last_error: Some(error.to_string()),
        });
    }
}

/// Check raw form input: the symbol must be non-empty after trimming and
/// the quantity must parse to an integer strictly greater than zero.
/// Returns the uppercased symbol and the parsed quantity.
fn validate(symbol_input: &str, quantity_input: &str) -> Result<(String, u32), CoreError> {
    let symbol = symbol_input.trim();
    if symbol.is_empty() {
        return Err(CoreError::ValidationError(
            "stock symbol must not be empty".into(),
        ));
    }

    let quantity = quantity_input.trim().parse::<u32>().unwrap_or(0);
    if quantity == 0 {
        return Err(CoreError::ValidationError(
            "quantity must be an integer greater than 0".into(),
        ));
    }

    Ok((symbol.to_uppercase(), quantity))
}
