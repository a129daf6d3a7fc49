use serde::{Deserialize, Serialize};

/// Current quote for a symbol, as returned by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Current price per share.
    pub price: f64,
}

impl Quote {
    /// Whether this quote carries a price the portfolio can use.
    ///
    /// Finnhub answers unknown symbols with a zero-filled quote, so a price
    /// of 0 means "no data", not a free stock. Non-finite values are
    /// rejected for the same reason.
    #[must_use]
    pub fn has_usable_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Company profile for a symbol: display name plus the canonical ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub ticker: String,
}

/// One symbol-search result. Doubles as the suggestion entry shown under
/// the symbol input; the provider's ranking order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub description: String,
}
