use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::{CompanyProfile, Quote, SymbolMatch};

/// Trait abstraction for the remote market-data service.
///
/// The production implementation talks to Finnhub; tests script responses.
/// If the API stops working or changes, only that one implementation is
/// replaced — the store, scheduler, and workflows are untouched.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the current quote for a symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError>;

    /// Get the company profile (display name, canonical ticker) for a symbol.
    async fn get_company_profile(&self, symbol: &str) -> Result<CompanyProfile, CoreError>;

    /// Search symbols by free text. Results keep the provider's ranking.
    async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>, CoreError>;
}
