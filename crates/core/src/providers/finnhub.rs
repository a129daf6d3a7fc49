use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::quote::{CompanyProfile, Quote, SymbolMatch};

const BASE_URL: &str = "https://finnhub.io/api/v1";

/// Finnhub market-data provider.
///
/// - **Free tier**: current quotes, company profiles, symbol search.
/// - **Requires**: API token, passed as the `token` query parameter.
/// - **Coverage**: US equities; prices are returned in USD.
///
/// Unknown symbols do not produce an HTTP error: `/quote` answers with a
/// zero-filled body and `/stock/profile2` with an empty object. Callers
/// check `Quote::has_usable_price`; an empty profile maps to an API error
/// here.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
}

impl FinnhubProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Finnhub API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct QuoteResponse {
    /// Current price. Zero when the symbol is unknown.
    c: f64,
}

#[derive(Deserialize)]
struct ProfileResponse {
    name: Option<String>,
    ticker: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    symbol: String,
    description: String,
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn name(&self) -> &str {
        "Finnhub"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        let response = self
            .client
            .get(format!("{BASE_URL}/quote"))
            .query(&[("symbol", symbol), ("token", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                provider: "Finnhub".into(),
                message: format!("Quote request for {symbol} failed: {status} {body}"),
            });
        }

        let quote: QuoteResponse = response.json().await.map_err(|e| CoreError::Api {
            provider: "Finnhub".into(),
            message: format!("Failed to parse quote for {symbol}: {e}"),
        })?;

        Ok(Quote { price: quote.c })
    }

    async fn get_company_profile(&self, symbol: &str) -> Result<CompanyProfile, CoreError> {
        let response = self
            .client
            .get(format!("{BASE_URL}/stock/profile2"))
            .query(&[("symbol", symbol), ("token", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                provider: "Finnhub".into(),
                message: format!("Profile request for {symbol} failed: {status} {body}"),
            });
        }

        let profile: ProfileResponse = response.json().await.map_err(|e| CoreError::Api {
            provider: "Finnhub".into(),
            message: format!("Failed to parse profile for {symbol}: {e}"),
        })?;

        let name = profile
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CoreError::Api {
                provider: "Finnhub".into(),
                message: format!("No profile data for {symbol}"),
            })?;

        Ok(CompanyProfile {
            name,
            ticker: profile.ticker.unwrap_or_else(|| symbol.to_uppercase()),
        })
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>, CoreError> {
        let response = self
            .client
            .get(format!("{BASE_URL}/search"))
            .query(&[("q", query), ("token", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                provider: "Finnhub".into(),
                message: format!("Symbol search for '{query}' failed: {status} {body}"),
            });
        }

        let search: SearchResponse = response.json().await.map_err(|e| CoreError::Api {
            provider: "Finnhub".into(),
            message: format!("Failed to parse search results for '{query}': {e}"),
        })?;

        Ok(search
            .result
            .into_iter()
            .map(|item| SymbolMatch {
                symbol: item.symbol,
                description: item.description,
            })
            .collect())
    }
}
