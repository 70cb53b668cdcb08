use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily close series for one symbol, plus whatever live metadata the
/// provider exposes alongside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolHistory {
    /// Ascending by date.
    pub points: Vec<ExternalPricePoint>,
    /// Live market price where the provider reports one; fresher than the
    /// last close.
    pub live_price: Option<f64>,
    pub display_name: Option<String>,
}

impl SymbolHistory {
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

#[derive(Debug, Error)]
pub enum QuoteProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("symbol not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

impl QuoteProviderError {
    /// Network-class errors indicate the provider as a whole is unreachable,
    /// as opposed to one symbol being bad.
    pub fn is_outage(&self) -> bool {
        matches!(self, QuoteProviderError::Network(_))
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Daily close history over the trailing `days` window, ascending by
    /// date. An unknown symbol is `NotFound`, never an empty Ok.
    async fn fetch_daily_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<SymbolHistory, QuoteProviderError>;

    /// Best-effort live price for one symbol. `Ok(None)` when the provider
    /// answered but has no quote.
    async fn fetch_current_price(
        &self,
        symbol: &str,
    ) -> Result<Option<f64>, QuoteProviderError>;
}
