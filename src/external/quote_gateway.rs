use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::external::quote_provider::{QuoteProvider, SymbolHistory};

/// Best-effort quote data for one symbol. Either field may be absent; absence
/// is a value that flows through valuation, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolQuote {
    pub current: Option<f64>,
    pub window_average: Option<f64>,
    pub display_name: Option<String>,
}

/// Result of one batched gateway call. `quotes` holds exactly one entry per
/// requested symbol. `degraded` is set when the provider as a whole was
/// unreachable, so the caller can report the outage once.
#[derive(Debug, Clone, Default)]
pub struct BatchQuotes {
    pub quotes: HashMap<String, SymbolQuote>,
    pub degraded: bool,
}

/// Wraps the external quote provider with partial-failure-tolerant batch
/// semantics: one bad symbol never aborts the others.
#[derive(Clone)]
pub struct QuoteGateway {
    provider: Arc<dyn QuoteProvider>,
}

impl QuoteGateway {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Fetches current price and trailing-window average for every symbol in
    /// one fan-out. Guarantees an entry (possibly all-absent) for each
    /// requested symbol.
    pub async fn fetch_batch(&self, symbols: &[String], window_days: u32) -> BatchQuotes {
        let fetches = symbols
            .iter()
            .map(|s| self.provider.fetch_daily_history(s, window_days));
        let results = join_all(fetches).await;

        let mut quotes = HashMap::with_capacity(symbols.len());
        let mut outages = 0usize;
        let mut failures = 0usize;

        for (symbol, result) in symbols.iter().zip(results) {
            let quote = match result {
                Ok(history) => {
                    let mut current = history.live_price.or_else(|| history.last_close());

                    // Single-symbol batches get a fresher quote than the
                    // series' last close when the provider gave no live price.
                    if symbols.len() == 1 && history.live_price.is_none() {
                        if let Ok(Some(live)) = self.provider.fetch_current_price(symbol).await {
                            current = Some(live);
                        }
                    }

                    SymbolQuote {
                        current,
                        window_average: window_average(&history),
                        display_name: history.display_name,
                    }
                }
                Err(e) => {
                    warn!("No quote data for {}: {}", symbol, e);
                    failures += 1;
                    if e.is_outage() {
                        outages += 1;
                    }
                    SymbolQuote::default()
                }
            };
            quotes.insert(symbol.clone(), quote);
        }

        // Provider-wide outage: every symbol failed with a network-class
        // error. Reported once to the caller instead of per symbol.
        let degraded = !symbols.is_empty() && failures == symbols.len() && outages > 0;

        BatchQuotes { quotes, degraded }
    }

    /// Fetches the full daily history per symbol for the screener, keeping
    /// per-symbol outcomes separate so one failed fetch never drops the rest
    /// of the batch.
    pub async fn fetch_history_batch(
        &self,
        symbols: &[String],
        days: u32,
    ) -> Vec<(String, Result<SymbolHistory, String>)> {
        let fetches = symbols
            .iter()
            .map(|s| self.provider.fetch_daily_history(s, days));
        let results = join_all(fetches).await;

        symbols
            .iter()
            .cloned()
            .zip(results.into_iter().map(|r| r.map_err(|e| e.to_string())))
            .collect()
    }
}

fn window_average(history: &SymbolHistory) -> Option<f64> {
    if history.points.is_empty() {
        return None;
    }
    let sum: f64 = history.points.iter().map(|p| p.close).sum();
    Some(sum / history.points.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::quote_provider::{
        ExternalPricePoint, QuoteProviderError,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;

    enum Canned {
        Series(Vec<f64>, Option<f64>),
        Outage,
    }

    struct StubProvider {
        canned: HashMap<String, Canned>,
    }

    impl StubProvider {
        fn series(closes: &[f64], live: Option<f64>) -> Canned {
            Canned::Series(closes.to_vec(), live)
        }
    }

    #[async_trait]
    impl QuoteProvider for StubProvider {
        async fn fetch_daily_history(
            &self,
            symbol: &str,
            _days: u32,
        ) -> Result<SymbolHistory, QuoteProviderError> {
            match self.canned.get(symbol) {
                Some(Canned::Series(closes, live)) => {
                    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
                    let points = closes
                        .iter()
                        .enumerate()
                        .map(|(i, c)| ExternalPricePoint {
                            date: base + chrono::Duration::days(i as i64),
                            close: *c,
                        })
                        .collect();
                    Ok(SymbolHistory {
                        points,
                        live_price: *live,
                        display_name: None,
                    })
                }
                Some(Canned::Outage) => {
                    Err(QuoteProviderError::Network("connection refused".into()))
                }
                _ => Err(QuoteProviderError::NotFound),
            }
        }

        async fn fetch_current_price(
            &self,
            symbol: &str,
        ) -> Result<Option<f64>, QuoteProviderError> {
            match self.canned.get(symbol) {
                Some(Canned::Series(closes, live)) => Ok((*live).or(closes.last().copied())),
                _ => Ok(None),
            }
        }
    }

    fn gateway(canned: HashMap<String, Canned>) -> QuoteGateway {
        QuoteGateway::new(Arc::new(StubProvider { canned }))
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_batch_returns_entry_for_every_symbol() {
        let mut canned = HashMap::new();
        canned.insert("A".to_string(), StubProvider::series(&[10.0, 12.0], Some(11.0)));
        canned.insert("C".to_string(), StubProvider::series(&[20.0, 22.0], None));
        // B deliberately missing -> NotFound

        let batch = gateway(canned).fetch_batch(&symbols(&["A", "B", "C"]), 90).await;

        assert_eq!(batch.quotes.len(), 3);
        assert!(!batch.degraded);
        assert_eq!(batch.quotes["A"].current, Some(11.0));
        assert_eq!(batch.quotes["A"].window_average, Some(11.0));
        assert_eq!(batch.quotes["B"].current, None);
        assert_eq!(batch.quotes["B"].window_average, None);
        // no live price -> falls back to last close
        assert_eq!(batch.quotes["C"].current, Some(22.0));
    }

    #[tokio::test]
    async fn test_provider_outage_degrades_instead_of_failing() {
        let mut canned = HashMap::new();
        canned.insert("A".to_string(), Canned::Outage);
        canned.insert("B".to_string(), Canned::Outage);

        let batch = gateway(canned).fetch_batch(&symbols(&["A", "B"]), 90).await;

        assert!(batch.degraded);
        assert_eq!(batch.quotes.len(), 2);
        assert!(batch.quotes.values().all(|q| q.current.is_none()));
    }

    #[tokio::test]
    async fn test_partial_outage_is_not_degraded() {
        let mut canned = HashMap::new();
        canned.insert("A".to_string(), StubProvider::series(&[10.0], Some(10.0)));
        canned.insert("B".to_string(), Canned::Outage);

        let batch = gateway(canned).fetch_batch(&symbols(&["A", "B"]), 90).await;

        assert!(!batch.degraded);
        assert_eq!(batch.quotes["A"].current, Some(10.0));
        assert_eq!(batch.quotes["B"].current, None);
    }

    #[tokio::test]
    async fn test_single_symbol_batch_refreshes_quote() {
        let mut canned = HashMap::new();
        // History without a live price; fetch_current_price returns the
        // last close, which stands in for a fresher quote here.
        canned.insert("SOLO".to_string(), StubProvider::series(&[50.0, 55.0], None));

        let batch = gateway(canned).fetch_batch(&symbols(&["SOLO"]), 90).await;

        assert_eq!(batch.quotes["SOLO"].current, Some(55.0));
    }

    #[tokio::test]
    async fn test_history_batch_keeps_failures_separate() {
        let mut canned = HashMap::new();
        canned.insert("A".to_string(), StubProvider::series(&[1.0, 2.0], None));

        let results = gateway(canned)
            .fetch_history_batch(&symbols(&["A", "B"]), 365)
            .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }

    #[tokio::test]
    async fn test_empty_symbol_list_is_empty_and_not_degraded() {
        let batch = gateway(HashMap::new()).fetch_batch(&[], 90).await;
        assert!(batch.quotes.is_empty());
        assert!(!batch.degraded);
    }
}
