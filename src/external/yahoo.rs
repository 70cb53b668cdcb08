use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use crate::external::quote_provider::{
    ExternalPricePoint, QuoteProvider, QuoteProviderError, SymbolHistory,
};

pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn range_for_days(days: u32) -> &'static str {
        if days <= 5 {
            "5d"
        } else if days <= 30 {
            "1mo"
        } else if days <= 90 {
            "3mo"
        } else if days <= 180 {
            "6mo"
        } else {
            "1y"
        }
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<YahooResult, QuoteProviderError> {
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{symbol}?range={range}&interval=1d"
        );

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QuoteProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteProviderError::RateLimited);
        }
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(QuoteProviderError::NotFound);
        }

        let body = resp
            .json::<YahooChartResponse>()
            .await
            .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

        if body.chart.error.is_some() {
            return Err(QuoteProviderError::NotFound);
        }

        body.chart
            .result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| QuoteProviderError::BadResponse("missing result".into()))
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "longName")]
    long_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    async fn fetch_daily_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<SymbolHistory, QuoteProviderError> {
        let range = Self::range_for_days(days);
        let result = self.fetch_chart(symbol, range).await?;

        // timestamp aligns with the close list by index
        let closes = result
            .indicators
            .quote
            .first()
            .map(|q| q.close.clone())
            .unwrap_or_default();

        let mut points = Vec::new();
        for (i, ts) in result.timestamp.iter().enumerate() {
            // skip missing closes
            let Some(close) = closes.get(i).and_then(|v| *v) else {
                continue;
            };

            let dt = DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| QuoteProviderError::Parse("bad timestamp".into()))?;

            points.push(ExternalPricePoint {
                date: dt.date_naive(),
                close,
            });
        }

        // Ensure ascending by date
        points.sort_by_key(|p| p.date);

        Ok(SymbolHistory {
            points,
            live_price: result.meta.regular_market_price,
            display_name: result.meta.long_name.or(result.meta.short_name),
        })
    }

    async fn fetch_current_price(
        &self,
        symbol: &str,
    ) -> Result<Option<f64>, QuoteProviderError> {
        let result = self.fetch_chart(symbol, "1d").await?;

        let last_close = result
            .indicators
            .quote
            .first()
            .and_then(|q| q.close.iter().rev().find_map(|v| *v));

        Ok(result.meta.regular_market_price.or(last_close))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_mapping_covers_valuation_and_screener_windows() {
        assert_eq!(YahooProvider::range_for_days(90), "3mo");
        assert_eq!(YahooProvider::range_for_days(180), "6mo");
        assert_eq!(YahooProvider::range_for_days(365), "1y");
    }

    #[test]
    fn test_chart_response_parses_with_missing_closes() {
        let raw = r#"{
            "chart": {
                "result": [{
                    "meta": {"regularMarketPrice": 101.5, "shortName": "Acme Corp"},
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {"quote": [{"close": [100.0, null, 103.0]}]}
                }],
                "error": null
            }
        }"#;
        let parsed: YahooChartResponse = serde_json::from_str(raw).unwrap();
        let result = parsed.chart.result.unwrap().pop().unwrap();
        assert_eq!(result.meta.regular_market_price, Some(101.5));
        assert_eq!(result.timestamp.len(), 3);
        assert_eq!(result.indicators.quote[0].close[1], None);
    }

    #[test]
    fn test_chart_error_body_parses() {
        let raw = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        }"#;
        let parsed: YahooChartResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.chart.result.is_none());
        assert!(parsed.chart.error.is_some());
    }
}
