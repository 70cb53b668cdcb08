use chrono::{Duration, NaiveDate, Utc};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::constituents;
use crate::external::quote_gateway::QuoteGateway;
use crate::external::quote_provider::SymbolHistory;
use crate::models::{MarketInfo, PriceBand, ScreenerEntry, ScreenerFailure, ScreenerReport};
use crate::models::market::find_market;

/// Provider batch limit for bulk history fetches.
pub const SCREENER_BATCH_SIZE: usize = 20;

const THREE_MONTHS: i64 = 90;
const SIX_MONTHS: i64 = 180;
const ONE_YEAR: i64 = 365;

/// Screens every symbol of a market: 1-year history in fixed-size batches,
/// multi-horizon price bands, and price-band buy flags. Only an unknown
/// market is fatal; every per-symbol problem lands in the failure list and
/// the run continues.
pub async fn run_screener(
    gateway: &QuoteGateway,
    client: &reqwest::Client,
    market_name: &str,
) -> Result<ScreenerReport, AppError> {
    let market = find_market(market_name)
        .ok_or_else(|| AppError::NotFound(format!("Unknown market '{}'", market_name)))?;

    let universe = resolve_universe(client, market).await;
    info!(
        "Screening {}: {} symbols in batches of {}",
        market.name,
        universe.len(),
        SCREENER_BATCH_SIZE
    );

    let today = Utc::now().date_naive();
    let mut entries: Vec<ScreenerEntry> = Vec::new();
    let mut failures: Vec<ScreenerFailure> = Vec::new();

    for batch in universe.chunks(SCREENER_BATCH_SIZE) {
        for (symbol, outcome) in gateway.fetch_history_batch(batch, ONE_YEAR as u32).await {
            match outcome {
                Ok(history) => match build_entry(&symbol, &history, today) {
                    Ok(entry) => entries.push(entry),
                    Err(reason) => {
                        warn!("Screener skipped {}: {}", symbol, reason);
                        failures.push(ScreenerFailure { symbol, reason });
                    }
                },
                Err(reason) => {
                    warn!("Screener fetch failed for {}: {}", symbol, reason);
                    failures.push(ScreenerFailure { symbol, reason });
                }
            }
        }
    }

    let status_message = format!(
        "{}: screened {} symbols, {} with data, {} failed.",
        market.name,
        universe.len(),
        entries.len(),
        failures.len()
    );

    Ok(ScreenerReport {
        market: market.id.to_string(),
        entries,
        failures,
        status_message,
    })
}

/// Resolves the symbol universe for a market. Scraped reference-index
/// constituents (already exchange-suffixed) win when available; the static
/// catalog list, with the market suffix applied, is the offline fallback.
async fn resolve_universe(client: &reqwest::Client, market: &MarketInfo) -> Vec<String> {
    if let Some(index) = market.reference_index {
        let scraped = constituents::fetch_index_members(client, index).await;
        if !scraped.is_empty() {
            info!("Using {} scraped constituents for {}", scraped.len(), market.id);
            return scraped;
        }
    }
    market
        .constituents
        .iter()
        .map(|base| market.suffixed(base))
        .collect()
}

/// Computes one screener entry from a 1-year series. Pure aside from the
/// injected reference date.
fn build_entry(
    symbol: &str,
    history: &SymbolHistory,
    today: NaiveDate,
) -> Result<ScreenerEntry, String> {
    if history.points.is_empty() {
        return Err("no price history".to_string());
    }

    // Live quote preferred, last close as fallback
    let current_price = history
        .live_price
        .or_else(|| history.last_close())
        .ok_or_else(|| "no current price".to_string())?;

    let three_month_closes = closes_since(history, today - Duration::days(THREE_MONTHS));
    let six_month_closes = closes_since(history, today - Duration::days(SIX_MONTHS));
    let one_year_closes = closes_since(history, today - Duration::days(ONE_YEAR));

    let three_month =
        band_of(&three_month_closes).ok_or_else(|| "insufficient recent history".to_string())?;
    let six_month =
        band_of(&six_month_closes).ok_or_else(|| "insufficient recent history".to_string())?;
    let one_year =
        band_of(&one_year_closes).ok_or_else(|| "insufficient recent history".to_string())?;

    let three_month_avg =
        three_month_closes.iter().sum::<f64>() / three_month_closes.len() as f64;

    // Strictly below a band midpoint; sitting exactly on it is not a signal
    let short_term_buy =
        current_price < three_month.midpoint() || current_price < six_month.midpoint();
    let long_term_buy = current_price < one_year.midpoint();

    Ok(ScreenerEntry {
        symbol: symbol.to_string(),
        name: history
            .display_name
            .clone()
            .unwrap_or_else(|| symbol.to_string()),
        current_price,
        three_month,
        three_month_avg,
        six_month,
        one_year,
        short_term_buy,
        long_term_buy,
    })
}

fn closes_since(history: &SymbolHistory, cutoff: NaiveDate) -> Vec<f64> {
    history
        .points
        .iter()
        .filter(|p| p.date >= cutoff)
        .map(|p| p.close)
        .collect()
}

fn band_of(closes: &[f64]) -> Option<PriceBand> {
    if closes.is_empty() {
        return None;
    }
    let low = closes.iter().cloned().fold(f64::INFINITY, f64::min);
    let high = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some(PriceBand { low, high })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::quote_provider::ExternalPricePoint;

    fn history_over_year(today: NaiveDate, closes_by_age_days: &[(i64, f64)]) -> SymbolHistory {
        let mut points: Vec<ExternalPricePoint> = closes_by_age_days
            .iter()
            .map(|(age, close)| ExternalPricePoint {
                date: today - Duration::days(*age),
                close: *close,
            })
            .collect();
        points.sort_by_key(|p| p.date);
        SymbolHistory {
            points,
            live_price: None,
            display_name: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn test_bands_split_by_trailing_window() {
        // old data only in the 1y window, mid data in 6m, recent in 3m
        let history = history_over_year(
            today(),
            &[(300, 40.0), (150, 60.0), (60, 80.0), (10, 90.0), (1, 100.0)],
        );
        let entry = build_entry("XYZ", &history, today()).unwrap();

        assert_eq!(entry.three_month, PriceBand { low: 80.0, high: 100.0 });
        assert_eq!(entry.six_month, PriceBand { low: 60.0, high: 100.0 });
        assert_eq!(entry.one_year, PriceBand { low: 40.0, high: 100.0 });
        assert!((entry.three_month_avg - 90.0).abs() < 1e-9);
        assert_eq!(entry.current_price, 100.0);
    }

    #[test]
    fn test_current_at_three_month_midpoint_is_not_short_term_buy() {
        // 3m band [80, 120] midpoint 100; 6m band [80, 120] too
        let mut history =
            history_over_year(today(), &[(80, 80.0), (40, 120.0), (1, 100.0)]);
        history.live_price = Some(100.0);

        let entry = build_entry("MID", &history, today()).unwrap();
        assert_eq!(entry.three_month.midpoint(), 100.0);
        assert!(!entry.short_term_buy);
    }

    #[test]
    fn test_below_either_short_window_midpoint_flags_buy() {
        // 3m band [95, 105] midpoint 100 (not below); 6m band [95, 200]
        // midpoint 147.5 (below) -> short-term buy via the 6m band
        let mut history = history_over_year(
            today(),
            &[(150, 200.0), (80, 95.0), (40, 105.0), (1, 100.0)],
        );
        history.live_price = Some(100.0);

        let entry = build_entry("OR", &history, today()).unwrap();
        assert!(!(entry.current_price < entry.three_month.midpoint()));
        assert!(entry.short_term_buy);
    }

    #[test]
    fn test_long_term_buy_uses_one_year_midpoint() {
        // 1y band [40, 100] midpoint 70
        let mut history =
            history_over_year(today(), &[(300, 40.0), (60, 100.0), (1, 60.0)]);
        history.live_price = Some(60.0);

        let entry = build_entry("LT", &history, today()).unwrap();
        assert!(entry.long_term_buy);
    }

    #[test]
    fn test_live_quote_preferred_over_last_close() {
        let mut history = history_over_year(today(), &[(40, 50.0), (1, 55.0)]);
        history.live_price = Some(57.5);

        let entry = build_entry("LIVE", &history, today()).unwrap();
        assert_eq!(entry.current_price, 57.5);
    }

    #[test]
    fn test_empty_history_is_a_failure_reason() {
        let empty = SymbolHistory::default();
        assert_eq!(
            build_entry("NONE", &empty, today()).unwrap_err(),
            "no price history"
        );
    }

    #[test]
    fn test_stale_series_without_recent_window_fails() {
        // all points older than 3 months -> no 3m band
        let history = history_over_year(today(), &[(300, 40.0), (200, 45.0)]);
        let err = build_entry("STALE", &history, today()).unwrap_err();
        assert_eq!(err, "insufficient recent history");
    }
}
