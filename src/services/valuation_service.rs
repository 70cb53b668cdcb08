use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::external::quote_gateway::{BatchQuotes, QuoteGateway, SymbolQuote};
use crate::models::{PortfolioTotals, Position, ValuationReport, ValuedRow};
use crate::services::position_service;
use crate::services::recommendation::{classify, RecommendationThresholds};

/// Trailing window for the per-position market average.
pub const VALUATION_WINDOW_DAYS: u32 = 90;

/// Builds the full valuation report for one user: aggregate positions, one
/// batched quote fetch, one valued row per position.
pub async fn valuation_report(
    pool: &PgPool,
    gateway: &QuoteGateway,
    user_id: Uuid,
) -> Result<ValuationReport, AppError> {
    let positions = position_service::positions_for_user(pool, user_id).await?;

    if positions.is_empty() {
        return Ok(ValuationReport {
            rows: Vec::new(),
            totals: PortfolioTotals::default(),
            status_message: "Your portfolio is empty. Add a lot to get started.".to_string(),
        });
    }

    let tickers: Vec<String> = positions.iter().map(|p| p.ticker.clone()).collect();
    let batch = gateway.fetch_batch(&tickers, VALUATION_WINDOW_DAYS).await;

    info!(
        "Valuing {} position(s) for user {} (degraded={})",
        positions.len(),
        user_id,
        batch.degraded
    );

    Ok(build_report(
        &positions,
        &batch,
        &RecommendationThresholds::default(),
    ))
}

/// Joins aggregated positions with batched quote data. Pure: one row per
/// position in input order, with absent quote fields degrading that row
/// only (market value 0, signal NoData), never dropping it.
pub fn build_report(
    positions: &[Position],
    batch: &BatchQuotes,
    thresholds: &RecommendationThresholds,
) -> ValuationReport {
    let absent = SymbolQuote::default();

    let rows: Vec<ValuedRow> = positions
        .iter()
        .map(|position| {
            let quote = batch.quotes.get(&position.ticker).unwrap_or(&absent);

            let market_value = quote
                .current
                .map(|price| position.total_shares as f64 * price)
                .unwrap_or(0.0);

            ValuedRow {
                ticker: position.ticker.clone(),
                name: quote
                    .display_name
                    .clone()
                    .unwrap_or_else(|| position.ticker.clone()),
                shares: position.total_shares,
                avg_cost: position.avg_cost,
                cost_basis: position.cost_basis(),
                market_value,
                window_average: quote.window_average,
                current_price: quote.current,
                recommendation: classify(quote.current, quote.window_average, thresholds),
            }
        })
        .collect();

    let totals = compute_totals(&rows);

    let status_message = if batch.degraded {
        "Quote provider unreachable; prices and averages are unavailable.".to_string()
    } else {
        format!(
            "Portfolio loaded; prices and {}-day averages refreshed.",
            VALUATION_WINDOW_DAYS
        )
    };

    ValuationReport {
        rows,
        totals,
        status_message,
    }
}

fn compute_totals(rows: &[ValuedRow]) -> PortfolioTotals {
    let cost_basis: f64 = rows.iter().map(|r| r.cost_basis).sum();
    let market_value: f64 = rows.iter().map(|r| r.market_value).sum();
    let gain_abs = market_value - cost_basis;
    let gain_pct = if cost_basis > 0.0 {
        gain_abs / cost_basis * 100.0
    } else {
        0.0
    };

    PortfolioTotals {
        cost_basis,
        market_value,
        gain_abs,
        gain_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recommendation;
    use std::collections::HashMap;

    fn position(ticker: &str, shares: i64, avg_cost: f64) -> Position {
        Position {
            ticker: ticker.to_string(),
            total_shares: shares,
            avg_cost,
        }
    }

    fn quote(current: Option<f64>, average: Option<f64>) -> SymbolQuote {
        SymbolQuote {
            current,
            window_average: average,
            display_name: None,
        }
    }

    fn batch(entries: &[(&str, SymbolQuote)]) -> BatchQuotes {
        BatchQuotes {
            quotes: entries
                .iter()
                .map(|(t, q)| (t.to_string(), q.clone()))
                .collect::<HashMap<_, _>>(),
            degraded: false,
        }
    }

    fn defaults() -> RecommendationThresholds {
        RecommendationThresholds::default()
    }

    #[test]
    fn test_scenario_two_lots_buy_signal() {
        // Position AAA: 15 shares at 110.00; quote 80 vs 90d-avg 110
        let positions = [position("AAA", 15, 110.0)];
        let batch = batch(&[("AAA", quote(Some(80.0), Some(110.0)))]);

        let report = build_report(&positions, &batch, &defaults());
        let row = &report.rows[0];

        assert!((row.cost_basis - 1650.0).abs() < 1e-9);
        assert!((row.market_value - 1200.0).abs() < 1e-9);
        // 80 < 0.75 * 110 = 82.5
        assert_eq!(row.recommendation, Recommendation::Buy);
    }

    #[test]
    fn test_row_count_matches_positions_under_partial_failure() {
        let positions = [
            position("A", 10, 10.0),
            position("B", 5, 20.0),
            position("C", 2, 30.0),
        ];
        let batch = batch(&[
            ("A", quote(Some(12.0), Some(11.0))),
            ("B", quote(None, None)),
            ("C", quote(Some(33.0), Some(30.0))),
        ]);

        let report = build_report(&positions, &batch, &defaults());

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[1].ticker, "B");
        assert_eq!(report.rows[1].market_value, 0.0);
        assert_eq!(report.rows[1].recommendation, Recommendation::NoData);
        assert!(report.rows[0].market_value > 0.0);
        assert!(report.rows[2].market_value > 0.0);
    }

    #[test]
    fn test_rows_follow_position_order() {
        let positions = [position("Z", 1, 1.0), position("A", 1, 1.0)];
        let batch = batch(&[
            ("A", quote(Some(1.0), Some(1.0))),
            ("Z", quote(Some(1.0), Some(1.0))),
        ]);

        let report = build_report(&positions, &batch, &defaults());
        let tickers: Vec<_> = report.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["Z", "A"]);
    }

    #[test]
    fn test_totals_sum_rows_and_guard_zero_cost_basis() {
        let positions = [position("A", 10, 10.0), position("B", 5, 20.0)];
        let batch = batch(&[
            ("A", quote(Some(11.0), Some(10.0))),
            ("B", quote(None, None)),
        ]);

        let report = build_report(&positions, &batch, &defaults());
        assert!((report.totals.cost_basis - 200.0).abs() < 1e-9);
        assert!((report.totals.market_value - 110.0).abs() < 1e-9);
        assert!((report.totals.gain_abs + 90.0).abs() < 1e-9);

        let empty = build_report(&[], &BatchQuotes::default(), &defaults());
        assert_eq!(empty.totals.gain_pct, 0.0);
    }

    #[test]
    fn test_report_is_deterministic_for_same_inputs() {
        let positions = [position("A", 3, 50.0), position("B", 7, 20.0)];
        let quotes = batch(&[
            ("A", quote(Some(60.0), Some(55.0))),
            ("B", quote(Some(18.0), Some(25.0))),
        ]);

        let first = build_report(&positions, &quotes, &defaults());
        let second = build_report(&positions, &quotes, &defaults());
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.totals, second.totals);
    }

    #[test]
    fn test_degraded_batch_reports_outage_once_in_status() {
        let positions = [position("A", 1, 10.0)];
        let degraded = BatchQuotes {
            quotes: [("A".to_string(), quote(None, None))].into_iter().collect(),
            degraded: true,
        };

        let report = build_report(&positions, &degraded, &defaults());
        assert!(report.status_message.contains("unreachable"));
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].recommendation, Recommendation::NoData);
    }
}
