use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{MutationOutcome, Position, PurchaseLot, ShareCount, UnitPrice};

/// Folds raw purchase lots into one position per distinct ticker, in
/// first-seen order. Average cost is the monetary-weighted mean: sum of
/// shares×price over sum of shares, never an average of unit prices.
pub fn aggregate_positions(lots: &[PurchaseLot]) -> Vec<Position> {
    struct Acc {
        shares: i64,
        cost: f64,
    }

    let mut order: Vec<String> = Vec::new();
    let mut by_ticker: std::collections::HashMap<String, Acc> = std::collections::HashMap::new();

    for lot in lots {
        let acc = by_ticker.entry(lot.ticker.clone()).or_insert_with(|| {
            order.push(lot.ticker.clone());
            Acc { shares: 0, cost: 0.0 }
        });
        acc.shares += lot.shares;
        acc.cost += lot.shares as f64 * lot.purchase_price;
    }

    order
        .into_iter()
        .filter_map(|ticker| {
            let acc = by_ticker.remove(&ticker)?;
            // shares > 0 holds for every stored lot, but guard the division
            if acc.shares <= 0 {
                return None;
            }
            Some(Position {
                ticker,
                avg_cost: acc.cost / acc.shares as f64,
                total_shares: acc.shares,
            })
        })
        .collect()
}

/// Loads and aggregates a user's positions. `NotFound` when the user id does
/// not resolve.
pub async fn positions_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Position>, AppError> {
    if !db::user_queries::exists(pool, user_id).await? {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }
    let lots = db::lot_queries::fetch_all_for_user(pool, user_id).await?;
    Ok(aggregate_positions(&lots))
}

/// Records one purchase lot. Inputs arrive as raw strings and are rejected
/// before any persistence when non-numeric or non-positive.
pub async fn add_lot(
    pool: &PgPool,
    user_id: Uuid,
    ticker: &str,
    shares_input: &str,
    price_input: &str,
) -> Result<MutationOutcome, AppError> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::Validation("Ticker cannot be empty".into()));
    }
    let shares = ShareCount::parse(shares_input).map_err(AppError::Validation)?;
    let price = UnitPrice::parse(price_input).map_err(AppError::Validation)?;

    if !db::user_queries::exists(pool, user_id).await? {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    let lot = db::lot_queries::insert(pool, user_id, &ticker, shares.get(), price.get()).await?;
    info!(
        "Recorded lot for user {}: {} x{} @ {}",
        user_id, lot.ticker, lot.shares, lot.purchase_price
    );

    Ok(MutationOutcome {
        success: true,
        message: format!(
            "'{}' ({} shares at {:.2}) added to your portfolio",
            lot.ticker, lot.shares, lot.purchase_price
        ),
    })
}

/// Removes every lot of a ticker for the user, all-or-nothing.
pub async fn remove_ticker(
    pool: &PgPool,
    user_id: Uuid,
    ticker: &str,
) -> Result<MutationOutcome, AppError> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::Validation("Ticker cannot be empty".into()));
    }

    if !db::user_queries::exists(pool, user_id).await? {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    let removed = db::lot_queries::delete_for_ticker(pool, user_id, &ticker).await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!(
            "No lots of '{}' in your portfolio",
            ticker
        )));
    }

    info!("Removed {} lot(s) of {} for user {}", removed, ticker, user_id);
    Ok(MutationOutcome {
        success: true,
        message: format!("'{}' removed from your portfolio ({} lots)", ticker, removed),
    })
}
