use sqlx::PgPool;
use uuid::Uuid;

use crate::models::PurchaseLot;

pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    ticker: &str,
    shares: i64,
    purchase_price: f64,
) -> Result<PurchaseLot, sqlx::Error> {
    sqlx::query_as::<_, PurchaseLot>(
        "INSERT INTO purchase_lots (id, user_id, ticker, shares, purchase_price)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, user_id, ticker, shares, purchase_price, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(ticker)
    .bind(shares)
    .bind(purchase_price)
    .fetch_one(pool)
    .await
}

/// All of a user's lots, oldest first. Insertion order drives the
/// first-seen ticker ordering of the valuation report, so it must be stable.
pub async fn fetch_all_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PurchaseLot>, sqlx::Error> {
    sqlx::query_as::<_, PurchaseLot>(
        "SELECT id, user_id, ticker, shares, purchase_price, created_at
         FROM purchase_lots
         WHERE user_id = $1
         ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Deletes every lot of the ticker for that user in one statement.
pub async fn delete_for_ticker(
    pool: &PgPool,
    user_id: Uuid,
    ticker: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM purchase_lots WHERE user_id = $1 AND ticker = $2")
        .bind(user_id)
        .bind(ticker)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
