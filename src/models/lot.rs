use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// One recorded purchase of shares at a given price. Lots are immutable once
// written and are only ever deleted in bulk, per ticker.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseLot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ticker: String,
    pub shares: i64,
    pub purchase_price: f64,
    pub created_at: DateTime<Utc>,
}

/// POST body for adding a lot. Shares and price arrive as raw strings from
/// the form boundary and are validated through `ShareCount` / `UnitPrice`
/// before anything touches the database.
#[derive(Debug, Clone, Deserialize)]
pub struct AddLotRequest {
    pub ticker: String,
    pub shares: String,
    pub price: String,
}

/// A share count that is known to be a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareCount(i64);

impl ShareCount {
    pub fn parse(input: &str) -> Result<Self, String> {
        let n: i64 = input
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a whole number of shares", input.trim()))?;
        if n <= 0 {
            return Err("Share count must be positive".to_string());
        }
        Ok(Self(n))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

/// A unit price that is known to be a positive, finite decimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPrice(f64);

impl UnitPrice {
    pub fn parse(input: &str) -> Result<Self, String> {
        let p: f64 = input
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid price", input.trim()))?;
        if !p.is_finite() || p <= 0.0 {
            return Err("Price must be positive".to_string());
        }
        Ok(Self(p))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Serialize)]
pub struct MutationOutcome {
    pub success: bool,
    pub message: String,
}
