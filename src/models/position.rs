use serde::Serialize;

// Aggregated holding in one ticker across all of a user's lots. Derived on
// every valuation request, never persisted. total_shares is always > 0: a
// ticker with no lots simply has no position.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Position {
    pub ticker: String,
    pub total_shares: i64,
    pub avg_cost: f64,
}

impl Position {
    pub fn cost_basis(&self) -> f64 {
        self.total_shares as f64 * self.avg_cost
    }
}
