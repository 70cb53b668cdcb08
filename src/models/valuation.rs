use serde::Serialize;

/// Three-way action signal plus the no-data case for symbols the provider
/// could not price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
    NoData,
}

/// One valued portfolio row: an aggregated position joined with whatever
/// quote data the gateway could obtain for it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValuedRow {
    pub ticker: String,
    pub name: String,
    pub shares: i64,
    pub avg_cost: f64,
    pub cost_basis: f64,
    /// 0.0 when the current price is absent: the position is valued as
    /// worthless pending data, not dropped from the report.
    pub market_value: f64,
    pub window_average: Option<f64>,
    pub current_price: Option<f64>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PortfolioTotals {
    pub cost_basis: f64,
    pub market_value: f64,
    pub gain_abs: f64,
    /// 0.0 when cost basis is 0, to avoid dividing by zero.
    pub gain_pct: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValuationReport {
    pub rows: Vec<ValuedRow>,
    pub totals: PortfolioTotals,
    pub status_message: String,
}
