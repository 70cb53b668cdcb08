use serde::Serialize;

/// Trailing [low, high] price band over one sub-window of the 1-year series.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScreenerEntry {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub three_month: PriceBand,
    pub three_month_avg: f64,
    pub six_month: PriceBand,
    pub one_year: PriceBand,
    pub short_term_buy: bool,
    pub long_term_buy: bool,
}

/// A symbol the screener could not process, with the reason. Collected and
/// returned alongside the entries, never swallowed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScreenerFailure {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenerReport {
    pub market: String,
    pub entries: Vec<ScreenerEntry>,
    pub failures: Vec<ScreenerFailure>,
    pub status_message: String,
}
