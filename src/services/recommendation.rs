use crate::models::Recommendation;

/// Band thresholds for the buy/sell signal, as fractions of the trailing
/// window average. Tunable configuration, not derived values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationThresholds {
    pub buy_below_fraction: f64,
    pub sell_above_fraction: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        // A quarter-magnitude deviation from the 90-day mean is required
        // before recommending action; ordinary volatility stays Hold.
        Self {
            buy_below_fraction: 0.75,
            sell_above_fraction: 1.25,
        }
    }
}

/// Maps (current price, trailing average) to an action signal. Pure; both
/// band boundaries are exclusive.
pub fn classify(
    current: Option<f64>,
    window_average: Option<f64>,
    thresholds: &RecommendationThresholds,
) -> Recommendation {
    let (Some(current), Some(average)) = (current, window_average) else {
        return Recommendation::NoData;
    };

    if current < thresholds.buy_below_fraction * average {
        Recommendation::Buy
    } else if current > thresholds.sell_above_fraction * average {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}
