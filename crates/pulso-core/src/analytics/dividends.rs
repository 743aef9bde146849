//! Trailing dividend total and yield.

use serde::{Deserialize, Serialize};

use crate::{CorporateAction, TradingDate};

pub const DEFAULT_DIVIDEND_LOOKBACK_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendSummary {
    /// Price the yield was computed against; `None` when unknown.
    pub price: Option<f64>,
    pub total_paid: f64,
    /// Percent of `price`.
    pub annual_yield: f64,
    pub events_in_window: usize,
}

impl DividendSummary {
    /// Zeroed summary used when the provider could not be reached.
    pub const fn unavailable() -> Self {
        Self {
            price: None,
            total_paid: 0.0,
            annual_yield: 0.0,
            events_in_window: 0,
        }
    }
}

/// Sums cash dividends with an ex-date inside the trailing window and
/// expresses them as a yield on `price`.
///
/// A missing, zero or non-finite price yields 0 rather than an error.
pub fn aggregate_dividends(
    actions: &[CorporateAction],
    price: Option<f64>,
    today: TradingDate,
    lookback_days: u32,
) -> DividendSummary {
    let window_start = today.days_before(lookback_days);
    let paid: Vec<f64> = actions
        .iter()
        .filter(|action| action.ex_date >= window_start)
        .filter_map(CorporateAction::paid_amount)
        .collect();

    let total_paid: f64 = paid.iter().sum();
    let annual_yield = match price {
        Some(price) if price.is_finite() && price != 0.0 => total_paid / price * 100.0,
        _ => 0.0,
    };

    DividendSummary {
        price,
        total_paid,
        annual_yield,
        events_in_window: paid.len(),
    }
}
