//! Day-over-day mover ranking for the watchlist basket.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, Symbol, TradingDate};

/// Number of sessions the ranking looks at.
pub const BASKET_SESSIONS: usize = 2;

/// Closes of one symbol aligned to the basket's sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketColumn {
    pub symbol: Symbol,
    pub closes: Vec<Option<f64>>,
}

/// Session-aligned close table for a basket of symbols.
///
/// Non-finite closes are stored as missing and columns with no close at all
/// are dropped, so a symbol the provider returned nothing for never shows up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseBasket {
    sessions: Vec<TradingDate>,
    columns: Vec<BasketColumn>,
}

impl CloseBasket {
    pub fn new(sessions: Vec<TradingDate>, columns: Vec<BasketColumn>) -> Self {
        let width = sessions.len();
        let columns = columns
            .into_iter()
            .map(|mut column| {
                column.closes.resize(width, None);
                for close in &mut column.closes {
                    if close.is_some_and(|value| !value.is_finite()) {
                        *close = None;
                    }
                }
                column
            })
            .filter(|column| column.closes.iter().any(Option::is_some))
            .collect();

        Self { sessions, columns }
    }

    /// Aligns per-symbol histories on the union of their dates and keeps the
    /// trailing `max_sessions` sessions.
    pub fn from_series(series: &[PriceSeries], max_sessions: usize) -> Self {
        let all_dates: BTreeSet<TradingDate> = series
            .iter()
            .flat_map(|history| history.points().iter().map(|point| point.date))
            .collect();
        let skip = all_dates.len().saturating_sub(max_sessions);
        let sessions: Vec<TradingDate> = all_dates.into_iter().skip(skip).collect();

        let columns = series
            .iter()
            .map(|history| BasketColumn {
                symbol: history.symbol.clone(),
                closes: sessions
                    .iter()
                    .map(|date| history.close_on(*date))
                    .collect(),
            })
            .collect();

        Self::new(sessions, columns)
    }

    pub fn sessions(&self) -> &[TradingDate] {
        &self.sessions
    }

    pub fn columns(&self) -> &[BasketColumn] {
        &self.columns
    }
}

/// Ranked row: display symbol, last close and day change in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverRow {
    pub symbol: String,
    pub qualified: Symbol,
    pub price: f64,
    pub percent_change: f64,
}

/// Result of one ranking cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoverBoard {
    /// Every ranked symbol in basket order.
    pub rows: Vec<MoverRow>,
    pub gainers: Vec<MoverRow>,
    pub losers: Vec<MoverRow>,
}

impl MoverBoard {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ranks the basket's movers.
///
/// With a single session every change is flat (0%); with none the board is
/// empty. Symbols missing either close are dropped rather than zero-filled.
pub fn rank_movers(basket: &CloseBasket, list_size: usize, suffix: &str) -> MoverBoard {
    let session_count = basket.sessions().len();
    if session_count == 0 {
        return MoverBoard::default();
    }

    let last = session_count - 1;
    let rows: Vec<MoverRow> = basket
        .columns()
        .iter()
        .filter_map(|column| {
            let price = column.closes[last]?;
            let percent_change = if session_count == 1 {
                0.0
            } else {
                let prior = column.closes[last - 1]?;
                (price / prior - 1.0) * 100.0
            };

            if !percent_change.is_finite() {
                return None;
            }

            Some(MoverRow {
                symbol: column.symbol.display(suffix),
                qualified: column.symbol.clone(),
                price,
                percent_change,
            })
        })
        .collect();

    let mut gainers: Vec<MoverRow> = rows
        .iter()
        .filter(|row| row.percent_change > 0.0)
        .cloned()
        .collect();
    gainers.sort_by(|a, b| b.percent_change.total_cmp(&a.percent_change));
    gainers.truncate(list_size);

    let mut losers: Vec<MoverRow> = rows
        .iter()
        .filter(|row| row.percent_change < 0.0)
        .cloned()
        .collect();
    losers.sort_by(|a, b| a.percent_change.total_cmp(&b.percent_change));
    losers.truncate(list_size);

    MoverBoard {
        rows,
        gainers,
        losers,
    }
}
