use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate};

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: TradingDate,
    pub close: f64,
}

impl PricePoint {
    pub const fn new(date: TradingDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Value of a derived series aligned to an input date; `None` while the
/// indicator is still warming up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: TradingDate,
    pub value: Option<f64>,
}

/// Daily close history for one symbol, strictly increasing by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, sorting by date, dropping non-finite closes and
    /// keeping the last close seen for a repeated date.
    pub fn new(symbol: Symbol, mut points: Vec<PricePoint>) -> Self {
        points.retain(|point| point.close.is_finite());
        points.sort_by_key(|point| point.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            symbol,
            points: deduped,
        }
    }

    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            points: Vec::new(),
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn close_on(&self, date: TradingDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |point| point.date)
            .ok()
            .map(|index| self.points[index].close)
    }
}

/// Canonical corporate action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorporateActionKind {
    Dividend,
    Split,
    Other,
}

/// Corporate action keyed by ex-date. Only dividends carry a cash amount;
/// splits and other events report `None` or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateAction {
    pub ex_date: TradingDate,
    pub kind: CorporateActionKind,
    pub cash_amount: Option<f64>,
}

impl CorporateAction {
    pub fn dividend(ex_date: TradingDate, cash_amount: f64) -> Self {
        Self {
            ex_date,
            kind: CorporateActionKind::Dividend,
            cash_amount: Some(cash_amount),
        }
    }

    pub fn split(ex_date: TradingDate) -> Self {
        Self {
            ex_date,
            kind: CorporateActionKind::Split,
            cash_amount: None,
        }
    }

    /// Positive, finite cash amount, if any.
    pub fn paid_amount(&self) -> Option<f64> {
        self.cash_amount
            .filter(|amount| amount.is_finite() && *amount > 0.0)
    }
}

/// Valuation fields of a provider snapshot. Absent fields stay absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    pub long_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub forward_multiple: Option<f64>,
    pub trailing_multiple: Option<f64>,
    pub price_to_book: Option<f64>,
    pub book_value_per_share: Option<f64>,
    /// Number of populated fields the provider returned for the symbol.
    pub field_count: usize,
}

impl FundamentalsSnapshot {
    /// Forward earnings multiple, falling back to the trailing one.
    pub fn earnings_multiple(&self) -> Option<f64> {
        self.forward_multiple.or(self.trailing_multiple)
    }

    /// Minimum-richness check used to tell a live listing from an unknown
    /// ticker: a live price must be present and the snapshot must not be
    /// nearly empty.
    pub fn is_recognized(&self, min_fields: usize) -> bool {
        self.regular_market_price.is_some() && self.field_count >= min_fields
    }
}

/// Headline as returned by the search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineRecord {
    pub title: String,
    pub source: Option<String>,
    pub published: Option<String>,
    pub url: String,
}
