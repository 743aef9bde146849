//! # Domain Models
//!
//! Value types shared by the providers, the analytics pipeline and the CLI.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, provider-qualified ticker |
//! | [`TradingDate`] | Session date serialized as `YYYY-MM-DD` |
//! | [`PriceSeries`] | Daily closes, strictly increasing by date |
//! | [`SeriesPoint`] | Indicator value aligned to a session date |
//! | [`CorporateAction`] | Dividend/split event keyed by ex-date |
//! | [`FundamentalsSnapshot`] | Valuation multiples and live price |
//! | [`HeadlineRecord`] | Search result headline |
//!
//! Symbols entered by users go through [`symbol::qualify`] first, which
//! appends the regional suffix to bare B3 tickers.

mod date;
mod models;
pub mod symbol;

pub use date::TradingDate;
pub use models::{
    CorporateAction, CorporateActionKind, FundamentalsSnapshot, HeadlineRecord, PricePoint,
    PriceSeries, SeriesPoint,
};
pub use symbol::{Symbol, DEFAULT_REGIONAL_SUFFIX};
