//! # Analytics
//!
//! Pure pipeline components. None of them perform I/O; identical inputs
//! always produce identical outputs, which is what makes caching at the
//! provider boundary valid.
//!
//! | Module | Output |
//! |--------|--------|
//! | [`movers`] | [`MoverBoard`] of top gainers and losers |
//! | [`trend`] | [`TrendSignal`] from a long simple moving average |
//! | [`momentum`] | [`MomentumSignal`] from the relative strength oscillator |
//! | [`dividends`] | [`DividendSummary`] over a trailing window |
//! | [`sentiment`] | [`ScoredHeadline`]s and a [`SentimentSummary`] |
//! | [`format`] | Display strings with an `N/A` fallback |

pub mod dividends;
pub mod format;
pub mod momentum;
pub mod movers;
pub mod sentiment;
pub mod trend;

pub use dividends::{aggregate_dividends, DividendSummary};
pub use format::{format_value, DecimalStyle, NumberFormat, ValueKind, NOT_APPLICABLE};
pub use momentum::{
    momentum_chart, momentum_signal, relative_strength_index, MomentumChart,
    MomentumClassification, MomentumParams, MomentumSignal,
};
pub use movers::{rank_movers, BasketColumn, CloseBasket, MoverBoard, MoverRow};
pub use sentiment::{
    score_headlines, summarize, HeadlineTone, ScoredHeadline, SentimentClassification,
    SentimentLexicon, SentimentSummary, SentimentThresholds,
};
pub use trend::{
    rolling_mean, trend_chart, trend_signal, TrendChart, TrendClassification, TrendParams,
    TrendSignal,
};
