use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{CorporateAction, FundamentalsSnapshot, HeadlineRecord, PriceSeries, Symbol};

/// Boxed future returned by provider contracts.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    NotFound,
    Internal,
}

/// Structured provider error. Callers decide between fail-soft defaults and
/// hard failures; the message is for logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// How much daily history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookback {
    /// The last two sessions, used for the mover basket.
    TwoDays,
    /// Two calendar years, enough to warm up the long trend window.
    TwoYears,
}

impl Lookback {
    /// Yahoo chart `range` parameter covering the lookback.
    pub fn range_param(self) -> &'static str {
        match self {
            Self::TwoDays => "2d",
            Self::TwoYears => "2y",
        }
    }

    pub fn as_key(self) -> String {
        match self {
            Self::TwoDays => String::from("2d"),
            Self::TwoYears => String::from("2y"),
        }
    }
}

/// Request payload for daily close history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClosesRequest {
    pub symbols: Vec<Symbol>,
    pub lookback: Lookback,
}

impl DailyClosesRequest {
    pub fn new(symbols: Vec<Symbol>, lookback: Lookback) -> Result<Self, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "daily closes request must include at least one symbol",
            ));
        }
        Ok(Self { symbols, lookback })
    }
}

/// Request payload for headline search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineRequest {
    pub query: String,
    pub limit: usize,
}

impl HeadlineRequest {
    pub fn new(query: impl Into<String>, limit: usize) -> Result<Self, SourceError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SourceError::invalid_request(
                "headline query must not be empty",
            ));
        }
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "headline request limit must be greater than zero",
            ));
        }
        Ok(Self { query, limit })
    }
}

/// Quote and fundamentals provider contract.
pub trait MarketDataSource: Send + Sync {
    /// One series per requested symbol the provider knows; unknown symbols are
    /// omitted rather than failing the whole batch.
    fn daily_closes<'a>(&'a self, req: DailyClosesRequest) -> SourceFuture<'a, Vec<PriceSeries>>;

    fn corporate_actions<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Vec<CorporateAction>>;

    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, FundamentalsSnapshot>;

    /// Most recent traded price, if the provider has one.
    fn last_price<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Option<f64>>;
}

/// Headline search provider contract.
pub trait HeadlineSource: Send + Sync {
    /// Most recent first.
    fn headlines<'a>(&'a self, req: HeadlineRequest) -> SourceFuture<'a, Vec<HeadlineRecord>>;
}
