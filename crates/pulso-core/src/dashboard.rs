//! Dashboard orchestration.
//!
//! [`Dashboard`] is the only place that talks to providers. It runs the pure
//! analytics over whatever the providers return and turns provider failures
//! into [`FailSoft::Defaulted`] values, empty series or a [`DashboardError`].

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::YahooAdapter;
use crate::analytics::movers::BASKET_SESSIONS;
use crate::analytics::{
    aggregate_dividends, momentum_chart, momentum_signal, rank_movers, score_headlines, summarize,
    trend_chart, trend_signal, CloseBasket, DividendSummary, MomentumChart, MomentumSignal,
    MoverBoard, ScoredHeadline, SentimentSummary, TrendChart, TrendSignal,
};
use crate::cache::CachedSource;
use crate::config::DashboardConfig;
use crate::data_source::{
    DailyClosesRequest, HeadlineRequest, HeadlineSource, Lookback, MarketDataSource, SourceError,
};
use crate::http_client::HttpClient;
use crate::{FundamentalsSnapshot, PriceSeries, Symbol, TradingDate, ValidationError};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("could not load initial market data: {reason}")]
    MarketDataUnavailable { reason: String },

    #[error("invalid symbol or no data available for '{symbol}'")]
    UnknownSymbol { symbol: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Value computed from provider data, or a default used because the provider
/// failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FailSoft<T> {
    Computed { value: T },
    Defaulted { value: T, reason: String },
}

impl<T> FailSoft<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Computed { value } | Self::Defaulted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Computed { value } | Self::Defaulted { value, .. } => value,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted { .. })
    }

    fn from_result(result: Result<T, SourceError>, what: &str, default: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Self::Computed { value },
            Err(error) => {
                warn!(code = error.code(), %error, "{what} unavailable, using default");
                Self::Defaulted {
                    value: default(),
                    reason: error.to_string(),
                }
            }
        }
    }
}

/// Everything shown for one inspected instrument.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentReport {
    pub symbol: Symbol,
    pub display_symbol: String,
    /// `"<long name> (<TICKER>)"`, or the ticker alone.
    pub display_name: String,
    pub as_of: TradingDate,
    pub fundamentals: FundamentalsSnapshot,
    pub dividends: FailSoft<DividendSummary>,
    pub trend: TrendSignal,
    pub trend_chart: TrendChart,
    pub momentum: MomentumSignal,
    pub momentum_chart: MomentumChart,
    pub headlines: FailSoft<Vec<ScoredHeadline>>,
    pub sentiment: SentimentSummary,
    /// Non-fatal provider problems hit while building the report.
    pub warnings: Vec<String>,
}

pub struct Dashboard {
    market: Arc<dyn MarketDataSource>,
    headlines: Arc<dyn HeadlineSource>,
    config: DashboardConfig,
    evaluation_date: Option<TradingDate>,
}

impl Dashboard {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        headlines: Arc<dyn HeadlineSource>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            market,
            headlines,
            config,
            evaluation_date: None,
        }
    }

    /// Cached Yahoo adapter on `http_client` serving both quotes and headlines.
    /// A mock transport puts the adapter in its offline fixture mode.
    pub fn yahoo(http_client: Arc<dyn HttpClient>, config: DashboardConfig) -> Self {
        let adapter = YahooAdapter::new(http_client, config.provider);
        let source = Arc::new(CachedSource::new(adapter, config.cache));
        Self::new(source.clone(), source, config)
    }

    /// Pins "today" for the dividend window; defaults to the current UTC date.
    pub fn with_evaluation_date(mut self, date: TradingDate) -> Self {
        self.evaluation_date = Some(date);
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn today(&self) -> TradingDate {
        self.evaluation_date.unwrap_or_else(TradingDate::today)
    }

    /// Qualified watchlist symbols in configured order.
    pub fn watchlist(&self) -> Result<Vec<Symbol>, ValidationError> {
        self.config
            .watchlist
            .iter()
            .map(|raw| Symbol::qualified(raw, &self.config.regional_suffix))
            .collect()
    }

    pub async fn movers(&self) -> Result<MoverBoard, DashboardError> {
        let symbols = self.watchlist()?;
        info!(symbols = symbols.len(), "loading mover basket");

        let request = DailyClosesRequest::new(symbols, Lookback::TwoDays).map_err(|error| {
            DashboardError::MarketDataUnavailable {
                reason: error.to_string(),
            }
        })?;
        let series = self.market.daily_closes(request).await.map_err(|error| {
            warn!(code = error.code(), %error, "mover basket fetch failed");
            DashboardError::MarketDataUnavailable {
                reason: error.to_string(),
            }
        })?;

        let basket = CloseBasket::from_series(&series, BASKET_SESSIONS);
        let board = rank_movers(
            &basket,
            self.config.mover_list_size,
            &self.config.regional_suffix,
        );
        if board.is_empty() {
            return Err(DashboardError::MarketDataUnavailable {
                reason: String::from("no watchlist symbol has a usable close"),
            });
        }

        info!(
            rows = board.rows.len(),
            gainers = board.gainers.len(),
            losers = board.losers.len(),
            "ranked movers"
        );
        Ok(board)
    }

    pub async fn inspect(&self, raw: &str) -> Result<InstrumentReport, DashboardError> {
        let suffix = &self.config.regional_suffix;
        let symbol = Symbol::qualified(raw, suffix)?;
        let display_symbol = symbol.display(suffix);
        info!(symbol = %symbol, "inspecting instrument");

        let fundamentals = self.recognize(&symbol).await?;
        let display_name = match &fundamentals.long_name {
            Some(name) if !name.trim().is_empty() => format!("{name} ({display_symbol})"),
            _ => display_symbol.clone(),
        };

        let mut warnings = Vec::new();
        let today = self.today();

        let dividends = FailSoft::from_result(
            self.dividend_summary(&symbol, &fundamentals, today).await,
            "dividends",
            DividendSummary::unavailable,
        );
        if let FailSoft::Defaulted { reason, .. } = &dividends {
            warnings.push(format!("dividends: {reason}"));
        }

        let history = self.history(&symbol, &mut warnings).await;
        let trend = trend_signal(&history, self.config.trend);
        let trend_chart = trend_chart(&history, &trend, self.config.trend_chart_points);
        let momentum = momentum_signal(&history, self.config.momentum);
        let momentum_chart = momentum_chart(
            &momentum,
            self.config.momentum,
            self.config.momentum_chart_points,
        );

        let headlines = FailSoft::from_result(
            self.scored_headlines(&display_symbol).await,
            "headlines",
            Vec::new,
        );
        if let FailSoft::Defaulted { reason, .. } = &headlines {
            warnings.push(format!("headlines: {reason}"));
        }
        let scores: Vec<i32> = headlines.value().iter().map(|item| item.score).collect();
        let sentiment = summarize(&scores, self.config.sentiment_thresholds);

        Ok(InstrumentReport {
            symbol,
            display_symbol,
            display_name,
            as_of: today,
            fundamentals,
            dividends,
            trend,
            trend_chart,
            momentum,
            momentum_chart,
            headlines,
            sentiment,
            warnings,
        })
    }

    async fn recognize(&self, symbol: &Symbol) -> Result<FundamentalsSnapshot, DashboardError> {
        let unknown = || DashboardError::UnknownSymbol {
            symbol: symbol.to_string(),
        };
        match self.market.fundamentals(symbol).await {
            Ok(snapshot) if snapshot.is_recognized(self.config.min_snapshot_fields) => Ok(snapshot),
            Ok(snapshot) => {
                warn!(
                    symbol = %symbol,
                    field_count = snapshot.field_count,
                    has_price = snapshot.regular_market_price.is_some(),
                    "fundamentals snapshot too sparse"
                );
                Err(unknown())
            }
            Err(error) => {
                warn!(symbol = %symbol, code = error.code(), %error, "fundamentals lookup failed");
                Err(unknown())
            }
        }
    }

    async fn dividend_summary(
        &self,
        symbol: &Symbol,
        fundamentals: &FundamentalsSnapshot,
        today: TradingDate,
    ) -> Result<DividendSummary, SourceError> {
        let price = self
            .market
            .last_price(symbol)
            .await?
            .or(fundamentals.regular_market_price);
        let actions = self.market.corporate_actions(symbol).await?;
        Ok(aggregate_dividends(
            &actions,
            price,
            today,
            self.config.dividend_lookback_days,
        ))
    }

    async fn history(&self, symbol: &Symbol, warnings: &mut Vec<String>) -> PriceSeries {
        let fetched = match DailyClosesRequest::new(vec![symbol.clone()], Lookback::TwoYears) {
            Ok(request) => self.market.daily_closes(request).await,
            Err(error) => Err(error),
        };

        match fetched {
            Ok(series) => series
                .into_iter()
                .find(|item| &item.symbol == symbol)
                .unwrap_or_else(|| PriceSeries::empty(symbol.clone())),
            Err(error) => {
                warn!(symbol = %symbol, code = error.code(), %error, "history unavailable, indicators insufficient");
                warnings.push(format!("history: {error}"));
                PriceSeries::empty(symbol.clone())
            }
        }
    }

    async fn scored_headlines(&self, display_symbol: &str) -> Result<Vec<ScoredHeadline>, SourceError> {
        let query = self.config.headline_query_for(display_symbol);
        let request = HeadlineRequest::new(query, self.config.headline_cap)?;
        let records = self.headlines.headlines(request).await?;
        Ok(score_headlines(
            records,
            &self.config.lexicon,
            self.config.headline_cap,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::OfflineHttpClient;

    #[test]
    fn fail_soft_serializes_with_status_tag() {
        let computed: FailSoft<u32> = FailSoft::Computed { value: 3 };
        let defaulted: FailSoft<u32> = FailSoft::Defaulted {
            value: 0,
            reason: String::from("down"),
        };

        assert_eq!(
            serde_json::to_value(&computed).expect("serialize"),
            serde_json::json!({"status": "computed", "value": 3})
        );
        assert_eq!(
            serde_json::to_value(&defaulted).expect("serialize"),
            serde_json::json!({"status": "defaulted", "value": 0, "reason": "down"})
        );
        assert!(defaulted.is_defaulted());
        assert_eq!(defaulted.into_value(), 0);
    }

    #[test]
    fn watchlist_is_qualified_in_order() {
        let dashboard = Dashboard::yahoo(Arc::new(OfflineHttpClient), DashboardConfig::default());
        let symbols = dashboard.watchlist().expect("valid watchlist");
        assert_eq!(symbols.len(), 15);
        assert_eq!(symbols[0].as_str(), "PETR4.SA");
        assert_eq!(symbols[14].as_str(), "ELET3.SA");
    }

    #[tokio::test]
    async fn offline_inspect_builds_full_report() {
        let dashboard = Dashboard::yahoo(Arc::new(OfflineHttpClient), DashboardConfig::default());

        let report = dashboard.inspect(" petr4 ").await.expect("known fixture");
        assert_eq!(report.symbol.as_str(), "PETR4.SA");
        assert_eq!(report.display_symbol, "PETR4");
        assert_eq!(
            report.display_name,
            "Petróleo Brasileiro S.A. - Petrobras (PETR4)"
        );
        assert!(!report.dividends.is_defaulted());
        assert_eq!(report.trend_chart.points.len(), 252);
        assert_eq!(report.momentum_chart.points.len(), 60);
        assert_eq!(report.headlines.value().len(), 7);
        assert_eq!(report.sentiment.headline_count, 7);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn invalid_ticker_text_is_a_validation_error() {
        let dashboard = Dashboard::yahoo(Arc::new(OfflineHttpClient), DashboardConfig::default());
        let error = dashboard.inspect("   ").await.expect_err("must fail");
        assert!(matches!(error, DashboardError::Validation(ValidationError::EmptySymbol)));
    }
}
