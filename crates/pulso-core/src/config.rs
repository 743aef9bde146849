//! Dashboard configuration.
//!
//! Every tunable lives in [`DashboardConfig`]. A JSON file may override any
//! subset of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::YahooSettings;
use crate::analytics::dividends::DEFAULT_DIVIDEND_LOOKBACK_DAYS;
use crate::analytics::sentiment::DEFAULT_HEADLINE_CAP;
use crate::analytics::{MomentumParams, SentimentLexicon, SentimentThresholds, TrendParams};
use crate::cache::CacheTtls;
use crate::error::ConfigError;
use crate::{ValidationError, DEFAULT_REGIONAL_SUFFIX};

const DEFAULT_WATCHLIST: &[&str] = &[
    "PETR4", "VALE3", "ITUB4", "BBDC4", "BBAS3", "MGLU3", "VIIA3", "HAPV3", "WEGE3", "RENT3",
    "PRIO3", "SUZB3", "GGBR4", "CSNA3", "ELET3",
];

/// Search query used for headlines; `{symbol}` is replaced by the display
/// ticker.
pub const DEFAULT_HEADLINE_QUERY: &str = "\"Fato Relevante\" {symbol} OR notícias {symbol} B3";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Raw tickers; each is qualified with `regional_suffix` before use.
    pub watchlist: Vec<String>,
    pub regional_suffix: String,
    pub mover_list_size: usize,
    pub trend: TrendParams,
    pub momentum: MomentumParams,
    pub trend_chart_points: usize,
    pub momentum_chart_points: usize,
    pub dividend_lookback_days: u32,
    pub headline_cap: usize,
    pub headline_query: String,
    pub sentiment_thresholds: SentimentThresholds,
    pub lexicon: SentimentLexicon,
    /// Minimum populated fundamentals fields for a symbol to count as known.
    pub min_snapshot_fields: usize,
    pub cache: CacheTtls,
    pub provider: YahooSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            watchlist: DEFAULT_WATCHLIST.iter().map(|t| (*t).to_owned()).collect(),
            regional_suffix: DEFAULT_REGIONAL_SUFFIX.to_owned(),
            mover_list_size: 5,
            trend: TrendParams::default(),
            momentum: MomentumParams::default(),
            trend_chart_points: 252,
            momentum_chart_points: 60,
            dividend_lookback_days: DEFAULT_DIVIDEND_LOOKBACK_DAYS,
            headline_cap: DEFAULT_HEADLINE_CAP,
            headline_query: DEFAULT_HEADLINE_QUERY.to_owned(),
            sentiment_thresholds: SentimentThresholds::default(),
            lexicon: SentimentLexicon::default(),
            min_snapshot_fields: 5,
            cache: CacheTtls::default(),
            provider: YahooSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Defaults when `path` is `None`, otherwise the file merged over them.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.watchlist.is_empty() {
            return Err(ValidationError::EmptyWindow { field: "watchlist" });
        }
        let windows = [
            ("mover_list_size", self.mover_list_size),
            ("trend.window", self.trend.window),
            ("momentum.period", self.momentum.period),
            ("headline_cap", self.headline_cap),
        ];
        if let Some(&(field, _)) = windows.iter().find(|(_, value)| *value == 0) {
            return Err(ValidationError::EmptyWindow { field });
        }
        if self.dividend_lookback_days == 0 {
            return Err(ValidationError::EmptyWindow {
                field: "dividend_lookback_days",
            });
        }

        let bounds = [
            ("trend.band_pct", self.trend.band_pct),
            ("momentum.overbought", self.momentum.overbought),
            ("momentum.oversold", self.momentum.oversold),
            (
                "sentiment_thresholds.optimistic_above",
                self.sentiment_thresholds.optimistic_above,
            ),
            (
                "sentiment_thresholds.pessimistic_below",
                self.sentiment_thresholds.pessimistic_below,
            ),
        ];
        if let Some(&(field, _)) = bounds.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ValidationError::NonFiniteValue { field });
        }
        if self.trend.band_pct < 0.0 {
            return Err(ValidationError::NegativeValue {
                field: "trend.band_pct",
            });
        }
        if self.momentum.oversold >= self.momentum.overbought {
            return Err(ValidationError::InvertedBounds {
                lower: "momentum.oversold",
                upper: "momentum.overbought",
            });
        }
        if self.sentiment_thresholds.pessimistic_below > self.sentiment_thresholds.optimistic_above
        {
            return Err(ValidationError::InvertedBounds {
                lower: "sentiment_thresholds.pessimistic_below",
                upper: "sentiment_thresholds.optimistic_above",
            });
        }
        Ok(())
    }

    /// Headline query for a display ticker.
    pub fn headline_query_for(&self, display_symbol: &str) -> String {
        self.headline_query.replace("{symbol}", display_symbol)
    }
}
