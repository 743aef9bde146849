//! Long-window simple moving average trend filter.

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, SeriesPoint, TradingDate};

pub const DEFAULT_TREND_WINDOW: usize = 252;
pub const DEFAULT_TREND_BAND_PCT: f64 = 1.0;

/// Window and neutral band of the trend filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendParams {
    pub window: usize,
    /// Half-width of the neutral band around the average, in percent.
    pub band_pct: f64,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_TREND_WINDOW,
            band_pct: DEFAULT_TREND_BAND_PCT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendClassification {
    Uptrend,
    Downtrend,
    Neutral,
    Insufficient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub classification: TrendClassification,
    pub window: usize,
    pub latest_price: Option<f64>,
    pub latest_average: Option<f64>,
    pub percent_deviation: Option<f64>,
    /// Rolling average aligned to the input dates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub average: Vec<SeriesPoint>,
}

impl TrendSignal {
    fn insufficient(window: usize, latest_price: Option<f64>) -> Self {
        Self {
            classification: TrendClassification::Insufficient,
            window,
            latest_price,
            latest_average: None,
            percent_deviation: None,
            average: Vec::new(),
        }
    }
}

/// Simple moving average; `None` until a full window is available.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|index| {
            if index + 1 < window {
                return None;
            }
            let sum: f64 = values[index + 1 - window..=index].iter().sum();
            let mean = sum / window as f64;
            mean.is_finite().then_some(mean)
        })
        .collect()
}

pub fn trend_signal(series: &PriceSeries, params: TrendParams) -> TrendSignal {
    let latest_price = series.last().map(|point| point.close);
    if params.window == 0 || series.len() < params.window {
        return TrendSignal::insufficient(params.window, latest_price);
    }

    let closes = series.closes();
    let averages = rolling_mean(&closes, params.window);
    let (Some(price), Some(Some(average))) = (latest_price, averages.last().copied()) else {
        return TrendSignal::insufficient(params.window, latest_price);
    };
    if average == 0.0 {
        return TrendSignal::insufficient(params.window, latest_price);
    }

    let band = params.band_pct / 100.0;
    let classification = if price > average * (1.0 + band) {
        TrendClassification::Uptrend
    } else if price < average * (1.0 - band) {
        TrendClassification::Downtrend
    } else {
        TrendClassification::Neutral
    };

    let average_series = series
        .points()
        .iter()
        .zip(averages)
        .map(|(point, value)| SeriesPoint {
            date: point.date,
            value,
        })
        .collect();

    TrendSignal {
        classification,
        window: params.window,
        latest_price: Some(price),
        latest_average: Some(average),
        percent_deviation: Some((price / average - 1.0) * 100.0),
        average: average_series,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendChartPoint {
    pub date: TradingDate,
    pub close: f64,
    pub average: f64,
}

/// Close and average pairs for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendChart {
    pub points: Vec<TrendChartPoint>,
}

/// Trailing `count` sessions that have a defined average.
pub fn trend_chart(series: &PriceSeries, signal: &TrendSignal, count: usize) -> TrendChart {
    let defined: Vec<TrendChartPoint> = series
        .points()
        .iter()
        .zip(&signal.average)
        .filter_map(|(point, average)| {
            average.value.map(|value| TrendChartPoint {
                date: point.date,
                close: point.close,
                average: value,
            })
        })
        .collect();

    let start = defined.len().saturating_sub(count);
    TrendChart {
        points: defined[start..].to_vec(),
    }
}
