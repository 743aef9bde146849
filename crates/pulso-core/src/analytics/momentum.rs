//! Relative strength momentum oscillator.
//!
//! Gains and losses are smoothed with a recursive exponential average
//! (`alpha = 1 / period`) seeded at the first observation, whose difference
//! counts as zero. The oscillator is reported from index `period` onwards.

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, SeriesPoint, TradingDate};

pub const DEFAULT_MOMENTUM_PERIOD: usize = 14;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumParams {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            period: DEFAULT_MOMENTUM_PERIOD,
            overbought: DEFAULT_OVERBOUGHT,
            oversold: DEFAULT_OVERSOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumClassification {
    Overbought,
    Oversold,
    Neutral,
    Insufficient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSignal {
    pub value: Option<f64>,
    pub classification: MomentumClassification,
    pub period: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<SeriesPoint>,
}

impl MomentumSignal {
    /// Trailing `count` oscillator points.
    pub fn tail(&self, count: usize) -> &[SeriesPoint] {
        let start = self.series.len().saturating_sub(count);
        &self.series[start..]
    }
}

/// Oscillator value for every close; `None` during warm-up or when both
/// averages are flat.
pub fn relative_strength_index(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return values;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for index in 1..closes.len() {
        let change = closes[index] - closes[index - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
        avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;

        if index >= period {
            values[index] = oscillator(avg_gain, avg_loss);
        }
    }

    values
}

fn oscillator(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return None;
    }
    if avg_loss == 0.0 {
        return (avg_gain > 0.0).then_some(100.0);
    }

    let relative_strength = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + relative_strength))
}

pub fn momentum_signal(series: &PriceSeries, params: MomentumParams) -> MomentumSignal {
    let insufficient = MomentumSignal {
        value: None,
        classification: MomentumClassification::Insufficient,
        period: params.period,
        series: Vec::new(),
    };
    if params.period == 0 || series.len() < params.period + 1 {
        return insufficient;
    }

    let values = relative_strength_index(&series.closes(), params.period);
    let Some(value) = values.last().copied().flatten() else {
        return insufficient;
    };

    let classification = if value > params.overbought {
        MomentumClassification::Overbought
    } else if value < params.oversold {
        MomentumClassification::Oversold
    } else {
        MomentumClassification::Neutral
    };

    MomentumSignal {
        value: Some(value),
        classification,
        period: params.period,
        series: series
            .points()
            .iter()
            .zip(values)
            .map(|(point, value)| SeriesPoint {
                date: point.date,
                value,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumChartPoint {
    pub date: TradingDate,
    pub value: Option<f64>,
}

/// Trailing oscillator window with its reference lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumChart {
    pub overbought: f64,
    pub oversold: f64,
    pub points: Vec<MomentumChartPoint>,
}

pub fn momentum_chart(signal: &MomentumSignal, params: MomentumParams, count: usize) -> MomentumChart {
    MomentumChart {
        overbought: params.overbought,
        oversold: params.oversold,
        points: signal
            .tail(count)
            .iter()
            .map(|point| MomentumChartPoint {
                date: point.date,
                value: point.value,
            })
            .collect(),
    }
}
