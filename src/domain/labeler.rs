//! Forward-return labelling of a price series into training targets.
//!
//! A bar's label looks `horizon` bars ahead, so the last `horizon` bars have
//! no label and are dropped from the output rather than defaulted.

use chrono::NaiveDate;

use super::error::TradelabError;
use super::ohlcv::PriceSeries;
use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelConfig {
    pub horizon: usize,
    pub threshold: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            horizon: 5,
            threshold: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBar {
    /// Position of the bar in the source series.
    pub index: usize,
    pub date: NaiveDate,
    pub label: Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries {
    pub horizon: usize,
    pub threshold: f64,
    pub rows: Vec<LabeledBar>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub hold: usize,
    pub buy: usize,
    pub sell: usize,
}

impl LabeledSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> Vec<Signal> {
        self.rows.iter().map(|r| r.label).collect()
    }

    pub fn class_counts(&self) -> ClassCounts {
        let mut counts = ClassCounts::default();
        for row in &self.rows {
            match row.label {
                Signal::Hold => counts.hold += 1,
                Signal::Buy => counts.buy += 1,
                Signal::Sell => counts.sell += 1,
            }
        }
        counts
    }
}

/// close[t + horizon] / close[t] - 1, or `None` where t + horizon is past the end.
pub fn future_returns(prices: &PriceSeries, horizon: usize) -> Vec<Option<f64>> {
    let n = prices.len();
    (0..n)
        .map(|t| {
            let ahead = t.checked_add(horizon)?;
            if ahead < n {
                Some(prices.close(ahead) / prices.close(t) - 1.0)
            } else {
                None
            }
        })
        .collect()
}

/// Strict inequalities: a return of exactly `±threshold` is Hold.
pub fn classify(future_return: f64, threshold: f64) -> Signal {
    if future_return > threshold {
        Signal::Buy
    } else if future_return < -threshold {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

pub fn label(
    prices: &PriceSeries,
    horizon: usize,
    threshold: f64,
) -> Result<LabeledSeries, TradelabError> {
    if horizon == 0 {
        return Err(TradelabError::invalid_parameter(
            "horizon",
            "horizon must be positive",
        ));
    }
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(TradelabError::invalid_parameter(
            "threshold",
            format!("threshold must be a positive number, got {}", threshold),
        ));
    }
    if prices.len() <= horizon {
        return Err(TradelabError::InsufficientData {
            required: horizon + 1,
            actual: prices.len(),
        });
    }

    let bars = prices.bars();
    let rows = future_returns(prices, horizon)
        .into_iter()
        .enumerate()
        .filter_map(|(index, ret)| {
            ret.map(|r| LabeledBar {
                index,
                date: bars[index].date,
                label: classify(r, threshold),
            })
        })
        .collect();

    Ok(LabeledSeries {
        horizon,
        threshold,
        rows,
    })
}

pub fn label_with(prices: &PriceSeries, config: &LabelConfig) -> Result<LabeledSeries, TradelabError> {
    label(prices, config.horizon, config.threshold)
}
