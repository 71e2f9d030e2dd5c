//! Chronological train/test split. Rows are never shuffled: training data
//! always precedes test data in time.

use super::error::TradelabError;
use super::ohlcv::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPoint {
    /// First test index; `[0, index)` trains, `[index, len)` tests.
    pub index: usize,
    pub len: usize,
}

impl SplitPoint {
    pub fn train_len(&self) -> usize {
        self.index
    }

    pub fn test_len(&self) -> usize {
        self.len - self.index
    }
}

pub fn chronological_split(len: usize, train_fraction: f64) -> Result<SplitPoint, TradelabError> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(TradelabError::invalid_parameter(
            "train_fraction",
            format!("train_fraction must be between 0 and 1, got {}", train_fraction),
        ));
    }
    let index = (len as f64 * train_fraction) as usize;
    if index == 0 || index >= len {
        return Err(TradelabError::InsufficientData {
            required: minimum_len(train_fraction),
            actual: len,
        });
    }
    Ok(SplitPoint { index, len })
}

// Smallest length leaving at least one row on each side.
fn minimum_len(train_fraction: f64) -> usize {
    (2..)
        .find(|&n| {
            let index = (n as f64 * train_fraction) as usize;
            index > 0 && index < n
        })
        .unwrap_or(2)
}

pub fn split_prices(
    prices: &PriceSeries,
    train_fraction: f64,
) -> Result<(PriceSeries, PriceSeries), TradelabError> {
    let point = chronological_split(prices.len(), train_fraction)?;
    Ok(prices.split_at(point.index))
}
