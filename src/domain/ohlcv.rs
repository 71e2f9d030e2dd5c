//! OHLCV bars and the chronologically ordered price series.

use chrono::NaiveDate;

use super::error::TradelabError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Prices finite and positive, volume finite and non-negative.
    fn validate(&self, index: usize) -> Result<(), TradelabError> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in prices {
            if !(value.is_finite() && value > 0.0) {
                return Err(TradelabError::invalid_parameter(
                    name,
                    format!("{} at index {} must be positive, got {}", name, index, value),
                ));
            }
        }
        if !(self.volume.is_finite() && self.volume >= 0.0) {
            return Err(TradelabError::invalid_parameter(
                "volume",
                format!("volume at index {} must be non-negative, got {}", index, self.volume),
            ));
        }
        Ok(())
    }
}

/// Bars indexed 0..N-1 in strictly increasing date order.
///
/// Index order is chronological order; every labelling and simulation step
/// relies on it, so construction is the only place ordering is checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, TradelabError> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate(i)?;
        }
        if let Some(pos) = bars.windows(2).position(|w| w[1].date <= w[0].date) {
            return Err(TradelabError::UnorderedSeries { index: pos + 1 });
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn close(&self, index: usize) -> f64 {
        self.bars[index].close
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Split into `[0, index)` and `[index, N)`. Both halves keep ordering.
    pub fn split_at(&self, index: usize) -> (PriceSeries, PriceSeries) {
        let index = index.min(self.bars.len());
        let (head, tail) = self.bars.split_at(index);
        (
            PriceSeries {
                bars: head.to_vec(),
            },
            PriceSeries {
                bars: tail.to_vec(),
            },
        )
    }
}
