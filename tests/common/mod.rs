#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
pub use tradelab::domain::ohlcv::{OhlcvBar, PriceSeries};
use tradelab::domain::error::TradelabError;
use tradelab::domain::signal::Signal;
use tradelab::ports::data_port::DataPort;

pub struct MockDataPort {
    pub bars: HashMap<String, Vec<OhlcvBar>>,
    pub signals: HashMap<String, HashMap<NaiveDate, Signal>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            signals: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.bars.insert(ticker.to_string(), bars);
        self
    }

    /// Pairs each bar date of `ticker` with the signal at the same position.
    pub fn with_signals(mut self, ticker: &str, signals: &[Signal]) -> Self {
        let dates: Vec<NaiveDate> = self
            .bars
            .get(ticker)
            .map(|bars| bars.iter().map(|b| b.date).collect())
            .unwrap_or_default();
        self.signals.insert(
            ticker.to_string(),
            dates.into_iter().zip(signals.iter().copied()).collect(),
        );
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TradelabError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(TradelabError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self
            .bars
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(bars)
    }

    fn fetch_signals(&self, ticker: &str, dates: &[NaiveDate]) -> Result<Vec<Signal>, TradelabError> {
        let known = self.signals.get(ticker);
        dates
            .iter()
            .map(|d| {
                known
                    .and_then(|m| m.get(d).copied())
                    .ok_or_else(|| TradelabError::Data {
                        reason: format!("no signal for {} on {}", ticker, d),
                    })
            })
            .collect()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close * 0.99,
        high: close * 1.01,
        low: close * 0.98,
        close,
        volume: 1000.0,
    }
}

/// Consecutive daily bars with the given closes, starting 2024-01-01.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        })
        .collect()
}

pub fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(bars_from_closes(closes)).unwrap()
}

pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000.0,
        })
        .collect()
}
