//! CSV file data adapter.
//!
//! Prices live at `<base>/<TICKER>.csv` and predicted signals at
//! `<base>/<TICKER>_signals.csv`. The same adapter writes label and equity
//! files for the external trainer and plotter.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradelabError;
use crate::domain::execution::Position;
use crate::domain::labeler::LabeledSeries;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::signal::Signal;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn prices_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn signals_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}_signals.csv", ticker))
    }

    fn read(path: &Path) -> Result<String, TradelabError> {
        fs::read_to_string(path).map_err(|e| TradelabError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

fn field<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str, TradelabError> {
    record.get(index).ok_or_else(|| TradelabError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_number(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, TradelabError> {
    field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| TradelabError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_record_date(record: &csv::StringRecord) -> Result<NaiveDate, TradelabError> {
    let date_str = field(record, 0, "date")?;
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| TradelabError::Data {
        reason: format!("invalid date format: {}", e),
    })
}

fn csv_error(e: csv::Error) -> TradelabError {
    TradelabError::Data {
        reason: format!("CSV parse error: {}", e),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TradelabError> {
        let path = self.prices_path(ticker);
        let content = Self::read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(csv_error)?;
            let date = parse_record_date(&record)?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: parse_number(&record, 1, "open")?,
                high: parse_number(&record, 2, "high")?,
                low: parse_number(&record, 3, "low")?,
                close: parse_number(&record, 4, "close")?,
                volume: parse_number(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        tracing::debug!(ticker, bars = bars.len(), path = %path.display(), "loaded prices");
        PriceSeries::new(bars)
    }

    fn fetch_signals(&self, ticker: &str, dates: &[NaiveDate]) -> Result<Vec<Signal>, TradelabError> {
        let path = self.signals_path(ticker);
        let content = Self::read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut by_date: HashMap<NaiveDate, Signal> = HashMap::new();

        for result in rdr.records() {
            let record = result.map_err(csv_error)?;
            let date = parse_record_date(&record)?;
            let signal: Signal = field(&record, 1, "signal")?.parse()?;
            if by_date.insert(date, signal).is_some() {
                return Err(TradelabError::Data {
                    reason: format!("duplicate signal for {} on {}", ticker, date),
                });
            }
        }

        tracing::debug!(ticker, signals = by_date.len(), path = %path.display(), "loaded signals");

        dates
            .iter()
            .map(|date| {
                by_date.get(date).copied().ok_or_else(|| TradelabError::Data {
                    reason: format!("no signal for {} on {}", ticker, date),
                })
            })
            .collect()
    }
}

/// `date,label` with class codes Hold=0, Buy=1, Sell=2.
pub fn write_labels<P: AsRef<Path>>(path: P, labels: &LabeledSeries) -> Result<(), TradelabError> {
    let mut wtr = csv::Writer::from_path(path.as_ref()).map_err(csv_error)?;
    wtr.write_record(["date", "label"]).map_err(csv_error)?;
    for row in &labels.rows {
        wtr.write_record([row.date.to_string(), row.label.class_code().to_string()])
            .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Per-bar returns, positions and both equity curves. Undefined values are
/// written as empty cells.
pub fn write_equity<P: AsRef<Path>>(path: P, result: &BacktestResult) -> Result<(), TradelabError> {
    let mut wtr = csv::Writer::from_path(path.as_ref()).map_err(csv_error)?;
    wtr.write_record([
        "date",
        "market_return",
        "strategy_return",
        "position",
        "market_equity",
        "strategy_equity",
    ])
    .map_err(csv_error)?;

    let returns = &result.simulation.returns;
    let equity = &result.simulation.equity;
    for (i, date) in result.dates.iter().enumerate() {
        let position = match returns.positions[i] {
            Some(Position::Long) => "1".to_string(),
            Some(Position::Flat) => "0".to_string(),
            None => String::new(),
        };
        wtr.write_record([
            date.to_string(),
            optional_cell(returns.market[i]),
            optional_cell(returns.strategy[i]),
            position,
            optional_cell(equity.market[i]),
            optional_cell(equity.strategy[i]),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}
