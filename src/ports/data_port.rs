//! Data access port trait.
//!
//! Prices come from an external market data provider and signals from an
//! external classifier; both reach the domain only through this trait.

use crate::domain::error::TradelabError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Signal;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `ticker` within `[start_date, end_date]`, oldest first.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TradelabError>;

    /// One signal per date in `dates`, in the same order. A date with no
    /// signal is an error, never a silent Hold.
    fn fetch_signals(&self, ticker: &str, dates: &[NaiveDate]) -> Result<Vec<Signal>, TradelabError>;
}
