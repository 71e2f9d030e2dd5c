//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradelabError;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        ticker: &str,
        output_path: &str,
    ) -> Result<(), TradelabError>;
}
