//! Backtest orchestration: simulate, then summarize.
//!
//! BacktestConfig collects the labelling, split and execution parameters of a run.

use chrono::NaiveDate;

use super::error::TradelabError;
use super::execution::ExecutionLag;
use super::labeler::LabelConfig;
use super::metrics::{summarize, BenchmarkComparison, PerformanceSummary, RiskStats};
use super::ohlcv::PriceSeries;
use super::signal::Signal;
use super::simulator::{simulate_with_lag, Simulation};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub labels: LabelConfig,
    pub train_fraction: f64,
    pub execution_lag: ExecutionLag,
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            labels: LabelConfig::default(),
            train_fraction: 0.8,
            execution_lag: ExecutionLag::NEXT_BAR,
            risk_free_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub dates: Vec<NaiveDate>,
    pub simulation: Simulation,
    pub summary: PerformanceSummary,
    pub risk: RiskStats,
    pub benchmark: BenchmarkComparison,
}

pub fn run_backtest(
    prices: &PriceSeries,
    signals: &[Signal],
    config: &BacktestConfig,
) -> Result<BacktestResult, TradelabError> {
    let simulation = simulate_with_lag(prices, signals, config.execution_lag)?;
    let summary = summarize(&simulation.equity.strategy, &simulation.returns.strategy)?;
    let risk = RiskStats::compute(&simulation, config.risk_free_rate);
    let benchmark = BenchmarkComparison::compute(&simulation.equity)?;

    Ok(BacktestResult {
        dates: prices.dates(),
        simulation,
        summary,
        risk,
        benchmark,
    })
}
