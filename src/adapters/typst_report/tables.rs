//! Table formatting for reports.
//!
//! Provides functions to generate Typst markup for:
//! - Run summary (ticker, dates, execution lag)
//! - Performance summary and supplementary risk statistics
//! - Strategy against buy-and-hold benchmark

use chrono::NaiveDate;

use crate::domain::metrics::{BenchmarkComparison, PerformanceSummary, RiskStats};

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn render_run_summary(ticker: &str, dates: &[NaiveDate], lag_bars: usize) -> String {
    let period = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "n/a".to_string(),
    };
    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 2,\n");
    output.push_str("  [*Property*], [*Value*],\n");
    output.push_str(&format!("  [Ticker], [{}],\n", ticker));
    output.push_str(&format!("  [Period], [{}],\n", period));
    output.push_str(&format!("  [Bars], [{}],\n", dates.len()));
    output.push_str(&format!("  [Execution lag], [{} bar(s)],\n", lag_bars));
    output.push_str(")\n");
    output
}

pub fn render_metrics_table(summary: &PerformanceSummary, risk: &RiskStats) -> String {
    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 2,\n");
    output.push_str("  [*Metric*], [*Value*],\n");
    output.push_str(&format!("  [Total Strategy Return], [{}],\n", pct(summary.total_return)));
    output.push_str(&format!("  [Max Drawdown], [{}],\n", pct(summary.max_drawdown)));
    output.push_str(&format!("  [Win Rate], [{}],\n", pct(summary.win_rate)));
    output.push_str(&format!("  [Annualized Return], [{}],\n", pct(risk.annualized_return)));
    output.push_str(&format!("  [Sharpe Ratio], [{:.2}],\n", risk.sharpe_ratio));
    output.push_str(&format!("  [Sortino Ratio], [{:.2}],\n", risk.sortino_ratio));
    output.push_str(&format!(
        "  [Max Drawdown Duration], [{} bars],\n",
        risk.max_drawdown_duration
    ));
    output.push_str(&format!("  [Exposure], [{}],\n", pct(risk.exposure)));
    output.push_str(")\n");
    output
}

pub fn render_benchmark_table(benchmark: &BenchmarkComparison) -> String {
    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 2,\n");
    output.push_str("  [*Benchmark*], [*Value*],\n");
    output.push_str(&format!(
        "  [Buy & Hold Return], [{}],\n",
        pct(benchmark.market_total_return)
    ));
    output.push_str(&format!(
        "  [Buy & Hold Max Drawdown], [{}],\n",
        pct(benchmark.market_max_drawdown)
    ));
    output.push_str(&format!(
        "  [Strategy Return], [{}],\n",
        pct(benchmark.strategy_total_return)
    ));
    output.push_str(&format!("  [Excess Return], [{}],\n", pct(benchmark.excess_return)));
    output.push_str(")\n");
    output
}
