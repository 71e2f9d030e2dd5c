//! Performance summary statistics over a simulated strategy.

use super::error::TradelabError;
use super::execution::Position;
use super::simulator::{defined, EquityCurve, Simulation};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSummary {
    pub total_return: f64,
    /// Fractional drawdown from the running peak, always `<= 0`.
    pub max_drawdown: f64,
    pub win_rate: f64,
}

/// Either all three statistics are defined or the call fails.
pub fn summarize(
    equity_strategy: &[Option<f64>],
    returns_strategy: &[Option<f64>],
) -> Result<PerformanceSummary, TradelabError> {
    let total_return = total_return(equity_strategy)?;
    let max_drawdown = max_drawdown(equity_strategy)?;
    let win_rate = win_rate(returns_strategy)?;
    Ok(PerformanceSummary {
        total_return,
        max_drawdown,
        win_rate,
    })
}

pub fn total_return(equity: &[Option<f64>]) -> Result<f64, TradelabError> {
    equity
        .iter()
        .rev()
        .find_map(|e| *e)
        .map(|last| last - 1.0)
        .ok_or(TradelabError::EmptySeries)
}

/// (E[t] - peak[t]) / peak[t] for each defined point, with a causal running peak.
pub fn drawdown_series(equity: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut peak = f64::NEG_INFINITY;
    equity
        .iter()
        .map(|e| {
            e.map(|value| {
                peak = peak.max(value);
                (value - peak) / peak
            })
        })
        .collect()
}

pub fn max_drawdown(equity: &[Option<f64>]) -> Result<f64, TradelabError> {
    defined(&drawdown_series(equity))
        .into_iter()
        .reduce(f64::min)
        .ok_or(TradelabError::EmptySeries)
}

/// count(r > 0) / count(r != 0). Zero-return bars count on neither side.
pub fn win_rate(returns: &[Option<f64>]) -> Result<f64, TradelabError> {
    let mut wins = 0usize;
    let mut nonzero = 0usize;
    for r in returns.iter().flatten() {
        if *r != 0.0 {
            nonzero += 1;
            if *r > 0.0 {
                wins += 1;
            }
        }
    }
    if nonzero == 0 {
        return Err(TradelabError::NoTrades);
    }
    Ok(wins as f64 / nonzero as f64)
}

/// Supplementary risk statistics for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskStats {
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    /// Longest run of consecutive bars spent below a prior peak.
    pub max_drawdown_duration: usize,
    /// Fraction of bars with a decided position that were Long.
    pub exposure: f64,
}

impl RiskStats {
    pub fn compute(simulation: &Simulation, risk_free_rate: f64) -> Self {
        let returns = defined(&simulation.returns.strategy);

        let annualized_return = match total_return(&simulation.equity.strategy) {
            Ok(total) => annualize(total, returns.len()),
            Err(_) => 0.0,
        };

        let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
        let (sharpe_ratio, sortino_ratio) = compute_risk_adjusted(&returns, daily_rf);

        let decided: Vec<Position> = simulation.returns.positions.iter().flatten().copied().collect();
        let exposure = if decided.is_empty() {
            0.0
        } else {
            decided.iter().map(|p| p.exposure()).sum::<f64>() / decided.len() as f64
        };

        RiskStats {
            annualized_return,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown_duration: drawdown_duration(&simulation.equity.strategy),
            exposure,
        }
    }
}

/// Compound growth per year; 0.0 when undefined or too large to represent.
fn annualize(total: f64, periods: usize) -> f64 {
    if periods == 0 || total <= -1.0 {
        return 0.0;
    }
    let years = periods as f64 / TRADING_DAYS_PER_YEAR;
    let annualized = (1.0 + total).powf(1.0 / years) - 1.0;
    if annualized.is_finite() { annualized } else { 0.0 }
}

fn drawdown_duration(equity: &[Option<f64>]) -> usize {
    let mut peak = f64::NEG_INFINITY;
    let mut current = 0usize;
    let mut longest = 0usize;
    for value in equity.iter().flatten() {
        if *value >= peak {
            peak = *value;
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }
    longest
}

fn compute_risk_adjusted(returns: &[f64], daily_rf: f64) -> (f64, f64) {
    if returns.len() < 2 {
        return (0.0, 0.0);
    }

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;

    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let excess_return = mean - daily_rf;

    let sharpe = if stddev > 0.0 {
        (excess_return / stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    let downside_sum: f64 = returns
        .iter()
        .filter(|&&r| r < daily_rf)
        .map(|&r| (r - daily_rf).powi(2))
        .sum();
    let downside_stddev = (downside_sum / n).sqrt();

    let sortino = if downside_stddev > 0.0 {
        (excess_return / downside_stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    (sharpe, sortino)
}

/// Strategy against the buy-and-hold market curve over the same bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkComparison {
    pub market_total_return: f64,
    pub market_max_drawdown: f64,
    pub strategy_total_return: f64,
    pub excess_return: f64,
}

impl BenchmarkComparison {
    pub fn compute(equity: &EquityCurve) -> Result<Self, TradelabError> {
        let market_total_return = total_return(&equity.market)?;
        let strategy_total_return = total_return(&equity.strategy)?;
        Ok(BenchmarkComparison {
            market_total_return,
            market_max_drawdown: max_drawdown(&equity.market)?,
            strategy_total_return,
            excess_return: strategy_total_return - market_total_return,
        })
    }
}
