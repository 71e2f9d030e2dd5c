//! Converts a signal series and its price series into return and equity series.

use super::error::TradelabError;
use super::execution::{ExecutionLag, Position};
use super::ohlcv::PriceSeries;
use super::signal::Signal;

/// Per-bar returns aligned with the price series. `None` marks an undefined
/// value: the first market return and any bar without a decided position.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub market: Vec<Option<f64>>,
    pub strategy: Vec<Option<f64>>,
    pub positions: Vec<Option<Position>>,
}

/// Compounded value of one unit invested, starting at the first defined return.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurve {
    pub market: Vec<Option<f64>>,
    pub strategy: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub lag: ExecutionLag,
    pub returns: ReturnSeries,
    pub equity: EquityCurve,
}

pub fn simulate(prices: &PriceSeries, signals: &[Signal]) -> Result<Simulation, TradelabError> {
    simulate_with_lag(prices, signals, ExecutionLag::NEXT_BAR)
}

pub fn simulate_with_lag(
    prices: &PriceSeries,
    signals: &[Signal],
    lag: ExecutionLag,
) -> Result<Simulation, TradelabError> {
    if signals.len() != prices.len() {
        return Err(TradelabError::LengthMismatch {
            prices: prices.len(),
            signals: signals.len(),
        });
    }
    if prices.len() < 2 {
        return Err(TradelabError::EmptySeries);
    }

    let market = market_returns(prices);
    let positions = lag.positions(signals);
    let strategy: Vec<Option<f64>> = market
        .iter()
        .zip(&positions)
        .map(|(ret, pos)| match (ret, pos) {
            (Some(r), Some(p)) => Some(r * p.exposure()),
            _ => None,
        })
        .collect();

    let equity = EquityCurve {
        market: compound(&market),
        strategy: compound(&strategy),
    };

    Ok(Simulation {
        lag,
        returns: ReturnSeries {
            market,
            strategy,
            positions,
        },
        equity,
    })
}

/// close[t] / close[t-1] - 1, undefined at t = 0.
pub fn market_returns(prices: &PriceSeries) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|t| {
            if t == 0 {
                None
            } else {
                Some(prices.close(t) / prices.close(t - 1) - 1.0)
            }
        })
        .collect()
}

/// Running product of (1 + r) over defined returns; undefined stays undefined.
pub fn compound(returns: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut equity = 1.0_f64;
    returns
        .iter()
        .map(|ret| {
            ret.map(|r| {
                equity *= 1.0 + r;
                equity
            })
        })
        .collect()
}

/// Defined values only, in order.
pub fn defined(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().flatten().copied().collect()
}
