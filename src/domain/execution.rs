//! Signal-to-position execution policy.
//!
//! A signal observed at the close of bar `t` can only be acted on at a later
//! bar. [`ExecutionLag`] names that delay; every position is derived from the
//! signal `lag` bars earlier and never from the bar's own signal.

use super::error::TradelabError;
use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Flat,
    Long,
}

impl Position {
    /// Long-only: Buy opens a long, Sell and Hold are both flat.
    pub fn from_signal(signal: Signal) -> Self {
        match signal {
            Signal::Buy => Position::Long,
            Signal::Hold | Signal::Sell => Position::Flat,
        }
    }

    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }
}

/// Number of bars between observing a signal and holding its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionLag(usize);

impl ExecutionLag {
    /// Next-bar execution.
    pub const NEXT_BAR: ExecutionLag = ExecutionLag(1);

    /// A lag of zero would trade on the bar's own signal and is rejected.
    pub fn new(bars: usize) -> Result<Self, TradelabError> {
        if bars == 0 {
            return Err(TradelabError::invalid_parameter(
                "execution_lag",
                "execution lag must be at least one bar",
            ));
        }
        Ok(ExecutionLag(bars))
    }

    pub fn bars(self) -> usize {
        self.0
    }

    /// Index of the signal that decides the position at `t`, if one exists.
    pub fn source_index(self, t: usize) -> Option<usize> {
        t.checked_sub(self.0)
    }

    /// Position per bar; `None` for the first `lag` bars.
    pub fn positions(self, signals: &[Signal]) -> Vec<Option<Position>> {
        (0..signals.len())
            .map(|t| {
                self.source_index(t)
                    .map(|src| Position::from_signal(signals[src]))
            })
            .collect()
    }
}

impl Default for ExecutionLag {
    fn default() -> Self {
        ExecutionLag::NEXT_BAR
    }
}
