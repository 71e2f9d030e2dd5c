//! Core domain types and logic.

pub mod ohlcv;
pub mod signal;
pub mod labeler;
pub mod execution;
pub mod simulator;
pub mod metrics;
pub mod split;
pub mod classifier;
pub mod backtest;
pub mod config_validation;
pub mod error;
