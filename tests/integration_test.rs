//! Integration tests for the label → simulate → summarize pipeline.
//!
//! Tests cover:
//! - Full backtest pipeline through a mock data port
//! - Literal scenarios for labelling, simulation and metrics
//! - Chronological split feeding a test-only backtest
//! - Classifier output wired into the simulator
//! - Report and equity CSV writers on a real result
//! - Properties: no lookahead, idempotence, bounded statistics

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use std::cell::RefCell;
use tradelab::adapters::csv_adapter;
use tradelab::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use tradelab::domain::classifier::{predict_signals, FeatureTable};
use tradelab::domain::error::TradelabError;
use tradelab::domain::execution::{ExecutionLag, Position};
use tradelab::domain::labeler::{label, label_with, LabelConfig};
use tradelab::domain::metrics::{max_drawdown, summarize, win_rate};
use tradelab::domain::signal::Signal;
use tradelab::domain::simulator::{simulate, simulate_with_lag};
use tradelab::domain::split::split_prices;
use tradelab::ports::data_port::DataPort;
use tradelab::ports::report_port::ReportPort;

mod full_backtest_pipeline {
    use super::*;

    #[test]
    fn pipeline_with_mock_data_port() {
        let closes = [100.0, 110.0, 121.0];
        let port = MockDataPort::new()
            .with_bars("AAPL", bars_from_closes(&closes))
            .with_signals("AAPL", &[Signal::Buy, Signal::Buy, Signal::Hold]);

        let prices = port
            .fetch_prices("AAPL", date(2024, 1, 1), date(2024, 1, 3))
            .unwrap();
        let signals = port.fetch_signals("AAPL", &prices.dates()).unwrap();
        let result = run_backtest(&prices, &signals, &BacktestConfig::default()).unwrap();

        assert_relative_eq!(result.summary.total_return, 0.21, epsilon = 1e-12);
        assert_relative_eq!(result.summary.max_drawdown, 0.0);
        assert_relative_eq!(result.summary.win_rate, 1.0);
        assert_eq!(result.dates.len(), 3);
    }

    #[test]
    fn fetch_filters_by_date_range() {
        let port = MockDataPort::new().with_bars("AAPL", generate_bars("2024-01-01", 10, 100.0));
        let prices = port
            .fetch_prices("AAPL", date(2024, 1, 3), date(2024, 1, 6))
            .unwrap();
        assert_eq!(prices.len(), 4);
        assert_eq!(prices.dates()[0], date(2024, 1, 3));
    }

    #[test]
    fn data_error_propagates() {
        let port = MockDataPort::new().with_error("AAPL", "provider unavailable");
        let err = port
            .fetch_prices("AAPL", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap_err();
        assert!(matches!(err, TradelabError::Data { reason } if reason == "provider unavailable"));
    }

    #[test]
    fn missing_signal_is_an_error() {
        let port = MockDataPort::new()
            .with_bars("AAPL", bars_from_closes(&[100.0, 101.0, 102.0]))
            .with_signals("AAPL", &[Signal::Buy, Signal::Hold]);
        let prices = port
            .fetch_prices("AAPL", date(2024, 1, 1), date(2024, 1, 3))
            .unwrap();
        let err = port.fetch_signals("AAPL", &prices.dates()).unwrap_err();
        assert!(matches!(err, TradelabError::Data { .. }));
    }

    #[test]
    fn all_hold_has_no_trades() {
        let prices = series(&[100.0, 105.0, 95.0, 110.0]);
        let signals = vec![Signal::Hold; 4];
        let err = run_backtest(&prices, &signals, &BacktestConfig::default()).unwrap_err();
        assert!(matches!(err, TradelabError::NoTrades));
    }

    #[test]
    fn mismatched_signal_length_fails_before_simulating() {
        let prices = series(&[100.0, 105.0, 95.0]);
        let err = run_backtest(&prices, &[Signal::Buy], &BacktestConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            TradelabError::LengthMismatch {
                prices: 3,
                signals: 1
            }
        ));
    }
}

mod literal_scenarios {
    use super::*;

    #[test]
    fn ten_bars_horizon_five_labels_first_five() {
        let prices = series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0, 107.0, 108.0, 109.0]);
        let labeled = label(&prices, 5, 0.02).unwrap();
        let indices: Vec<usize> = labeled.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        // 105 / 100 - 1 = 0.05 > 0.02
        assert_eq!(labeled.rows[0].label, Signal::Buy);
    }

    #[test]
    fn falling_prices_label_sell() {
        let prices = series(&[100.0, 90.0, 80.0]);
        let labeled = label(&prices, 1, 0.02).unwrap();
        assert_eq!(labeled.labels(), vec![Signal::Sell, Signal::Sell]);
    }

    #[test]
    fn insufficient_bars_for_horizon() {
        let prices = series(&[100.0, 101.0, 102.0]);
        let err = label(&prices, 3, 0.02).unwrap_err();
        assert!(matches!(
            err,
            TradelabError::InsufficientData {
                required: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn buy_signal_applies_on_next_bar() {
        let prices = series(&[100.0, 110.0, 121.0]);
        let sim = simulate(&prices, &[Signal::Buy, Signal::Buy, Signal::Hold]).unwrap();
        assert_eq!(sim.returns.strategy[0], None);
        assert_relative_eq!(sim.returns.strategy[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(sim.returns.strategy[2].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(sim.equity.strategy[2].unwrap(), 1.21, epsilon = 1e-12);
    }

    #[test]
    fn sell_stays_flat() {
        let prices = series(&[100.0, 50.0, 25.0]);
        let sim = simulate(&prices, &[Signal::Sell, Signal::Sell, Signal::Sell]).unwrap();
        assert_eq!(sim.returns.positions[1], Some(Position::Flat));
        assert_eq!(sim.returns.strategy[1], Some(0.0));
        assert_eq!(sim.equity.strategy[2], Some(1.0));
    }

    #[test]
    fn max_drawdown_of_known_curve() {
        let equity = [Some(1.0), Some(1.2), Some(0.9), Some(1.5)];
        assert_relative_eq!(max_drawdown(&equity).unwrap(), -0.25, epsilon = 1e-12);
    }

    #[test]
    fn win_rate_ignores_flat_bars() {
        let returns = [None, Some(0.1), Some(0.0), Some(-0.05), Some(0.02)];
        assert_relative_eq!(win_rate(&returns).unwrap(), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn two_bar_lag_delays_exposure() {
        let prices = series(&[100.0, 110.0, 121.0, 133.1]);
        let lag = ExecutionLag::new(2).unwrap();
        let sim = simulate_with_lag(&prices, &[Signal::Buy; 4], lag).unwrap();
        assert_eq!(sim.returns.strategy[0], None);
        assert_eq!(sim.returns.strategy[1], None);
        assert!(sim.returns.strategy[2].is_some());
        assert_eq!(sim.equity.strategy[1], None);
    }
}

mod split_and_classify {
    use super::*;

    #[test]
    fn test_only_backtest_uses_tail() {
        let prices = PriceSeries::new(generate_bars("2024-01-01", 10, 100.0)).unwrap();
        let (train, test) = split_prices(&prices, 0.8).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
        assert!(train.dates().last().unwrap() < test.dates().first().unwrap());

        let result = run_backtest(&test, &[Signal::Buy, Signal::Buy], &BacktestConfig::default())
            .unwrap();
        assert_relative_eq!(result.summary.total_return, 109.0 / 108.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn labels_train_a_threshold_classifier() {
        let prices = series(&[100.0, 103.0, 101.0, 99.0, 104.0, 107.0, 103.0, 100.0]);
        let labeled = label_with(&prices, &LabelConfig { horizon: 1, threshold: 0.02 }).unwrap();
        assert_eq!(labeled.len(), 7);

        // Single momentum feature: previous bar return, zero on the first bar.
        let closes = prices.closes();
        let rows: Vec<Vec<f64>> = (0..closes.len())
            .map(|t| {
                if t == 0 {
                    vec![0.0]
                } else {
                    vec![closes[t] / closes[t - 1] - 1.0]
                }
            })
            .collect();
        let table = FeatureTable::new(vec!["momentum".into()], rows).unwrap();
        table.ensure_aligned(&prices).unwrap();

        let signals = predict_signals(&table, |row| {
            if row[0] > 0.0 {
                Signal::Buy
            } else {
                Signal::Hold
            }
        });
        assert_eq!(signals.len(), prices.len());
        assert_eq!(signals[1], Signal::Buy);
        assert_eq!(signals[3], Signal::Hold);

        let result = run_backtest(&prices, &signals, &BacktestConfig::default()).unwrap();
        assert!(result.summary.win_rate >= 0.0 && result.summary.win_rate <= 1.0);
    }

    #[test]
    fn misaligned_features_rejected() {
        let prices = series(&[100.0, 101.0, 102.0]);
        let table = FeatureTable::new(vec!["x".into()], vec![vec![1.0], vec![2.0]]).unwrap();
        assert!(matches!(
            table.ensure_aligned(&prices),
            Err(TradelabError::LengthMismatch { .. })
        ));
    }
}

mod outputs {
    use super::*;
    use tempfile::TempDir;

    struct RecordingReport {
        written: RefCell<Vec<(String, String)>>,
    }

    impl ReportPort for RecordingReport {
        fn write(
            &self,
            _result: &BacktestResult,
            ticker: &str,
            output_path: &str,
        ) -> Result<(), TradelabError> {
            self.written
                .borrow_mut()
                .push((ticker.to_string(), output_path.to_string()));
            Ok(())
        }
    }

    fn sample_result() -> BacktestResult {
        let prices = series(&[100.0, 110.0, 99.0, 105.0, 120.0]);
        let signals = [Signal::Buy, Signal::Buy, Signal::Sell, Signal::Buy, Signal::Hold];
        run_backtest(&prices, &signals, &BacktestConfig::default()).unwrap()
    }

    #[test]
    fn report_port_receives_result() {
        let report = RecordingReport {
            written: RefCell::new(Vec::new()),
        };
        report.write(&sample_result(), "AAPL", "out.typ").unwrap();
        assert_eq!(
            report.written.borrow().as_slice(),
            &[("AAPL".to_string(), "out.typ".to_string())]
        );
    }

    #[test]
    fn equity_csv_has_one_row_per_bar() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equity.csv");
        csv_adapter::write_equity(&path, &sample_result()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("date,"));
        // First bar has no return and no position.
        assert_eq!(lines[1], "2024-01-01,,,,,");
    }

    #[test]
    fn labels_csv_round_trips_class_codes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("labels.csv");
        let labeled = label(&series(&[100.0, 110.0, 90.0, 91.0]), 1, 0.02).unwrap();
        csv_adapter::write_labels(&path, &labeled).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let codes: Vec<&str> = content
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(codes, vec!["1", "2", "0"]);
    }
}

fn closes_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..500.0, 3..60)
}

fn signal_strategy() -> impl Strategy<Value = Signal> {
    prop_oneof![Just(Signal::Hold), Just(Signal::Buy), Just(Signal::Sell)]
}

proptest! {
    #[test]
    fn strategy_returns_ignore_future_signals(
        closes in closes_strategy(),
        seed in prop::collection::vec(signal_strategy(), 60),
        flip in prop::collection::vec(signal_strategy(), 60),
        cut in 0usize..60,
    ) {
        let prices = series(&closes);
        let n = closes.len();
        let k = cut % n;
        let original: Vec<Signal> = seed[..n].to_vec();
        let mut changed = original.clone();
        changed[k..].copy_from_slice(&flip[k..n]);

        let a = simulate(&prices, &original).unwrap();
        let b = simulate(&prices, &changed).unwrap();
        // With a one-bar lag, signal k first affects the return at k + 1.
        prop_assert_eq!(&a.returns.strategy[..=k], &b.returns.strategy[..=k]);
    }

    #[test]
    fn labels_ignore_prices_beyond_horizon(
        closes in closes_strategy(),
        bump in 1.0f64..100.0,
        horizon in 1usize..3,
    ) {
        prop_assume!(closes.len() > horizon + 1);
        let base = label(&series(&closes), horizon, 0.02).unwrap();
        let mut changed = closes.clone();
        let last = changed.len() - 1;
        changed[last] += bump;
        let moved = label(&series(&changed), horizon, 0.02).unwrap();

        let untouched = last - horizon;
        prop_assert_eq!(&base.rows[..untouched], &moved.rows[..untouched]);
    }

    #[test]
    fn simulation_is_idempotent(
        closes in closes_strategy(),
        seed in prop::collection::vec(signal_strategy(), 60),
    ) {
        let prices = series(&closes);
        let signals = &seed[..closes.len()];
        prop_assert_eq!(simulate(&prices, signals).unwrap(), simulate(&prices, signals).unwrap());
    }

    #[test]
    fn summary_statistics_are_bounded(
        closes in closes_strategy(),
        seed in prop::collection::vec(signal_strategy(), 60),
    ) {
        let prices = series(&closes);
        let sim = simulate(&prices, &seed[..closes.len()]).unwrap();
        match summarize(&sim.equity.strategy, &sim.returns.strategy) {
            Ok(summary) => {
                prop_assert!(summary.max_drawdown <= 0.0);
                prop_assert!(summary.max_drawdown >= -1.0);
                prop_assert!((0.0..=1.0).contains(&summary.win_rate));
                prop_assert!(summary.total_return > -1.0);
            }
            Err(e) => prop_assert!(matches!(e, TradelabError::NoTrades)),
        }
    }
}
