//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{default_start_date, parse_date, validate_config};
use crate::domain::error::TradelabError;
use crate::domain::execution::ExecutionLag;
use crate::domain::labeler::{label_with, LabelConfig, LabeledSeries};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::split::split_prices;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradelab", about = "Forward labelling and signal backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Label a price series with forward-return targets
    Label {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Backtest predicted signals against a price series
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        equity_csv: Option<PathBuf>,
        /// Only simulate the chronological test split
        #[arg(long)]
        test_only: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Logs go to stderr; `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Label {
            config,
            ticker,
            output,
        } => run_label(&config, ticker.as_deref(), output.as_ref()),
        Command::Backtest {
            config,
            ticker,
            output,
            equity_csv,
            test_only,
        } => run_backtest_command(
            &config,
            ticker.as_deref(),
            output.as_ref(),
            equity_csv.as_ref(),
            test_only,
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(fail)
}

fn fail(err: TradelabError) -> ExitCode {
    tracing::error!("{err}");
    (&err).into()
}

/// Where and which prices to load.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    pub path: PathBuf,
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn build_data_request(
    adapter: &dyn ConfigPort,
    ticker_override: Option<&str>,
) -> Result<DataRequest, TradelabError> {
    let path = adapter
        .get_string("data", "path")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| TradelabError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    let ticker = resolve_ticker(ticker_override, adapter).ok_or_else(|| {
        TradelabError::ConfigMissing {
            section: "data".into(),
            key: "ticker".into(),
        }
    })?;
    let start_date = parse_date(adapter.get_string("data", "start_date").as_deref(), "start_date")?
        .unwrap_or_else(default_start_date);
    let end_date = parse_date(adapter.get_string("data", "end_date").as_deref(), "end_date")?
        .unwrap_or(NaiveDate::MAX);

    Ok(DataRequest {
        path: PathBuf::from(path.trim()),
        ticker,
        start_date,
        end_date,
    })
}

pub fn resolve_ticker(ticker_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    ticker_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "ticker"))
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
}

pub fn build_label_config(adapter: &dyn ConfigPort) -> Result<LabelConfig, TradelabError> {
    let horizon = adapter.get_int("labels", "horizon", 5)?;
    let horizon = usize::try_from(horizon).map_err(|_| TradelabError::ConfigInvalid {
        section: "labels".into(),
        key: "horizon".into(),
        reason: "horizon must be at least 1".into(),
    })?;
    Ok(LabelConfig {
        horizon,
        threshold: adapter.get_double("labels", "threshold", 0.02)?,
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, TradelabError> {
    let lag = adapter.get_int("backtest", "execution_lag", 1)?;
    let execution_lag = usize::try_from(lag)
        .map_err(|_| TradelabError::ConfigInvalid {
            section: "backtest".into(),
            key: "execution_lag".into(),
            reason: "execution_lag must be at least 1".into(),
        })
        .and_then(ExecutionLag::new)?;

    Ok(BacktestConfig {
        labels: build_label_config(adapter)?,
        train_fraction: adapter.get_double("backtest", "train_fraction", 0.8)?,
        execution_lag,
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", 0.0)?,
    })
}

fn run_label(config_path: &PathBuf, ticker: Option<&str>, output_path: Option<&PathBuf>) -> ExitCode {
    tracing::info!("loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&adapter) {
        return fail(e);
    }

    let request = match build_data_request(&adapter, ticker) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let label_config = match build_label_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from(format!("{}_labels.csv", request.ticker)));

    let data_port = CsvAdapter::new(request.path.clone());
    match run_label_pipeline(&data_port, &request, &label_config, &output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

pub fn run_label_pipeline(
    data_port: &dyn DataPort,
    request: &DataRequest,
    config: &LabelConfig,
    output: &PathBuf,
) -> Result<LabeledSeries, TradelabError> {
    let prices = data_port.fetch_prices(&request.ticker, request.start_date, request.end_date)?;
    tracing::info!(ticker = %request.ticker, bars = prices.len(), "prices loaded");

    let labeled = label_with(&prices, config)?;
    let counts = labeled.class_counts();
    tracing::info!(
        horizon = config.horizon,
        threshold = config.threshold,
        rows = labeled.len(),
        dropped = prices.len() - labeled.len(),
        hold = counts.hold,
        buy = counts.buy,
        sell = counts.sell,
        "labels computed"
    );

    csv_adapter::write_labels(output, &labeled)?;
    tracing::info!("labels written to {}", output.display());
    Ok(labeled)
}

fn run_backtest_command(
    config_path: &PathBuf,
    ticker: Option<&str>,
    output_path: Option<&PathBuf>,
    equity_csv: Option<&PathBuf>,
    test_only_flag: bool,
) -> ExitCode {
    tracing::info!("loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&adapter) {
        return fail(e);
    }

    let request = match build_data_request(&adapter, ticker) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let test_only = match adapter.get_bool("backtest", "test_only", false) {
        Ok(configured) => test_only_flag || configured,
        Err(e) => return fail(e),
    };

    let report_port = match adapter.get_string("report", "template_path") {
        Some(path) => match TypstReportAdapter::with_template_file(&path) {
            Ok(r) => r,
            Err(e) => return fail(e),
        },
        None => TypstReportAdapter::new(),
    };
    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.typ"));
    let equity_csv = equity_csv
        .cloned()
        .or_else(|| adapter.get_string("report", "equity_csv").map(PathBuf::from));

    let data_port = CsvAdapter::new(request.path.clone());
    let outputs = BacktestOutputs {
        report: &output,
        equity_csv: equity_csv.as_ref(),
    };
    match run_backtest_pipeline(&data_port, &report_port, &request, &bt_config, test_only, &outputs) {
        Ok(result) => {
            print_summary(&request.ticker, &result);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

pub struct BacktestOutputs<'a> {
    pub report: &'a PathBuf,
    pub equity_csv: Option<&'a PathBuf>,
}

/// Selects the bars to simulate: the whole series, or only the test split.
pub fn select_prices(
    prices: PriceSeries,
    config: &BacktestConfig,
    test_only: bool,
) -> Result<PriceSeries, TradelabError> {
    if !test_only {
        return Ok(prices);
    }
    let (train, test) = split_prices(&prices, config.train_fraction)?;
    tracing::info!(
        train = train.len(),
        test = test.len(),
        "simulating chronological test split only"
    );
    Ok(test)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    request: &DataRequest,
    config: &BacktestConfig,
    test_only: bool,
    outputs: &BacktestOutputs,
) -> Result<BacktestResult, TradelabError> {
    let prices = data_port.fetch_prices(&request.ticker, request.start_date, request.end_date)?;
    tracing::info!(ticker = %request.ticker, bars = prices.len(), "prices loaded");

    let prices = select_prices(prices, config, test_only)?;
    let signals = data_port.fetch_signals(&request.ticker, &prices.dates())?;

    tracing::info!(
        bars = prices.len(),
        lag = config.execution_lag.bars(),
        "running backtest"
    );
    let result = run_backtest(&prices, &signals, config)?;

    // Outputs land together or not at all.
    report_port.write(&result, &request.ticker, &outputs.report.display().to_string())?;
    if let Some(path) = outputs.equity_csv {
        if let Err(e) = csv_adapter::write_equity(path, &result) {
            let _ = fs::remove_file(outputs.report);
            return Err(e);
        }
        tracing::info!("equity curves written to {}", path.display());
    }

    Ok(result)
}

fn print_summary(ticker: &str, result: &BacktestResult) {
    let s = &result.summary;
    let b = &result.benchmark;
    let r = &result.risk;
    println!("--- Backtest Results: {} ---", ticker);
    println!("Total Strategy Return: {:.2}%", s.total_return * 100.0);
    println!("Max Drawdown:          {:.2}%", s.max_drawdown * 100.0);
    println!("Win Rate:              {:.2}%", s.win_rate * 100.0);
    println!("Buy & Hold Return:     {:.2}%", b.market_total_return * 100.0);
    println!("Excess Return:         {:.2}%", b.excess_return * 100.0);
    println!("Sharpe Ratio:          {:.2}", r.sharpe_ratio);
    println!("Exposure:              {:.2}%", r.exposure * 100.0);
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    tracing::info!("validating config {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        return fail(e);
    }
    let config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    eprintln!("Labels:   horizon {} bars, threshold {}", config.labels.horizon, config.labels.threshold);
    eprintln!(
        "Backtest: train_fraction {}, execution lag {} bar(s), risk_free_rate {}",
        config.train_fraction,
        config.execution_lag.bars(),
        config.risk_free_rate
    );
    match resolve_ticker(None, &adapter) {
        Some(t) => eprintln!("Ticker:   {}", t),
        None => tracing::warn!("no [data] ticker configured; pass --ticker when running"),
    }
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
