//! Configuration validation.
//!
//! Validates all config fields before a labelling or backtest run. Missing
//! optional keys fall back to the same defaults the CLI uses.

use crate::domain::error::TradelabError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    validate_data_config(config)?;
    validate_label_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    validate_data_path(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_label_config(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    validate_horizon(config)?;
    validate_threshold(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    validate_train_fraction(config)?;
    validate_execution_lag(config)?;
    validate_risk_free_rate(config)?;
    config.get_bool("backtest", "test_only", false)?;
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TradelabError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let start_date = parse_date(config.get_string("data", "start_date").as_deref(), "start_date")?
        .unwrap_or_else(default_start_date);
    let end_date = parse_date(config.get_string("data", "end_date").as_deref(), "end_date")?;

    if let Some(end_date) = end_date {
        if start_date >= end_date {
            return Err(TradelabError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

/// `None` when the key is absent or blank.
pub fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, TradelabError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| TradelabError::ConfigInvalid {
                section: "data".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }),
    }
}

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn validate_horizon(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_int("labels", "horizon", 5)?;
    if value < 1 {
        return Err(TradelabError::ConfigInvalid {
            section: "labels".to_string(),
            key: "horizon".to_string(),
            reason: "horizon must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_threshold(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_double("labels", "threshold", 0.02)?;
    if !(value.is_finite() && value > 0.0) {
        return Err(TradelabError::ConfigInvalid {
            section: "labels".to_string(),
            key: "threshold".to_string(),
            reason: "threshold must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_train_fraction(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_double("backtest", "train_fraction", 0.8)?;
    if value <= 0.0 || value >= 1.0 {
        return Err(TradelabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "train_fraction".to_string(),
            reason: "train_fraction must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_execution_lag(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_int("backtest", "execution_lag", 1)?;
    if value < 1 {
        return Err(TradelabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "execution_lag".to_string(),
            reason: "execution_lag must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.0)?;
    if value < 0.0 || value >= 1.0 {
        return Err(TradelabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}
