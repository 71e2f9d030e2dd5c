//! Feature table and the prediction capability of a trained model.
//!
//! The model itself is trained elsewhere. Here it is only a function from one
//! feature row to a [`Signal`], so no fit/predict lifecycle leaks into the core.

use super::error::TradelabError;
use super::ohlcv::PriceSeries;
use super::signal::Signal;

/// Feature rows aligned 1:1 with the bars of a price series.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    pub fn new(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, TradelabError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(TradelabError::invalid_parameter(
                    "features",
                    format!(
                        "row {} has {} values but {} feature names",
                        i,
                        row.len(),
                        names.len()
                    ),
                ));
            }
            if let Some(col) = row.iter().position(|v| !v.is_finite()) {
                return Err(TradelabError::invalid_parameter(
                    "features",
                    format!("non-finite value in row {} column '{}'", i, names[col]),
                ));
            }
        }
        Ok(Self { names, rows })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn ensure_aligned(&self, prices: &PriceSeries) -> Result<(), TradelabError> {
        if self.rows.len() != prices.len() {
            return Err(TradelabError::LengthMismatch {
                prices: prices.len(),
                signals: self.rows.len(),
            });
        }
        Ok(())
    }
}

/// One signal per feature row, in row order.
pub fn predict_signals<F>(table: &FeatureTable, predict: F) -> Vec<Signal>
where
    F: Fn(&[f64]) -> Signal,
{
    table.rows.iter().map(|row| predict(row)).collect()
}
