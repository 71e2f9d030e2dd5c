//! Trade signal vocabulary shared by labels and model predictions.

use std::fmt;
use std::str::FromStr;

use super::error::TradelabError;

/// One of three trade classes. Labels and predicted signals share this type.
///
/// Class codes match the training targets: Hold = 0, Buy = 1, Sell = 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Hold,
    Buy,
    Sell,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Hold, Signal::Buy, Signal::Sell];

    pub fn class_code(self) -> u8 {
        match self {
            Signal::Hold => 0,
            Signal::Buy => 1,
            Signal::Sell => 2,
        }
    }

    pub fn from_class_code(code: u8) -> Option<Signal> {
        match code {
            0 => Some(Signal::Hold),
            1 => Some(Signal::Buy),
            2 => Some(Signal::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Hold => write!(f, "Hold"),
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
        }
    }
}

/// Accepts a class code (`0`, `1`, `2`) or a case-insensitive name.
impl FromStr for Signal {
    type Err = TradelabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Signal::from_class_code(code).ok_or_else(|| {
                TradelabError::invalid_parameter("signal", format!("unknown class code {}", code))
            });
        }
        match trimmed.to_lowercase().as_str() {
            "hold" => Ok(Signal::Hold),
            "buy" => Ok(Signal::Buy),
            "sell" => Ok(Signal::Sell),
            other => Err(TradelabError::invalid_parameter(
                "signal",
                format!("unknown signal '{}'", other),
            )),
        }
    }
}
