//! Domain error types.

/// Top-level error type for tradelab.
#[derive(Debug, thiserror::Error)]
pub enum TradelabError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("insufficient data: have {actual} bars, need {required}")]
    InsufficientData { required: usize, actual: usize },

    #[error("length mismatch: {prices} prices but {signals} signals")]
    LengthMismatch { prices: usize, signals: usize },

    #[error("empty series: no defined returns")]
    EmptySeries,

    #[error("no trades: strategy never held a position with a nonzero return")]
    NoTrades,

    #[error("price series is not strictly increasing at index {index}")]
    UnorderedSeries { index: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradelabError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        TradelabError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TradelabError> for std::process::ExitCode {
    fn from(err: &TradelabError) -> Self {
        let code: u8 = match err {
            TradelabError::Io(_) => 1,
            TradelabError::ConfigParse { .. }
            | TradelabError::ConfigMissing { .. }
            | TradelabError::ConfigInvalid { .. } => 2,
            TradelabError::Data { .. } | TradelabError::UnorderedSeries { .. } => 3,
            TradelabError::InvalidParameter { .. }
            | TradelabError::InsufficientData { .. }
            | TradelabError::LengthMismatch { .. }
            | TradelabError::EmptySeries => 4,
            TradelabError::NoTrades => 5,
        };
        std::process::ExitCode::from(code)
    }
}
