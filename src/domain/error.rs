//! Error types for the I/O-facing layers.
//!
//! Domain computations never fail: insufficient history is expressed as
//! `None` entries or explicit "not enough data" variants. These errors only
//! arise while loading configuration and bar data.

/// A timeframe name that does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timeframe '{name}' (expected day, week, month, 6months, year or overall)")]
pub struct UnknownTimeframe {
    pub name: String,
}

/// Top-level error type for trendscope.
#[derive(Debug, thiserror::Error)]
pub enum TrendscopeError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("malformed row {line} for {symbol}: {reason}")]
    DataParse {
        symbol: String,
        line: u64,
        reason: String,
    },

    #[error("inconsistent bar at row {line} for {symbol}: {reason}")]
    InvalidBar {
        symbol: String,
        line: u64,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TrendscopeError> for std::process::ExitCode {
    fn from(err: &TrendscopeError) -> Self {
        let code: u8 = match err {
            TrendscopeError::Io(_) => 1,
            TrendscopeError::ConfigParse { .. }
            | TrendscopeError::ConfigInvalid { .. } => 2,
            TrendscopeError::DataSource { .. }
            | TrendscopeError::DataParse { .. }
            | TrendscopeError::InvalidBar { .. } => 3,
            TrendscopeError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
