use thiserror::Error;

/// Validation errors for domain values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid timeframe '{value}', expected one of daily, weekly, monthly, intraday")]
    InvalidTimeframe { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("timestamp out of representable range: {epoch_secs}")]
    TimestampOutOfRange { epoch_secs: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("snapshot open price must be greater than zero, got {value}")]
    ZeroOpenPrice { value: f64 },

    #[error("stop-loss fraction must be in (0, 1], got {value}")]
    InvalidStopLoss { value: f64 },
    #[error("take-profit fraction must be greater than zero, got {value}")]
    InvalidTakeProfit { value: f64 },

    #[error("refresh interval must be greater than zero")]
    ZeroRefreshInterval,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
