use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{Symbol, Timeframe, UtcDateTime};

/// Raw OHLCV observation exactly as the provider delivered it, before any
/// normalization or derived metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProviderBar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Transport,
    RateLimited,
    UnknownSymbol,
    InvalidResponse,
}

/// Structured provider error with retry classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
    retryable: bool,
}

impl ProviderError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Transport,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn unknown_symbol(symbol: &Symbol) -> Self {
        Self {
            kind: ProviderErrorKind::UnknownSymbol,
            message: format!("provider rejected symbol '{symbol}'"),
            retryable: false,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::Transport => "provider.transport",
            ProviderErrorKind::RateLimited => "provider.rate_limited",
            ProviderErrorKind::UnknownSymbol => "provider.unknown_symbol",
            ProviderErrorKind::InvalidResponse => "provider.invalid_response",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

pub type HistoryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<ProviderBar>, ProviderError>> + Send + 'a>>;

/// Market-data seam.
///
/// Zero bars is a valid result (`Ok` with an empty vec), never an error:
/// delisted or thinly traded symbols simply have no data for the window.
/// Implementations must be `Send + Sync`; callers may share them across
/// tasks.
pub trait MarketData: Send + Sync {
    /// Stable identifier used in warnings and logs.
    fn provider_name(&self) -> &'static str;

    /// Fetch raw bars for one symbol over the timeframe's window.
    fn history<'a>(&'a self, symbol: &'a Symbol, timeframe: Timeframe) -> HistoryFuture<'a>;
}
