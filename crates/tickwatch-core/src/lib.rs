//! Core contracts for tickwatch.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The market-data provider seam and adapters
//! - Watchlist and threshold/alert evaluation
//! - Notification delivery and refresh scheduling

pub mod domain;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod provider;
pub mod providers;
pub mod schedule;
pub mod thresholds;
pub mod watchlist;

pub use domain::{PriceBar, PriceSeries, RowTone, Snapshot, Symbol, Timeframe, UtcDateTime};
pub use error::{CoreError, ValidationError};
pub use monitor::{
    AlertScan, ChartSeries, EvaluationReport, Fetched, SkipReason, SnapshotRow, TableRow,
    TickerReport, WatchlistMonitor,
};
pub use notify::{Notifier, NotifyError, WebhookNotifier};
pub use provider::{MarketData, ProviderBar, ProviderError, ProviderErrorKind};
pub use providers::{FixtureProvider, YahooChartProvider};
pub use schedule::{run_refresh_loop, RefreshConfig};
pub use thresholds::{
    AlertEvent, AlertGate, AlertKind, AlertPolicy, RiskThresholds, ThresholdHit,
};
pub use watchlist::Watchlist;
