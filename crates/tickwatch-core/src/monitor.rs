use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::provider::MarketData;
use crate::thresholds::{AlertEvent, RiskThresholds, ThresholdHit};
use crate::watchlist::Watchlist;
use crate::{PriceSeries, RowTone, Snapshot, Symbol, Timeframe, UtcDateTime};

/// Why a ticker was skipped for one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum SkipReason {
    /// Provider resolved the symbol but returned no displayable bars.
    NoData,
    /// Provider call failed (network, auth, rate limit, unknown symbol).
    Transport(String),
    /// Data came back but is unusable, e.g. a zero open price.
    DegenerateInput(String),
}

impl SkipReason {
    pub fn describe(&self, symbol: &Symbol) -> String {
        match self {
            Self::NoData => format!("no data available for '{symbol}', skipping"),
            Self::Transport(detail) => format!("fetch failed for '{symbol}': {detail}"),
            Self::DegenerateInput(detail) => format!("skipping '{symbol}': {detail}"),
        }
    }
}

/// Result of one series fetch: either a normalized series or a skip.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Series(PriceSeries),
    Empty(SkipReason),
}

/// Snapshot row with its threshold flags and display tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub snapshot: Snapshot,
    pub hit: ThresholdHit,
    pub tone: RowTone,
}

/// One display row of the history table. `price` is the bar close, renamed
/// for presentation the way the dashboard labels the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub price: f64,
    pub volume: Option<u64>,
    pub change_pct: f64,
    pub tone: RowTone,
}

/// Line-chart series: one (timestamp, close) point per bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub symbol: Symbol,
    pub points: Vec<(UtcDateTime, f64)>,
}

/// Everything the display surfaces need for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerReport {
    pub symbol: Symbol,
    pub rows: Vec<TableRow>,
    pub chart: ChartSeries,
    pub snapshot: Option<SnapshotRow>,
}

/// Output of one full evaluation pass over the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub generated_at: UtcDateTime,
    pub tickers: Vec<TickerReport>,
    pub alerts: Vec<AlertEvent>,
    pub warnings: Vec<String>,
}

/// Alerts plus the warnings gathered while producing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertScan {
    pub alerts: Vec<AlertEvent>,
    pub warnings: Vec<String>,
}

/// Stateless evaluation engine over a market-data provider.
///
/// Every method recomputes from scratch; no memoization or cross-cycle state
/// is carried, so identical inputs against unchanged provider data yield
/// identical output. Tickers are processed serially in watchlist order and
/// a per-ticker failure never aborts the pass.
pub struct WatchlistMonitor<'a> {
    provider: &'a dyn MarketData,
}

impl<'a> WatchlistMonitor<'a> {
    pub fn new(provider: &'a dyn MarketData) -> Self {
        Self { provider }
    }

    /// Fetch and normalize one ticker's series.
    ///
    /// Transport faults and degenerate payloads collapse to [`Fetched::Empty`]
    /// so callers have a single "skip this ticker" path.
    pub async fn fetch_series(&self, symbol: &Symbol, timeframe: Timeframe) -> Fetched {
        let raw = match self.provider.history(symbol, timeframe).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(
                    provider = self.provider.provider_name(),
                    %symbol,
                    %timeframe,
                    "history fetch failed: {error}"
                );
                return Fetched::Empty(SkipReason::Transport(error.to_string()));
            }
        };

        if raw.is_empty() {
            warn!(%symbol, %timeframe, "provider returned no bars");
            return Fetched::Empty(SkipReason::NoData);
        }

        match PriceSeries::from_provider_bars(symbol.clone(), timeframe, raw) {
            Ok(series) if series.is_empty() => {
                // A lone bar has no previous close, so nothing survives
                // normalization. Same outcome as the provider sending nothing.
                warn!(%symbol, %timeframe, "no bars with a defined percent change");
                Fetched::Empty(SkipReason::NoData)
            }
            Ok(series) => Fetched::Series(series),
            Err(error) => {
                warn!(%symbol, %timeframe, "unusable provider bars: {error}");
                Fetched::Empty(SkipReason::DegenerateInput(error.to_string()))
            }
        }
    }

    /// Latest intraday snapshot for one ticker: the chronologically last
    /// one-minute bar, prices rounded to two decimals.
    pub async fn latest_snapshot(&self, symbol: &Symbol) -> Result<Snapshot, SkipReason> {
        let raw = match self.provider.history(symbol, Timeframe::Intraday).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%symbol, "snapshot fetch failed: {error}");
                return Err(SkipReason::Transport(error.to_string()));
            }
        };

        let Some(last) = raw.iter().max_by_key(|bar| bar.ts) else {
            warn!(%symbol, "no intraday bars for snapshot");
            return Err(SkipReason::NoData);
        };

        Snapshot::new(symbol.clone(), last.close, last.open, last.volume, last.ts).map_err(
            |error| {
                warn!(%symbol, "degenerate snapshot input: {error}");
                SkipReason::DegenerateInput(error.to_string())
            },
        )
    }

    /// One evaluation pass: per ticker in watchlist order, the history table,
    /// chart series, latest snapshot with threshold flags, and at most one
    /// alert. Skipped tickers leave a warning and nothing else.
    pub async fn evaluate(
        &self,
        watchlist: &Watchlist,
        thresholds: RiskThresholds,
        timeframe: Timeframe,
    ) -> EvaluationReport {
        let mut tickers = Vec::new();
        let mut alerts = Vec::new();
        let mut warnings = Vec::new();

        for symbol in watchlist.snapshot() {
            let series = match self.fetch_series(&symbol, timeframe).await {
                Fetched::Series(series) => series,
                Fetched::Empty(reason) => {
                    warnings.push(reason.describe(&symbol));
                    continue;
                }
            };

            let snapshot = match self.latest_snapshot(&symbol).await {
                Ok(snapshot) => {
                    let hit = thresholds.evaluate(&snapshot);
                    if let Some(alert) = AlertEvent::from_snapshot(&snapshot, thresholds) {
                        alerts.push(alert);
                    }
                    let tone = snapshot.tone();
                    Some(SnapshotRow {
                        snapshot,
                        hit,
                        tone,
                    })
                }
                Err(reason) => {
                    warnings.push(reason.describe(&symbol));
                    None
                }
            };

            tickers.push(TickerReport {
                symbol: series.symbol.clone(),
                rows: table_rows(&series),
                chart: chart_series(&series),
                snapshot,
            });
        }

        EvaluationReport {
            generated_at: UtcDateTime::now(),
            tickers,
            alerts,
            warnings,
        }
    }

    /// Threshold scan only: latest snapshot per ticker in watchlist order,
    /// at most one alert each, skips on Empty.
    pub async fn build_alerts(
        &self,
        watchlist: &Watchlist,
        thresholds: RiskThresholds,
    ) -> AlertScan {
        let mut alerts = Vec::new();
        let mut warnings = Vec::new();

        for symbol in watchlist.snapshot() {
            match self.latest_snapshot(&symbol).await {
                Ok(snapshot) => {
                    if let Some(alert) = AlertEvent::from_snapshot(&snapshot, thresholds) {
                        alerts.push(alert);
                    }
                }
                Err(reason) => warnings.push(reason.describe(&symbol)),
            }
        }

        AlertScan { alerts, warnings }
    }
}

fn table_rows(series: &PriceSeries) -> Vec<TableRow> {
    series
        .bars
        .iter()
        .map(|bar| TableRow {
            ts: bar.ts,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            price: bar.close,
            volume: bar.volume,
            change_pct: bar.percent_change,
            tone: RowTone::for_prices(bar.close, bar.open),
        })
        .collect()
}

fn chart_series(series: &PriceSeries) -> ChartSeries {
    ChartSeries {
        symbol: series.symbol.clone(),
        points: series
            .bars
            .iter()
            .map(|bar| (bar.ts, bar.close))
            .collect(),
    }
}
