use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::provider::{HistoryFuture, MarketData, ProviderBar, ProviderError};
use crate::{Symbol, Timeframe, UtcDateTime};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = concat!("tickwatch/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Live adapter over the Yahoo chart endpoint.
///
/// One GET per (symbol, timeframe); the chart JSON carries parallel arrays of
/// timestamps and OHLCV values with nullable slots for halted buckets, which
/// are skipped rather than zero-filled.
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the adapter at a different chart host, e.g. a local stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<Vec<ProviderBar>, ProviderError> {
        let url = format!(
            "{}/{}?range={}&interval={}",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            timeframe.range_code(),
            timeframe.interval_code(),
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|error| ProviderError::transport(error.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ProviderError::unknown_symbol(symbol)),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::rate_limited(format!(
                    "chart endpoint throttled request for '{symbol}'"
                )));
            }
            status if !status.is_success() => {
                return Err(ProviderError::transport(format!(
                    "chart endpoint returned {status} for '{symbol}'"
                )));
            }
            _ => {}
        }

        let envelope: ChartEnvelope = response
            .json()
            .await
            .map_err(|error| ProviderError::invalid_response(error.to_string()))?;

        decode_chart(symbol, envelope)
    }
}

impl Default for YahooChartProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketData for YahooChartProvider {
    fn provider_name(&self) -> &'static str {
        "yahoo"
    }

    fn history<'a>(&'a self, symbol: &'a Symbol, timeframe: Timeframe) -> HistoryFuture<'a> {
        Box::pin(self.fetch(symbol, timeframe))
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartPayload,
}

#[derive(Debug, Deserialize)]
struct ChartPayload {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

fn decode_chart(
    symbol: &Symbol,
    envelope: ChartEnvelope,
) -> Result<Vec<ProviderBar>, ProviderError> {
    if let Some(error) = envelope.chart.error {
        if error.code.eq_ignore_ascii_case("not found") {
            return Err(ProviderError::unknown_symbol(symbol));
        }
        return Err(ProviderError::transport(format!(
            "chart error for '{symbol}': {} ({})",
            error.description, error.code
        )));
    }

    let Some(result) = envelope
        .chart
        .result
        .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
    else {
        return Ok(Vec::new());
    };

    let Some(timestamps) = result.timestamp else {
        // No timestamps at all means no data for the window, not a fault.
        return Ok(Vec::new());
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (index, epoch) in timestamps.into_iter().enumerate() {
        let slot = (
            quote.open.get(index).copied().flatten(),
            quote.high.get(index).copied().flatten(),
            quote.low.get(index).copied().flatten(),
            quote.close.get(index).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = slot else {
            continue;
        };

        let ts = UtcDateTime::from_unix_seconds(epoch)
            .map_err(|error| ProviderError::invalid_response(error.to_string()))?;

        bars.push(ProviderBar {
            ts,
            open,
            high,
            low,
            close,
            volume: quote.volume.get(index).copied().flatten(),
        });
    }

    Ok(bars)
}
