use serde::{Deserialize, Serialize};

use crate::provider::ProviderBar;
use crate::{Symbol, Timeframe, UtcDateTime, ValidationError};

/// One normalized OHLCV observation with its derived percent change.
///
/// `percent_change` is always defined: series construction drops any bar that
/// has no preceding close to compute it from. OHLC range consistency
/// (`low <= open,close <= high`) is not validated because the upstream
/// provider does not guarantee it; only non-negative finite prices are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
    pub percent_change: f64,
}

impl PriceBar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
        percent_change: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;
        if !percent_change.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                field: "percent_change",
            });
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
            percent_change,
        })
    }
}

/// Ordered bar series for one symbol over one timeframe.
///
/// Built fresh on every fetch and never mutated in place; a refresh replaces
/// the whole series. Bars are strictly ascending by timestamp and every bar
/// carries a defined `percent_change`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Normalize raw provider bars into a display-ready series.
    ///
    /// Bars are sorted ascending by timestamp, duplicate timestamps collapse
    /// to one observation, and percent change is computed per bar from
    /// the immediately preceding close in this same series. The leading bar
    /// (and any bar following a zero close) has no defined percent change and
    /// is dropped.
    pub fn from_provider_bars(
        symbol: Symbol,
        timeframe: Timeframe,
        mut raw: Vec<ProviderBar>,
    ) -> Result<Self, ValidationError> {
        raw.sort_by_key(|bar| bar.ts);
        raw.dedup_by_key(|bar| bar.ts);

        let mut bars = Vec::with_capacity(raw.len().saturating_sub(1));
        let mut previous_close: Option<f64> = None;

        for bar in raw {
            if let Some(prev) = previous_close {
                if prev > 0.0 {
                    let percent_change = (bar.close / prev - 1.0) * 100.0;
                    bars.push(PriceBar::new(
                        bar.ts,
                        bar.open,
                        bar.high,
                        bar.low,
                        bar.close,
                        bar.volume,
                        percent_change,
                    )?);
                }
            }
            previous_close = Some(bar.close);
        }

        Ok(Self {
            symbol,
            timeframe,
            bars,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Chronologically last bar, if any.
    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(epoch: i64, close: f64) -> ProviderBar {
        ProviderBar {
            ts: UtcDateTime::from_unix_seconds(epoch).expect("timestamp"),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: Some(1_000),
        }
    }

    #[test]
    fn drops_leading_bar_and_sorts_ascending() {
        let symbol = Symbol::parse("SPY").expect("symbol");
        let series = PriceSeries::from_provider_bars(
            symbol,
            Timeframe::Daily,
            vec![raw(200, 102.0), raw(100, 100.0), raw(300, 99.0)],
        )
        .expect("series");

        assert_eq!(series.bars.len(), 2);
        assert!(series.bars[0].ts < series.bars[1].ts);
        assert!((series.bars[0].percent_change - 2.0).abs() < 1e-9);
        assert!((series.bars[1].percent_change - (99.0 / 102.0 - 1.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn skips_percent_change_after_zero_close() {
        let symbol = Symbol::parse("XYZ").expect("symbol");
        let series = PriceSeries::from_provider_bars(
            symbol,
            Timeframe::Daily,
            vec![raw(100, 0.0), raw(200, 10.0), raw(300, 11.0)],
        )
        .expect("series");

        // Bar at t=200 follows a zero close, so only t=300 has a defined change.
        assert_eq!(series.bars.len(), 1);
        assert!((series.bars[0].percent_change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_negative_price() {
        let ts = UtcDateTime::from_unix_seconds(0).expect("timestamp");
        let err = PriceBar::new(ts, -1.0, 2.0, 0.5, 1.0, None, 0.0).expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { field: "open" }));
    }
}
