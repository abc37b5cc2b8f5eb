use std::collections::HashMap;

use time::Duration;

use crate::provider::{HistoryFuture, MarketData, ProviderBar, ProviderError};
use crate::{Symbol, Timeframe, UtcDateTime};

/// Deterministic in-memory provider for tests and offline runs.
///
/// Series and failures are registered per (symbol, timeframe). In seeded
/// mode, unregistered symbols get a synthetic series derived from a stable
/// per-symbol seed, so repeated fetches return identical prices.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    series: HashMap<(Symbol, Timeframe), Vec<ProviderBar>>,
    failures: HashMap<Symbol, ProviderError>,
    synthesize_missing: bool,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offline mode: any symbol not explicitly registered gets seeded data.
    pub fn seeded() -> Self {
        Self {
            synthesize_missing: true,
            ..Self::default()
        }
    }

    pub fn with_series(
        mut self,
        symbol: Symbol,
        timeframe: Timeframe,
        bars: Vec<ProviderBar>,
    ) -> Self {
        self.series.insert((symbol, timeframe), bars);
        self
    }

    /// Register a symbol that resolves but has no bars for any window.
    pub fn with_empty(mut self, symbol: Symbol) -> Self {
        for timeframe in Timeframe::ALL {
            self.series.insert((symbol.clone(), timeframe), Vec::new());
        }
        self
    }

    pub fn with_failure(mut self, symbol: Symbol, error: ProviderError) -> Self {
        self.failures.insert(symbol, error);
        self
    }
}

impl MarketData for FixtureProvider {
    fn provider_name(&self) -> &'static str {
        "fixture"
    }

    fn history<'a>(&'a self, symbol: &'a Symbol, timeframe: Timeframe) -> HistoryFuture<'a> {
        Box::pin(async move {
            if let Some(error) = self.failures.get(symbol) {
                return Err(error.clone());
            }
            if let Some(bars) = self.series.get(&(symbol.clone(), timeframe)) {
                return Ok(bars.clone());
            }
            if self.synthesize_missing {
                return Ok(seeded_series(symbol, timeframe));
            }
            Ok(Vec::new())
        })
    }
}

/// Build a plausible synthetic series from a per-symbol seed.
fn seeded_series(symbol: &Symbol, timeframe: Timeframe) -> Vec<ProviderBar> {
    let seed = symbol_seed(symbol);
    let (step, count) = match timeframe {
        Timeframe::Daily => (Duration::days(1), 22),
        Timeframe::Weekly => (Duration::weeks(1), 13),
        Timeframe::Monthly => (Duration::days(30), 6),
        Timeframe::Intraday => (Duration::minutes(1), 60),
    };

    let now = UtcDateTime::now().into_inner();
    let mut bars = Vec::with_capacity(count);

    for index in 0..count {
        let offset = step * (count - index - 1) as i32;
        let ts = match UtcDateTime::from_offset_datetime(now - offset) {
            Ok(ts) => ts,
            Err(_) => continue,
        };
        let base = 90.0 + ((seed + index as u64 * 7) % 350) as f64 / 10.0;

        bars.push(ProviderBar {
            ts,
            open: base,
            high: base + 1.2,
            low: base - 0.8,
            close: base + 0.3,
            volume: Some(20_000 + index as u64 * 25),
        });
    }

    bars
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
