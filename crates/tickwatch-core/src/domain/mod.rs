//! Canonical domain types: symbols, timestamps, timeframes, bars, snapshots.

mod bar;
mod snapshot;
mod symbol;
mod timeframe;
mod timestamp;

pub use bar::{PriceBar, PriceSeries};
pub use snapshot::{RowTone, Snapshot};
pub use symbol::Symbol;
pub use timeframe::Timeframe;
pub use timestamp::UtcDateTime;
