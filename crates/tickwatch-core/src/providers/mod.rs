//! Market-data adapters implementing the [`MarketData`](crate::MarketData) seam.

mod fixture;
mod yahoo;

pub use fixture::FixtureProvider;
pub use yahoo::YahooChartProvider;
