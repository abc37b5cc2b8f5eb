use tickwatch_core::{Fetched, WatchlistMonitor};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::Session;

pub async fn run(session: &Session, format: OutputFormat) -> Result<(), CliError> {
    let monitor = WatchlistMonitor::new(session.provider());

    let mut series_list = Vec::new();
    let mut warnings = Vec::new();

    for symbol in session.watchlist.snapshot() {
        match monitor.fetch_series(&symbol, session.timeframe).await {
            Fetched::Series(series) => series_list.push(series),
            Fetched::Empty(reason) => warnings.push(reason.describe(&symbol)),
        }
    }

    output::render_bars(&series_list, &warnings, session.timeframe, format)
}
