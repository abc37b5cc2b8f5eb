use tickwatch_core::{SnapshotRow, WatchlistMonitor};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::Session;

pub async fn run(session: &Session, format: OutputFormat) -> Result<(), CliError> {
    let monitor = WatchlistMonitor::new(session.provider());

    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for symbol in session.watchlist.snapshot() {
        match monitor.latest_snapshot(&symbol).await {
            Ok(snapshot) => {
                let hit = session.thresholds.evaluate(&snapshot);
                let tone = snapshot.tone();
                rows.push(SnapshotRow {
                    snapshot,
                    hit,
                    tone,
                });
            }
            Err(reason) => warnings.push(reason.describe(&symbol)),
        }
    }

    output::render_snapshots(&rows, &warnings, format)
}
