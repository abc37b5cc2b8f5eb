use tracing::warn;

use tickwatch_core::{Notifier, WatchlistMonitor, WebhookNotifier};

use crate::cli::{AlertsArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::Session;

pub async fn run(
    args: &AlertsArgs,
    session: &Session,
    format: OutputFormat,
) -> Result<(), CliError> {
    let monitor = WatchlistMonitor::new(session.provider());
    let scan = monitor
        .build_alerts(&session.watchlist, session.thresholds)
        .await;

    output::render_alert_scan(&scan, format)?;

    // Delivery failure never fails the command; the alerts were already
    // rendered above.
    if let Some(url) = &args.notify.notify_url {
        if !scan.alerts.is_empty() {
            let notifier = WebhookNotifier::new(url.clone());
            let lines = output::alert_lines(&scan.alerts);
            if let Err(error) = notifier
                .send("tickwatch alerts", &args.notify.recipient, &lines)
                .await
            {
                warn!("alert delivery failed: {error}");
            }
        }
    }

    Ok(())
}
