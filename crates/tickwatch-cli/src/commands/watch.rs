use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::warn;

use tickwatch_core::{
    run_refresh_loop, AlertGate, Notifier, RefreshConfig, Symbol, WatchlistMonitor,
    WebhookNotifier,
};

use crate::cli::{OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::Session;

pub async fn run(
    args: &WatchArgs,
    mut session: Session,
    format: OutputFormat,
) -> Result<(), CliError> {
    // One-shot watchlist edits before the loop starts; the running loop
    // iterates per-pass snapshots so the list stays stable mid-cycle.
    for symbol in &args.add {
        session.watchlist.add(Symbol::parse(symbol)?);
    }
    for symbol in &args.remove {
        session.watchlist.remove(&Symbol::parse(symbol)?);
    }
    if session.watchlist.is_empty() {
        return Err(CliError::Command(String::from(
            "watchlist is empty after --add/--remove edits",
        )));
    }

    let config = RefreshConfig::new(
        Duration::from_secs(args.interval),
        Duration::from_secs(args.jitter),
    )?;

    let session = Arc::new(session);
    let gate = Arc::new(Mutex::new(AlertGate::new(args.alert_policy.into())));
    let notifier = args
        .notify
        .notify_url
        .clone()
        .map(|url| Arc::new(WebhookNotifier::new(url)));
    let recipient = Arc::new(args.notify.recipient.clone());

    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {error}");
        }
    };

    run_refresh_loop(config, shutdown, move || {
        let session = Arc::clone(&session);
        let gate = Arc::clone(&gate);
        let notifier = notifier.clone();
        let recipient = Arc::clone(&recipient);

        async move {
            let monitor = WatchlistMonitor::new(session.provider());
            let mut report = monitor
                .evaluate(&session.watchlist, session.thresholds, session.timeframe)
                .await;
            report.alerts = gate.lock().await.admit(&report.alerts);

            if let Err(error) = output::render_report(&report, session.timeframe, format) {
                warn!("render failed: {error}");
            }

            if let Some(notifier) = &notifier {
                if !report.alerts.is_empty() {
                    let lines = output::alert_lines(&report.alerts);
                    if let Err(error) = notifier
                        .send("tickwatch alerts", &recipient, &lines)
                        .await
                    {
                        warn!("alert delivery failed: {error}");
                    }
                }
            }
        }
    })
    .await;

    Ok(())
}
