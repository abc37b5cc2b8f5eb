use serde_json::json;
use tickwatch_core::{
    AlertEvent, AlertScan, EvaluationReport, PriceSeries, RowTone, SnapshotRow, Timeframe,
    UtcDateTime,
};

use crate::cli::OutputFormat;
use crate::error::CliError;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

fn paint(tone: RowTone, text: String) -> String {
    match tone {
        RowTone::Positive => format!("{GREEN}{text}{RESET}"),
        RowTone::Negative => format!("{RED}{text}{RESET}"),
        RowTone::Neutral => text,
    }
}

/// Date column: calendar date for daily-or-coarser bars, full timestamp for
/// intraday rows.
fn format_ts(ts: UtcDateTime, timeframe: Timeframe) -> String {
    match timeframe {
        Timeframe::Intraday => ts.format_rfc3339(),
        _ => ts.date().to_string(),
    }
}

fn format_volume(volume: Option<u64>) -> String {
    volume.map_or_else(|| String::from("-"), |v| v.to_string())
}

pub fn render_bars(
    series_list: &[PriceSeries],
    warnings: &[String],
    timeframe: Timeframe,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let value = json!({ "series": series_list, "warnings": warnings });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            for series in series_list {
                println!("{} ({} bars, {})", series.symbol, series.bars.len(), timeframe);
                println!(
                    "{:<22} {:>10} {:>10} {:>10} {:>10} {:>12} {:>9}",
                    "Date", "Open", "High", "Low", "Price", "Volume", "Change%"
                );
                for bar in &series.bars {
                    let line = format!(
                        "{:<22} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12} {:>8.2}%",
                        format_ts(bar.ts, timeframe),
                        bar.open,
                        bar.high,
                        bar.low,
                        bar.close,
                        format_volume(bar.volume),
                        bar.percent_change,
                    );
                    println!("{}", paint(RowTone::for_prices(bar.close, bar.open), line));
                }
                println!();
            }
            render_warnings(warnings);
        }
    }
    Ok(())
}

pub fn render_snapshots(
    rows: &[SnapshotRow],
    warnings: &[String],
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let value = json!({ "snapshots": rows, "warnings": warnings });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!(
                "{:<10} {:>10} {:>10} {:>9} {:>12} {:>6} {:>6}",
                "Ticker", "Open", "Price", "Change%", "Volume", "SL", "TP"
            );
            for row in rows {
                let line = format!(
                    "{:<10} {:>10.2} {:>10.2} {:>8.2}% {:>12} {:>6} {:>6}",
                    row.snapshot.symbol,
                    row.snapshot.open_price,
                    row.snapshot.price,
                    row.snapshot.change_pct,
                    format_volume(row.snapshot.volume),
                    flag(row.hit.stop_loss),
                    flag(row.hit.take_profit),
                );
                println!("{}", paint(row.tone, line));
            }
            render_warnings(warnings);
        }
    }
    Ok(())
}

pub fn render_alert_scan(scan: &AlertScan, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(scan)?);
        }
        OutputFormat::Text => {
            if scan.alerts.is_empty() {
                println!("no alerts");
            }
            for alert in &scan.alerts {
                println!("ALERT {}", alert.message());
            }
            render_warnings(&scan.warnings);
        }
    }
    Ok(())
}

pub fn render_report(
    report: &EvaluationReport,
    timeframe: Timeframe,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            println!("=== tickwatch {} ===", report.generated_at);
            for ticker in &report.tickers {
                println!();
                println!("{} ({})", ticker.symbol, timeframe);
                println!(
                    "{:<22} {:>10} {:>10} {:>10} {:>10} {:>12} {:>9}",
                    "Date", "Open", "High", "Low", "Price", "Volume", "Change%"
                );
                for row in &ticker.rows {
                    let line = format!(
                        "{:<22} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12} {:>8.2}%",
                        format_ts(row.ts, timeframe),
                        row.open,
                        row.high,
                        row.low,
                        row.price,
                        format_volume(row.volume),
                        row.change_pct,
                    );
                    println!("{}", paint(row.tone, line));
                }
                if let Some(snapshot) = &ticker.snapshot {
                    let line = format!(
                        "latest: {:.2} (open {:.2}, {:+.2}%) SL:{} TP:{}",
                        snapshot.snapshot.price,
                        snapshot.snapshot.open_price,
                        snapshot.snapshot.change_pct,
                        flag(snapshot.hit.stop_loss),
                        flag(snapshot.hit.take_profit),
                    );
                    println!("{}", paint(snapshot.tone, line));
                }
            }
            println!();
            for alert in &report.alerts {
                println!("ALERT {}", alert.message());
            }
            render_warnings(&report.warnings);
        }
    }
    Ok(())
}

pub fn alert_lines(alerts: &[AlertEvent]) -> Vec<String> {
    alerts.iter().map(AlertEvent::message).collect()
}

fn render_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("warning: {warning}");
    }
}

const fn flag(hit: bool) -> &'static str {
    if hit {
        "yes"
    } else {
        "-"
    }
}
