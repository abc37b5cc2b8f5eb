use clap::{Args, Parser, Subcommand, ValueEnum};
use tickwatch_core::AlertPolicy;

/// Watchlist price monitoring: history tables, latest snapshots, and
/// stop-loss / take-profit alerts.
#[derive(Debug, Parser)]
#[command(name = "tickwatch", version, about)]
pub struct Cli {
    /// Comma-separated watchlist symbols.
    #[arg(long, global = true, default_value = "SPY,QQQ,DIA")]
    pub symbols: String,

    /// Lookback window: daily, weekly, or monthly.
    #[arg(long, global = true, default_value = "daily")]
    pub timeframe: String,

    /// Stop-loss threshold in percent below open (1-10).
    #[arg(long, global = true, default_value_t = 5.0)]
    pub stop_loss: f64,

    /// Take-profit threshold in percent above open (1-20).
    #[arg(long, global = true, default_value_t = 10.0)]
    pub take_profit: f64,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Use the deterministic offline provider instead of the live endpoint.
    #[arg(long, global = true)]
    pub fixture: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and display the price history table per watchlist symbol.
    Bars,
    /// Latest intraday snapshot per symbol with threshold flags.
    Snapshot,
    /// Run one threshold scan and print (optionally deliver) alerts.
    Alerts(AlertsArgs),
    /// Refresh loop: evaluate and render the full dashboard on a cadence.
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Mail-gateway/webhook URL to deliver alert batches to.
    #[arg(long)]
    pub notify_url: Option<String>,

    /// Recipient passed through to the notification transport.
    #[arg(long, default_value = "alerts@localhost")]
    pub recipient: String,
}

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(flatten)]
    pub notify: NotifyArgs,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds.
    #[arg(long, default_value_t = 300)]
    pub interval: u64,

    /// Maximum random jitter in seconds added before each cycle.
    #[arg(long, default_value_t = 0)]
    pub jitter: u64,

    /// Re-fire standing alerts every cycle, or only on their rising edge.
    #[arg(long, value_enum, default_value_t = AlertPolicyArg::EveryCycle)]
    pub alert_policy: AlertPolicyArg,

    /// Symbols to add to the watchlist before the loop starts.
    #[arg(long)]
    pub add: Vec<String>,

    /// Symbols to remove from the watchlist before the loop starts.
    #[arg(long)]
    pub remove: Vec<String>,

    #[command(flatten)]
    pub notify: NotifyArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlertPolicyArg {
    EveryCycle,
    FireOnce,
}

impl std::fmt::Display for AlertPolicyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::EveryCycle => "every-cycle",
            Self::FireOnce => "fire-once",
        })
    }
}

impl From<AlertPolicyArg> for AlertPolicy {
    fn from(value: AlertPolicyArg) -> Self {
        match value {
            AlertPolicyArg::EveryCycle => Self::EveryCycle,
            AlertPolicyArg::FireOnce => Self::FireOnce,
        }
    }
}
