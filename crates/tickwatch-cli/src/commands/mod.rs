mod alerts;
mod bars;
mod snapshot;
mod watch;

use std::str::FromStr;

use tickwatch_core::{
    FixtureProvider, MarketData, RiskThresholds, Timeframe, Watchlist, YahooChartProvider,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Per-session evaluation context: the watchlist, thresholds, and timeframe
/// the user configured, plus the provider behind the seam. Passed explicitly
/// to every command; nothing lives in globals.
pub struct Session {
    pub watchlist: Watchlist,
    pub thresholds: RiskThresholds,
    pub timeframe: Timeframe,
    provider: Box<dyn MarketData>,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let watchlist = Watchlist::parse_list(&cli.symbols)?;
        if watchlist.is_empty() {
            return Err(CliError::Command(String::from(
                "--symbols must name at least one ticker",
            )));
        }

        let timeframe = Timeframe::from_str(&cli.timeframe)?;

        // Slider bounds from the dashboard: 1-10% stop-loss, 1-20% take-profit.
        if !(1.0..=10.0).contains(&cli.stop_loss) {
            return Err(CliError::Command(format!(
                "--stop-loss must be between 1 and 10 percent, got {}",
                cli.stop_loss
            )));
        }
        if !(1.0..=20.0).contains(&cli.take_profit) {
            return Err(CliError::Command(format!(
                "--take-profit must be between 1 and 20 percent, got {}",
                cli.take_profit
            )));
        }
        let thresholds = RiskThresholds::new(cli.stop_loss / 100.0, cli.take_profit / 100.0)?;

        let provider: Box<dyn MarketData> = if cli.fixture {
            Box::new(FixtureProvider::seeded())
        } else {
            Box::new(YahooChartProvider::new())
        };

        Ok(Self {
            watchlist,
            thresholds,
            timeframe,
            provider,
        })
    }

    pub fn provider(&self) -> &dyn MarketData {
        self.provider.as_ref()
    }
}

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let session = Session::from_cli(cli)?;

    match &cli.command {
        Command::Bars => bars::run(&session, cli.format).await,
        Command::Snapshot => snapshot::run(&session, cli.format).await,
        Command::Alerts(args) => alerts::run(args, &session, cli.format).await,
        Command::Watch(args) => watch::run(args, session, cli.format).await,
    }
}
