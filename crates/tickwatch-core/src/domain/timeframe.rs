use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Enumerated lookback windows: each timeframe fixes both the provider range
/// and the bar interval, mirroring the dashboard's period selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// One month of daily bars.
    Daily,
    /// Three months of weekly bars.
    Weekly,
    /// Six months of monthly bars.
    Monthly,
    /// One day of one-minute bars, used for latest-price snapshots.
    Intraday,
}

impl Timeframe {
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Intraday];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Intraday => "intraday",
        }
    }

    /// Provider range code for the lookback period.
    pub const fn range_code(self) -> &'static str {
        match self {
            Self::Daily => "1mo",
            Self::Weekly => "3mo",
            Self::Monthly => "6mo",
            Self::Intraday => "1d",
        }
    }

    /// Provider interval code for the bar width.
    pub const fn interval_code(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
            Self::Intraday => "1m",
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "intraday" => Ok(Self::Intraday),
            other => Err(ValidationError::InvalidTimeframe {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timeframe() {
        let timeframe = Timeframe::from_str("Weekly").expect("must parse");
        assert_eq!(timeframe, Timeframe::Weekly);
        assert_eq!(timeframe.range_code(), "3mo");
        assert_eq!(timeframe.interval_code(), "1wk");
    }

    #[test]
    fn rejects_unknown_timeframe() {
        let err = Timeframe::from_str("yearly").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimeframe { .. }));
    }
}
