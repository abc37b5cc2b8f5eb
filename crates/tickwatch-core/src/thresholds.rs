use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Snapshot, Symbol, UtcDateTime, ValidationError};

/// Percentage-based risk thresholds, expressed as fractions of the open
/// price. Immutable for the duration of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    stop_loss: f64,
    take_profit: f64,
}

impl RiskThresholds {
    pub fn new(stop_loss: f64, take_profit: f64) -> Result<Self, ValidationError> {
        if !stop_loss.is_finite() || stop_loss <= 0.0 || stop_loss > 1.0 {
            return Err(ValidationError::InvalidStopLoss { value: stop_loss });
        }
        if !take_profit.is_finite() || take_profit <= 0.0 {
            return Err(ValidationError::InvalidTakeProfit { value: take_profit });
        }
        Ok(Self {
            stop_loss,
            take_profit,
        })
    }

    pub const fn stop_loss_fraction(self) -> f64 {
        self.stop_loss
    }

    pub const fn take_profit_fraction(self) -> f64 {
        self.take_profit
    }

    /// Price at or below which the stop-loss fires, relative to `open`.
    pub fn stop_loss_price(self, open: f64) -> f64 {
        open * (1.0 - self.stop_loss)
    }

    /// Price at or above which the take-profit fires, relative to `open`.
    pub fn take_profit_price(self, open: f64) -> f64 {
        open * (1.0 + self.take_profit)
    }

    /// Evaluate both thresholds against a snapshot.
    ///
    /// Stop-loss requires price strictly below open and take-profit strictly
    /// above, so for valid fractions the two can never fire together.
    pub fn evaluate(self, snapshot: &Snapshot) -> ThresholdHit {
        let stop_loss = snapshot.price < self.stop_loss_price(snapshot.open_price);
        let take_profit = snapshot.price > self.take_profit_price(snapshot.open_price);
        debug_assert!(
            !(stop_loss && take_profit),
            "stop-loss and take-profit fired together for {}",
            snapshot.symbol
        );
        ThresholdHit {
            stop_loss,
            take_profit,
        }
    }
}

/// Outcome of evaluating one snapshot against the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdHit {
    pub stop_loss: bool,
    pub take_profit: bool,
}

impl ThresholdHit {
    pub const fn any(self) -> bool {
        self.stop_loss || self.take_profit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    StopLoss,
    TakeProfit,
}

impl Display for AlertKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::StopLoss => "stop-loss",
            Self::TakeProfit => "take-profit",
        })
    }
}

/// One threshold crossing, recomputed every refresh cycle and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub symbol: Symbol,
    pub kind: AlertKind,
    pub trigger_price: f64,
    pub threshold_price: f64,
    pub at: UtcDateTime,
}

impl AlertEvent {
    /// Derive at most one alert from a snapshot. Stop-loss is checked first;
    /// the ordering only matters if thresholds were somehow inverted.
    pub fn from_snapshot(
        snapshot: &Snapshot,
        thresholds: RiskThresholds,
    ) -> Option<Self> {
        let hit = thresholds.evaluate(snapshot);
        let (kind, threshold_price) = if hit.stop_loss {
            (
                AlertKind::StopLoss,
                thresholds.stop_loss_price(snapshot.open_price),
            )
        } else if hit.take_profit {
            (
                AlertKind::TakeProfit,
                thresholds.take_profit_price(snapshot.open_price),
            )
        } else {
            return None;
        };

        Some(Self {
            symbol: snapshot.symbol.clone(),
            kind,
            trigger_price: snapshot.price,
            threshold_price,
            at: snapshot.as_of,
        })
    }

    /// Human-readable alert line for display and notification bodies.
    pub fn message(&self) -> String {
        match self.kind {
            AlertKind::StopLoss => format!(
                "{}: stop-loss hit at {:.2} (threshold {:.2})",
                self.symbol, self.trigger_price, self.threshold_price
            ),
            AlertKind::TakeProfit => format!(
                "{}: take-profit hit at {:.2} (threshold {:.2})",
                self.symbol, self.trigger_price, self.threshold_price
            ),
        }
    }
}

/// Whether a standing condition re-fires on every refresh cycle or only on
/// its rising edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertPolicy {
    /// Re-emit while the condition holds. Matches the original dashboard.
    EveryCycle,
    /// Emit once, then suppress until the condition clears.
    FireOnce,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::EveryCycle
    }
}

/// Edge detector backing [`AlertPolicy::FireOnce`].
///
/// Tracks which (symbol, kind) pairs are currently standing; `admit` returns
/// whether an alert should be delivered this cycle.
#[derive(Debug, Default)]
pub struct AlertGate {
    policy: AlertPolicy,
    standing: HashSet<(Symbol, AlertKind)>,
}

impl AlertGate {
    pub fn new(policy: AlertPolicy) -> Self {
        Self {
            policy,
            standing: HashSet::new(),
        }
    }

    /// Filter one cycle's alerts through the policy and update edge state.
    /// Conditions absent from `alerts` are considered cleared.
    pub fn admit(&mut self, alerts: &[AlertEvent]) -> Vec<AlertEvent> {
        let current: HashSet<(Symbol, AlertKind)> = alerts
            .iter()
            .map(|alert| (alert.symbol.clone(), alert.kind))
            .collect();

        let admitted = match self.policy {
            AlertPolicy::EveryCycle => alerts.to_vec(),
            AlertPolicy::FireOnce => alerts
                .iter()
                .filter(|alert| {
                    !self
                        .standing
                        .contains(&(alert.symbol.clone(), alert.kind))
                })
                .cloned()
                .collect(),
        };

        self.standing = current;
        admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(symbol: &str, price: f64, open: f64) -> Snapshot {
        Snapshot::new(
            Symbol::parse(symbol).expect("symbol"),
            price,
            open,
            Some(1_000),
            UtcDateTime::parse("2025-06-02T15:00:00Z").expect("timestamp"),
        )
        .expect("snapshot")
    }

    #[test]
    fn rejects_out_of_range_fractions() {
        assert!(matches!(
            RiskThresholds::new(0.0, 0.1),
            Err(ValidationError::InvalidStopLoss { .. })
        ));
        assert!(matches!(
            RiskThresholds::new(1.5, 0.1),
            Err(ValidationError::InvalidStopLoss { .. })
        ));
        assert!(matches!(
            RiskThresholds::new(0.05, 0.0),
            Err(ValidationError::InvalidTakeProfit { .. })
        ));
    }

    #[test]
    fn stop_loss_fires_below_band() {
        let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
        let hit = thresholds.evaluate(&snapshot("AAA", 89.0, 100.0));
        assert!(hit.stop_loss);
        assert!(!hit.take_profit);
    }

    #[test]
    fn take_profit_fires_above_band() {
        let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
        let hit = thresholds.evaluate(&snapshot("BBB", 61.0, 50.0));
        assert!(hit.take_profit);
        assert!(!hit.stop_loss);
    }

    #[test]
    fn inside_band_is_quiet() {
        let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
        let hit = thresholds.evaluate(&snapshot("CCC", 100.0, 100.0));
        assert!(!hit.any());
    }

    #[test]
    fn alert_message_includes_threshold_price() {
        let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
        let alert = AlertEvent::from_snapshot(&snapshot("AAA", 89.0, 100.0), thresholds)
            .expect("alert");
        assert_eq!(alert.kind, AlertKind::StopLoss);
        assert!(alert.message().contains("90.00"));
    }

    #[test]
    fn fire_once_gate_suppresses_standing_alerts() {
        let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
        let alert = AlertEvent::from_snapshot(&snapshot("AAA", 89.0, 100.0), thresholds)
            .expect("alert");
        let mut gate = AlertGate::new(AlertPolicy::FireOnce);

        assert_eq!(gate.admit(std::slice::from_ref(&alert)).len(), 1);
        assert_eq!(gate.admit(std::slice::from_ref(&alert)).len(), 0);

        // Condition clears, then re-fires.
        assert_eq!(gate.admit(&[]).len(), 0);
        assert_eq!(gate.admit(std::slice::from_ref(&alert)).len(), 1);
    }

    #[test]
    fn every_cycle_gate_repeats_alerts() {
        let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
        let alert = AlertEvent::from_snapshot(&snapshot("AAA", 89.0, 100.0), thresholds)
            .expect("alert");
        let mut gate = AlertGate::new(AlertPolicy::EveryCycle);

        assert_eq!(gate.admit(std::slice::from_ref(&alert)).len(), 1);
        assert_eq!(gate.admit(std::slice::from_ref(&alert)).len(), 1);
    }
}
