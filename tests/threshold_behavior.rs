//! Behavior tests for threshold evaluation and alert gating.

use tickwatch_core::{
    AlertEvent, AlertGate, AlertPolicy, RiskThresholds, RowTone, Snapshot, Symbol, UtcDateTime,
};

fn snapshot(price: f64, open: f64) -> Snapshot {
    Snapshot::new(
        Symbol::parse("TST").expect("symbol"),
        price,
        open,
        Some(1_000),
        UtcDateTime::parse("2025-06-02T15:30:00Z").expect("timestamp"),
    )
    .expect("snapshot")
}

#[test]
fn stop_loss_and_take_profit_are_mutually_exclusive() {
    // Sweep fractions through their valid ranges and prices around the open.
    let fractions = [0.01, 0.05, 0.10, 0.50, 1.0];
    let profit_fractions = [0.01, 0.10, 0.20, 0.50, 2.0];
    let opens = [0.5, 10.0, 100.0, 2_500.0];
    let ratios = [0.01, 0.5, 0.89, 0.999, 1.0, 1.001, 1.21, 3.0];

    for &stop in &fractions {
        for &profit in &profit_fractions {
            let thresholds = RiskThresholds::new(stop, profit).expect("valid thresholds");
            for &open in &opens {
                for &ratio in &ratios {
                    let hit = thresholds.evaluate(&snapshot(open * ratio, open));
                    assert!(
                        !(hit.stop_loss && hit.take_profit),
                        "both fired for stop={stop} profit={profit} open={open} ratio={ratio}"
                    );
                }
            }
        }
    }
}

#[test]
fn prices_exactly_on_a_band_do_not_trigger() {
    let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");

    // 100 * 0.90 = 90 exactly: strictly-below comparison stays quiet.
    let hit = thresholds.evaluate(&snapshot(90.0, 100.0));
    assert!(!hit.stop_loss);

    // 100 * 1.20 = 120 exactly.
    let hit = thresholds.evaluate(&snapshot(120.0, 100.0));
    assert!(!hit.take_profit);
}

#[test]
fn equality_with_open_renders_neutral() {
    let snap = snapshot(100.0, 100.0);
    assert_eq!(snap.tone(), RowTone::Neutral);
}

#[test]
fn alert_carries_snapshot_timestamp() {
    let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
    let snap = snapshot(89.0, 100.0);
    let alert = AlertEvent::from_snapshot(&snap, thresholds).expect("alert");
    assert_eq!(alert.at, snap.as_of);
}

#[test]
fn fire_once_policy_emits_on_rising_edge_only() {
    let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
    let standing = AlertEvent::from_snapshot(&snapshot(89.0, 100.0), thresholds)
        .map(|alert| vec![alert])
        .expect("alert");

    let mut gate = AlertGate::new(AlertPolicy::FireOnce);
    assert_eq!(gate.admit(&standing).len(), 1, "first cycle fires");
    assert_eq!(gate.admit(&standing).len(), 0, "second cycle suppressed");
    assert_eq!(gate.admit(&[]).len(), 0, "condition clears");
    assert_eq!(gate.admit(&standing).len(), 1, "re-fires after clearing");
}

#[test]
fn every_cycle_policy_matches_source_behavior() {
    let thresholds = RiskThresholds::new(0.10, 0.20).expect("thresholds");
    let standing = AlertEvent::from_snapshot(&snapshot(89.0, 100.0), thresholds)
        .map(|alert| vec![alert])
        .expect("alert");

    let mut gate = AlertGate::new(AlertPolicy::EveryCycle);
    for _ in 0..3 {
        assert_eq!(gate.admit(&standing).len(), 1);
    }
}
