use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime, ValidationError};

/// Latest-price view of one symbol, derived from the last intraday bar.
///
/// Prices are rounded to two decimals at construction so display and
/// threshold arithmetic see the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: Symbol,
    pub price: f64,
    pub open_price: f64,
    pub change_pct: f64,
    pub volume: Option<u64>,
    pub as_of: UtcDateTime,
}

impl Snapshot {
    pub fn new(
        symbol: Symbol,
        price: f64,
        open_price: f64,
        volume: Option<u64>,
        as_of: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }
        if price < 0.0 {
            return Err(ValidationError::NegativeValue { field: "price" });
        }
        if !open_price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "open_price" });
        }
        // Zero open would divide by zero in the change computation and make
        // percentage thresholds meaningless.
        if open_price <= 0.0 {
            return Err(ValidationError::ZeroOpenPrice { value: open_price });
        }

        let price = round2(price);
        let open_price = round2(open_price);
        let change_pct = round2((price - open_price) / open_price * 100.0);

        Ok(Self {
            symbol,
            price,
            open_price,
            change_pct,
            volume,
            as_of,
        })
    }

    /// Visual hint for the snapshot row.
    pub fn tone(&self) -> RowTone {
        RowTone::for_prices(self.price, self.open_price)
    }
}

/// Per-row display hint derived from current price versus open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTone {
    Positive,
    Negative,
    Neutral,
}

impl RowTone {
    /// Pure derivation: above open is positive, below is negative, equality
    /// is neutral.
    pub fn for_prices(price: f64, open: f64) -> Self {
        if price > open {
            Self::Positive
        } else if price < open {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

/// Round to two decimal places, the display precision for prices.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol() -> Symbol {
        Symbol::parse("SPY").expect("symbol")
    }

    #[test]
    fn rounds_prices_and_change() {
        let snap = Snapshot::new(symbol(), 101.239, 100.0, Some(10), UtcDateTime::now())
            .expect("snapshot");
        assert_eq!(snap.price, 101.24);
        assert_eq!(snap.change_pct, 1.24);
    }

    #[test]
    fn rejects_zero_open() {
        let err = Snapshot::new(symbol(), 10.0, 0.0, None, UtcDateTime::now())
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::ZeroOpenPrice { .. }));
    }

    #[test]
    fn equality_is_neutral() {
        assert_eq!(RowTone::for_prices(100.0, 100.0), RowTone::Neutral);
        assert_eq!(RowTone::for_prices(100.01, 100.0), RowTone::Positive);
        assert_eq!(RowTone::for_prices(99.99, 100.0), RowTone::Negative);
    }
}
