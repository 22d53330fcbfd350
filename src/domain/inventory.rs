use serde::{Deserialize, Serialize};
use thiserror::Error;

const MG_PER_GRAM: u64 = 1_000;
const MG_PER_KILOGRAM: u64 = 1_000_000;
const MG_PER_TON: u64 = 1_000_000_000;

/// Subtraction would leave the stock negative. The stock itself is never
/// mutated; the caller keeps the original level.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("not enough stock available: have {available_milligrams} mg, requested {requested_milligrams} mg")]
pub struct InsufficientStock {
    pub available_milligrams: u64,
    pub requested_milligrams: u64,
}

/// A stock quantity broken into mass units.
///
/// All arithmetic happens on the exact milligram total; the per-unit fields
/// are a presentation of that total, never computed in floating point.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct StockLevel {
    pub tons: u64,
    pub kilograms: u64,
    pub grams: u64,
    pub milligrams: u64,
}

impl StockLevel {
    pub fn new(tons: u64, kilograms: u64, grams: u64, milligrams: u64) -> Self {
        Self {
            tons,
            kilograms,
            grams,
            milligrams,
        }
    }

    pub const ZERO: Self = Self {
        tons: 0,
        kilograms: 0,
        grams: 0,
        milligrams: 0,
    };

    pub fn total_milligrams(&self) -> u64 {
        self.tons * MG_PER_TON
            + self.kilograms * MG_PER_KILOGRAM
            + self.grams * MG_PER_GRAM
            + self.milligrams
    }

    pub fn from_milligrams(mut milligrams: u64) -> Self {
        let tons = milligrams / MG_PER_TON;
        milligrams %= MG_PER_TON;
        let kilograms = milligrams / MG_PER_KILOGRAM;
        milligrams %= MG_PER_KILOGRAM;
        let grams = milligrams / MG_PER_GRAM;
        let milligrams = milligrams % MG_PER_GRAM;
        Self {
            tons,
            kilograms,
            grams,
            milligrams,
        }
    }

    /// Returns the stock level after removing `sold`, or `InsufficientStock`
    /// if the subtraction would go negative. Atomic check-then-update: on
    /// error nothing has changed.
    pub fn subtract(&self, sold: &StockLevel) -> Result<StockLevel, InsufficientStock> {
        let available = self.total_milligrams();
        let requested = sold.total_milligrams();
        match available.checked_sub(requested) {
            Some(remaining) => Ok(Self::from_milligrams(remaining)),
            None => Err(InsufficientStock {
                available_milligrams: available,
                requested_milligrams: requested,
            }),
        }
    }
}
