use super::*;

use core::ops::{Add, Sub};

/// An amount of the collateral token tez, held in micro units (mutez).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, SchemaType)]
pub struct Tez {
    pub micro_tez: u64,
}

impl Tez {
    pub const fn from_micro_tez(micro_tez: u64) -> Self {
        Self { micro_tez }
    }

    pub const fn from_tez(tez: u64) -> Self {
        Self {
            micro_tez: tez * TEZ_SCALING_FACTOR,
        }
    }

    pub const fn zero() -> Self {
        Self { micro_tez: 0 }
    }

    /// `floor(self * ratio)`.
    pub fn ratio_floor(self, ratio: Ratio) -> Tez {
        Tez::from_micro_tez(
            (self.micro_tez as u128 * ratio.num as u128 / ratio.den as u128) as u64,
        )
    }
}

impl Add for Tez {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Tez::from_micro_tez(self.micro_tez.checked_add(rhs.micro_tez).unwrap_abort())
    }
}

impl Sub for Tez {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Tez::from_micro_tez(self.micro_tez.checked_sub(rhs.micro_tez).unwrap_abort())
    }
}
