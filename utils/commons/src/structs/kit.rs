use super::*;

use core::ops::{Add, AddAssign, Sub};

/// An amount of the stable token kit, held in micro units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, SchemaType)]
pub struct Kit {
    pub micro_kit: u64,
}

impl Kit {
    pub const fn from_micro_kit(micro_kit: u64) -> Self {
        Self { micro_kit }
    }

    pub const fn from_kit(kit: u64) -> Self {
        Self {
            micro_kit: kit * KIT_SCALING_FACTOR,
        }
    }

    pub const fn zero() -> Self {
        Self { micro_kit: 0 }
    }

    /// Price a tez amount in kit: `ceil(tez * price)`, where `price` is kit
    /// per tez. Micro tez and micro kit scaling cancel out.
    pub fn of_tez_ceil(tez: Tez, price: Ratio) -> Kit {
        let num = tez.micro_tez as u128 * price.num as u128;
        Kit::from_micro_kit(div_ceil(num, price.den as u128))
    }

    /// `floor(self * part / whole)`, the proportional share of `self` that
    /// `part` represents within `whole`.
    pub fn scale_floor(self, part: Tez, whole: Tez) -> Kit {
        let num = self.micro_kit as u128 * part.micro_tez as u128;
        Kit::from_micro_kit((num / whole.micro_tez as u128) as u64)
    }

    /// `ceil(self * part / whole)`.
    pub fn scale_ceil(self, part: Tez, whole: Tez) -> Kit {
        let num = self.micro_kit as u128 * part.micro_tez as u128;
        Kit::from_micro_kit(div_ceil(num, whole.micro_tez as u128))
    }

    /// `ceil(self * ratio)`.
    pub fn ratio_ceil(self, ratio: Ratio) -> Kit {
        let num = self.micro_kit as u128 * ratio.num as u128;
        Kit::from_micro_kit(div_ceil(num, ratio.den as u128))
    }

    /// `ceil(self * fixed)` for a factor no greater than one.
    pub fn fixed_ceil(self, fixed: Fixed) -> Kit {
        let num = self.micro_kit as u128 * fixed.raw();
        Kit::from_micro_kit(((num + (Fixed::ONE_RAW - 1)) >> Fixed::FRACTIONAL_BITS) as u64)
    }
}

fn div_ceil(num: u128, den: u128) -> u64 {
    ((num + den - 1) / den) as u64
}

impl Add for Kit {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Kit::from_micro_kit(self.micro_kit.checked_add(rhs.micro_kit).unwrap_abort())
    }
}

impl AddAssign for Kit {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Kit {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Kit::from_micro_kit(self.micro_kit.checked_sub(rhs.micro_kit).unwrap_abort())
    }
}
