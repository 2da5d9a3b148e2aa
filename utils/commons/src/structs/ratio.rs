use super::*;

/// A rational rate `num / den`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct Ratio {
    pub num: u64,
    pub den: u64,
}

impl Ratio {
    pub const fn new(num: u64, den: u64) -> Self {
        Self { num, den }
    }
}

/// Unsigned fixed point number with 64 fractional bits, used for the
/// descending reserve price. Only factors no greater than one are ever
/// built, so products of two factors fit in a `u128`. Transient math only,
/// never stored in state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed {
    raw: u128,
}

impl Fixed {
    pub const FRACTIONAL_BITS: u32 = 64;
    pub const ONE_RAW: u128 = 1 << Self::FRACTIONAL_BITS;

    pub const fn one() -> Self {
        Self { raw: Self::ONE_RAW }
    }

    pub const fn raw(self) -> u128 {
        self.raw
    }

    /// `ceil(1 - ratio)` for a ratio strictly between zero and one.
    pub fn complement_ceil(ratio: Ratio) -> Fixed {
        let num = (ratio.den - ratio.num) as u128;
        let den = ratio.den as u128;
        Fixed {
            raw: ((num << Self::FRACTIONAL_BITS) + den - 1) / den,
        }
    }

    /// `ceil(self * rhs)`.
    pub fn mul_ceil(self, rhs: Fixed) -> Fixed {
        Fixed {
            raw: (self.raw * rhs.raw + (Self::ONE_RAW - 1)) >> Self::FRACTIONAL_BITS,
        }
    }

    /// `self` raised to an integer exponent, by squaring, rounding every
    /// intermediate product up.
    pub fn pow_ceil(self, mut exp: u64) -> Fixed {
        let mut base = self;
        let mut acc = Fixed::one();
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc.mul_ceil(base);
            }
            exp >>= 1;
            if exp > 0 {
                base = base.mul_ceil(base);
            }
        }
        acc
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_complement_of_ratio() {
        let half = Fixed::complement_ceil(Ratio::new(1, 2));
        claim_eq!(half.raw(), Fixed::ONE_RAW / 2);
    }

    #[concordium_test]
    fn test_pow_of_one_half() {
        let half = Fixed::complement_ceil(Ratio::new(1, 2));
        let eighth = half.pow_ceil(3);
        claim_eq!(eighth.raw(), Fixed::ONE_RAW / 8);
    }

    #[concordium_test]
    fn test_pow_zero_is_one() {
        let half = Fixed::complement_ceil(Ratio::new(1, 2));
        claim_eq!(half.pow_ceil(0), Fixed::one());
    }

    #[concordium_test]
    fn test_kit_fixed_ceil() {
        let half = Fixed::complement_ceil(Ratio::new(1, 2));
        claim_eq!(Kit::from_kit(10).fixed_ceil(half), Kit::from_kit(5));
        claim_eq!(Kit::from_kit(10).fixed_ceil(Fixed::one()), Kit::from_kit(10));
        claim_eq!(
            Kit::from_micro_kit(3).fixed_ceil(half),
            Kit::from_micro_kit(2)
        );
    }

    #[concordium_test]
    fn test_scale_rounding() {
        let kit = Kit::from_micro_kit(10);
        let part = Tez::from_micro_tez(1);
        let whole = Tez::from_micro_tez(3);
        claim_eq!(kit.scale_floor(part, whole), Kit::from_micro_kit(3));
        claim_eq!(kit.scale_ceil(part, whole), Kit::from_micro_kit(4));
    }
}
