//! Q-format fixed-point scalar.
//!
//! Every value is an `i32` scaled by `2^-FRAC_BITS`. Products and quotients are
//! computed in `i64` and narrowed back. None of the operations here can fail:
//! undefined cases (divide by zero, square root of a non-positive value) resolve
//! to zero so callers can keep a straight-line control flow.

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 12;

const ONE_RAW: i32 = 1 << FRAC_BITS;

/// Signed fixed-point scalar with [`FRAC_BITS`] fractional bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(ONE_RAW);
    /// Smallest positive value. Used as the self-intersection threshold.
    pub const EPSILON: Fixed = Fixed(1);
    /// Distance sentinel for "no hit".
    pub const INFINITY: Fixed = Fixed(i32::MAX);

    /// Wrap a raw scaled integer.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw scaled integer.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert an integer.
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n << FRAC_BITS)
    }

    /// Convert a float, rounding half away from zero.
    pub fn from_f32(x: f32) -> Self {
        let bias = if x >= 0.0 { 0.5 } else { -0.5 };
        Self((x * ONE_RAW as f32 + bias) as i32)
    }

    /// `num / den` as a fixed-point value. Zero when `den` is zero.
    pub fn from_ratio(num: i32, den: i32) -> Self {
        Self::from_int(num) / Self::from_int(den)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE_RAW as f32
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Widening multiply followed by an arithmetic shift.
    #[inline]
    pub fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(((self.0 as i64 * rhs.0 as i64) >> FRAC_BITS) as i32)
    }

    /// Widening divide. Returns zero when `rhs` is zero.
    #[inline]
    pub fn div(self, rhs: Fixed) -> Fixed {
        if rhs.0 == 0 {
            return Fixed::ZERO;
        }
        Fixed((((self.0 as i64) << FRAC_BITS) / rhs.0 as i64) as i32)
    }

    /// Approximate `1 / sqrt(self)`.
    ///
    /// Bit-level seed on the `f32` image of the value, refined by a single Newton
    /// step. Relative error stays below 0.2%. Zero for non-positive inputs.
    pub fn inv_sqrt(self) -> Fixed {
        if self.0 <= 0 {
            return Fixed::ZERO;
        }
        let x = self.to_f32();
        let y = f32::from_bits(0x5f37_59df - (x.to_bits() >> 1));
        let y = y * (1.5 - 0.5 * x * y * y);
        Fixed((y * ONE_RAW as f32) as i32)
    }

    /// Approximate square root, `self * inv_sqrt(self)`. Zero for non-positive inputs.
    pub fn sqrt(self) -> Fixed {
        if self.0 <= 0 {
            return Fixed::ZERO;
        }
        self.mul(self.inv_sqrt())
    }

    /// Map a linear intensity to an 8-bit channel.
    ///
    /// The value is boosted by `2^brightness_shift`, rescaled so that `ONE`
    /// lands on 255, then clamped.
    pub fn to_display_byte(self, brightness_shift: u32) -> u8 {
        let boosted = (self.0 as i64) << brightness_shift;
        let val = (boosted * 255) >> FRAC_BITS;
        val.clamp(0, 255) as u8
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.to_f32())
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::mul(self, rhs)
    }
}

impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        Fixed::div(self, rhs)
    }
}
