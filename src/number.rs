use crate::error::Error;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};
use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

// Past these powers of ten an f64 is infinite or zero whatever the digits are
const F64_MAX_POWER: i64 = 310;
const F64_MIN_POWER: i64 = -330;

/// An arbitrary-precision JSON number.
///
/// Equality and hashing follow the numeric value, so `1.0` and `1.00` are the same number.
/// The narrowing conversions never check for overflow: the fraction is truncated toward zero
/// and only the low-order bits of the integer part are kept.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Number(BigDecimal);

impl Number {
    pub fn new(value: BigDecimal) -> Self {
        Self(value)
    }

    pub fn to_i8(&self) -> i8 {
        self.to_i64() as i8
    }

    pub fn to_i16(&self) -> i16 {
        self.to_i64() as i16
    }

    pub fn to_i32(&self) -> i32 {
        self.to_i64() as i32
    }

    pub fn to_i64(&self) -> i64 {
        let (digits, power) = self.parts();
        // 10^k is a multiple of 2^k, so nothing reaches the low 64 bits
        if power >= 64 {
            return 0;
        }

        let bytes = expand(digits, power).to_signed_bytes_le();
        let fill = match bytes.last() {
            Some(byte) if byte & 0x80 != 0 => 0xff,
            _ => 0x00,
        };

        let mut low = [fill; 8];
        for (slot, byte) in low.iter_mut().zip(bytes) {
            *slot = byte;
        }

        i64::from_le_bytes(low)
    }

    pub fn to_u64(&self) -> u64 {
        self.to_i64() as u64
    }

    /// The value as an `i64` when it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        self.exact_integer().and_then(|int| i64::try_from(&int).ok())
    }

    /// The value as a `u64` when it is a non-negative integer in range.
    pub fn as_u64(&self) -> Option<u64> {
        self.exact_integer().and_then(|int| u64::try_from(&int).ok())
    }

    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    pub fn to_f64(&self) -> f64 {
        let (digits, power) = self.parts();
        let magnitude = power.saturating_add(decimal_digits(&digits));
        let sign = match digits.sign() {
            Sign::Minus => -1.0,
            Sign::NoSign => return 0.0,
            Sign::Plus => 1.0,
        };

        if magnitude > F64_MAX_POWER {
            return sign * f64::INFINITY;
        }
        if magnitude < F64_MIN_POWER {
            return sign * 0.0;
        }

        self.0.to_f64().unwrap_or(sign * f64::INFINITY)
    }

    /// The integer part, truncated toward zero.
    pub fn to_big_int(&self) -> BigInt {
        let (digits, power) = self.parts();
        expand(digits, power)
    }

    pub fn to_big_decimal(&self) -> BigDecimal {
        self.0.clone()
    }

    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }

    pub fn into_big_decimal(self) -> BigDecimal {
        self.0
    }

    pub fn is_integer(&self) -> bool {
        let (digits, power) = self.parts();
        if power >= 0 || digits.is_zero() {
            return true;
        }

        let shift = power.unsigned_abs();
        // |digits| < 2^bits <= 10^shift, so a fraction is left
        if shift > digits.bits() {
            return false;
        }

        (digits % ten_to_the(shift)).is_zero()
    }

    /// The value as `digits * 10^power`.
    fn parts(&self) -> (BigInt, i64) {
        let (digits, scale) = self.0.as_bigint_and_exponent();
        (digits, scale.saturating_neg())
    }

    fn exact_integer(&self) -> Option<BigInt> {
        let (digits, power) = self.parts();
        if digits.is_zero() {
            return Some(BigInt::zero());
        }
        // at least 10^21, out of range of any 64 bits integer
        if power > 20 || !self.is_integer() {
            return None;
        }

        Some(expand(digits, power))
    }
}

/// `digits * 10^power`, truncated toward zero.
fn expand(digits: BigInt, power: i64) -> BigInt {
    if power >= 0 {
        return digits * ten_to_the(power.unsigned_abs());
    }

    let shift = power.unsigned_abs();
    if shift > digits.bits() {
        return BigInt::zero();
    }

    digits / ten_to_the(shift)
}

fn ten_to_the(power: u64) -> BigInt {
    BigInt::from(10u8).pow(u32::try_from(power).unwrap_or(u32::MAX))
}

/// Upper bound of the number of decimal digits of `digits`.
fn decimal_digits(digits: &BigInt) -> i64 {
    // log10(2) < 0.302
    i64::try_from(digits.bits() * 302 / 1000 + 1).unwrap_or(i64::MAX)
}

// Normalized first, so `1.0` and `1.00` hash alike
impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (digits, scale) = self.0.normalized().into_bigint_and_exponent();
        digits.hash(state);
        scale.hash(state);
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Number {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s)
            .map(Self)
            .map_err(|e| Error::InvalidArgument(format!("'{}' is not a number: {}", s, e)))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Self(BigDecimal::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<isize> for Number {
    fn from(value: isize) -> Self {
        Self(BigDecimal::from(value as i64))
    }
}

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Self(BigDecimal::from(value as u64))
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl From<BigDecimal> for Number {
    fn from(value: BigDecimal) -> Self {
        Self(value)
    }
}

// Floats go through their shortest round-trip text so 0.1 stays 0.1 instead of its exact
// binary expansion. NaN and infinities carry no decimal value.
impl TryFrom<f64> for Number {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "{} has no decimal value",
                value
            )));
        }

        value.to_string().parse()
    }
}

impl TryFrom<f32> for Number {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "{} has no decimal value",
                value
            )));
        }

        value.to_string().parse()
    }
}
