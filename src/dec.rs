//! Arbitrary-precision decimal arithmetic.

use core::{cmp::Ordering, fmt};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use super::{
    arith,
    ctx::{Condition, Ctx},
    Error,
};

mod log;

/// An arbitrary-precision decimal number: `coeff * 10^exp`.
///
/// Every operation takes the [`Ctx`] it runs under and rounds
/// its result to [`Ctx::precision`] significant digits.
/// Equality and ordering compare numeric values, so `1.0 ==
/// 1`.
#[derive(Clone, Debug)]
pub struct Dec {
    coeff: BigInt,
    exp: i64,
}

macro_rules! impl_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Dec {
                fn from(v: $ty) -> Self {
                    Self::new(v, 0)
                }
            }
        )*
    };
}
impl_from!(u32, u64, u128, i32, i64, BigInt, BigUint);

impl Dec {
    /// Creates `coeff * 10^exp`.
    pub fn new<C: Into<BigInt>>(coeff: C, exp: i64) -> Self {
        Self {
            coeff: coeff.into(),
            exp,
        }
    }

    /// Returns 0.
    pub fn zero() -> Self {
        Self::new(0u32, 0)
    }

    /// Returns 1.
    pub fn one() -> Self {
        Self::new(1u32, 0)
    }

    /// Returns `2^n`.
    ///
    /// This is [`pow`][Self::pow] with a base of two, so
    /// negative `n` produce exact binary fractions as long as
    /// they fit in the precision.
    pub fn pow2(n: i64, ctx: &Ctx) -> Result<Self, Error> {
        Self::from(2u32).pow(n, ctx)
    }

    /// Returns the coefficient.
    pub fn coeff(&self) -> &BigInt {
        &self.coeff
    }

    /// Returns the exponent.
    pub fn exponent(&self) -> i64 {
        self.exp
    }

    /// Reports whether the number is zero.
    pub fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }

    /// Reports whether the number is less than zero.
    pub fn is_negative(&self) -> bool {
        self.coeff.is_negative()
    }

    /// Returns the number of digits in the coefficient.
    pub fn digits(&self) -> u32 {
        arith::digits(self.coeff.magnitude())
    }

    /// Returns the exponent of the most significant digit.
    pub fn adjusted(&self) -> i64 {
        self.exp + i64::from(self.digits()) - 1
    }

    /// Reports whether the number is an integer.
    pub fn is_integral(&self) -> bool {
        if self.exp >= 0 || self.is_zero() {
            return true;
        }
        let shift = self.exp.unsigned_abs();
        match u32::try_from(shift) {
            Ok(n) if n < self.digits() => arith::shr(self.coeff.magnitude(), n).1.is_zero(),
            // |coeff| < 10^shift, so it has a fraction.
            _ => false,
        }
    }

    /// Returns `self^n`.
    ///
    /// Non-negative powers are computed exactly, then rounded
    /// once. Negative powers are computed as `1 / self^|n|`.
    pub fn pow(&self, n: i64, ctx: &Ctx) -> Result<Self, Error> {
        if self.is_zero() && n <= 0 {
            return Err(Error::Raised(Condition::INVALID_OPERATION));
        }
        let e = u32::try_from(n.unsigned_abs()).map_err(|_| Error::NotRepresentable)?;
        let exp = self
            .exp
            .checked_mul(i64::from(e))
            .ok_or(Error::NotRepresentable)?;
        let p = Self {
            coeff: self.coeff.pow(e),
            exp,
        };
        if n >= 0 {
            finish(p.coeff, p.exp, false, ctx)
        } else {
            Self::one().div(&p, ctx)
        }
    }

    /// Returns `self / other`, correctly rounded.
    pub fn div(&self, other: &Self, ctx: &Ctx) -> Result<Self, Error> {
        check_divisor(self, other)?;

        let sign = self.coeff.sign() * other.coeff.sign();
        let ideal = self.exp - other.exp;
        if self.is_zero() {
            return Ok(Self::new(0u32, ideal));
        }

        let (a, b) = (self.coeff.magnitude(), other.coeff.magnitude());
        // Scale the dividend so that the quotient has at least
        // `prec + 1` digits.
        let shift = (i64::from(ctx.prec) + 1 + i64::from(arith::digits(b))
            - i64::from(arith::digits(a)))
        .max(0);
        let shift = u32::try_from(shift).map_err(|_| Error::NotRepresentable)?;
        let (mut q, r) = (a * arith::pow10(shift)).div_rem(b);
        let mut exp = ideal - i64::from(shift);
        let sticky = !r.is_zero();
        if !sticky {
            // Exact, so move back toward the ideal exponent.
            let ten = BigUint::from(10u8);
            while exp < ideal && !q.is_zero() {
                let (q1, r1) = q.div_rem(&ten);
                if !r1.is_zero() {
                    break;
                }
                q = q1;
                exp += 1;
            }
        }
        finish(BigInt::from_biguint(sign, q), exp, sticky, ctx)
    }

    /// Returns `floor(self / other)`.
    ///
    /// The quotient is exact. If it has more than
    /// [`Ctx::precision`] digits the operation fails with
    /// [`Condition::DIVISION_IMPOSSIBLE`].
    pub fn div_floor(&self, other: &Self, ctx: &Ctx) -> Result<Self, Error> {
        let (q, _) = self.div_mod_floor(other, ctx)?;
        Ok(q)
    }

    /// Returns `self - other * floor(self / other)`.
    ///
    /// The result has the sign of `other`.
    pub fn rem(&self, other: &Self, ctx: &Ctx) -> Result<Self, Error> {
        let (_, r) = self.div_mod_floor(other, ctx)?;
        Ok(r)
    }

    fn div_mod_floor(&self, other: &Self, ctx: &Ctx) -> Result<(Self, Self), Error> {
        check_divisor(self, other)?;

        let (a, b, exp) = align(self, other)?;
        let (q, r) = a.div_mod_floor(&b);
        if arith::digits(q.magnitude()) > ctx.prec {
            return Err(Error::Raised(Condition::DIVISION_IMPOSSIBLE));
        }
        let r = finish(r, exp, false, ctx)?;
        Ok((Self::new(q, 0), r))
    }

    /// Returns the base-10 logarithm of `self`.
    ///
    /// Exact powers of ten produce exact results. Everything
    /// else is [`INEXACT`][Condition::INEXACT].
    pub fn log10(&self, ctx: &Ctx) -> Result<Self, Error> {
        if self.coeff.sign() != Sign::Plus {
            return Err(Error::Raised(Condition::INVALID_OPERATION));
        }
        let mag = self.coeff.magnitude();
        let adj = self.adjusted();
        if arith::is_pow10(mag) {
            return finish(BigInt::from(adj), 0, false, ctx);
        }
        let (coeff, exp) = log::log10(mag, adj, ctx.prec);
        finish(coeff, exp, true, ctx)
    }

    /// Converts `self` to an `i64`.
    pub fn to_i64(&self) -> Result<i64, Error> {
        self.to_integer()?.to_i64().ok_or(Error::NotRepresentable)
    }

    /// Converts `self` to a `u64`.
    pub fn to_u64(&self) -> Result<u64, Error> {
        self.to_integer()?.to_u64().ok_or(Error::NotRepresentable)
    }

    /// Converts `self` to a `u128`.
    pub fn to_u128(&self) -> Result<u128, Error> {
        self.to_integer()?.to_u128().ok_or(Error::NotRepresentable)
    }

    fn to_integer(&self) -> Result<BigInt, Error> {
        // Nothing we convert to has more than 39 digits.
        const MAX_ADJ: i64 = 39;

        if !self.is_integral() || (!self.is_zero() && self.adjusted() > MAX_ADJ) {
            return Err(Error::NotRepresentable);
        }
        let shift = u32::try_from(self.exp.unsigned_abs()).map_err(|_| Error::NotRepresentable)?;
        let mag = if self.exp >= 0 {
            self.coeff.magnitude() * arith::pow10(shift)
        } else {
            arith::shr(self.coeff.magnitude(), shift).0
        };
        Ok(BigInt::from_biguint(self.coeff.sign(), mag))
    }
}

/// Rounds `coeff * 10^exp` to `ctx.prec` digits.
///
/// `sticky` reports that non-zero digits were already
/// discarded below the last digit of `coeff`.
fn finish(coeff: BigInt, exp: i64, sticky: bool, ctx: &Ctx) -> Result<Dec, Error> {
    let negative = coeff.is_negative();
    let (sign, mut mag) = coeff.into_parts();
    let mut exp = exp;

    let mut digits = arith::digits(&mag);
    if digits <= ctx.prec && !sticky {
        return Ok(Dec::new(BigInt::from_biguint(sign, mag), exp));
    }
    if digits <= ctx.prec {
        // Make room for a rounding digit below the sticky bit.
        let pad = ctx.prec + 1 - digits;
        mag *= arith::pow10(pad);
        exp -= i64::from(pad);
        digits += pad;
    }

    let drop = digits - ctx.prec;
    let (mut q, r) = arith::shr(&mag, drop);
    let nonzero = sticky || !r.is_zero();
    let half = match r.cmp(&(arith::pow10(drop - 1) * 5u8)) {
        Ordering::Equal if sticky => Ordering::Greater,
        ord => ord,
    };
    if ctx.rounding.round_up(half, nonzero, q.is_odd(), negative) {
        q += 1u8;
    }
    exp += i64::from(drop);
    if arith::digits(&q) > ctx.prec {
        // We went from 999... to 100..., so chop off
        // a trailing zero.
        q /= 10u8;
        exp += 1;
    }

    let mut cond = Condition::ROUNDED;
    if nonzero {
        cond |= Condition::INEXACT;
    }
    ctx.signal(cond)?;

    let sign = if q.is_zero() { Sign::NoSign } else { sign };
    Ok(Dec::new(BigInt::from_biguint(sign, q), exp))
}

fn check_divisor(lhs: &Dec, rhs: &Dec) -> Result<(), Error> {
    if !rhs.is_zero() {
        Ok(())
    } else if lhs.is_zero() {
        Err(Error::Raised(Condition::DIVISION_UNDEFINED))
    } else {
        Err(Error::Raised(Condition::DIVISION_BY_ZERO))
    }
}

/// Returns both coefficients scaled to the smaller exponent.
fn align(lhs: &Dec, rhs: &Dec) -> Result<(BigInt, BigInt, i64), Error> {
    let exp = lhs.exp.min(rhs.exp);
    let scale = |d: &Dec| -> Result<BigInt, Error> {
        let shift = u32::try_from(d.exp - exp).map_err(|_| Error::NotRepresentable)?;
        Ok(&d.coeff * BigInt::from(arith::pow10(shift)))
    };
    Ok((scale(lhs)?, scale(rhs)?, exp))
}

impl PartialEq for Dec {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Dec {}

impl PartialOrd for Dec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dec {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = (self.coeff.sign(), other.coeff.sign());
        if lhs != rhs {
            return lhs.cmp(&rhs);
        }
        if lhs == Sign::NoSign {
            return Ordering::Equal;
        }
        let ord = self.adjusted().cmp(&other.adjusted()).then_with(|| {
            // Same adjusted exponent, so the exponents differ
            // by less than the number of digits.
            let exp = self.exp.min(other.exp);
            let scale = |d: &Dec| {
                let shift = u32::try_from(d.exp - exp).unwrap_or(u32::MAX);
                d.coeff.magnitude() * arith::pow10(shift)
            };
            scale(self).cmp(&scale(other))
        });
        if lhs == Sign::Minus {
            ord.reverse()
        } else {
            ord
        }
    }
}

impl fmt::Display for Dec {
    /// Formats the number in scientific notation when the
    /// exponent is positive or the number is very small, and as
    /// a plain decimal otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        let digits = self.coeff.magnitude().to_str_radix(10);
        let adj = self.adjusted();
        if self.exp <= 0 && adj >= -6 {
            let point = usize::try_from(-self.exp).map_err(|_| fmt::Error)?;
            if point == 0 {
                return f.write_str(&digits);
            }
            if point >= digits.len() {
                f.write_str("0.")?;
                for _ in digits.len()..point {
                    f.write_str("0")?;
                }
                return f.write_str(&digits);
            }
            let (int, frac) = digits.split_at(digits.len() - point);
            return write!(f, "{int}.{frac}");
        }
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            write!(f, "{first}E{adj:+}")
        } else {
            write!(f, "{first}.{rest}E{adj:+}")
        }
    }
}
