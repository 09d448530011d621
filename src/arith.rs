//! Integer helpers for arbitrary-precision coefficients.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Returns the minimum number of bits required to represent
/// `x`.
///
/// It returns 0 for `x == 0`.
pub(crate) fn bitlen(x: &BigUint) -> u64 {
    x.bits()
}

/// Returns 10^n.
pub(crate) fn pow10(n: u32) -> BigUint {
    BigUint::from(10u8).pow(n)
}

/// Returns the number of decimal digits in `x`.
///
/// `digits(0) == 1`.
pub(crate) fn digits(x: &BigUint) -> u32 {
    if x.is_zero() {
        return 1;
    }
    // `bitlen * 1233 / 4096` never overshoots `floor(log10(x))
    // + 1` and never undershoots it by more than one for the
    // sizes we deal with, so a single comparison fixes it up.
    let bits = bitlen(x);
    debug_assert!(bits < 65_000);
    let r = u32::try_from(((bits + 1) * 1233) / 4096).unwrap_or(u32::MAX);
    r + u32::from(*x >= pow10(r))
}

/// Returns the quotient and remainder `(q, r)` such that
///
/// ```text
/// q = x / (10^n)
/// r = x % (10^n)
/// ```
pub(crate) fn shr(x: &BigUint, n: u32) -> (BigUint, BigUint) {
    if n == 0 {
        // x / (10^0) = x/1 = x
        (x.clone(), BigUint::zero())
    } else {
        num_integer::Integer::div_rem(x, &pow10(n))
    }
}

/// Returns the number of trailing decimal zeros in `x`.
///
/// `x` must be non-zero.
pub(crate) fn trailing_zeros(x: &BigUint) -> u32 {
    debug_assert!(!x.is_zero());

    let ten = BigUint::from(10u8);
    let mut n = 0;
    let mut x = x.clone();
    while !x.is_zero() {
        let (q, r) = num_integer::Integer::div_rem(&x, &ten);
        if !r.is_zero() {
            break;
        }
        x = q;
        n += 1;
    }
    n
}

/// Reports whether `x` is an exact power of ten.
pub(crate) fn is_pow10(x: &BigUint) -> bool {
    if x.is_zero() {
        return false;
    }
    let (q, _) = shr(x, trailing_zeros(x));
    q.is_one()
}
