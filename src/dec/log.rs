//! Fixed-point logarithms.
//!
//! Values are `BigInt`s scaled by `10^wp`.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use crate::arith;

/// Extra digits carried past the requested precision.
const GUARD: u32 = 20;

/// Returns `(c, e)` such that `c * 10^e` approximates
/// `log10(x)` where `x` has the coefficient `mag` and the
/// adjusted exponent `adj`.
///
/// `c` has at least `prec + GUARD/2` digits and its last digit
/// is not exact.
pub(super) fn log10(mag: &BigUint, adj: i64, prec: u32) -> (BigInt, i64) {
    let n = arith::digits(mag);
    let mut wp = prec + GUARD;
    loop {
        let one = BigInt::from(arith::pow10(wp));

        // x = y * 10^adj with y in [1, 10).
        let y = if wp >= n - 1 {
            mag * arith::pow10(wp - (n - 1))
        } else {
            arith::shr(mag, (n - 1) - wp).0
        };
        let y = BigInt::from(y);

        let ln2 = ln2(&one);
        let frac = ln(&y, &ln2, &one) * &one / ln10(&ln2, &one);
        let total = BigInt::from(adj) * &one + frac;

        let got = arith::digits(total.magnitude());
        if got >= prec + GUARD / 2 {
            return (total, -i64::from(wp));
        }
        // Leading zeros ate into the precision.
        wp += prec + GUARD - got;
    }
}

/// Returns `ln(y)` for `y` in `[1, 10)`.
fn ln(y: &BigInt, ln2: &BigInt, one: &BigInt) -> BigInt {
    // y = 2^k * z with z in [1, 2).
    let two = one * 2u32;
    let mut z = y.clone();
    let mut k = 0u32;
    while z >= two {
        z /= 2u32;
        k += 1;
    }
    // ln(z) = 2*atanh((z-1)/(z+1))
    let t = (&z - one) * one / (&z + one);
    atanh(&t, one) * 2u32 + ln2 * k
}

/// Returns `ln(2) = 2*atanh(1/3)`.
fn ln2(one: &BigInt) -> BigInt {
    atanh(&(one / 3u32), one) * 2u32
}

/// Returns `ln(10) = 3*ln(2) + ln(5/4) = 3*ln(2) + 2*atanh(1/9)`.
fn ln10(ln2: &BigInt, one: &BigInt) -> BigInt {
    ln2 * 3u32 + atanh(&(one / 9u32), one) * 2u32
}

/// Returns `atanh(t)` for `0 <= t <= 1/3`.
fn atanh(t: &BigInt, one: &BigInt) -> BigInt {
    let t2 = t * t / one;
    let mut term = t.clone();
    let mut sum = BigInt::zero();
    let mut n = 1u32;
    while !term.is_zero() {
        sum += &term / n;
        term = term * &t2 / one;
        n += 2;
    }
    sum
}
