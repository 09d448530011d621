//! Scaled powers of five.
//!
//! For `j = floor(log2(5^i))`:
//!
//! ```text
//! multiplier(i)         = floor(5^i / 2^(j-124))
//! inverse_multiplier(i) = floor(2^(j+125) / 5^i) + 1
//! ```
//!
//! Both land in a 125 or 126 bit window. The multipliers are
//! truncated, so they never exceed the exact value. The
//! inverse multipliers are truncated and then incremented, so
//! they always exceed it.

use tracing::trace;

use super::{ctx::Ctx, dec::Dec, Error};

/// The number of significant digits the tables are computed
/// with.
///
/// `2^(j+125)` for the largest negative index has 277 digits,
/// so every power and floor below is exact.
pub const PRECISION: u32 = 300;

/// The smallest precision that keeps every computation exact.
pub const MIN_PRECISION: u32 = 300;

/// The bit offset of the positive table's window.
pub const POSITIVE_SHIFT: i64 = 124;

/// The bit offset of the negative table's window.
pub const NEGATIVE_SHIFT: i64 = 125;

/// Returns the context the tables are computed with.
pub const fn table_ctx() -> Ctx {
    Ctx::new().with_precision(PRECISION)
}

/// Returns `floor(log2(5^i))`.
///
/// This is computed as `floor(log10(5^i) / log10(2))`.
/// `log2(5)` is irrational, so the quotient is never close
/// enough to an integer for the rounding of either logarithm
/// to matter at [`PRECISION`].
pub fn binary_exponent(i: u32, ctx: &Ctx) -> Result<i64, Error> {
    let p = Dec::from(5u32).pow(i64::from(i), ctx)?;
    binary_exponent_of(&p, &Dec::from(2u32).log10(ctx)?, ctx)
}

fn binary_exponent_of(p: &Dec, log10_2: &Dec, ctx: &Ctx) -> Result<i64, Error> {
    p.log10(ctx)?.div_floor(log10_2, ctx)?.to_i64()
}

/// Returns `floor(5^i / 2^(j-124))`.
pub fn multiplier(i: u32, ctx: &Ctx) -> Result<Dec, Error> {
    Pow5::new(ctx)?.multiplier(i)
}

/// Returns `floor(2^(j+125) / 5^i) + 1`.
pub fn inverse_multiplier(i: u32, ctx: &Ctx) -> Result<Dec, Error> {
    Pow5::new(ctx)?.inverse_multiplier(i)
}

/// Computes scaled powers of five under a single context.
///
/// It caches `log10(2)`, which every index needs.
#[derive(Clone, Debug)]
pub(crate) struct Pow5<'a> {
    ctx: &'a Ctx,
    log10_2: Dec,
}

impl<'a> Pow5<'a> {
    pub(crate) fn new(ctx: &'a Ctx) -> Result<Self, Error> {
        Ok(Self {
            ctx,
            log10_2: Dec::from(2u32).log10(ctx)?,
        })
    }

    /// Returns `(5^i, j)`.
    fn power(&self, i: u32) -> Result<(Dec, i64), Error> {
        let p = Dec::from(5u32).pow(i64::from(i), self.ctx)?;
        let j = binary_exponent_of(&p, &self.log10_2, self.ctx)?;
        Ok((p, j))
    }

    pub(crate) fn multiplier(&self, i: u32) -> Result<Dec, Error> {
        let (p, j) = self.power(i)?;
        let m = p.div_floor(&Dec::pow2(j - POSITIVE_SHIFT, self.ctx)?, self.ctx)?;
        trace!(i, j, %m, "multiplier");
        Ok(m)
    }

    pub(crate) fn inverse_multiplier(&self, i: u32) -> Result<Dec, Error> {
        let (p, j) = self.power(i)?;
        let q = Dec::pow2(j + NEGATIVE_SHIFT, self.ctx)?.div_floor(&p, self.ctx)?;
        // NB: q+1 is exact since q has far fewer digits than
        // the precision.
        let m = Dec::from(q.to_u128()?.checked_add(1).ok_or(Error::NotRepresentable)?);
        trace!(i, j, %m, "inverse multiplier");
        Ok(m)
    }
}

/// Returns the number of bits in `5^i`.
///
/// This is the constant-time estimate float parsers use:
/// `1217359 / 2^19` approximates `log2(5)`, and the estimate is
/// exact for every index in either table.
///
/// It returns `None` for `i` past 3528, where the product
/// overflows.
pub const fn pow5_bits(i: u32) -> Option<u32> {
    match i.checked_mul(1217359) {
        Some(n) => Some((n >> 19) + 1),
        None => None,
    }
}
