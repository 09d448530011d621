//! The generated tables.

use core::{fmt, slice};

use num_bigint::BigUint;
use tracing::debug;

use super::{
    ctx::Ctx,
    dec::Dec,
    pow5::{Pow5, NEGATIVE_SHIFT, POSITIVE_SHIFT},
    Error,
};

/// A 128-bit mantissa split at `2^64`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Entry {
    /// `m / 2^64`.
    pub hi: u64,
    /// `m % 2^64`.
    pub lo: u64,
}

impl Entry {
    /// Creates an `Entry` from its halves.
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Splits the integer `m` into `(m / 2^64, m % 2^64)`.
    ///
    /// Fails with [`Error::NotRepresentable`] unless `m` is
    /// a non-negative integer less than `2^128`.
    pub fn split(m: &Dec, ctx: &Ctx) -> Result<Self, Error> {
        let split = Dec::pow2(64, ctx)?;
        let hi = m.div_floor(&split, ctx)?.to_u64()?;
        let lo = m.rem(&split, ctx)?.to_u64()?;
        Ok(Self { hi, lo })
    }

    /// Returns the mantissa.
    pub fn to_u128(self) -> u128 {
        (u128::from(self.hi) << 64) | u128::from(self.lo)
    }

    /// Returns the number of significant bits in the mantissa.
    pub fn bits(self) -> u32 {
        u128::BITS - self.to_u128().leading_zeros()
    }
}

impl From<u128> for Entry {
    #[allow(clippy::cast_possible_truncation)]
    fn from(m: u128) -> Self {
        Self {
            hi: (m >> 64) as u64,
            lo: m as u64,
        }
    }
}

impl From<Entry> for u128 {
    fn from(e: Entry) -> Self {
        e.to_u128()
    }
}

/// Identifies one of the two tables.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    /// `floor(5^i / 2^(j-124))` for `i` in [0, 325].
    Positive,
    /// `floor(2^(j+125) / 5^i) + 1` for `i` in [0, 341].
    Negative,
}

impl Kind {
    /// Returns the number of entries in the table.
    pub const fn size(self) -> usize {
        match self {
            Self::Positive => 326,
            Self::Negative => 342,
        }
    }

    /// Returns the bit offset of the table's window.
    pub const fn shift(self) -> i64 {
        match self {
            Self::Positive => POSITIVE_SHIFT,
            Self::Negative => NEGATIVE_SHIFT,
        }
    }

    /// Returns the table's name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable table of mantissas, indexed by the power of
/// five.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    kind: Kind,
    entries: Box<[Entry]>,
}

impl Table {
    fn generate(kind: Kind, pow5: &Pow5<'_>, ctx: &Ctx) -> Result<Self, Error> {
        let entries = (0..kind.size())
            .map(|i| {
                let i = u32::try_from(i).map_err(|_| Error::NotRepresentable)?;
                let m = match kind {
                    Kind::Positive => pow5.multiplier(i)?,
                    Kind::Negative => pow5.inverse_multiplier(i)?,
                };
                Entry::split(&m, ctx)
            })
            .collect::<Result<Box<[_]>, _>>()?;
        debug!(table = %kind, len = entries.len(), "generated table");
        Ok(Self { kind, entries })
    }

    /// Returns the kind of table.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for `5^i`.
    pub fn get(&self, i: usize) -> Option<Entry> {
        self.entries.get(i).copied()
    }

    /// Returns the entries in index order.
    pub fn as_slice(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns an iterator over the entries in index order.
    pub fn iter(&self) -> slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Checks every entry against its bound law with exact
    /// integer arithmetic.
    fn verify(&self) -> Result<(), Error> {
        if self.len() != self.kind.size() {
            return Err(Error::BoundViolated {
                kind: self.kind,
                index: self.len(),
            });
        }
        for (index, entry) in self.iter().enumerate() {
            let i = u32::try_from(index).map_err(|_| Error::NotRepresentable)?;
            let ok = match self.kind {
                Kind::Positive => check_positive(i, *entry),
                Kind::Negative => check_negative(i, *entry),
            };
            if !ok {
                return Err(Error::BoundViolated {
                    kind: self.kind,
                    index,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Returns `(5^i, floor(log2(5^i)))` from the exact bit
/// length.
fn exact_power(i: u32) -> (BigUint, usize) {
    let p = BigUint::from(5u32).pow(i);
    let j = usize::try_from(p.bits() - 1).unwrap_or(usize::MAX);
    (p, j)
}

/// Reports whether `m * 2^(j-124) <= 5^i < (m+1) * 2^(j-124)`.
fn check_positive(i: u32, entry: Entry) -> bool {
    if !(125..=126).contains(&entry.bits()) {
        return false;
    }
    let (p, j) = exact_power(i);
    let m = BigUint::from(entry.to_u128());
    let next = &m + 1u8;
    match j.checked_sub(124) {
        Some(s) => (&m << s) <= p && p < (next << s),
        None => {
            let p = p << (124 - j);
            m <= p && p < next
        }
    }
}

/// Reports whether `m - 1 <= 2^(j+125) / 5^i < m`.
fn check_negative(i: u32, entry: Entry) -> bool {
    if !(125..=126).contains(&entry.bits()) {
        return false;
    }
    let (p, j) = exact_power(i);
    let m = BigUint::from(entry.to_u128());
    let scaled = BigUint::from(1u8) << (j + 125);
    let prev = &m - 1u8;
    prev * &p <= scaled && scaled < m * p
}

/// The positive and negative tables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PowerTables {
    positive: Table,
    negative: Table,
}

impl PowerTables {
    /// Computes both tables under `ctx`.
    ///
    /// `ctx` should be [`table_ctx`][crate::table_ctx] or have
    /// at least [`MIN_PRECISION`][crate::MIN_PRECISION] digits.
    /// Less precision silently produces wrong entries.
    pub fn generate(ctx: &Ctx) -> Result<Self, Error> {
        debug!(precision = ctx.precision(), "generating power tables");
        let pow5 = Pow5::new(ctx)?;
        Ok(Self {
            positive: Table::generate(Kind::Positive, &pow5, ctx)?,
            negative: Table::generate(Kind::Negative, &pow5, ctx)?,
        })
    }

    /// Returns the approximations of `5^i`.
    pub fn positive(&self) -> &Table {
        &self.positive
    }

    /// Returns the approximations of `5^-i`.
    pub fn negative(&self) -> &Table {
        &self.negative
    }

    /// Returns the table for `kind`.
    pub fn get(&self, kind: Kind) -> &Table {
        match kind {
            Kind::Positive => &self.positive,
            Kind::Negative => &self.negative,
        }
    }

    /// Checks both tables against their bound laws.
    ///
    /// This uses exact integer arithmetic and the exact bit
    /// length of `5^i`, so it does not depend on the context
    /// the tables were generated with.
    pub fn verify(&self) -> Result<(), Error> {
        self.positive.verify()?;
        self.negative.verify()?;
        debug!("verified power tables");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use ruint::Uint;

    use super::*;
    use crate::table_ctx;

    #[allow(non_camel_case_types)]
    type u1024 = Uint<1024, 16>;

    fn tables() -> &'static PowerTables {
        static TABLES: OnceLock<PowerTables> = OnceLock::new();
        TABLES.get_or_init(|| PowerTables::generate(&table_ctx()).unwrap())
    }

    fn pow5(i: usize) -> u1024 {
        u1024::from(5u64).pow(u1024::from(i))
    }

    /// floor(log2(5^i)).
    fn log2(x: u1024) -> usize {
        x.bit_len() - 1
    }

    #[test]
    fn test_sizes() {
        let t = tables();
        assert_eq!(t.positive().len(), 326);
        assert_eq!(t.negative().len(), 342);
        assert_eq!(t.get(Kind::Positive).kind(), Kind::Positive);
        assert_eq!(t.get(Kind::Negative).kind(), Kind::Negative);
    }

    #[test]
    fn test_first_entries() {
        let t = tables();
        assert_eq!(
            t.positive().get(0),
            Some(Entry::new(1152921504606846976, 0))
        );
        assert_eq!(
            t.negative().get(0),
            Some(Entry::new(2305843009213693952, 1))
        );
        assert_eq!(t.positive().get(326), None);
        assert_eq!(t.negative().get(342), None);
    }

    #[test]
    fn test_positive() {
        for (i, entry) in tables().positive().iter().enumerate() {
            let p = pow5(i);
            let j = log2(p);
            let want = if j >= 124 {
                p >> (j - 124)
            } else {
                p << (124 - j)
            };
            let got = u1024::from(entry.to_u128());
            assert_eq!(got, want, "#{i}");
            assert!(entry.bits() <= 126, "#{i}");
        }
    }

    #[test]
    fn test_negative() {
        for (i, entry) in tables().negative().iter().enumerate() {
            let p = pow5(i);
            let j = log2(p);
            let want = (u1024::from(1u64) << (j + 125)) / p + u1024::from(1u64);
            let got = u1024::from(entry.to_u128());
            assert_eq!(got, want, "#{i}");
            assert!(entry.bits() <= 126, "#{i}");
        }
    }

    #[test]
    fn test_bound_laws() {
        let t = tables();
        t.verify().unwrap();
        for (i, entry) in t.negative().iter().enumerate() {
            // Never exactly on the reciprocal.
            let p = pow5(i);
            let scaled = u1024::from(1u64) << (log2(p) + 125);
            assert_ne!(u1024::from(entry.to_u128()) * p, scaled, "#{i}");
        }
    }

    #[test]
    fn test_largest_index() {
        let t = tables();
        let last = t.positive().len() - 1;
        assert_eq!(last, 325);
        assert!(check_positive(325, t.positive().get(last).unwrap()));
        let last = t.negative().len() - 1;
        assert_eq!(last, 341);
        assert!(check_negative(341, t.negative().get(last).unwrap()));
    }

    #[test]
    fn test_verify_rejects() {
        let t = tables();

        let mut bad = t.clone();
        let mut entries = bad.positive.entries.to_vec();
        entries[17].lo = entries[17].lo.wrapping_add(1);
        bad.positive.entries = entries.into();
        assert_eq!(
            bad.verify(),
            Err(Error::BoundViolated {
                kind: Kind::Positive,
                index: 17,
            })
        );

        // Dropping the round-up bias breaks the strict bound.
        let mut bad = t.clone();
        let mut entries = bad.negative.entries.to_vec();
        entries[3] = Entry::from(entries[3].to_u128() - 1);
        bad.negative.entries = entries.into();
        assert_eq!(
            bad.verify(),
            Err(Error::BoundViolated {
                kind: Kind::Negative,
                index: 3,
            })
        );

        let mut bad = t.clone();
        bad.negative.entries = bad.negative.entries[..100].into();
        assert!(bad.verify().is_err());
    }

    #[test]
    fn test_deterministic() {
        let ctx = table_ctx();
        let a = PowerTables::generate(&ctx).unwrap();
        assert_eq!(&a, tables());
    }

    #[test]
    fn test_split() {
        let ctx = table_ctx();
        let m = (1u128 << 125) + 12345;
        let got = Entry::split(&Dec::from(m), &ctx).unwrap();
        assert_eq!(got, Entry::from(m));
        assert_eq!(got, Entry::new(1 << 61, 12345));
        assert_eq!(u128::from(got), m);

        let too_big = Dec::pow2(128, &ctx).unwrap();
        assert_eq!(Entry::split(&too_big, &ctx), Err(Error::NotRepresentable));
        assert_eq!(
            Entry::split(&Dec::new(15u32, -1), &ctx),
            Err(Error::NotRepresentable)
        );
    }
}
