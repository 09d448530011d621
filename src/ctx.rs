use core::fmt;

use bitflags::bitflags;

/// The arithmetic context.
///
/// A `Ctx` is built once and passed by reference into every
/// [`Dec`][crate::Dec] operation. Nothing mutates it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Ctx {
    pub(crate) prec: u32,
    pub(crate) rounding: RoundingMode,
    pub(crate) traps: Condition,
}

impl Ctx {
    /// The precision used when none is specified.
    pub const DEFAULT_PREC: u32 = 28;

    /// Creates a context with [`DEFAULT_PREC`][Self::DEFAULT_PREC]
    /// digits, [`RoundingMode::ToNearestEven`], and the
    /// default set of traps.
    pub const fn new() -> Self {
        Self {
            prec: Self::DEFAULT_PREC,
            rounding: RoundingMode::ToNearestEven,
            traps: Condition::DEFAULT_TRAPS,
        }
    }

    /// Sets the number of significant digits.
    ///
    /// A precision of zero is treated as one.
    pub const fn with_precision(self, prec: u32) -> Self {
        let mut ctx = self;
        ctx.prec = if prec == 0 { 1 } else { prec };
        ctx
    }

    /// Sets the rounding mode.
    pub const fn with_rounding_mode(self, mode: RoundingMode) -> Self {
        let mut ctx = self;
        ctx.rounding = mode;
        ctx
    }

    /// Sets the conditions that turn into errors.
    pub const fn with_traps(self, traps: Condition) -> Self {
        let mut ctx = self;
        ctx.traps = traps;
        ctx
    }

    /// Returns the number of significant digits.
    pub const fn precision(&self) -> u32 {
        self.prec
    }

    /// Returns the rounding mode.
    pub const fn rounding_mode(&self) -> RoundingMode {
        self.rounding
    }

    /// Returns the trapped conditions.
    pub const fn traps(&self) -> Condition {
        self.traps
    }

    /// Fails with [`Error::Raised`][crate::Error::Raised] if
    /// any of `cond` is trapped.
    pub(crate) fn signal(&self, cond: Condition) -> Result<(), crate::Error> {
        if self.traps.intersects(cond) {
            Err(crate::Error::Raised(cond))
        } else {
            Ok(())
        }
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Self::new()
    }
}

/// Determines how inexact results are rounded.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub enum RoundingMode {
    /// IEEE 754-2008 roundTiesToEven.
    ///
    /// - Under 0.5 rounds down.
    /// - Over 0.5 rounds up.
    /// - Exactly 0.5 rounds to the nearest even.
    #[default]
    ToNearestEven,
    /// IEEE 754-2008 roundTiesToAway.
    ///
    /// Like [`ToNearestEven`][Self::ToNearestEven], except that
    /// 0.5 rounds up.
    ToNearestAway,
    /// IEEE 754-2008 roundTowardZero.
    ///
    /// AKA truncation.
    ToZero,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Rounds up if the discarded digits are non-zero.
    AwayFromZero,
    /// IEEE 754-2008 roundTowardNegative.
    ///
    /// AKA floor.
    ToNegativeInf,
    /// IEEE 754-2008 roundTowardPositive.
    ///
    /// AKA ceiling.
    ToPositiveInf,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Like [`ToNearestAway`][Self::ToNearestAway], except that
    /// 0.5 rounds down.
    ToNearestTowardZero,
}

impl RoundingMode {
    /// Reports whether a magnitude should be incremented after
    /// discarding digits.
    ///
    /// `half` orders the discarded digits against one half of
    /// the last kept digit, `odd` is the parity of the kept
    /// magnitude and `negative` is the sign of the number.
    pub(crate) const fn round_up(
        self,
        half: core::cmp::Ordering,
        nonzero: bool,
        odd: bool,
        negative: bool,
    ) -> bool {
        use core::cmp::Ordering;

        if !nonzero {
            return false;
        }
        match self {
            Self::ToNearestEven => match half {
                Ordering::Greater => true,
                Ordering::Equal => odd,
                Ordering::Less => false,
            },
            Self::ToNearestAway => !matches!(half, Ordering::Less),
            Self::ToNearestTowardZero => matches!(half, Ordering::Greater),
            Self::ToZero => false,
            Self::AwayFromZero => true,
            Self::ToNegativeInf => negative,
            Self::ToPositiveInf => !negative,
        }
    }
}

/// An exceptional condition raised during or after an operation.
///
/// [`Dec`][crate::Dec] has no NaN or infinity, so the
/// division and invalid-operation conditions always fail the
/// operation whether or not they are trapped.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Condition(u32);

bitflags! {
    impl Condition: u32 {
        /// Occurs when division is attempted with a finite,
        /// non-zero dividend and a divisor with a value of zero.
        const DIVISION_BY_ZERO = 0x4;
        /// Occurs when the result of integer division would
        /// contain too many digits (i.e. be longer than the
        /// specified precision).
        const DIVISION_IMPOSSIBLE = 0x8;
        /// Occurs when division is attempted with in which both
        /// the divided and divisor are zero.
        const DIVISION_UNDEFINED = 0x10;
        /// Occurs when the result of an operation (e.g.
        /// division) is not exact.
        const INEXACT = 0x20;
        /// Occurs when:
        ///
        /// - Zero is raised to a non-positive power.
        /// - The operand of the log10 operation is less than
        /// or equal to zero.
        const INVALID_OPERATION = 0x100;
        /// Occurs when the result of an operation is rounded,
        /// whether or not any non-zero digits were discarded.
        const ROUNDED = 0x400;
    }
}

impl Condition {
    /// The conditions trapped by [`Ctx::new`]: everything
    /// except [`INEXACT`][Self::INEXACT] and
    /// [`ROUNDED`][Self::ROUNDED].
    pub const DEFAULT_TRAPS: Self = Self::all()
        .difference(Self::INEXACT)
        .difference(Self::ROUNDED);
}

impl fmt::Display for Condition {
    /// Writes the flag names separated by ` | `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

#[cfg(test)]
mod tests {
    use core::cmp::Ordering;

    use super::*;

    #[test]
    fn test_default_traps() {
        let ctx = Ctx::new();
        assert!(!ctx.traps().contains(Condition::INEXACT));
        assert!(!ctx.traps().contains(Condition::ROUNDED));
        assert!(ctx.traps().contains(Condition::DIVISION_BY_ZERO));
        assert!(ctx.traps().contains(Condition::INVALID_OPERATION));
        assert!(ctx.signal(Condition::INEXACT).is_ok());
        assert_eq!(
            ctx.signal(Condition::DIVISION_IMPOSSIBLE),
            Err(crate::Error::Raised(Condition::DIVISION_IMPOSSIBLE))
        );
    }

    #[test]
    fn test_display() {
        let tests = [
            (Condition::INEXACT, "INEXACT"),
            (Condition::INEXACT | Condition::ROUNDED, "INEXACT | ROUNDED"),
            (
                Condition::DIVISION_BY_ZERO | Condition::INVALID_OPERATION,
                "DIVISION_BY_ZERO | INVALID_OPERATION",
            ),
            (Condition::empty(), ""),
        ];
        for (i, (cond, want)) in tests.into_iter().enumerate() {
            assert_eq!(cond.to_string(), want, "#{i}");
        }
    }

    #[test]
    fn test_builder() {
        let ctx = Ctx::new()
            .with_precision(0)
            .with_rounding_mode(RoundingMode::ToZero)
            .with_traps(Condition::empty());
        assert_eq!(ctx.precision(), 1);
        assert_eq!(ctx.rounding_mode(), RoundingMode::ToZero);
        assert!(ctx.signal(Condition::all()).is_ok());
    }

    #[test]
    fn test_round_up() {
        use RoundingMode::*;

        // (mode, half, odd, negative, want)
        let tests = [
            (ToNearestEven, Ordering::Less, true, false, false),
            (ToNearestEven, Ordering::Equal, false, false, false),
            (ToNearestEven, Ordering::Equal, true, false, true),
            (ToNearestEven, Ordering::Greater, false, false, true),
            (ToNearestAway, Ordering::Equal, false, false, true),
            (ToNearestAway, Ordering::Less, false, false, false),
            (ToNearestTowardZero, Ordering::Equal, true, false, false),
            (ToNearestTowardZero, Ordering::Greater, true, false, true),
            (ToZero, Ordering::Greater, true, false, false),
            (AwayFromZero, Ordering::Less, false, false, true),
            (ToNegativeInf, Ordering::Less, false, false, false),
            (ToNegativeInf, Ordering::Less, false, true, true),
            (ToPositiveInf, Ordering::Less, false, false, true),
            (ToPositiveInf, Ordering::Less, false, true, false),
        ];
        for (i, (mode, half, odd, neg, want)) in tests.into_iter().enumerate() {
            let got = mode.round_up(half, true, odd, neg);
            assert_eq!(got, want, "#{i}: {mode:?} {half:?}");
            assert!(!mode.round_up(half, false, odd, neg), "#{i}: {mode:?}");
        }
    }
}
