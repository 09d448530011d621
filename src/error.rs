use core::fmt;

use super::{ctx::Condition, table::Kind};

/// An error returned by the arithmetic or the generator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// An operation raised conditions that are trapped or that
    /// have no representable result.
    Raised(Condition),
    /// A value is not an integer, or does not fit in the
    /// requested integer type.
    NotRepresentable,
    /// A table entry does not satisfy its bound law.
    BoundViolated {
        /// The table.
        kind: Kind,
        /// The offending index.
        index: usize,
    },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raised(cond) => write!(f, "arithmetic condition raised: {cond}"),
            Self::NotRepresentable => write!(f, "value is not representable as an integer"),
            Self::BoundViolated { kind, index } => {
                write!(f, "{kind} table entry #{index} violates its bound")
            }
        }
    }
}
