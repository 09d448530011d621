//! `pow5tab` computes the power-of-five multiplier tables used
//! by decimal-to-binary floating point parsers.
//!
//! # Tables
//!
//! For `j = floor(log2(5^i))` there are two tables.
//!
//! - The positive table holds `floor(5^i / 2^(j-124))` for `i`
//! in [0, 325]. Each entry is at most the exact value.
//! - The negative table holds `floor(2^(j+125) / 5^i) + 1` for
//! `i` in [0, 341]. Each entry is strictly greater than the
//! exact value.
//!
//! Every entry fits in 125 or 126 bits and is stored as
//! a `(high64, low64)` [`Entry`].
//!
//! # Arithmetic
//!
//! The tables are computed with [`Dec`], an arbitrary-precision
//! decimal that runs under an explicit [`Ctx`]. The context
//! must have at least [`MIN_PRECISION`] digits or some floors
//! come out wrong without any error. Use [`table_ctx`].
//!
//! ```no_run
//! use pow5tab::{table_ctx, PowerTables};
//!
//! let tables = PowerTables::generate(&table_ctx())?;
//! tables.verify()?;
//! assert_eq!(tables.positive().get(0).map(|e| e.to_u128()), Some(1 << 124));
//! # Ok::<(), pow5tab::Error>(())
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::indexing_slicing,
        clippy::string_slice,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
    )
)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_precision_loss)]
#![deny(clippy::cast_sign_loss)]
#![deny(clippy::expect_used)]
#![deny(clippy::implicit_saturating_sub)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::panic)]
#![deny(clippy::ptr_as_ptr)]
#![deny(clippy::string_slice)]
#![deny(clippy::undocumented_unsafe_blocks)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::wildcard_imports)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]

mod arith;
mod ctx;
mod dec;
pub mod emit;
mod error;
mod pow5;
mod table;

pub use ctx::{Condition, Ctx, RoundingMode};
pub use dec::Dec;
pub use error::Error;
pub use pow5::{
    binary_exponent, inverse_multiplier, multiplier, pow5_bits, table_ctx, MIN_PRECISION,
    NEGATIVE_SHIFT, POSITIVE_SHIFT, PRECISION,
};
pub use table::{Entry, Kind, PowerTables, Table};
