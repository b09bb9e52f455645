//! The cirrus engine: a flat term table behind a configured context.
//!
//! Terms are untyped [`Term`] handles; sorts live in a runtime table and
//! are checked when terms combine. Connectives are variadic
//! ([`Context::and_terms`] / [`Context::or_terms`] over slices), numeric
//! comparison has both `le_term` and a native `lt_term`, and bit vectors
//! come with a native [`Context::zero_extend_low`] so callers never build
//! padding by hand. Bit-vector numerals are parsed from binary digit
//! strings, the numeral's width being the digit count.

mod context;
mod decide;

pub use context::{Context, ContextConfig, Term, TermSort};

use thiserror::Error;

/// Outcome of [`Context::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// The asserted conjunction is satisfiable.
    Sat,
    /// The asserted conjunction is unsatisfiable.
    Unsat,
    /// Budget exhausted, or a term outside the decidable fragment.
    Undetermined,
}

/// Errors raised by term construction and assertion.
#[derive(Debug, Error)]
pub enum CirrusError {
    /// Operand sorts do not fit the operation.
    #[error("ill-sorted operands for {op}")]
    SortMismatch {
        /// Operation name.
        op: &'static str,
    },
    /// Bit-vector widths disagree.
    #[error("bit-vector widths {left} and {right} do not match")]
    WidthMismatch {
        /// Left width.
        left: u32,
        /// Right width.
        right: u32,
    },
    /// An uninterpreted term name was reused at a different sort.
    #[error("name {name} is bound to a different sort")]
    NameClash {
        /// The reused name.
        name: String,
    },
    /// Unparsable numeral text.
    #[error("cannot read numeral {0:?}")]
    BadNumeral(String),
    /// Variadic connective over an empty slice.
    #[error("connective requires at least one argument")]
    EmptyConnective,
    /// Asserted term is not boolean.
    #[error("assertion must be boolean")]
    NotBool,
}
