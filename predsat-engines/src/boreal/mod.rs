//! The boreal engine: hash-consed typed asts behind a context, with a
//! separate solver object holding assertions.
//!
//! Construction goes through [`Context`] and yields typed handles
//! ([`BoolAst`], [`ArithAst`], [`BvAst`]); equal terms are interned to equal
//! handles. Connectives are n-ary, numeric comparison offers a native
//! strict `mk_lt`, and bit-vector numerals are created from **decimal**
//! strings. Assertions accumulate in a [`Solver`], which checks against a
//! context and can be reset independently of it.

mod context;
mod feas;
mod solver;

pub use context::{ArithAst, BoolAst, BvAst, Context};
pub use solver::Solver;

use thiserror::Error;

/// Outcome of [`Solver::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatResult {
    /// The asserted conjunction is satisfiable.
    Sat,
    /// The asserted conjunction is unsatisfiable.
    Unsat,
    /// The search budget ran out or a term fell outside the fragment.
    Unknown,
}

/// Errors raised by ast construction.
#[derive(Debug, Error)]
pub enum BorealError {
    /// Mixed integer/real operands, or a non-numeric operand.
    #[error("arithmetic operands must share one numeric domain")]
    DomainMismatch,
    /// Bit-vector operands of unequal width.
    #[error("bit-vector width mismatch: {left} vs {right}")]
    WidthMismatch {
        /// Left operand width.
        left: u32,
        /// Right operand width.
        right: u32,
    },
    /// A symbol was reused at a different sort.
    #[error("symbol {name} already declared at a different sort")]
    Redeclared {
        /// The offending symbol.
        name: String,
    },
    /// A numeral string could not be parsed, or does not fit its width.
    #[error("invalid numeral {0:?}")]
    InvalidNumeral(String),
    /// `mk_and`/`mk_or` over an empty slice.
    #[error("n-ary connective needs at least one operand")]
    EmptyConnective,
}
