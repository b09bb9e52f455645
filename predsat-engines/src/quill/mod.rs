//! The quill engine: an environment-handle term API.
//!
//! Everything goes through an [`Env`]: terms are [`TermId`] handles into
//! the environment's arena, connectives are strictly binary (callers fold),
//! numeric comparison offers only `leq` and `equal` (strict less is the
//! caller's derivation), and bit-vector numerals are created from binary
//! digit strings.
//!
//! [`Env::reset`] discards the asserted formulas but keeps the term arena
//! alive, so handles created before a reset remain usable afterwards. The
//! flip side is that a name declared before the reset stays bound to its
//! sort; redeclaring it at a different sort is an error for the whole
//! lifetime of the environment.

mod solve;
mod term;
mod theory;

pub use term::{Env, Sort, TermId};

use thiserror::Error;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound on boolean branches plus theory leaves explored by one
    /// [`Env::solve`] call; exhausting it yields [`Status::Unknown`].
    pub branch_budget: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            branch_budget: 100_000,
        }
    }
}

/// Outcome of a [`Env::solve`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Some assignment satisfies every asserted formula.
    Sat,
    /// No assignment does.
    Unsat,
    /// The engine could not decide: budget exhausted or a term outside the
    /// supported fragment.
    Unknown,
}

/// Errors raised by term construction and assertion.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Operand sorts do not fit the constructor.
    #[error("sort mismatch: expected {expected}, found {found}")]
    SortMismatch {
        /// What the constructor required.
        expected: &'static str,
        /// What it was given.
        found: String,
    },
    /// Bit-vector operands of different widths where equal widths are
    /// required.
    #[error("bit-vector width mismatch: {left} vs {right}")]
    WidthMismatch {
        /// Width of the left operand.
        left: u32,
        /// Width of the right operand.
        right: u32,
    },
    /// A name was redeclared at a different sort.
    #[error("constant {name} already declared with a different sort")]
    Redeclared {
        /// The offending name.
        name: String,
    },
    /// A numeral string could not be parsed.
    #[error("invalid numeral {0:?}")]
    InvalidNumeral(String),
    /// A term handle does not belong to this environment.
    #[error("unknown term handle")]
    UnknownTerm,
    /// A non-boolean term was asserted.
    #[error("asserted term is not boolean")]
    NotBoolean,
}
