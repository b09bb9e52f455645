//! Satisfiability engines for the predsat bridge.
//!
//! Three independent engines, each owning its term language, sort rules and
//! decision procedure:
//!
//! - [`quill`] — environment-handle API: every term is built through a
//!   method on [`quill::Env`], connectives are binary, numeric strict less
//!   has no primitive, bit-vector numerals arrive as binary digit strings.
//! - [`boreal`] — context/solver split with hash-consed typed asts, n-ary
//!   connectives, native strict less, decimal bit-vector numerals.
//! - [`cirrus`] — config + context with a flat term table and runtime sort
//!   column, variadic connectives, native low-side zero extension.
//!
//! All three decide the same fragment: quantifier-free boolean combinations
//! of boolean variables, integer/real difference atoms (`x R y + c`) and
//! unsigned comparisons of fixed-width bit vectors. On that fragment they
//! must agree; a formula outside it, or a search that exceeds the
//! configured budget, yields the engine's `Unknown` status rather than a
//! guess.
//!
//! Engines are synchronous and single-threaded; a context/environment is
//! exclusively owned and never shared between callers.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod boreal;
pub mod cirrus;
pub mod quill;
