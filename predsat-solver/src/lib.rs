//! predsat-solver: the multi-backend satisfiability bridge.
//!
//! A semantic-cache layer asks one question — "is this condition
//! satisfiable?" — about predicates it has already resolved to typed
//! columns. This crate answers it against any of three interchangeable
//! engines without the caller touching an engine API:
//!
//! 1. build or obtain an immutable [`Expr`],
//! 2. create a session for a [`Backend`] and [`Lifecycle`],
//! 3. call [`SatChecker::is_satisfiable`] and get
//!    [`Satisfiability`] or a [`CheckError`].
//!
//! Translation is a single generic descent over the IR; each backend
//! supplies a term builder for its own term language. Sessions drive the
//! backend context through `open`/`reset`/`close` according to their
//! lifecycle policy, and every failure — translation, assertion, resource,
//! indeterminate verdict — surfaces as a typed error, never as a false
//! "unsatisfiable".
//!
//! # Examples
//!
//! ```
//! use predsat_solver::{session, Backend, CmpOp, Column, ColumnType, Expr, Lifecycle};
//!
//! let x = Column::new("t", "x", 1, ColumnType::Integer);
//! let y = Column::new("t", "y", 2, ColumnType::Integer);
//! // x = 21 and y = 21 and x = y + (-1)
//! let expr = Expr::and(vec![
//!     Expr::int_cmp(CmpOp::Equal, Some(x.clone()), None, 21).unwrap(),
//!     Expr::int_cmp(CmpOp::Equal, Some(y.clone()), None, 21).unwrap(),
//!     Expr::int_cmp(CmpOp::Equal, Some(x), Some(y), -1).unwrap(),
//! ])
//! .unwrap();
//!
//! let mut checker = session(Backend::Boreal, Lifecycle::PerCall);
//! assert!(!checker.is_satisfiable(&expr).unwrap().is_satisfiable());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
pub mod outcome;
pub mod session;
mod translate;

pub use outcome::{CheckError, Satisfiability};
pub use session::{
    session, Backend, BorealSession, CirrusSession, Lifecycle, QuillSession, SatChecker,
};

pub use predsat_core::{encode, CmpOp, Column, ColumnType, Expr, ExprError, TextOperand};
