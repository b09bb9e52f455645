//! Predicate IR for the predsat satisfiability bridge.
//!
//! This crate holds everything the bridge layer and the engines agree on
//! without knowing about each other:
//! - [`Column`]: a typed variable slot identified by its qualified name
//! - [`Expr`]: an immutable tree of boolean literals, typed comparisons and
//!   logical combinators
//! - [`encode`]: the string-to-bit-string rules used for text comparisons
//!
//! Expressions are constructed once, validated at construction, and never
//! mutated afterwards; they can be shared freely across sessions and
//! threads.
//!
//! # Examples
//!
//! ```
//! use predsat_core::{Column, ColumnType, CmpOp, Expr};
//!
//! let x = Column::new("t", "x", 1, ColumnType::Integer);
//! let y = Column::new("t", "y", 2, ColumnType::Integer);
//!
//! // x = 21 AND y = 21 AND x = y
//! let expr = Expr::and(vec![
//!     Expr::int_cmp(CmpOp::Equal, Some(x.clone()), None, 21).unwrap(),
//!     Expr::int_cmp(CmpOp::Equal, Some(y.clone()), None, 21).unwrap(),
//!     Expr::int_cmp(CmpOp::Equal, Some(x), Some(y), 0).unwrap(),
//! ])
//! .unwrap();
//! assert_eq!(expr.children().len(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod column;
pub mod encode;
pub mod expr;

pub use column::{Column, ColumnType};
pub use expr::{CmpOp, Expr, ExprError, TextOperand};
