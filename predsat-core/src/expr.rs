//! The predicate expression tree.
//!
//! [`Expr`] is a closed tagged union: boolean literals, boolean column
//! atoms, typed comparisons and the logical combinators. Comparisons read
//! as `left OP right + constant`; either operand may be absent, in which
//! case that side collapses to the raw constant. A comparison with both
//! operands absent is a degenerate tautology the translator folds straight
//! to `true`.
//!
//! Construction validates what the type system cannot: combinators need at
//! least one child, comparison operands must match the comparison's value
//! domain, and real constants must be finite. Once built, a node is
//! immutable and owns its children exclusively (a tree, not a DAG).

use crate::column::{Column, ColumnType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Comparison kind, shared by every value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    /// `left = right + c`
    Equal,
    /// `left != right + c`
    NotEqual,
    /// `left < right + c`
    Less,
    /// `left <= right + c`
    LessOrEqual,
}

/// One side of a text comparison: a varchar column or a string literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextOperand {
    /// A varchar column reference.
    Column(Column),
    /// A string literal.
    Literal(String),
}

/// Error raised by expression constructors.
#[derive(Debug, Error)]
pub enum ExprError {
    /// `And`/`Or` was given no children.
    #[error("{op} requires at least one subexpression")]
    EmptyJunction {
        /// The offending combinator, `"and"` or `"or"`.
        op: &'static str,
    },
    /// A comparison operand's declared type does not match the comparison
    /// domain.
    #[error("column {column} has type {actual}, expected {expected}")]
    DomainMismatch {
        /// Qualified name of the offending column.
        column: String,
        /// Type required by the comparison domain.
        expected: &'static str,
        /// The column's declared type.
        actual: ColumnType,
    },
    /// A real comparison was given a NaN or infinite constant.
    #[error("real comparison constant must be finite, got {0}")]
    NonFiniteConstant(f64),
}

/// An immutable predicate expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Constant `true` or `false`.
    BoolLit(bool),
    /// A boolean column used as an atom.
    BoolCol(Column),
    /// A boolean column used negatively.
    NotBoolCol(Column),
    /// Integer comparison `left OP right + constant`.
    IntCmp {
        /// Comparison kind.
        op: CmpOp,
        /// Left operand; absent means the side is the raw constant.
        left: Option<Column>,
        /// Right operand; absent means the side is the raw constant.
        right: Option<Column>,
        /// Constant offset added to the right side.
        constant: i64,
    },
    /// Real comparison `left OP right + constant`.
    RealCmp {
        /// Comparison kind.
        op: CmpOp,
        /// Left operand; absent means the side is the raw constant.
        left: Option<Column>,
        /// Right operand; absent means the side is the raw constant.
        right: Option<Column>,
        /// Constant offset added to the right side.
        constant: f64,
    },
    /// Text comparison between columns and/or string literals.
    TextCmp {
        /// Comparison kind.
        op: CmpOp,
        /// Left operand.
        left: Option<TextOperand>,
        /// Right operand.
        right: Option<TextOperand>,
    },
    /// Conjunction of one or more subexpressions, order-preserving.
    And(Vec<Expr>),
    /// Disjunction of one or more subexpressions, order-preserving.
    Or(Vec<Expr>),
    /// Negation of exactly one subexpression.
    Not(Box<Expr>),
}

fn check_domain(col: &Option<Column>, expected: ColumnType) -> Result<(), ExprError> {
    if let Some(c) = col {
        let matches = match (expected, c.ty()) {
            (ColumnType::Varchar { .. }, ColumnType::Varchar { .. }) => true,
            (want, got) => want == got,
        };
        if !matches {
            return Err(ExprError::DomainMismatch {
                column: c.qualified_name(),
                expected: match expected {
                    ColumnType::Integer => "integer",
                    ColumnType::Real => "real",
                    ColumnType::Boolean => "boolean",
                    ColumnType::Varchar { .. } => "varchar",
                },
                actual: c.ty(),
            });
        }
    }
    Ok(())
}

impl Expr {
    /// Constant boolean.
    #[must_use]
    pub fn bool_lit(value: bool) -> Self {
        Expr::BoolLit(value)
    }

    /// A boolean column atom.
    pub fn bool_col(col: Column) -> Result<Self, ExprError> {
        check_domain(&Some(col.clone()), ColumnType::Boolean)?;
        Ok(Expr::BoolCol(col))
    }

    /// A negated boolean column atom.
    pub fn not_bool_col(col: Column) -> Result<Self, ExprError> {
        check_domain(&Some(col.clone()), ColumnType::Boolean)?;
        Ok(Expr::NotBoolCol(col))
    }

    /// Integer comparison `left OP right + constant`.
    pub fn int_cmp(
        op: CmpOp,
        left: Option<Column>,
        right: Option<Column>,
        constant: i64,
    ) -> Result<Self, ExprError> {
        check_domain(&left, ColumnType::Integer)?;
        check_domain(&right, ColumnType::Integer)?;
        Ok(Expr::IntCmp {
            op,
            left,
            right,
            constant,
        })
    }

    /// Real comparison `left OP right + constant`.
    pub fn real_cmp(
        op: CmpOp,
        left: Option<Column>,
        right: Option<Column>,
        constant: f64,
    ) -> Result<Self, ExprError> {
        if !constant.is_finite() {
            return Err(ExprError::NonFiniteConstant(constant));
        }
        check_domain(&left, ColumnType::Real)?;
        check_domain(&right, ColumnType::Real)?;
        Ok(Expr::RealCmp {
            op,
            left,
            right,
            constant,
        })
    }

    /// Text comparison between columns and/or literals.
    pub fn text_cmp(
        op: CmpOp,
        left: Option<TextOperand>,
        right: Option<TextOperand>,
    ) -> Result<Self, ExprError> {
        for operand in [&left, &right].into_iter().flatten() {
            if let TextOperand::Column(c) = operand {
                check_domain(&Some(c.clone()), ColumnType::Varchar { len: 0 })?;
            }
        }
        Ok(Expr::TextCmp { op, left, right })
    }

    /// Conjunction; requires at least one child.
    pub fn and(children: Vec<Expr>) -> Result<Self, ExprError> {
        if children.is_empty() {
            return Err(ExprError::EmptyJunction { op: "and" });
        }
        Ok(Expr::And(children))
    }

    /// Disjunction; requires at least one child.
    pub fn or(children: Vec<Expr>) -> Result<Self, ExprError> {
        if children.is_empty() {
            return Err(ExprError::EmptyJunction { op: "or" });
        }
        Ok(Expr::Or(children))
    }

    /// Negation of one subexpression.
    #[must_use]
    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    /// Children of a combinator node; leaves have none.
    #[must_use]
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::And(cs) | Expr::Or(cs) => cs,
            Expr::Not(c) => std::slice::from_ref(c),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_col(name: &str) -> Column {
        Column::new("t", name, 1, ColumnType::Integer)
    }

    #[test]
    fn combinators_require_children() {
        assert!(matches!(
            Expr::and(vec![]),
            Err(ExprError::EmptyJunction { op: "and" })
        ));
        assert!(Expr::or(vec![Expr::bool_lit(true)]).is_ok());
    }

    #[test]
    fn comparison_domains_are_checked() {
        let b = Column::new("t", "b", 1, ColumnType::Boolean);
        let err = Expr::int_cmp(CmpOp::Equal, Some(b), None, 0).unwrap_err();
        assert!(matches!(err, ExprError::DomainMismatch { .. }));

        let ok = Expr::int_cmp(CmpOp::Equal, Some(int_col("x")), None, 3);
        assert!(ok.is_ok());
    }

    #[test]
    fn varchar_columns_of_any_length_fit_text_comparisons() {
        let s2 = Column::new("t", "s2", 1, ColumnType::Varchar { len: 2 });
        let s9 = Column::new("t", "s9", 2, ColumnType::Varchar { len: 9 });
        assert!(Expr::text_cmp(
            CmpOp::Less,
            Some(TextOperand::Column(s2)),
            Some(TextOperand::Column(s9)),
        )
        .is_ok());
    }

    #[test]
    fn real_constants_must_be_finite() {
        let err = Expr::real_cmp(CmpOp::Less, None, None, f64::NAN).unwrap_err();
        assert!(matches!(err, ExprError::NonFiniteConstant(_)));
    }

    #[test]
    fn not_holds_exactly_one_child() {
        let e = Expr::not(Expr::bool_lit(false));
        assert_eq!(e.children().len(), 1);
    }
}
