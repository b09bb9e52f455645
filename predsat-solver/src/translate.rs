//! The traversal protocol: one generic descent over the expression tree,
//! one [`TermBuilder`] implementation per backend.
//!
//! The builder trait carries the primitive constructors a backend must
//! supply, plus provided methods for every rule that is shared policy
//! rather than backend capability:
//!
//! - `ne` is `not(eq)` — none of the engines has a primitive disequality;
//! - `lt` defaults to `le ∧ ¬eq` and is overridden by backends with a
//!   native strict comparison;
//! - `align` widens the narrower bit-vector operand by appending zero bits
//!   on the low-order side (multiplying its unsigned value by a power of
//!   two) so that fixed-length text comparison sees right-NUL-padded
//!   strings; comparisons are always unsigned afterwards;
//! - `and_many`/`or_many` fold pairwise left-to-right for binary-only
//!   backends and are overridden where the API is variadic.
//!
//! [`translate`] performs a single pre-order descent and owns the
//! operand-presence matrix: a comparison reads `left OP right + constant`,
//! an absent side collapses to the raw constant, and a comparison with
//! both sides absent folds directly to the boolean-true term.

use predsat_core::encode;
use predsat_core::{CmpOp, Expr, TextOperand};

/// Backend term construction, one implementation per engine.
pub(crate) trait TermBuilder {
    /// Boolean term handle.
    type Bool: Copy;
    /// Numeric term handle (integer or real, fixed per constructor).
    type Arith: Copy;
    /// Bit-vector term handle.
    type Bv: Copy;
    /// Construction error surfaced through `CheckError::Translation`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Boolean constant.
    fn bool_lit(&mut self, value: bool) -> Result<Self::Bool, Self::Error>;
    /// Boolean variable.
    fn bool_var(&mut self, name: &str) -> Result<Self::Bool, Self::Error>;
    /// Integer variable.
    fn int_var(&mut self, name: &str) -> Result<Self::Arith, Self::Error>;
    /// Integer numeral.
    fn int_num(&mut self, value: i64) -> Result<Self::Arith, Self::Error>;
    /// Real variable.
    fn real_var(&mut self, name: &str) -> Result<Self::Arith, Self::Error>;
    /// Real numeral.
    fn real_num(&mut self, value: f64) -> Result<Self::Arith, Self::Error>;
    /// Bit-vector variable of the given width.
    fn bv_var(&mut self, name: &str, width: u32) -> Result<Self::Bv, Self::Error>;
    /// Bit-vector literal from binary digits (the canonical hand-over
    /// form; a backend wanting decimal re-renders internally).
    fn bv_lit(&mut self, bits: &str) -> Result<Self::Bv, Self::Error>;

    /// Numeric addition.
    fn add(&mut self, l: Self::Arith, r: Self::Arith) -> Result<Self::Arith, Self::Error>;
    /// Numeric equality.
    fn eq(&mut self, l: Self::Arith, r: Self::Arith) -> Result<Self::Bool, Self::Error>;
    /// Numeric `<=`.
    fn le(&mut self, l: Self::Arith, r: Self::Arith) -> Result<Self::Bool, Self::Error>;
    /// Bit-vector equality (operands already width-aligned).
    fn bv_eq(&mut self, l: Self::Bv, r: Self::Bv) -> Result<Self::Bool, Self::Error>;
    /// Unsigned bit-vector `<=` (operands already width-aligned).
    fn bv_ule(&mut self, l: Self::Bv, r: Self::Bv) -> Result<Self::Bool, Self::Error>;
    /// Unsigned bit-vector `<` (operands already width-aligned).
    fn bv_ult(&mut self, l: Self::Bv, r: Self::Bv) -> Result<Self::Bool, Self::Error>;
    /// Width of a bit-vector term.
    fn bv_width(&mut self, t: Self::Bv) -> Result<u32, Self::Error>;
    /// Append `extra` zero bits below the least significant bit.
    fn bv_extend_low(&mut self, t: Self::Bv, extra: u32) -> Result<Self::Bv, Self::Error>;

    /// Logical negation.
    fn not(&mut self, t: Self::Bool) -> Result<Self::Bool, Self::Error>;
    /// Binary conjunction.
    fn and2(&mut self, l: Self::Bool, r: Self::Bool) -> Result<Self::Bool, Self::Error>;
    /// Binary disjunction.
    fn or2(&mut self, l: Self::Bool, r: Self::Bool) -> Result<Self::Bool, Self::Error>;

    /// Numeric `<`. Default derivation for backends without the
    /// primitive: `le ∧ ¬eq`, logically identical to a native `<`.
    fn lt(&mut self, l: Self::Arith, r: Self::Arith) -> Result<Self::Bool, Self::Error> {
        let le = self.le(l, r)?;
        let eq = self.eq(l, r)?;
        let ne = self.not(eq)?;
        self.and2(le, ne)
    }

    /// Numeric disequality, always derived.
    fn ne(&mut self, l: Self::Arith, r: Self::Arith) -> Result<Self::Bool, Self::Error> {
        let eq = self.eq(l, r)?;
        self.not(eq)
    }

    /// Bit-vector disequality, always derived.
    fn bv_ne(&mut self, l: Self::Bv, r: Self::Bv) -> Result<Self::Bool, Self::Error> {
        let eq = self.bv_eq(l, r)?;
        self.not(eq)
    }

    /// Widen the narrower operand on the low side until widths agree.
    fn align(
        &mut self,
        l: Self::Bv,
        r: Self::Bv,
    ) -> Result<(Self::Bv, Self::Bv), Self::Error> {
        let (lw, rw) = (self.bv_width(l)?, self.bv_width(r)?);
        if lw > rw {
            let widened = self.bv_extend_low(r, lw - rw)?;
            Ok((l, widened))
        } else if rw > lw {
            let widened = self.bv_extend_low(l, rw - lw)?;
            Ok((widened, r))
        } else {
            Ok((l, r))
        }
    }

    /// N-ary conjunction; the default folds pairwise left-to-right.
    fn and_many(&mut self, terms: &[Self::Bool]) -> Result<Self::Bool, Self::Error> {
        let mut acc = terms[0];
        for &t in &terms[1..] {
            acc = self.and2(acc, t)?;
        }
        Ok(acc)
    }

    /// N-ary disjunction; the default folds pairwise left-to-right.
    fn or_many(&mut self, terms: &[Self::Bool]) -> Result<Self::Bool, Self::Error> {
        let mut acc = terms[0];
        for &t in &terms[1..] {
            acc = self.or2(acc, t)?;
        }
        Ok(acc)
    }
}

/// Translate an expression to one backend boolean term in a single
/// pre-order descent.
pub(crate) fn translate<B: TermBuilder>(b: &mut B, expr: &Expr) -> Result<B::Bool, B::Error> {
    match expr {
        Expr::BoolLit(v) => b.bool_lit(*v),
        Expr::BoolCol(col) => b.bool_var(&col.qualified_name()),
        Expr::NotBoolCol(col) => {
            let var = b.bool_var(&col.qualified_name())?;
            b.not(var)
        }
        Expr::IntCmp {
            op,
            left,
            right,
            constant,
        } => match (left, right) {
            (None, None) => b.bool_lit(true),
            (Some(l), None) => {
                let lhs = b.int_var(&l.qualified_name())?;
                let rhs = b.int_num(*constant)?;
                apply_arith(b, *op, lhs, rhs)
            }
            (None, Some(r)) => {
                let lhs = b.int_num(*constant)?;
                let rhs = b.int_var(&r.qualified_name())?;
                apply_arith(b, *op, lhs, rhs)
            }
            (Some(l), Some(r)) => {
                let lhs = b.int_var(&l.qualified_name())?;
                let rv = b.int_var(&r.qualified_name())?;
                let rhs = if *constant == 0 {
                    rv
                } else {
                    let c = b.int_num(*constant)?;
                    b.add(rv, c)?
                };
                apply_arith(b, *op, lhs, rhs)
            }
        },
        Expr::RealCmp {
            op,
            left,
            right,
            constant,
        } => match (left, right) {
            (None, None) => b.bool_lit(true),
            (Some(l), None) => {
                let lhs = b.real_var(&l.qualified_name())?;
                let rhs = b.real_num(*constant)?;
                apply_arith(b, *op, lhs, rhs)
            }
            (None, Some(r)) => {
                let lhs = b.real_num(*constant)?;
                let rhs = b.real_var(&r.qualified_name())?;
                apply_arith(b, *op, lhs, rhs)
            }
            (Some(l), Some(r)) => {
                let lhs = b.real_var(&l.qualified_name())?;
                let rv = b.real_var(&r.qualified_name())?;
                let rhs = if *constant == 0.0 {
                    rv
                } else {
                    let c = b.real_num(*constant)?;
                    b.add(rv, c)?
                };
                apply_arith(b, *op, lhs, rhs)
            }
        },
        Expr::TextCmp { op, left, right } => match (left, right) {
            (Some(l), Some(r)) => {
                let lt = text_operand(b, l)?;
                let rt = text_operand(b, r)?;
                let (lt, rt) = b.align(lt, rt)?;
                apply_bv(b, *op, lt, rt)
            }
            // One or both sides algebraically absent: nothing to
            // constrain, fold to true.
            _ => b.bool_lit(true),
        },
        Expr::And(children) => {
            let mut terms = Vec::with_capacity(children.len());
            for child in children {
                terms.push(translate(b, child)?);
            }
            b.and_many(&terms)
        }
        Expr::Or(children) => {
            let mut terms = Vec::with_capacity(children.len());
            for child in children {
                terms.push(translate(b, child)?);
            }
            b.or_many(&terms)
        }
        Expr::Not(inner) => {
            let t = translate(b, inner)?;
            b.not(t)
        }
    }
}

fn apply_arith<B: TermBuilder>(
    b: &mut B,
    op: CmpOp,
    l: B::Arith,
    r: B::Arith,
) -> Result<B::Bool, B::Error> {
    match op {
        CmpOp::Equal => b.eq(l, r),
        CmpOp::NotEqual => b.ne(l, r),
        CmpOp::Less => b.lt(l, r),
        CmpOp::LessOrEqual => b.le(l, r),
    }
}

fn apply_bv<B: TermBuilder>(
    b: &mut B,
    op: CmpOp,
    l: B::Bv,
    r: B::Bv,
) -> Result<B::Bool, B::Error> {
    match op {
        CmpOp::Equal => b.bv_eq(l, r),
        CmpOp::NotEqual => b.bv_ne(l, r),
        CmpOp::Less => b.bv_ult(l, r),
        CmpOp::LessOrEqual => b.bv_ule(l, r),
    }
}

fn text_operand<B: TermBuilder>(b: &mut B, op: &TextOperand) -> Result<B::Bv, B::Error> {
    match op {
        TextOperand::Column(col) => {
            let width = col.bit_width().unwrap_or(0);
            b.bv_var(&col.qualified_name(), width)
        }
        TextOperand::Literal(s) if s.is_empty() => {
            // The empty string is one NUL unit; low-side padding keeps it
            // below every non-empty value at any width.
            b.bv_lit(&"0".repeat(encode::BITS_PER_CHAR as usize))
        }
        TextOperand::Literal(s) => b.bv_lit(&encode::bit_string(s)),
    }
}
