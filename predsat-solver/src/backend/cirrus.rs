//! Term builder for the cirrus engine.
//!
//! Cirrus takes binary bit-vector literals directly, has native strict and
//! non-strict comparisons, variadic connectives, and a native low-side
//! zero extension, so almost every provided method is overridden with a
//! one-call implementation.

use crate::translate::TermBuilder;
use predsat_engines::cirrus::{CirrusError, Context, Term, TermSort};

pub(crate) struct CirrusBuilder<'a> {
    pub(crate) ctx: &'a mut Context,
}

impl TermBuilder for CirrusBuilder<'_> {
    type Bool = Term;
    type Arith = Term;
    type Bv = Term;
    type Error = CirrusError;

    fn bool_lit(&mut self, value: bool) -> Result<Term, CirrusError> {
        Ok(if value {
            self.ctx.true_term()
        } else {
            self.ctx.false_term()
        })
    }

    fn bool_var(&mut self, name: &str) -> Result<Term, CirrusError> {
        self.ctx.new_uninterpreted(name, TermSort::Bool)
    }

    fn int_var(&mut self, name: &str) -> Result<Term, CirrusError> {
        self.ctx.new_uninterpreted(name, TermSort::Int)
    }

    fn int_num(&mut self, value: i64) -> Result<Term, CirrusError> {
        Ok(self.ctx.int_const(value))
    }

    fn real_var(&mut self, name: &str) -> Result<Term, CirrusError> {
        self.ctx.new_uninterpreted(name, TermSort::Real)
    }

    fn real_num(&mut self, value: f64) -> Result<Term, CirrusError> {
        self.ctx.rational_const(&format!("{value}"))
    }

    fn bv_var(&mut self, name: &str, width: u32) -> Result<Term, CirrusError> {
        self.ctx.new_uninterpreted(name, TermSort::BitVec(width))
    }

    fn bv_lit(&mut self, bits: &str) -> Result<Term, CirrusError> {
        self.ctx.bv_from_bits(bits)
    }

    fn add(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.add(l, r)
    }

    fn eq(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.eq(l, r)
    }

    fn le(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.le_term(l, r)
    }

    /// Native strict less.
    fn lt(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.lt_term(l, r)
    }

    fn bv_eq(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.eq(l, r)
    }

    fn bv_ule(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.bv_le(l, r)
    }

    fn bv_ult(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.bv_lt(l, r)
    }

    fn bv_width(&mut self, t: Term) -> Result<u32, CirrusError> {
        match self.ctx.sort(t) {
            TermSort::BitVec(w) => Ok(w),
            _ => Err(CirrusError::SortMismatch { op: "bv_width" }),
        }
    }

    /// Native low-side extension; no padding literal needed.
    fn bv_extend_low(&mut self, t: Term, extra: u32) -> Result<Term, CirrusError> {
        self.ctx.zero_extend_low(t, extra)
    }

    fn not(&mut self, t: Term) -> Result<Term, CirrusError> {
        self.ctx.not_term(t)
    }

    fn and2(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.and_terms(&[l, r])
    }

    fn or2(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.ctx.or_terms(&[l, r])
    }

    /// Variadic conjunction.
    fn and_many(&mut self, terms: &[Term]) -> Result<Term, CirrusError> {
        self.ctx.and_terms(terms)
    }

    /// Variadic disjunction.
    fn or_many(&mut self, terms: &[Term]) -> Result<Term, CirrusError> {
        self.ctx.or_terms(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_goes_through_the_native_primitive() {
        let mut ctx = Context::new();
        let mut builder = CirrusBuilder { ctx: &mut ctx };
        let v = builder.bv_var("t.s", 16).unwrap();
        let wide = builder.bv_extend_low(v, 32).unwrap();
        assert_eq!(builder.bv_width(wide).unwrap(), 48);
    }

    #[test]
    fn alignment_widens_the_narrower_side() {
        let mut ctx = Context::new();
        let mut builder = CirrusBuilder { ctx: &mut ctx };
        let narrow = builder.bv_var("t.a", 32).unwrap();
        let wide = builder.bv_var("t.b", 48).unwrap();
        let (l, r) = builder.align(narrow, wide).unwrap();
        assert_eq!(builder.bv_width(l).unwrap(), 48);
        assert_eq!(builder.bv_width(r).unwrap(), 48);
    }
}
