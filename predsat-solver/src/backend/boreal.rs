//! Term builder for the boreal engine.
//!
//! Boreal has native strict less and variadic connectives, so those
//! provided methods are overridden. Bit-vector literals must be re-rendered
//! from the canonical binary digits into the decimal numerals the engine
//! accepts — a serialization detail of this backend, not a semantic one.

use crate::translate::TermBuilder;
use num_bigint::BigUint;
use predsat_engines::boreal::{ArithAst, BoolAst, BorealError, BvAst, Context};

pub(crate) struct BorealBuilder<'a> {
    pub(crate) ctx: &'a mut Context,
}

fn bits_to_decimal(bits: &str) -> String {
    let mut value = BigUint::ZERO;
    for b in bits.bytes() {
        value = (value << 1u32) + BigUint::from(u8::from(b == b'1'));
    }
    value.to_string()
}

impl TermBuilder for BorealBuilder<'_> {
    type Bool = BoolAst;
    type Arith = ArithAst;
    type Bv = BvAst;
    type Error = BorealError;

    fn bool_lit(&mut self, value: bool) -> Result<BoolAst, BorealError> {
        Ok(if value {
            self.ctx.mk_true()
        } else {
            self.ctx.mk_false()
        })
    }

    fn bool_var(&mut self, name: &str) -> Result<BoolAst, BorealError> {
        self.ctx.mk_bool_const(name)
    }

    fn int_var(&mut self, name: &str) -> Result<ArithAst, BorealError> {
        self.ctx.mk_int_const(name)
    }

    fn int_num(&mut self, value: i64) -> Result<ArithAst, BorealError> {
        Ok(self.ctx.mk_int(value))
    }

    fn real_var(&mut self, name: &str) -> Result<ArithAst, BorealError> {
        self.ctx.mk_real_const(name)
    }

    fn real_num(&mut self, value: f64) -> Result<ArithAst, BorealError> {
        self.ctx.mk_real_numeral(&format!("{value}"))
    }

    fn bv_var(&mut self, name: &str, width: u32) -> Result<BvAst, BorealError> {
        self.ctx.mk_bv_const(name, width)
    }

    fn bv_lit(&mut self, bits: &str) -> Result<BvAst, BorealError> {
        self.ctx
            .mk_bv_numeral(&bits_to_decimal(bits), bits.len() as u32)
    }

    fn add(&mut self, l: ArithAst, r: ArithAst) -> Result<ArithAst, BorealError> {
        self.ctx.mk_add(l, r)
    }

    fn eq(&mut self, l: ArithAst, r: ArithAst) -> Result<BoolAst, BorealError> {
        self.ctx.mk_eq(l, r)
    }

    fn le(&mut self, l: ArithAst, r: ArithAst) -> Result<BoolAst, BorealError> {
        self.ctx.mk_le(l, r)
    }

    /// Native strict less; no derivation needed.
    fn lt(&mut self, l: ArithAst, r: ArithAst) -> Result<BoolAst, BorealError> {
        self.ctx.mk_lt(l, r)
    }

    fn bv_eq(&mut self, l: BvAst, r: BvAst) -> Result<BoolAst, BorealError> {
        self.ctx.mk_eq_bv(l, r)
    }

    fn bv_ule(&mut self, l: BvAst, r: BvAst) -> Result<BoolAst, BorealError> {
        self.ctx.mk_bvule(l, r)
    }

    fn bv_ult(&mut self, l: BvAst, r: BvAst) -> Result<BoolAst, BorealError> {
        self.ctx.mk_bvult(l, r)
    }

    fn bv_width(&mut self, t: BvAst) -> Result<u32, BorealError> {
        self.ctx.bv_width(t.0).ok_or(BorealError::DomainMismatch)
    }

    fn bv_extend_low(&mut self, t: BvAst, extra: u32) -> Result<BvAst, BorealError> {
        let zeros = self.ctx.mk_bv_numeral("0", extra)?;
        Ok(self.ctx.mk_concat(t, zeros))
    }

    fn not(&mut self, t: BoolAst) -> Result<BoolAst, BorealError> {
        Ok(self.ctx.mk_not(t))
    }

    fn and2(&mut self, l: BoolAst, r: BoolAst) -> Result<BoolAst, BorealError> {
        self.ctx.mk_and(&[l, r])
    }

    fn or2(&mut self, l: BoolAst, r: BoolAst) -> Result<BoolAst, BorealError> {
        self.ctx.mk_or(&[l, r])
    }

    /// Variadic n-ary conjunction, no fold.
    fn and_many(&mut self, terms: &[BoolAst]) -> Result<BoolAst, BorealError> {
        self.ctx.mk_and(terms)
    }

    /// Variadic n-ary disjunction, no fold.
    fn or_many(&mut self, terms: &[BoolAst]) -> Result<BoolAst, BorealError> {
        self.ctx.mk_or(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_digits_rerender_as_decimal() {
        // "aa" encodes to 0x00610061 = 6357089.
        let bits = "00000000011000010000000001100001";
        assert_eq!(bits_to_decimal(bits), "6357089");
        assert_eq!(bits_to_decimal("0"), "0");
    }

    #[test]
    fn nary_connectives_stay_flat() {
        let mut ctx = Context::new();
        let mut builder = BorealBuilder { ctx: &mut ctx };
        let a = builder.bool_var("t.a").unwrap();
        let b = builder.bool_var("t.b").unwrap();
        let c = builder.bool_var("t.c").unwrap();
        let and = builder.and_many(&[a, b, c]).unwrap();
        assert_eq!(builder.ctx.to_smtlib2(and), "(and t.a t.b t.c)");
    }
}
