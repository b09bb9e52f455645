//! Term builder for the quill engine.
//!
//! Quill has no native numeric strict less and no n-ary connectives, so
//! this builder keeps the trait's derived `lt` and pairwise folds. Numbers
//! are handed over as decimal text; bit-vector literals stay binary.

use crate::translate::TermBuilder;
use predsat_engines::quill::{Env, QuillError, Sort, TermId};

pub(crate) struct QuillBuilder<'a> {
    pub(crate) env: &'a mut Env,
}

/// Quill reads sort from the numeral text, so a real constant must carry a
/// fraction marker even when integral.
fn real_text(value: f64) -> String {
    let mut text = format!("{value}");
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}

impl TermBuilder for QuillBuilder<'_> {
    type Bool = TermId;
    type Arith = TermId;
    type Bv = TermId;
    type Error = QuillError;

    fn bool_lit(&mut self, value: bool) -> Result<TermId, QuillError> {
        Ok(if value {
            self.env.make_true()
        } else {
            self.env.make_false()
        })
    }

    fn bool_var(&mut self, name: &str) -> Result<TermId, QuillError> {
        self.env.declare_const(name, Sort::Bool)
    }

    fn int_var(&mut self, name: &str) -> Result<TermId, QuillError> {
        self.env.declare_const(name, Sort::Int)
    }

    fn int_num(&mut self, value: i64) -> Result<TermId, QuillError> {
        self.env.make_number(&value.to_string())
    }

    fn real_var(&mut self, name: &str) -> Result<TermId, QuillError> {
        self.env.declare_const(name, Sort::Real)
    }

    fn real_num(&mut self, value: f64) -> Result<TermId, QuillError> {
        self.env.make_number(&real_text(value))
    }

    fn bv_var(&mut self, name: &str, width: u32) -> Result<TermId, QuillError> {
        self.env.declare_const(name, Sort::Bv(width))
    }

    fn bv_lit(&mut self, bits: &str) -> Result<TermId, QuillError> {
        self.env.make_bv_number(bits, bits.len() as u32)
    }

    fn add(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.env.make_plus(l, r)
    }

    fn eq(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.env.make_equal(l, r)
    }

    fn le(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.env.make_leq(l, r)
    }

    fn bv_eq(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.env.make_equal(l, r)
    }

    fn bv_ule(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.env.make_bv_uleq(l, r)
    }

    fn bv_ult(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.env.make_bv_ult(l, r)
    }

    fn bv_width(&mut self, t: TermId) -> Result<u32, QuillError> {
        match self.env.sort_of(t)? {
            Sort::Bv(w) => Ok(w),
            s => Err(QuillError::SortMismatch {
                expected: "a bit-vector term",
                found: s.to_string(),
            }),
        }
    }

    fn bv_extend_low(&mut self, t: TermId, extra: u32) -> Result<TermId, QuillError> {
        let zeros = "0".repeat(extra as usize);
        let pad = self.env.make_bv_number(&zeros, extra)?;
        self.env.make_bv_concat(t, pad)
    }

    fn not(&mut self, t: TermId) -> Result<TermId, QuillError> {
        self.env.make_not(t)
    }

    fn and2(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.env.make_and(l, r)
    }

    fn or2(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.env.make_or(l, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_constants_keep_their_sort_marker() {
        assert_eq!(real_text(2.0), "2.0");
        assert_eq!(real_text(2.5), "2.5");
        assert_eq!(real_text(0.0), "0.0");
    }

    #[test]
    fn derived_strict_less_is_le_and_not_eq() {
        use predsat_engines::quill::Config;
        let mut env = Env::new(&Config::default());
        let mut builder = QuillBuilder { env: &mut env };
        let x = builder.int_var("t.x").unwrap();
        let y = builder.int_var("t.y").unwrap();
        let lt = builder.lt(x, y).unwrap();
        assert_eq!(
            builder.env.to_smtlib2(lt),
            "(and (<= t.x t.y) (not (= t.x t.y)))"
        );
    }
}
