//! Flat term table and constructors for the cirrus engine.

use super::{CheckStatus, CirrusError};
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::One;
use rustc_hash::FxHashMap;

/// Handle into a context's term table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Term(pub(crate) u32);

/// Runtime sort of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermSort {
    /// Boolean.
    Bool,
    /// Unbounded integer.
    Int,
    /// Real.
    Real,
    /// Bit vector of the given width.
    BitVec(u32),
}

/// Context construction parameters.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Search-step ceiling for one [`Context::check`].
    pub branch_budget: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            branch_budget: 100_000,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum TermNode {
    True,
    False,
    Unint(String),
    IntLit(BigInt),
    RatLit(BigRational),
    BvLit(BigUint),
    Add(Term, Term),
    Eq(Term, Term),
    Le(Term, Term),
    Lt(Term, Term),
    BvLe(Term, Term),
    BvLt(Term, Term),
    ExtendLow(Term, u32),
    Not(Term),
    Conj(Vec<Term>),
    Disj(Vec<Term>),
}

/// A cirrus context: terms, sorts, names and assertions in one place.
#[derive(Debug)]
pub struct Context {
    config: ContextConfig,
    pub(crate) nodes: Vec<TermNode>,
    pub(crate) sorts: Vec<TermSort>,
    names: FxHashMap<String, Term>,
    pub(crate) assertions: Vec<Term>,
}

impl Default for Context {
    fn default() -> Self {
        Self::with_config(&ContextConfig::default())
    }
}

impl Context {
    /// Context with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with explicit configuration.
    #[must_use]
    pub fn with_config(config: &ContextConfig) -> Self {
        Self {
            config: config.clone(),
            nodes: Vec::new(),
            sorts: Vec::new(),
            names: FxHashMap::default(),
            assertions: Vec::new(),
        }
    }

    pub(crate) fn budget(&self) -> u64 {
        self.config.branch_budget
    }

    fn push(&mut self, node: TermNode, sort: TermSort) -> Term {
        self.nodes.push(node);
        self.sorts.push(sort);
        Term(self.nodes.len() as u32 - 1)
    }

    pub(crate) fn node(&self, t: Term) -> &TermNode {
        &self.nodes[t.0 as usize]
    }

    /// Sort of a term.
    #[must_use]
    pub fn sort(&self, t: Term) -> TermSort {
        self.sorts[t.0 as usize]
    }

    /// The constant `true`.
    pub fn true_term(&mut self) -> Term {
        self.push(TermNode::True, TermSort::Bool)
    }

    /// The constant `false`.
    pub fn false_term(&mut self) -> Term {
        self.push(TermNode::False, TermSort::Bool)
    }

    /// Fresh (or previously created) uninterpreted term of a sort.
    pub fn new_uninterpreted(&mut self, name: &str, sort: TermSort) -> Result<Term, CirrusError> {
        if let Some(&t) = self.names.get(name) {
            if self.sort(t) == sort {
                return Ok(t);
            }
            return Err(CirrusError::NameClash {
                name: name.to_string(),
            });
        }
        let t = self.push(TermNode::Unint(name.to_string()), sort);
        self.names.insert(name.to_string(), t);
        Ok(t)
    }

    /// Integer literal.
    pub fn int_const(&mut self, value: i64) -> Term {
        self.push(TermNode::IntLit(BigInt::from(value)), TermSort::Int)
    }

    /// Rational literal from decimal or `p/q` text.
    pub fn rational_const(&mut self, text: &str) -> Result<Term, CirrusError> {
        let value =
            read_rational(text).ok_or_else(|| CirrusError::BadNumeral(text.to_string()))?;
        Ok(self.push(TermNode::RatLit(value), TermSort::Real))
    }

    /// Bit-vector literal from binary digits; the width is the digit count.
    pub fn bv_from_bits(&mut self, bits: &str) -> Result<Term, CirrusError> {
        if bits.is_empty() || bits.bytes().any(|b| b != b'0' && b != b'1') {
            return Err(CirrusError::BadNumeral(bits.to_string()));
        }
        let mut value = BigUint::ZERO;
        for b in bits.bytes() {
            value = (value << 1u32) + BigUint::from(u8::from(b == b'1'));
        }
        let width = bits.len() as u32;
        Ok(self.push(TermNode::BvLit(value), TermSort::BitVec(width)))
    }

    fn numeric(&self, l: Term, r: Term, op: &'static str) -> Result<TermSort, CirrusError> {
        match (self.sort(l), self.sort(r)) {
            (TermSort::Int, TermSort::Int) => Ok(TermSort::Int),
            (TermSort::Real, TermSort::Real) => Ok(TermSort::Real),
            _ => Err(CirrusError::SortMismatch { op }),
        }
    }

    fn bitvec(&self, l: Term, r: Term, op: &'static str) -> Result<u32, CirrusError> {
        match (self.sort(l), self.sort(r)) {
            (TermSort::BitVec(a), TermSort::BitVec(b)) if a == b => Ok(a),
            (TermSort::BitVec(a), TermSort::BitVec(b)) => {
                Err(CirrusError::WidthMismatch { left: a, right: b })
            }
            _ => Err(CirrusError::SortMismatch { op }),
        }
    }

    fn boolean(&self, t: Term, op: &'static str) -> Result<(), CirrusError> {
        match self.sort(t) {
            TermSort::Bool => Ok(()),
            _ => Err(CirrusError::SortMismatch { op }),
        }
    }

    /// Numeric addition.
    pub fn add(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        let sort = self.numeric(l, r, "add")?;
        Ok(self.push(TermNode::Add(l, r), sort))
    }

    /// Equality over numerics of one sort or bit vectors of one width.
    pub fn eq(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        if matches!(
            (self.sort(l), self.sort(r)),
            (TermSort::BitVec(_), TermSort::BitVec(_))
        ) {
            self.bitvec(l, r, "eq")?;
        } else {
            self.numeric(l, r, "eq")?;
        }
        Ok(self.push(TermNode::Eq(l, r), TermSort::Bool))
    }

    /// Numeric `<=`.
    pub fn le_term(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.numeric(l, r, "le")?;
        Ok(self.push(TermNode::Le(l, r), TermSort::Bool))
    }

    /// Numeric `<`, native.
    pub fn lt_term(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.numeric(l, r, "lt")?;
        Ok(self.push(TermNode::Lt(l, r), TermSort::Bool))
    }

    /// Unsigned bit-vector `<=`.
    pub fn bv_le(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.bitvec(l, r, "bv_le")?;
        Ok(self.push(TermNode::BvLe(l, r), TermSort::Bool))
    }

    /// Unsigned bit-vector `<`.
    pub fn bv_lt(&mut self, l: Term, r: Term) -> Result<Term, CirrusError> {
        self.bitvec(l, r, "bv_lt")?;
        Ok(self.push(TermNode::BvLt(l, r), TermSort::Bool))
    }

    /// Append `extra` zero bits below the least significant bit, i.e.
    /// multiply the unsigned value by `2^extra` while widening.
    pub fn zero_extend_low(&mut self, t: Term, extra: u32) -> Result<Term, CirrusError> {
        match self.sort(t) {
            TermSort::BitVec(w) => Ok(self.push(TermNode::ExtendLow(t, extra), TermSort::BitVec(w + extra))),
            _ => Err(CirrusError::SortMismatch { op: "zero_extend_low" }),
        }
    }

    /// Logical negation.
    pub fn not_term(&mut self, t: Term) -> Result<Term, CirrusError> {
        self.boolean(t, "not")?;
        Ok(self.push(TermNode::Not(t), TermSort::Bool))
    }

    /// Variadic conjunction over a non-empty slice.
    pub fn and_terms(&mut self, terms: &[Term]) -> Result<Term, CirrusError> {
        if terms.is_empty() {
            return Err(CirrusError::EmptyConnective);
        }
        for &t in terms {
            self.boolean(t, "and")?;
        }
        Ok(self.push(TermNode::Conj(terms.to_vec()), TermSort::Bool))
    }

    /// Variadic disjunction over a non-empty slice.
    pub fn or_terms(&mut self, terms: &[Term]) -> Result<Term, CirrusError> {
        if terms.is_empty() {
            return Err(CirrusError::EmptyConnective);
        }
        for &t in terms {
            self.boolean(t, "or")?;
        }
        Ok(self.push(TermNode::Disj(terms.to_vec()), TermSort::Bool))
    }

    /// Assert a boolean term.
    pub fn assert_term(&mut self, t: Term) -> Result<(), CirrusError> {
        self.boolean(t, "assert").map_err(|_| CirrusError::NotBool)?;
        self.assertions.push(t);
        Ok(())
    }

    /// Drop all assertions; terms and names survive.
    pub fn reset(&mut self) {
        tracing::trace!(terms = self.nodes.len(), "cirrus reset");
        self.assertions.clear();
    }

    /// Decide the asserted conjunction.
    #[must_use]
    pub fn check(&self) -> CheckStatus {
        super::decide::check(self)
    }

    /// Render a term in SMT-LIB 2 syntax.
    #[must_use]
    pub fn to_smtlib2(&self, t: Term) -> String {
        let mut out = String::new();
        self.write_term(t, &mut out);
        out
    }

    fn write_term(&self, t: Term, out: &mut String) {
        use std::fmt::Write;
        match self.node(t) {
            TermNode::True => out.push_str("true"),
            TermNode::False => out.push_str("false"),
            TermNode::Unint(name) => out.push_str(name),
            TermNode::IntLit(i) => {
                if i.sign() == num_bigint::Sign::Minus {
                    let _ = write!(out, "(- {})", i.magnitude());
                } else {
                    let _ = write!(out, "{i}");
                }
            }
            TermNode::RatLit(r) => {
                if r.denom().is_one() {
                    let _ = write!(out, "{}", r.numer());
                } else {
                    let _ = write!(out, "(/ {} {})", r.numer(), r.denom());
                }
            }
            TermNode::BvLit(v) => {
                let w = match self.sort(t) {
                    TermSort::BitVec(w) => w,
                    _ => 0,
                };
                let _ = write!(out, "(_ bv{v} {w})");
            }
            TermNode::Add(l, r) => self.write_app("+", &[*l, *r], out),
            TermNode::Eq(l, r) => self.write_app("=", &[*l, *r], out),
            TermNode::Le(l, r) => self.write_app("<=", &[*l, *r], out),
            TermNode::Lt(l, r) => self.write_app("<", &[*l, *r], out),
            TermNode::BvLe(l, r) => self.write_app("bvule", &[*l, *r], out),
            TermNode::BvLt(l, r) => self.write_app("bvult", &[*l, *r], out),
            TermNode::ExtendLow(inner, extra) => {
                let _ = write!(out, "(concat ");
                self.write_term(*inner, out);
                let _ = write!(out, " (_ bv0 {extra}))");
            }
            TermNode::Not(x) => self.write_app("not", &[*x], out),
            TermNode::Conj(xs) => self.write_app("and", xs, out),
            TermNode::Disj(xs) => self.write_app("or", xs, out),
        }
    }

    fn write_app(&self, head: &str, args: &[Term], out: &mut String) {
        out.push('(');
        out.push_str(head);
        for &a in args {
            out.push(' ');
            self.write_term(a, out);
        }
        out.push(')');
    }
}

/// Exact rational from decimal, exponent or `p/q` text.
fn read_rational(text: &str) -> Option<BigRational> {
    if let Some((num, den)) = text.split_once('/') {
        let n = num.trim().parse::<BigInt>().ok()?;
        let d = den.trim().parse::<BigInt>().ok()?;
        if d == BigInt::ZERO {
            return None;
        }
        return Some(BigRational::new(n, d));
    }
    let (body, exp) = match text.split_once(['e', 'E']) {
        Some((b, e)) => (b, e.parse::<i32>().ok()?),
        None => (text, 0),
    };
    let neg = body.starts_with('-');
    let trimmed = body.trim_start_matches(['-', '+']);
    let (int_digits, frac_digits) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    let mut n: BigInt = format!("{int_digits}{frac_digits}").parse().ok()?;
    if neg {
        n = -n;
    }
    let scale = frac_digits.len() as i32 - exp;
    let ten = BigInt::from(10);
    Some(if scale >= 0 {
        BigRational::new(n, ten.pow(scale as u32))
    } else {
        BigRational::from(n * ten.pow((-scale) as u32))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_bind_one_sort() {
        let mut ctx = Context::new();
        let a = ctx.new_uninterpreted("t.x", TermSort::Int).unwrap();
        let b = ctx.new_uninterpreted("t.x", TermSort::Int).unwrap();
        assert_eq!(a, b);
        assert!(matches!(
            ctx.new_uninterpreted("t.x", TermSort::BitVec(8)),
            Err(CirrusError::NameClash { .. })
        ));
    }

    #[test]
    fn bv_literal_width_is_the_digit_count() {
        let mut ctx = Context::new();
        let v = ctx.bv_from_bits("0000000001100001").unwrap();
        assert_eq!(ctx.sort(v), TermSort::BitVec(16));
        assert!(ctx.bv_from_bits("").is_err());
        assert!(ctx.bv_from_bits("01x").is_err());
    }

    #[test]
    fn zero_extend_low_widens() {
        let mut ctx = Context::new();
        let v = ctx.bv_from_bits("01").unwrap();
        let e = ctx.zero_extend_low(v, 3).unwrap();
        assert_eq!(ctx.sort(e), TermSort::BitVec(5));
        assert_eq!(ctx.to_smtlib2(e), "(concat (_ bv1 2) (_ bv0 3))");
    }

    #[test]
    fn variadic_connectives_reject_empty_input() {
        let mut ctx = Context::new();
        assert!(matches!(
            ctx.and_terms(&[]),
            Err(CirrusError::EmptyConnective)
        ));
        let t = ctx.true_term();
        assert!(ctx.or_terms(&[t]).is_ok());
    }

    #[test]
    fn assertion_must_be_boolean() {
        let mut ctx = Context::new();
        let n = ctx.int_const(3);
        assert!(matches!(ctx.assert_term(n), Err(CirrusError::NotBool)));
    }
}
