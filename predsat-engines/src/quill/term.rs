//! Term arena and constructors for the quill engine.

use super::{Config, QuillError, Status};
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::One;
use rustc_hash::FxHashMap;

/// Handle to a term inside an [`Env`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermId(pub(crate) u32);

/// Sort of a quill term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    /// Boolean.
    Bool,
    /// Unbounded integer.
    Int,
    /// Real number.
    Real,
    /// Bit vector of the given width.
    Bv(u32),
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::Int => write!(f, "Int"),
            Sort::Real => write!(f, "Real"),
            Sort::Bv(w) => write!(f, "(_ BitVec {w})"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum TermKind {
    True,
    False,
    Var(String),
    IntNum(BigInt),
    RatNum(BigRational),
    BvNum(BigUint),
    Plus(TermId, TermId),
    Eq(TermId, TermId),
    Leq(TermId, TermId),
    BvUle(TermId, TermId),
    BvUlt(TermId, TermId),
    BvConcat(TermId, TermId),
    Not(TermId),
    And(TermId, TermId),
    Or(TermId, TermId),
}

#[derive(Debug, Clone)]
pub(crate) struct TermData {
    pub(crate) kind: TermKind,
    pub(crate) sort: Sort,
}

/// A quill environment: term arena, declarations and assertion store.
#[derive(Debug)]
pub struct Env {
    pub(crate) config: Config,
    pub(crate) terms: Vec<TermData>,
    decls: FxHashMap<String, TermId>,
    pub(crate) asserted: Vec<TermId>,
}

impl Env {
    /// Create an environment from a configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            terms: Vec::new(),
            decls: FxHashMap::default(),
            asserted: Vec::new(),
        }
    }

    fn intern(&mut self, kind: TermKind, sort: Sort) -> TermId {
        let id = TermId(self.terms.len() as u32);
        self.terms.push(TermData { kind, sort });
        id
    }

    pub(crate) fn data(&self, t: TermId) -> &TermData {
        &self.terms[t.0 as usize]
    }

    /// Sort of a term.
    ///
    /// # Errors
    /// [`QuillError::UnknownTerm`] if the handle is out of range.
    pub fn sort_of(&self, t: TermId) -> Result<Sort, QuillError> {
        self.terms
            .get(t.0 as usize)
            .map(|d| d.sort)
            .ok_or(QuillError::UnknownTerm)
    }

    /// The constant `true`.
    pub fn make_true(&mut self) -> TermId {
        self.intern(TermKind::True, Sort::Bool)
    }

    /// The constant `false`.
    pub fn make_false(&mut self) -> TermId {
        self.intern(TermKind::False, Sort::Bool)
    }

    /// Declare (or look up) a constant of the given sort.
    ///
    /// Redeclaring a name at the same sort returns the original handle;
    /// a different sort is an error, even across [`Env::reset`].
    pub fn declare_const(&mut self, name: &str, sort: Sort) -> Result<TermId, QuillError> {
        if let Some(&id) = self.decls.get(name) {
            if self.data(id).sort == sort {
                return Ok(id);
            }
            return Err(QuillError::Redeclared {
                name: name.to_string(),
            });
        }
        let id = self.intern(TermKind::Var(name.to_string()), sort);
        self.decls.insert(name.to_string(), id);
        Ok(id)
    }

    /// Numeral from a decimal string: integers get sort `Int`, anything
    /// with a fraction digit, an exponent or a `/` gets sort `Real`.
    pub fn make_number(&mut self, text: &str) -> Result<TermId, QuillError> {
        if let Ok(i) = text.parse::<BigInt>() {
            return Ok(self.intern(TermKind::IntNum(i), Sort::Int));
        }
        let rat = parse_rational(text).ok_or_else(|| QuillError::InvalidNumeral(text.to_string()))?;
        Ok(self.intern(TermKind::RatNum(rat), Sort::Real))
    }

    /// Bit-vector numeral from a binary digit string of exactly `width`
    /// digits, most significant first.
    pub fn make_bv_number(&mut self, bits: &str, width: u32) -> Result<TermId, QuillError> {
        if bits.len() != width as usize || bits.bytes().any(|b| b != b'0' && b != b'1') {
            return Err(QuillError::InvalidNumeral(bits.to_string()));
        }
        let mut value = BigUint::ZERO;
        for digit in bits.bytes() {
            value = (value << 1u32) + BigUint::from(u8::from(digit == b'1'));
        }
        Ok(self.intern(TermKind::BvNum(value), Sort::Bv(width)))
    }

    fn numeric_pair(&self, l: TermId, r: TermId) -> Result<Sort, QuillError> {
        let (ls, rs) = (self.sort_of(l)?, self.sort_of(r)?);
        match (ls, rs) {
            (Sort::Int, Sort::Int) => Ok(Sort::Int),
            (Sort::Real, Sort::Real) => Ok(Sort::Real),
            _ => Err(QuillError::SortMismatch {
                expected: "two Int or two Real terms",
                found: format!("{ls} and {rs}"),
            }),
        }
    }

    fn bv_pair(&self, l: TermId, r: TermId) -> Result<u32, QuillError> {
        match (self.sort_of(l)?, self.sort_of(r)?) {
            (Sort::Bv(a), Sort::Bv(b)) if a == b => Ok(a),
            (Sort::Bv(a), Sort::Bv(b)) => Err(QuillError::WidthMismatch { left: a, right: b }),
            (ls, rs) => Err(QuillError::SortMismatch {
                expected: "two bit-vector terms",
                found: format!("{ls} and {rs}"),
            }),
        }
    }

    fn bool_operand(&self, t: TermId) -> Result<(), QuillError> {
        match self.sort_of(t)? {
            Sort::Bool => Ok(()),
            s => Err(QuillError::SortMismatch {
                expected: "a Bool term",
                found: s.to_string(),
            }),
        }
    }

    /// Numeric addition.
    pub fn make_plus(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        let sort = self.numeric_pair(l, r)?;
        Ok(self.intern(TermKind::Plus(l, r), sort))
    }

    /// Equality over two numeric terms of one sort or two bit vectors of
    /// one width. There is no boolean equality in this engine.
    pub fn make_equal(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        if matches!((self.sort_of(l)?, self.sort_of(r)?), (Sort::Bv(_), Sort::Bv(_))) {
            self.bv_pair(l, r)?;
        } else {
            self.numeric_pair(l, r)?;
        }
        Ok(self.intern(TermKind::Eq(l, r), Sort::Bool))
    }

    /// Non-strict numeric comparison. Strict less is not primitive; derive
    /// it as `leq ∧ ¬equal`.
    pub fn make_leq(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.numeric_pair(l, r)?;
        Ok(self.intern(TermKind::Leq(l, r), Sort::Bool))
    }

    /// Unsigned bit-vector `<=`; operands must share a width.
    pub fn make_bv_uleq(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.bv_pair(l, r)?;
        Ok(self.intern(TermKind::BvUle(l, r), Sort::Bool))
    }

    /// Unsigned bit-vector `<`; operands must share a width.
    pub fn make_bv_ult(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.bv_pair(l, r)?;
        Ok(self.intern(TermKind::BvUlt(l, r), Sort::Bool))
    }

    /// Bit-vector concatenation; `l` supplies the high bits.
    pub fn make_bv_concat(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        match (self.sort_of(l)?, self.sort_of(r)?) {
            (Sort::Bv(a), Sort::Bv(b)) => Ok(self.intern(TermKind::BvConcat(l, r), Sort::Bv(a + b))),
            (ls, rs) => Err(QuillError::SortMismatch {
                expected: "two bit-vector terms",
                found: format!("{ls} and {rs}"),
            }),
        }
    }

    /// Logical negation.
    pub fn make_not(&mut self, t: TermId) -> Result<TermId, QuillError> {
        self.bool_operand(t)?;
        Ok(self.intern(TermKind::Not(t), Sort::Bool))
    }

    /// Binary conjunction. Callers with more than two conjuncts fold.
    pub fn make_and(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.bool_operand(l)?;
        self.bool_operand(r)?;
        Ok(self.intern(TermKind::And(l, r), Sort::Bool))
    }

    /// Binary disjunction. Callers with more than two disjuncts fold.
    pub fn make_or(&mut self, l: TermId, r: TermId) -> Result<TermId, QuillError> {
        self.bool_operand(l)?;
        self.bool_operand(r)?;
        Ok(self.intern(TermKind::Or(l, r), Sort::Bool))
    }

    /// Assert a boolean term; `solve` decides the conjunction of all
    /// assertions since the last reset.
    pub fn assert_formula(&mut self, t: TermId) -> Result<(), QuillError> {
        match self.sort_of(t)? {
            Sort::Bool => {
                self.asserted.push(t);
                Ok(())
            }
            _ => Err(QuillError::NotBoolean),
        }
    }

    /// Drop every assertion while keeping the term arena and declarations
    /// alive. Handles created before the reset stay valid.
    pub fn reset(&mut self) {
        tracing::trace!(terms = self.terms.len(), "quill reset");
        self.asserted.clear();
    }

    /// Decide the conjunction of the asserted formulas.
    #[must_use]
    pub fn solve(&self) -> Status {
        super::solve::solve(self)
    }

    /// Render a term in SMT-LIB 2 syntax.
    #[must_use]
    pub fn to_smtlib2(&self, t: TermId) -> String {
        let mut out = String::new();
        self.render(t, &mut out);
        out
    }

    fn render(&self, t: TermId, out: &mut String) {
        use std::fmt::Write;
        match &self.data(t).kind {
            TermKind::True => out.push_str("true"),
            TermKind::False => out.push_str("false"),
            TermKind::Var(name) => out.push_str(name),
            TermKind::IntNum(i) => {
                if i.sign() == num_bigint::Sign::Minus {
                    let _ = write!(out, "(- {})", i.magnitude());
                } else {
                    let _ = write!(out, "{i}");
                }
            }
            TermKind::RatNum(r) => {
                if r.denom().is_one() {
                    let _ = write!(out, "{}", r.numer());
                } else {
                    let _ = write!(out, "(/ {} {})", r.numer(), r.denom());
                }
            }
            TermKind::BvNum(v) => {
                let width = match self.data(t).sort {
                    Sort::Bv(w) => w,
                    _ => 0,
                };
                let _ = write!(out, "(_ bv{v} {width})");
            }
            TermKind::Plus(l, r) => self.render_app("+", &[*l, *r], out),
            TermKind::Eq(l, r) => self.render_app("=", &[*l, *r], out),
            TermKind::Leq(l, r) => self.render_app("<=", &[*l, *r], out),
            TermKind::BvUle(l, r) => self.render_app("bvule", &[*l, *r], out),
            TermKind::BvUlt(l, r) => self.render_app("bvult", &[*l, *r], out),
            TermKind::BvConcat(l, r) => self.render_app("concat", &[*l, *r], out),
            TermKind::Not(x) => self.render_app("not", &[*x], out),
            TermKind::And(l, r) => self.render_app("and", &[*l, *r], out),
            TermKind::Or(l, r) => self.render_app("or", &[*l, *r], out),
        }
    }

    fn render_app(&self, head: &str, args: &[TermId], out: &mut String) {
        out.push('(');
        out.push_str(head);
        for &a in args {
            out.push(' ');
            self.render(a, out);
        }
        out.push(')');
    }
}

/// Parse `p/q`, plain decimals and exponent forms into an exact rational.
fn parse_rational(text: &str) -> Option<BigRational> {
    if let Some((p, q)) = text.split_once('/') {
        let numer = p.trim().parse::<BigInt>().ok()?;
        let denom = q.trim().parse::<BigInt>().ok()?;
        if denom == BigInt::ZERO {
            return None;
        }
        return Some(BigRational::new(numer, denom));
    }
    let (mantissa, exp) = match text.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().ok()?),
        None => (text, 0),
    };
    let negative = mantissa.starts_with('-');
    let unsigned = mantissa.trim_start_matches(['-', '+']);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let digits = format!("{int_part}{frac_part}");
    let mut numer = digits.parse::<BigInt>().ok()?;
    if negative {
        numer = -numer;
    }
    let scale = frac_part.len() as i32 - exp;
    let ten = BigInt::from(10);
    Some(if scale >= 0 {
        BigRational::new(numer, ten.pow(scale as u32))
    } else {
        BigRational::from(numer * ten.pow((-scale) as u32))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_are_stable_per_name() {
        let mut env = Env::new(&Config::default());
        let a = env.declare_const("t.x", Sort::Int).unwrap();
        let b = env.declare_const("t.x", Sort::Int).unwrap();
        assert_eq!(a, b);
        assert!(matches!(
            env.declare_const("t.x", Sort::Real),
            Err(QuillError::Redeclared { .. })
        ));
    }

    #[test]
    fn sorts_are_checked_at_construction() {
        let mut env = Env::new(&Config::default());
        let x = env.declare_const("t.x", Sort::Int).unwrap();
        let p = env.declare_const("t.p", Sort::Bool).unwrap();
        assert!(matches!(
            env.make_leq(x, p),
            Err(QuillError::SortMismatch { .. })
        ));
        let v2 = env.make_bv_number("01", 2).unwrap();
        let v3 = env.make_bv_number("011", 3).unwrap();
        assert!(matches!(
            env.make_bv_uleq(v2, v3),
            Err(QuillError::WidthMismatch { left: 2, right: 3 })
        ));
    }

    #[test]
    fn bv_numerals_require_exact_width() {
        let mut env = Env::new(&Config::default());
        assert!(env.make_bv_number("0101", 4).is_ok());
        assert!(env.make_bv_number("0101", 5).is_err());
        assert!(env.make_bv_number("012", 3).is_err());
    }

    #[test]
    fn rational_parsing_is_exact() {
        for (text, numer, denom) in [("2.5", 5, 2), ("-0.75", -3, 4), ("3/4", 3, 4), ("1e-2", 1, 100)]
        {
            let r = parse_rational(text).unwrap();
            assert_eq!(r, BigRational::new(BigInt::from(numer), BigInt::from(denom)));
        }
        assert!(parse_rational("1/0").is_none());
    }

    #[test]
    fn reset_keeps_handles_usable() {
        let mut env = Env::new(&Config::default());
        let t = env.make_true();
        env.assert_formula(t).unwrap();
        env.reset();
        assert!(env.asserted.is_empty());
        assert_eq!(env.sort_of(t).unwrap(), Sort::Bool);
        assert!(env.assert_formula(t).is_ok());
    }

    #[test]
    fn smtlib2_rendering() {
        let mut env = Env::new(&Config::default());
        let x = env.declare_const("t.x", Sort::Int).unwrap();
        let n = env.make_number("-3").unwrap();
        let le = env.make_leq(x, n).unwrap();
        let no = env.make_not(le).unwrap();
        assert_eq!(env.to_smtlib2(no), "(not (<= t.x (- 3)))");
        let bv = env.make_bv_number("0101", 4).unwrap();
        assert_eq!(env.to_smtlib2(bv), "(_ bv5 4)");
    }
}
