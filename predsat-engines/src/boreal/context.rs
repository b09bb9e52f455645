//! Hash-consed term store for the boreal engine.

use super::BorealError;
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::One;
use rustc_hash::FxHashMap;

/// Boolean ast handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolAst(pub(crate) u32);

/// Integer or real ast handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArithAst(pub(crate) u32);

/// Bit-vector ast handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BvAst(pub u32);

/// Numeric domain of an arithmetic ast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Domain {
    Int,
    Real,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Node {
    True,
    False,
    BoolVar(String),
    ArithVar(String, Domain),
    BvVar(String, u32),
    IntNum(BigInt),
    RatNum(BigRational),
    BvNum(BigUint, u32),
    Add(u32, u32),
    EqArith(u32, u32),
    Le(u32, u32),
    Lt(u32, u32),
    EqBv(u32, u32),
    Ule(u32, u32),
    Ult(u32, u32),
    Concat(u32, u32),
    Not(u32),
    And(Vec<u32>),
    Or(Vec<u32>),
}

/// Term store. Equal constructions intern to equal handles.
#[derive(Debug, Default)]
pub struct Context {
    pub(crate) nodes: Vec<Node>,
    cons: FxHashMap<Node, u32>,
    declared: FxHashMap<String, u32>,
}

impl Context {
    /// Fresh, empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, node: Node) -> u32 {
        if let Some(&id) = self.cons.get(&node) {
            return id;
        }
        let id = self.nodes.len() as u32;
        self.nodes.push(node.clone());
        self.cons.insert(node, id);
        id
    }

    pub(crate) fn node(&self, id: u32) -> &Node {
        &self.nodes[id as usize]
    }

    fn declare(&mut self, name: &str, node: Node) -> Result<u32, BorealError> {
        if let Some(&id) = self.declared.get(name) {
            if *self.node(id) == node {
                return Ok(id);
            }
            return Err(BorealError::Redeclared {
                name: name.to_string(),
            });
        }
        let id = self.intern(node);
        self.declared.insert(name.to_string(), id);
        Ok(id)
    }

    pub(crate) fn arith_domain(&self, id: u32) -> Option<Domain> {
        match self.node(id) {
            Node::ArithVar(_, d) => Some(*d),
            Node::IntNum(_) => Some(Domain::Int),
            Node::RatNum(_) => Some(Domain::Real),
            Node::Add(l, _) => self.arith_domain(*l),
            _ => None,
        }
    }

    /// Width in bits of the bit-vector ast `id`, if it denotes one.
    pub fn bv_width(&self, id: u32) -> Option<u32> {
        match self.node(id) {
            Node::BvVar(_, w) | Node::BvNum(_, w) => Some(*w),
            Node::Concat(l, r) => Some(self.bv_width(*l)? + self.bv_width(*r)?),
            _ => None,
        }
    }

    /// The constant `true`.
    pub fn mk_true(&mut self) -> BoolAst {
        BoolAst(self.intern(Node::True))
    }

    /// The constant `false`.
    pub fn mk_false(&mut self) -> BoolAst {
        BoolAst(self.intern(Node::False))
    }

    /// Boolean constant symbol.
    pub fn mk_bool_const(&mut self, name: &str) -> Result<BoolAst, BorealError> {
        self.declare(name, Node::BoolVar(name.to_string())).map(BoolAst)
    }

    /// Integer constant symbol.
    pub fn mk_int_const(&mut self, name: &str) -> Result<ArithAst, BorealError> {
        self.declare(name, Node::ArithVar(name.to_string(), Domain::Int))
            .map(ArithAst)
    }

    /// Real constant symbol.
    pub fn mk_real_const(&mut self, name: &str) -> Result<ArithAst, BorealError> {
        self.declare(name, Node::ArithVar(name.to_string(), Domain::Real))
            .map(ArithAst)
    }

    /// Bit-vector constant symbol of the given width.
    pub fn mk_bv_const(&mut self, name: &str, width: u32) -> Result<BvAst, BorealError> {
        self.declare(name, Node::BvVar(name.to_string(), width))
            .map(BvAst)
    }

    /// Integer numeral.
    pub fn mk_int(&mut self, value: i64) -> ArithAst {
        ArithAst(self.intern(Node::IntNum(BigInt::from(value))))
    }

    /// Real numeral from a decimal or `p/q` string, read exactly.
    pub fn mk_real_numeral(&mut self, text: &str) -> Result<ArithAst, BorealError> {
        let value = decode_rational(text)
            .ok_or_else(|| BorealError::InvalidNumeral(text.to_string()))?;
        Ok(ArithAst(self.intern(Node::RatNum(value))))
    }

    /// Bit-vector numeral from a **decimal** value string; the value must
    /// fit in `width` bits.
    pub fn mk_bv_numeral(&mut self, decimal: &str, width: u32) -> Result<BvAst, BorealError> {
        let value = decimal
            .parse::<BigUint>()
            .map_err(|_| BorealError::InvalidNumeral(decimal.to_string()))?;
        if value.bits() > u64::from(width) {
            return Err(BorealError::InvalidNumeral(decimal.to_string()));
        }
        Ok(BvAst(self.intern(Node::BvNum(value, width))))
    }

    fn arith_pair(&self, l: ArithAst, r: ArithAst) -> Result<(), BorealError> {
        match (self.arith_domain(l.0), self.arith_domain(r.0)) {
            (Some(a), Some(b)) if a == b => Ok(()),
            _ => Err(BorealError::DomainMismatch),
        }
    }

    fn bv_pair(&self, l: BvAst, r: BvAst) -> Result<(), BorealError> {
        let (a, b) = (
            self.bv_width(l.0).unwrap_or(0),
            self.bv_width(r.0).unwrap_or(0),
        );
        if a == b {
            Ok(())
        } else {
            Err(BorealError::WidthMismatch { left: a, right: b })
        }
    }

    /// Numeric addition.
    pub fn mk_add(&mut self, l: ArithAst, r: ArithAst) -> Result<ArithAst, BorealError> {
        self.arith_pair(l, r)?;
        Ok(ArithAst(self.intern(Node::Add(l.0, r.0))))
    }

    /// Numeric equality.
    pub fn mk_eq(&mut self, l: ArithAst, r: ArithAst) -> Result<BoolAst, BorealError> {
        self.arith_pair(l, r)?;
        Ok(BoolAst(self.intern(Node::EqArith(l.0, r.0))))
    }

    /// Numeric `<=`.
    pub fn mk_le(&mut self, l: ArithAst, r: ArithAst) -> Result<BoolAst, BorealError> {
        self.arith_pair(l, r)?;
        Ok(BoolAst(self.intern(Node::Le(l.0, r.0))))
    }

    /// Numeric `<`; native, no derivation needed.
    pub fn mk_lt(&mut self, l: ArithAst, r: ArithAst) -> Result<BoolAst, BorealError> {
        self.arith_pair(l, r)?;
        Ok(BoolAst(self.intern(Node::Lt(l.0, r.0))))
    }

    /// Bit-vector equality; widths must agree.
    pub fn mk_eq_bv(&mut self, l: BvAst, r: BvAst) -> Result<BoolAst, BorealError> {
        self.bv_pair(l, r)?;
        Ok(BoolAst(self.intern(Node::EqBv(l.0, r.0))))
    }

    /// Unsigned bit-vector `<=`.
    pub fn mk_bvule(&mut self, l: BvAst, r: BvAst) -> Result<BoolAst, BorealError> {
        self.bv_pair(l, r)?;
        Ok(BoolAst(self.intern(Node::Ule(l.0, r.0))))
    }

    /// Unsigned bit-vector `<`.
    pub fn mk_bvult(&mut self, l: BvAst, r: BvAst) -> Result<BoolAst, BorealError> {
        self.bv_pair(l, r)?;
        Ok(BoolAst(self.intern(Node::Ult(l.0, r.0))))
    }

    /// Concatenation; `l` supplies the high bits.
    pub fn mk_concat(&mut self, l: BvAst, r: BvAst) -> BvAst {
        BvAst(self.intern(Node::Concat(l.0, r.0)))
    }

    /// Logical negation.
    pub fn mk_not(&mut self, a: BoolAst) -> BoolAst {
        BoolAst(self.intern(Node::Not(a.0)))
    }

    /// N-ary conjunction over a non-empty slice.
    pub fn mk_and(&mut self, args: &[BoolAst]) -> Result<BoolAst, BorealError> {
        if args.is_empty() {
            return Err(BorealError::EmptyConnective);
        }
        let ids: Vec<u32> = args.iter().map(|a| a.0).collect();
        Ok(BoolAst(self.intern(Node::And(ids))))
    }

    /// N-ary disjunction over a non-empty slice.
    pub fn mk_or(&mut self, args: &[BoolAst]) -> Result<BoolAst, BorealError> {
        if args.is_empty() {
            return Err(BorealError::EmptyConnective);
        }
        let ids: Vec<u32> = args.iter().map(|a| a.0).collect();
        Ok(BoolAst(self.intern(Node::Or(ids))))
    }

    /// Render a boolean ast in SMT-LIB 2 syntax.
    #[must_use]
    pub fn to_smtlib2(&self, ast: BoolAst) -> String {
        let mut out = String::new();
        self.render(ast.0, &mut out);
        out
    }

    fn render(&self, id: u32, out: &mut String) {
        use std::fmt::Write;
        match self.node(id) {
            Node::True => out.push_str("true"),
            Node::False => out.push_str("false"),
            Node::BoolVar(n) | Node::ArithVar(n, _) | Node::BvVar(n, _) => out.push_str(n),
            Node::IntNum(i) => {
                if i.sign() == num_bigint::Sign::Minus {
                    let _ = write!(out, "(- {})", i.magnitude());
                } else {
                    let _ = write!(out, "{i}");
                }
            }
            Node::RatNum(r) => {
                if r.denom().is_one() {
                    let _ = write!(out, "{}", r.numer());
                } else {
                    let _ = write!(out, "(/ {} {})", r.numer(), r.denom());
                }
            }
            Node::BvNum(v, w) => {
                let _ = write!(out, "(_ bv{v} {w})");
            }
            Node::Add(l, r) => self.render_app("+", &[*l, *r], out),
            Node::EqArith(l, r) | Node::EqBv(l, r) => self.render_app("=", &[*l, *r], out),
            Node::Le(l, r) => self.render_app("<=", &[*l, *r], out),
            Node::Lt(l, r) => self.render_app("<", &[*l, *r], out),
            Node::Ule(l, r) => self.render_app("bvule", &[*l, *r], out),
            Node::Ult(l, r) => self.render_app("bvult", &[*l, *r], out),
            Node::Concat(l, r) => self.render_app("concat", &[*l, *r], out),
            Node::Not(x) => self.render_app("not", &[*x], out),
            Node::And(xs) => self.render_app("and", xs, out),
            Node::Or(xs) => self.render_app("or", xs, out),
        }
    }

    fn render_app(&self, head: &str, args: &[u32], out: &mut String) {
        out.push('(');
        out.push_str(head);
        for &a in args {
            out.push(' ');
            self.render(a, out);
        }
        out.push(')');
    }
}

/// Exact rational from `p/q`, plain decimal or exponent notation.
fn decode_rational(text: &str) -> Option<BigRational> {
    if let Some((p, q)) = text.split_once('/') {
        let (numer, denom) = (p.trim().parse::<BigInt>().ok()?, q.trim().parse::<BigInt>().ok()?);
        return (denom != BigInt::ZERO).then(|| BigRational::new(numer, denom));
    }
    let (mantissa, exponent) = text
        .split_once(['e', 'E'])
        .map_or((text, 0), |(m, e)| (m, e.parse::<i32>().unwrap_or(i32::MAX)));
    if exponent == i32::MAX {
        return None;
    }
    let sign = if mantissa.starts_with('-') { -1 } else { 1 };
    let body = mantissa.trim_start_matches(['-', '+']);
    let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    let digits: BigInt = format!("{whole}{frac}").parse().ok()?;
    let shift = frac.len() as i32 - exponent;
    let base = BigInt::from(10);
    Some(if shift >= 0 {
        BigRational::new(digits * sign, base.pow(shift as u32))
    } else {
        BigRational::from(digits * sign * base.pow((-shift) as u32))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let mut ctx = Context::new();
        let a = ctx.mk_int(5);
        let b = ctx.mk_int(5);
        assert_eq!(a, b);
        let x = ctx.mk_int_const("t.x").unwrap();
        let y = ctx.mk_int_const("t.x").unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn redeclaration_at_another_sort_fails() {
        let mut ctx = Context::new();
        ctx.mk_int_const("t.x").unwrap();
        assert!(matches!(
            ctx.mk_real_const("t.x"),
            Err(BorealError::Redeclared { .. })
        ));
    }

    #[test]
    fn bv_numerals_check_their_width() {
        let mut ctx = Context::new();
        assert!(ctx.mk_bv_numeral("255", 8).is_ok());
        assert!(ctx.mk_bv_numeral("256", 8).is_err());
        assert!(ctx.mk_bv_numeral("zz", 8).is_err());
    }

    #[test]
    fn mixed_domains_are_rejected() {
        let mut ctx = Context::new();
        let x = ctx.mk_int_const("t.x").unwrap();
        let r = ctx.mk_real_const("t.r").unwrap();
        assert!(matches!(ctx.mk_le(x, r), Err(BorealError::DomainMismatch)));
    }

    #[test]
    fn rendering_uses_native_strict_less() {
        let mut ctx = Context::new();
        let x = ctx.mk_int_const("t.x").unwrap();
        let three = ctx.mk_int(3);
        let lt = ctx.mk_lt(x, three).unwrap();
        assert_eq!(ctx.to_smtlib2(lt), "(< t.x 3)");
    }

    #[test]
    fn decode_rational_handles_decimal_forms() {
        assert_eq!(
            decode_rational("0.25").unwrap(),
            BigRational::new(BigInt::from(1), BigInt::from(4))
        );
        assert_eq!(
            decode_rational("-2").unwrap(),
            BigRational::from(BigInt::from(-2))
        );
        assert!(decode_rational("").is_none());
    }
}
