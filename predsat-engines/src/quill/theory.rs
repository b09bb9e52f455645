//! Theory reasoning for quill: conjunctions of difference and bit-vector
//! literals.
//!
//! Numeric literals normalize to difference constraints `x - y <= c` (with
//! an epsilon component for strict real bounds; integer strict bounds are
//! tightened to `c - 1`) and are checked by Bellman-Ford negative-cycle
//! detection. Bit-vector literals are checked word-level: every operand is
//! scaled to a common width, each variable ranges over the multiples of its
//! scale factor, equalities merge nodes, and the remaining order graph is
//! condensed by SCC and assigned minimal values in topological order.

use super::term::{Env, Sort, TermId, TermKind};
use num_bigint::BigUint;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Outcome of a conjunction check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TheoryVerdict {
    Consistent,
    Inconsistent,
    /// Budget exhausted or a term shape outside the fragment.
    Unknown,
}

/// One side of a numeric atom: optional variable plus constant offset.
struct NumSide {
    var: Option<TermId>,
    offset: BigRational,
}

/// `x - y <= c` with `eps` strict steps subtracted from the bound.
struct DiffEdge {
    x: Option<TermId>,
    y: Option<TermId>,
    bound: BigRational,
    eps: u32,
}

#[derive(Clone)]
enum BvOp {
    Var {
        id: TermId,
        nat_width: u32,
        shift: u32,
        width: u32,
    },
    Const {
        value: BigUint,
        width: u32,
    },
}

impl BvOp {
    fn width(&self) -> u32 {
        match self {
            BvOp::Var { width, .. } | BvOp::Const { width, .. } => *width,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BvRel {
    Le,
    Lt,
    Eq,
}

struct BvConstraint {
    left: BvOp,
    right: BvOp,
    rel: BvRel,
}

/// Check the conjunction of assigned literals. Disequalities are decided by
/// trichotomy: each one splits into a strict-less alternative per side.
pub(crate) fn check(env: &Env, lits: &[(TermId, bool)], budget: &mut u64) -> TheoryVerdict {
    let mut diffs: Vec<DiffEdge> = Vec::new();
    // (left, right, is_int) pairs awaiting a split.
    let mut num_diseqs: Vec<(TermId, TermId, bool)> = Vec::new();
    let mut bvs: Vec<BvConstraint> = Vec::new();
    let mut bv_diseqs: Vec<(BvOp, BvOp)> = Vec::new();

    for &(atom, value) in lits {
        match &env.data(atom).kind {
            TermKind::Var(_) => {}
            TermKind::Eq(l, r) => match env.sort_of(*l) {
                Ok(Sort::Bv(_)) => {
                    let (Some(lo), Some(ro)) = (bv_operand(env, *l), bv_operand(env, *r)) else {
                        return TheoryVerdict::Unknown;
                    };
                    if value {
                        bvs.push(BvConstraint {
                            left: lo,
                            right: ro,
                            rel: BvRel::Eq,
                        });
                    } else {
                        bv_diseqs.push((lo, ro));
                    }
                }
                Ok(Sort::Int) | Ok(Sort::Real) => {
                    if value {
                        if !push_numeric(env, &mut diffs, *l, *r, false, false)
                            || !push_numeric(env, &mut diffs, *r, *l, false, false)
                        {
                            return TheoryVerdict::Unknown;
                        }
                    } else {
                        num_diseqs.push((*l, *r, matches!(env.sort_of(*l), Ok(Sort::Int))));
                    }
                }
                _ => return TheoryVerdict::Unknown,
            },
            TermKind::Leq(l, r) => {
                let is_int = matches!(env.sort_of(*l), Ok(Sort::Int));
                let ok = if value {
                    push_numeric(env, &mut diffs, *l, *r, false, is_int)
                } else {
                    // not (l <= r)  <=>  r < l
                    push_numeric(env, &mut diffs, *r, *l, true, is_int)
                };
                if !ok {
                    return TheoryVerdict::Unknown;
                }
            }
            TermKind::BvUle(l, r) | TermKind::BvUlt(l, r) => {
                let strict_kind = matches!(&env.data(atom).kind, TermKind::BvUlt(_, _));
                let (Some(lo), Some(ro)) = (bv_operand(env, *l), bv_operand(env, *r)) else {
                    return TheoryVerdict::Unknown;
                };
                // not (l <= r) <=> r < l; not (l < r) <=> r <= l
                let (left, right, rel) = match (value, strict_kind) {
                    (true, false) => (lo, ro, BvRel::Le),
                    (true, true) => (lo, ro, BvRel::Lt),
                    (false, false) => (ro, lo, BvRel::Lt),
                    (false, true) => (ro, lo, BvRel::Le),
                };
                bvs.push(BvConstraint { left, right, rel });
            }
            _ => return TheoryVerdict::Unknown,
        }
    }

    split_diseqs(env, &diffs, &num_diseqs, &bvs, &bv_diseqs, budget)
}

/// Recursively expand disequalities into strict alternatives and check each
/// leaf conjunction.
fn split_diseqs(
    env: &Env,
    diffs: &[DiffEdge],
    num_diseqs: &[(TermId, TermId, bool)],
    bvs: &[BvConstraint],
    bv_diseqs: &[(BvOp, BvOp)],
    budget: &mut u64,
) -> TheoryVerdict {
    if let Some((&(l, r, is_int), rest)) = num_diseqs.split_first() {
        let mut saw_unknown = false;
        for (a, b) in [(l, r), (r, l)] {
            let mut extended: Vec<DiffEdge> = diffs
                .iter()
                .map(|e| DiffEdge {
                    x: e.x,
                    y: e.y,
                    bound: e.bound.clone(),
                    eps: e.eps,
                })
                .collect();
            if !push_numeric(env, &mut extended, a, b, true, is_int) {
                return TheoryVerdict::Unknown;
            }
            match split_diseqs(env, &extended, rest, bvs, bv_diseqs, budget) {
                TheoryVerdict::Consistent => return TheoryVerdict::Consistent,
                TheoryVerdict::Unknown => saw_unknown = true,
                TheoryVerdict::Inconsistent => {}
            }
        }
        return if saw_unknown {
            TheoryVerdict::Unknown
        } else {
            TheoryVerdict::Inconsistent
        };
    }
    if let Some(((l, r), rest)) = bv_diseqs.split_first() {
        let mut saw_unknown = false;
        for (a, b) in [(l, r), (r, l)] {
            let mut extended: Vec<BvConstraint> = bvs
                .iter()
                .map(|c| BvConstraint {
                    left: c.left.clone(),
                    right: c.right.clone(),
                    rel: c.rel,
                })
                .collect();
            extended.push(BvConstraint {
                left: a.clone(),
                right: b.clone(),
                rel: BvRel::Lt,
            });
            match split_diseqs(env, diffs, &[], &extended, rest, budget) {
                TheoryVerdict::Consistent => return TheoryVerdict::Consistent,
                TheoryVerdict::Unknown => saw_unknown = true,
                TheoryVerdict::Inconsistent => {}
            }
        }
        return if saw_unknown {
            TheoryVerdict::Unknown
        } else {
            TheoryVerdict::Inconsistent
        };
    }

    if *budget == 0 {
        return TheoryVerdict::Unknown;
    }
    *budget -= 1;

    match (diff_feasible(diffs), lex_feasible(bvs)) {
        (Some(true), Some(true)) => TheoryVerdict::Consistent,
        (Some(_), Some(_)) => TheoryVerdict::Inconsistent,
        _ => TheoryVerdict::Unknown,
    }
}

/// Append `l < r` (strict) or `l <= r` to the difference system.
/// Returns false when an operand is outside the linear fragment.
fn push_numeric(
    env: &Env,
    diffs: &mut Vec<DiffEdge>,
    l: TermId,
    r: TermId,
    strict: bool,
    is_int: bool,
) -> bool {
    let (Some(ls), Some(rs)) = (linearize(env, l), linearize(env, r)) else {
        return false;
    };
    // ls.var + ls.offset REL rs.var + rs.offset
    let mut bound = rs.offset - ls.offset;
    let mut eps = 0u32;
    if strict {
        if is_int {
            bound -= BigRational::one();
        } else {
            eps = 1;
        }
    }
    diffs.push(DiffEdge {
        x: ls.var,
        y: rs.var,
        bound,
        eps,
    });
    true
}

fn linearize(env: &Env, t: TermId) -> Option<NumSide> {
    match &env.data(t).kind {
        TermKind::Var(_) => Some(NumSide {
            var: Some(t),
            offset: BigRational::zero(),
        }),
        TermKind::IntNum(i) => Some(NumSide {
            var: None,
            offset: BigRational::from(i.clone()),
        }),
        TermKind::RatNum(r) => Some(NumSide {
            var: None,
            offset: r.clone(),
        }),
        TermKind::Plus(a, b) => {
            let (sa, sb) = (linearize(env, *a)?, linearize(env, *b)?);
            let var = match (sa.var, sb.var) {
                (Some(_), Some(_)) => return None,
                (v, None) | (None, v) => v,
            };
            Some(NumSide {
                var,
                offset: sa.offset + sb.offset,
            })
        }
        _ => None,
    }
}

/// Bellman-Ford negative-cycle detection over the difference graph.
/// Constant-only sides share a single origin node.
fn diff_feasible(diffs: &[DiffEdge]) -> Option<bool> {
    if diffs.is_empty() {
        return Some(true);
    }
    let mut index: FxHashMap<Option<TermId>, usize> = FxHashMap::default();
    index.insert(None, 0);
    let node = |v: Option<TermId>, index: &mut FxHashMap<Option<TermId>, usize>| -> usize {
        let next = index.len();
        *index.entry(v).or_insert(next)
    };
    // dist[x] <= dist[y] + bound, so the edge runs y -> x.
    let edges: Vec<(usize, usize, BigRational, u32)> = diffs
        .iter()
        .map(|e| {
            let to = node(e.x, &mut index);
            let from = node(e.y, &mut index);
            (from, to, e.bound.clone(), e.eps)
        })
        .collect();
    let n = index.len();
    let mut dist: Vec<(BigRational, u32)> = vec![(BigRational::zero(), 0); n];
    for round in 0..=n {
        let mut changed = false;
        for (from, to, bound, eps) in &edges {
            let cand = (&dist[*from].0 + bound, dist[*from].1 + eps);
            let better =
                cand.0 < dist[*to].0 || (cand.0 == dist[*to].0 && cand.1 > dist[*to].1);
            if better {
                dist[*to] = cand;
                changed = true;
            }
        }
        if !changed {
            return Some(true);
        }
        if round == n {
            // Still relaxing after n full passes: negative cycle.
            return Some(false);
        }
    }
    Some(true)
}

fn bv_operand(env: &Env, t: TermId) -> Option<BvOp> {
    match &env.data(t).kind {
        TermKind::Var(_) => match env.sort_of(t) {
            Ok(Sort::Bv(w)) => Some(BvOp::Var {
                id: t,
                nat_width: w,
                shift: 0,
                width: w,
            }),
            _ => None,
        },
        TermKind::BvNum(v) => match env.sort_of(t) {
            Ok(Sort::Bv(w)) => Some(BvOp::Const {
                value: v.clone(),
                width: w,
            }),
            _ => None,
        },
        TermKind::BvConcat(a, b) => {
            let (hi, lo) = (bv_operand(env, *a)?, bv_operand(env, *b)?);
            match (hi, lo) {
                (BvOp::Const { value: va, width: wa }, BvOp::Const { value: vb, width: wb }) => {
                    Some(BvOp::Const {
                        value: (va << wb) | vb,
                        width: wa + wb,
                    })
                }
                (
                    BvOp::Var {
                        id,
                        nat_width,
                        shift,
                        width,
                    },
                    BvOp::Const { value, width: wb },
                ) if value.is_zero() => Some(BvOp::Var {
                    id,
                    nat_width,
                    shift: shift + wb,
                    width: width + wb,
                }),
                _ => None,
            }
        }
        _ => None,
    }
}

#[derive(Clone)]
struct NodeDomain {
    /// The node's value must be a multiple of this (a power of two).
    stride: BigUint,
    /// Largest admissible value.
    cap: BigUint,
    /// Pinned value, if the node is (or was merged with) a constant.
    fixed: Option<BigUint>,
}

struct UnionFind(Vec<usize>);

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind((0..n).collect())
    }
    fn find(&mut self, x: usize) -> usize {
        if self.0[x] != x {
            let root = self.find(self.0[x]);
            self.0[x] = root;
        }
        self.0[x]
    }
    fn union(&mut self, a: usize, b: usize) -> usize {
        let (ra, rb) = (self.find(a), self.find(b));
        self.0[rb] = ra;
        ra
    }
}

fn merge_domains(a: &NodeDomain, b: &NodeDomain) -> Option<NodeDomain> {
    let fixed = match (&a.fixed, &b.fixed) {
        (Some(x), Some(y)) if x != y => return None,
        (Some(x), _) => Some(x.clone()),
        (_, y) => y.clone(),
    };
    Some(NodeDomain {
        stride: a.stride.clone().max(b.stride.clone()),
        cap: a.cap.clone().min(b.cap.clone()),
        fixed,
    })
}

/// Smallest multiple of `stride` that is `>= floor` (or `> floor` when
/// `strict`).
fn round_up(floor: &BigUint, stride: &BigUint, strict: bool) -> BigUint {
    if strict {
        ((floor / stride) + BigUint::one()) * stride
    } else {
        ((floor + stride - BigUint::one()) / stride) * stride
    }
}

/// Word-level feasibility of bit-vector order constraints.
fn lex_feasible(constraints: &[BvConstraint]) -> Option<bool> {
    if constraints.is_empty() {
        return Some(true);
    }
    let global = constraints
        .iter()
        .flat_map(|c| [c.left.width(), c.right.width()])
        .max()
        .unwrap_or(0);

    // One node per distinct variable, one per constant occurrence. A
    // variable must appear at a single scale exponent; the bridge always
    // aligns consistently, anything else is out of fragment.
    let mut var_nodes: FxHashMap<TermId, (usize, u32)> = FxHashMap::default();
    let mut domains: Vec<NodeDomain> = Vec::new();
    let resolve = |op: &BvOp,
                       width: u32,
                       var_nodes: &mut FxHashMap<TermId, (usize, u32)>,
                       domains: &mut Vec<NodeDomain>|
     -> Option<usize> {
        match op {
            BvOp::Var {
                id,
                nat_width,
                shift,
                ..
            } => {
                let exponent = shift + (global - width);
                if let Some(&(idx, seen)) = var_nodes.get(id) {
                    if seen != exponent {
                        return None;
                    }
                    return Some(idx);
                }
                let stride = BigUint::one() << exponent;
                let cap = ((BigUint::one() << *nat_width) - BigUint::one()) << exponent;
                domains.push(NodeDomain {
                    stride,
                    cap,
                    fixed: None,
                });
                var_nodes.insert(*id, (domains.len() - 1, exponent));
                Some(domains.len() - 1)
            }
            BvOp::Const { value, .. } => {
                let scaled = value.clone() << (global - width);
                domains.push(NodeDomain {
                    stride: BigUint::one(),
                    cap: scaled.clone(),
                    fixed: Some(scaled),
                });
                Some(domains.len() - 1)
            }
        }
    };

    let mut order: Vec<(usize, usize, bool)> = Vec::new();
    let mut eqs: Vec<(usize, usize)> = Vec::new();
    for c in constraints {
        let l = resolve(&c.left, c.left.width(), &mut var_nodes, &mut domains)?;
        let r = resolve(&c.right, c.right.width(), &mut var_nodes, &mut domains)?;
        match c.rel {
            BvRel::Eq => eqs.push((l, r)),
            BvRel::Le => order.push((l, r, false)),
            BvRel::Lt => order.push((l, r, true)),
        }
    }

    let mut uf = UnionFind::new(domains.len());
    let mut merged: Vec<NodeDomain> = domains.clone();
    for (a, b) in eqs {
        let (ra, rb) = (uf.find(a), uf.find(b));
        if ra == rb {
            continue;
        }
        let Some(dom) = merge_domains(&merged[ra], &merged[rb]) else {
            return Some(false);
        };
        let root = uf.union(ra, rb);
        merged[root] = dom;
    }

    // Rewrite order edges onto class representatives.
    let edges: Vec<(usize, usize, bool)> = order
        .into_iter()
        .map(|(l, r, strict)| (uf.find(l), uf.find(r), strict))
        .collect();
    for &(l, r, strict) in &edges {
        if l == r && strict {
            return Some(false);
        }
    }

    let nodes: Vec<usize> = {
        let mut seen: Vec<usize> = (0..domains.len()).map(|i| uf.find(i)).collect();
        seen.sort_unstable();
        seen.dedup();
        seen
    };

    // SCC condensation: a cycle forces equality around it, so an internal
    // strict edge is a contradiction and an all-non-strict component merges.
    let components = tarjan(&nodes, &edges);
    let mut component_of: FxHashMap<usize, usize> = FxHashMap::default();
    for (i, comp) in components.iter().enumerate() {
        for &n in comp {
            component_of.insert(n, i);
        }
    }
    let mut comp_domains: Vec<Option<NodeDomain>> = Vec::with_capacity(components.len());
    for comp in &components {
        let mut dom: Option<NodeDomain> = None;
        for &n in comp {
            dom = match dom {
                None => Some(merged[n].clone()),
                Some(d) => match merge_domains(&d, &merged[n]) {
                    Some(m) => Some(m),
                    // Two pinned constants disagree inside one equality
                    // component.
                    None => return Some(false),
                },
            };
        }
        comp_domains.push(dom);
    }
    for &(l, r, strict) in &edges {
        if component_of[&l] == component_of[&r] && strict {
            return Some(false);
        }
    }

    // Tarjan pops sinks first; reversing gives sources-first order for the
    // minimal-assignment pass.
    let mut values: Vec<Option<BigUint>> = vec![None; components.len()];
    for idx in (0..components.len()).rev() {
        let dom = comp_domains[idx].clone()?;
        let mut floor = BigUint::ZERO;
        for &(l, r, strict) in &edges {
            let (cl, cr) = (component_of[&l], component_of[&r]);
            if cr != idx || cl == idx {
                continue;
            }
            let pred = values[cl].clone()?;
            let req = round_up(&pred, &dom.stride, strict);
            floor = floor.max(req);
        }
        let value = match &dom.fixed {
            Some(v) => {
                if *v < floor || v % &dom.stride != BigUint::ZERO {
                    return Some(false);
                }
                v.clone()
            }
            None => round_up(&floor, &dom.stride, false),
        };
        if value > dom.cap {
            return Some(false);
        }
        values[idx] = Some(value);
    }
    Some(true)
}

/// Tarjan's strongly connected components over a small node set.
fn tarjan(nodes: &[usize], edges: &[(usize, usize, bool)]) -> Vec<SmallVec<[usize; 4]>> {
    let mut adjacency: FxHashMap<usize, SmallVec<[usize; 4]>> = FxHashMap::default();
    for &n in nodes {
        adjacency.entry(n).or_default();
    }
    for &(from, to, _) in edges {
        adjacency.entry(from).or_default().push(to);
    }

    struct State {
        index: FxHashMap<usize, u32>,
        lowlink: FxHashMap<usize, u32>,
        on_stack: FxHashMap<usize, bool>,
        stack: Vec<usize>,
        next: u32,
        out: Vec<SmallVec<[usize; 4]>>,
    }
    fn visit(v: usize, adjacency: &FxHashMap<usize, SmallVec<[usize; 4]>>, st: &mut State) {
        st.index.insert(v, st.next);
        st.lowlink.insert(v, st.next);
        st.next += 1;
        st.stack.push(v);
        st.on_stack.insert(v, true);
        for &w in adjacency.get(&v).map(|a| a.as_slice()).unwrap_or(&[]) {
            if !st.index.contains_key(&w) {
                visit(w, adjacency, st);
                let low = st.lowlink[&v].min(st.lowlink[&w]);
                st.lowlink.insert(v, low);
            } else if st.on_stack.get(&w).copied().unwrap_or(false) {
                let low = st.lowlink[&v].min(st.index[&w]);
                st.lowlink.insert(v, low);
            }
        }
        if st.lowlink[&v] == st.index[&v] {
            let mut comp = SmallVec::new();
            loop {
                let w = st.stack.pop().expect("tarjan stack underflow");
                st.on_stack.insert(w, false);
                comp.push(w);
                if w == v {
                    break;
                }
            }
            st.out.push(comp);
        }
    }

    let mut st = State {
        index: FxHashMap::default(),
        lowlink: FxHashMap::default(),
        on_stack: FxHashMap::default(),
        stack: Vec::new(),
        next: 0,
        out: Vec::new(),
    };
    for &n in nodes {
        if !st.index.contains_key(&n) {
            visit(n, &adjacency, &mut st);
        }
    }
    st.out
}

#[cfg(test)]
mod tests {
    use super::super::{Config, Status};
    use super::*;

    fn env() -> Env {
        Env::new(&Config::default())
    }

    #[test]
    fn difference_cycle_is_inconsistent() {
        // x <= y, y <= x - 1
        let mut e = env();
        let x = e.declare_const("x", Sort::Int).unwrap();
        let y = e.declare_const("y", Sort::Int).unwrap();
        let minus1 = e.make_number("-1").unwrap();
        let y_minus = e.make_plus(y, minus1).unwrap();
        let a = e.make_leq(x, y).unwrap();
        let b = e.make_leq(y_minus, x).unwrap();
        // b says y - 1 <= x, fine; the contradiction needs x <= y and y <= x - 1.
        let x_minus = e.make_plus(x, minus1).unwrap();
        let c = e.make_leq(y, x_minus).unwrap();
        let mut budget = 1_000;
        assert_eq!(
            check(&e, &[(a, true), (c, true)], &mut budget),
            TheoryVerdict::Inconsistent
        );
        assert_eq!(
            check(&e, &[(a, true), (b, true)], &mut budget),
            TheoryVerdict::Consistent
        );
    }

    #[test]
    fn real_strictness_separates_from_integer_tightening() {
        // x < y and y < x + 1: satisfiable over reals, not over integers.
        let mut e = env();
        let x = e.declare_const("x", Sort::Real).unwrap();
        let y = e.declare_const("y", Sort::Real).unwrap();
        let one = e.make_number("1.0").unwrap();
        let le1 = e.make_leq(x, y).unwrap();
        let eq1 = e.make_equal(x, y).unwrap();
        let y1 = e.make_plus(y, one).unwrap();
        // x < y as leq + not equal at the literal level.
        let mut budget = 1_000;
        let lits = [(le1, true), (eq1, false)];
        assert_eq!(check(&e, &lits, &mut budget), TheoryVerdict::Consistent);

        let le2 = e.make_leq(x, y1).unwrap();
        let eq2 = e.make_equal(x, y1).unwrap();
        let lits = [(le1, true), (eq1, false), (le2, true), (eq2, false)];
        assert_eq!(check(&e, &lits, &mut budget), TheoryVerdict::Consistent);
    }

    #[test]
    fn bv_strict_self_loop_is_inconsistent() {
        let mut e = env();
        let s = e.declare_const("t.s", Sort::Bv(32)).unwrap();
        let lt = e.make_bv_ult(s, s).unwrap();
        let mut budget = 1_000;
        assert_eq!(check(&e, &[(lt, true)], &mut budget), TheoryVerdict::Inconsistent);
    }

    #[test]
    fn bv_chain_through_mixed_widths_is_consistent() {
        // sx3 = "aaa", sz3 = "aba", sx3 < sy2·2^16 < sz3 — sy2 can be "ab".
        let mut e = env();
        let sx = e.declare_const("t.sx3", Sort::Bv(48)).unwrap();
        let sy = e.declare_const("t.sy2", Sort::Bv(32)).unwrap();
        let sz = e.declare_const("t.sz3", Sort::Bv(48)).unwrap();
        let pad = e.make_bv_number("0000000000000000", 16).unwrap();
        let sy_ext = e.make_bv_concat(sy, pad).unwrap();

        let aaa = bits_of(&mut e, "aaa");
        let aba = bits_of(&mut e, "aba");
        let c1 = e.make_equal(sx, aaa).unwrap();
        let c2 = e.make_equal(sz, aba).unwrap();
        let c3 = e.make_bv_ult(sx, sy_ext).unwrap();
        let c4 = e.make_bv_ult(sy_ext, sz).unwrap();
        let mut budget = 10_000;
        let lits = [(c1, true), (c2, true), (c3, true), (c4, true)];
        assert_eq!(check(&e, &lits, &mut budget), TheoryVerdict::Consistent);
    }

    fn bits_of(e: &mut Env, s: &str) -> TermId {
        let mut bits = String::new();
        for ch in s.chars() {
            let u = ch as u32;
            for b in (0..16).rev() {
                bits.push(if u >> b & 1 == 1 { '1' } else { '0' });
            }
        }
        let width = bits.len() as u32;
        e.make_bv_number(&bits, width).unwrap()
    }

    #[test]
    fn solve_is_wired_through_the_env() {
        let mut e = env();
        let t = e.make_true();
        let f = e.make_false();
        let and = e.make_and(t, f).unwrap();
        e.assert_formula(and).unwrap();
        assert_eq!(e.solve(), Status::Unsat);
    }
}
