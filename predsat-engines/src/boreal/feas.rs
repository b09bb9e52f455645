//! Conjunction feasibility for the boreal engine.
//!
//! Arithmetic literals become difference bounds checked by Floyd-Warshall
//! closure. Real disequalities need no case split: the reals are convex, so
//! a disequality only fails when the closure entails the equality exactly.
//! Integer and bit-vector disequalities are split by trichotomy. Bit-vector
//! order literals are checked word-level on scaled stride domains with
//! Kosaraju SCC condensation; an equality is simply a pair of opposite
//! non-strict edges, so equality classes fall out of the SCCs.

use super::context::{Context, Domain, Node};
use num_bigint::BigUint;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feas {
    Feasible,
    Infeasible,
    Unknown,
}

/// A difference bound `x - y <= c`, strict when `strict` holds.
#[derive(Clone)]
struct Bound {
    x: Option<u32>,
    y: Option<u32>,
    c: BigRational,
    strict: bool,
}

/// A pending disequality `x - y != c`.
#[derive(Clone)]
struct Diseq {
    x: Option<u32>,
    y: Option<u32>,
    c: BigRational,
    int_domain: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Rel {
    Le,
    Lt,
}

#[derive(Clone)]
enum Operand {
    Var { id: u32, nat_width: u32, shift: u32, width: u32 },
    Const { value: BigUint, width: u32 },
}

impl Operand {
    fn width(&self) -> u32 {
        match self {
            Operand::Var { width, .. } | Operand::Const { width, .. } => *width,
        }
    }
}

#[derive(Clone)]
struct BvEdge {
    left: Operand,
    right: Operand,
    rel: Rel,
    both_ways: bool,
}

pub(crate) fn conjunction(ctx: &Context, lits: &[(u32, bool)], budget: &mut u64) -> Feas {
    let mut bounds: Vec<Bound> = Vec::new();
    let mut real_diseqs: Vec<Diseq> = Vec::new();
    let mut int_diseqs: Vec<Diseq> = Vec::new();
    let mut bv_edges: Vec<BvEdge> = Vec::new();
    let mut bv_diseqs: Vec<(Operand, Operand)> = Vec::new();

    for &(id, value) in lits {
        match ctx.node(id) {
            Node::BoolVar(_) => {}
            Node::EqArith(l, r) | Node::Le(l, r) | Node::Lt(l, r) => {
                let Some((lv, lc)) = flatten(ctx, *l) else {
                    return Feas::Unknown;
                };
                let Some((rv, rc)) = flatten(ctx, *r) else {
                    return Feas::Unknown;
                };
                let int_domain = ctx.arith_domain(*l) == Some(Domain::Int);
                let c = rc - lc;
                match (ctx.node(id), value) {
                    (Node::EqArith(..), true) => {
                        push_bound(&mut bounds, lv, rv, c.clone(), false, int_domain);
                        push_bound(&mut bounds, rv, lv, -c, false, int_domain);
                    }
                    (Node::EqArith(..), false) => {
                        let d = Diseq {
                            x: lv,
                            y: rv,
                            c,
                            int_domain,
                        };
                        if int_domain {
                            int_diseqs.push(d);
                        } else {
                            real_diseqs.push(d);
                        }
                    }
                    (Node::Le(..), true) => push_bound(&mut bounds, lv, rv, c, false, int_domain),
                    // not (l <= r): r < l
                    (Node::Le(..), false) => push_bound(&mut bounds, rv, lv, -c, true, int_domain),
                    (Node::Lt(..), true) => push_bound(&mut bounds, lv, rv, c, true, int_domain),
                    // not (l < r): r <= l
                    (Node::Lt(..), false) => push_bound(&mut bounds, rv, lv, -c, false, int_domain),
                    _ => return Feas::Unknown,
                }
            }
            Node::EqBv(l, r) | Node::Ule(l, r) | Node::Ult(l, r) => {
                let (Some(lo), Some(ro)) = (bv_flatten(ctx, *l), bv_flatten(ctx, *r)) else {
                    return Feas::Unknown;
                };
                match (ctx.node(id), value) {
                    (Node::EqBv(..), true) => bv_edges.push(BvEdge {
                        left: lo,
                        right: ro,
                        rel: Rel::Le,
                        both_ways: true,
                    }),
                    (Node::EqBv(..), false) => bv_diseqs.push((lo, ro)),
                    (Node::Ule(..), true) => bv_edges.push(BvEdge {
                        left: lo,
                        right: ro,
                        rel: Rel::Le,
                        both_ways: false,
                    }),
                    (Node::Ule(..), false) => bv_edges.push(BvEdge {
                        left: ro,
                        right: lo,
                        rel: Rel::Lt,
                        both_ways: false,
                    }),
                    (Node::Ult(..), true) => bv_edges.push(BvEdge {
                        left: lo,
                        right: ro,
                        rel: Rel::Lt,
                        both_ways: false,
                    }),
                    (Node::Ult(..), false) => bv_edges.push(BvEdge {
                        left: ro,
                        right: lo,
                        rel: Rel::Le,
                        both_ways: false,
                    }),
                    _ => return Feas::Unknown,
                }
            }
            _ => return Feas::Unknown,
        }
    }

    split(
        &bounds,
        &int_diseqs,
        &real_diseqs,
        &bv_edges,
        &bv_diseqs,
        budget,
    )
}

/// Case-split the non-convex disequalities, then check one leaf.
fn split(
    bounds: &[Bound],
    int_diseqs: &[Diseq],
    real_diseqs: &[Diseq],
    bv_edges: &[BvEdge],
    bv_diseqs: &[(Operand, Operand)],
    budget: &mut u64,
) -> Feas {
    if let Some((d, rest)) = int_diseqs.split_first() {
        let mut unknown = false;
        // x - y < c  or  y - x < -c
        for (x, y, c) in [
            (d.x, d.y, d.c.clone()),
            (d.y, d.x, -d.c.clone()),
        ] {
            let mut extended = bounds.to_vec();
            push_bound(&mut extended, x, y, c, true, d.int_domain);
            match split(&extended, rest, real_diseqs, bv_edges, bv_diseqs, budget) {
                Feas::Feasible => return Feas::Feasible,
                Feas::Unknown => unknown = true,
                Feas::Infeasible => {}
            }
        }
        return if unknown { Feas::Unknown } else { Feas::Infeasible };
    }
    if let Some(((l, r), rest)) = bv_diseqs.split_first() {
        let mut unknown = false;
        for (a, b) in [(l, r), (r, l)] {
            let mut extended = bv_edges.to_vec();
            extended.push(BvEdge {
                left: a.clone(),
                right: b.clone(),
                rel: Rel::Lt,
                both_ways: false,
            });
            match split(bounds, &[], real_diseqs, &extended, rest, budget) {
                Feas::Feasible => return Feas::Feasible,
                Feas::Unknown => unknown = true,
                Feas::Infeasible => {}
            }
        }
        return if unknown { Feas::Unknown } else { Feas::Infeasible };
    }

    if *budget == 0 {
        return Feas::Unknown;
    }
    *budget -= 1;

    if !arith_feasible(bounds, real_diseqs) {
        return Feas::Infeasible;
    }
    match bv_feasible(bv_edges) {
        Some(true) => Feas::Feasible,
        Some(false) => Feas::Infeasible,
        None => Feas::Unknown,
    }
}

fn push_bound(
    bounds: &mut Vec<Bound>,
    x: Option<u32>,
    y: Option<u32>,
    mut c: BigRational,
    strict: bool,
    int_domain: bool,
) {
    let mut eff_strict = strict;
    if strict && int_domain {
        c -= BigRational::one();
        eff_strict = false;
    }
    bounds.push(Bound {
        x,
        y,
        c,
        strict: eff_strict,
    });
}

/// `(variable, constant)` view of an arithmetic node.
fn flatten(ctx: &Context, id: u32) -> Option<(Option<u32>, BigRational)> {
    match ctx.node(id) {
        Node::ArithVar(..) => Some((Some(id), BigRational::zero())),
        Node::IntNum(i) => Some((None, BigRational::from(i.clone()))),
        Node::RatNum(r) => Some((None, r.clone())),
        Node::Add(l, r) => {
            let ((lv, lc), (rv, rc)) = (flatten(ctx, *l)?, flatten(ctx, *r)?);
            let var = match (lv, rv) {
                (Some(_), Some(_)) => return None,
                (v, None) | (None, v) => v,
            };
            Some((var, lc + rc))
        }
        _ => None,
    }
}

/// Shortest-path closure; infeasible on a negative (or zero-but-strict)
/// diagonal, and real disequalities fail exactly when the closure pins the
/// difference to the excluded constant.
fn arith_feasible(bounds: &[Bound], real_diseqs: &[Diseq]) -> bool {
    if bounds.is_empty() && real_diseqs.is_empty() {
        return true;
    }
    let mut index: FxHashMap<Option<u32>, usize> = FxHashMap::default();
    index.insert(None, 0);
    for b in bounds {
        for v in [b.x, b.y] {
            let next = index.len();
            index.entry(v).or_insert(next);
        }
    }
    for d in real_diseqs {
        for v in [d.x, d.y] {
            let next = index.len();
            index.entry(v).or_insert(next);
        }
    }
    let n = index.len();
    type W = (BigRational, bool);
    let lighter = |a: &W, b: &W| a.0 < b.0 || (a.0 == b.0 && a.1 && !b.1);
    let mut dist: Vec<Vec<Option<W>>> = vec![vec![None; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = Some((BigRational::zero(), false));
    }
    for b in bounds {
        // x - y <= c constrains the y -> x entry.
        let (from, to) = (index[&b.y], index[&b.x]);
        let cand = (b.c.clone(), b.strict);
        let better = match &dist[from][to] {
            None => true,
            Some(cur) => lighter(&cand, cur),
        };
        if better {
            dist[from][to] = Some(cand);
        }
    }
    for k in 0..n {
        for i in 0..n {
            let Some(ik) = dist[i][k].clone() else { continue };
            for j in 0..n {
                let Some(kj) = dist[k][j].clone() else { continue };
                let cand = (&ik.0 + &kj.0, ik.1 || kj.1);
                let better = match &dist[i][j] {
                    None => true,
                    Some(cur) => lighter(&cand, cur),
                };
                if better {
                    dist[i][j] = Some(cand);
                }
            }
        }
    }
    for (i, row) in dist.iter().enumerate() {
        if let Some((c, strict)) = &row[i] {
            if *c < BigRational::zero() || (c.is_zero() && *strict) {
                return false;
            }
        }
    }
    for d in real_diseqs {
        let (ix, iy) = (index[&d.x], index[&d.y]);
        let pinned_above = matches!(&dist[iy][ix], Some((c, false)) if *c == d.c);
        let pinned_below = matches!(&dist[ix][iy], Some((c, false)) if *c == -d.c.clone());
        if pinned_above && pinned_below {
            return false;
        }
    }
    true
}

fn bv_flatten(ctx: &Context, id: u32) -> Option<Operand> {
    match ctx.node(id) {
        Node::BvVar(_, w) => Some(Operand::Var {
            id,
            nat_width: *w,
            shift: 0,
            width: *w,
        }),
        Node::BvNum(v, w) => Some(Operand::Const {
            value: v.clone(),
            width: *w,
        }),
        Node::Concat(l, r) => {
            let (hi, lo) = (bv_flatten(ctx, *l)?, bv_flatten(ctx, *r)?);
            match (hi, lo) {
                (Operand::Const { value: a, width: wa }, Operand::Const { value: b, width: wb }) => {
                    Some(Operand::Const {
                        value: (a << wb) | b,
                        width: wa + wb,
                    })
                }
                (
                    Operand::Var {
                        id,
                        nat_width,
                        shift,
                        width,
                    },
                    Operand::Const { value, width: wb },
                ) if value.is_zero() => Some(Operand::Var {
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
struct DomainInfo {
    stride: BigUint,
    cap: BigUint,
    fixed: Option<BigUint>,
}

/// Word-level feasibility over scaled stride domains. Equalities arrive as
/// opposite edge pairs, so every equality class is an SCC; components in
/// Kosaraju discovery order are already topologically sorted.
fn bv_feasible(edges_in: &[BvEdge]) -> Option<bool> {
    if edges_in.is_empty() {
        return Some(true);
    }
    let global = edges_in
        .iter()
        .flat_map(|e| [e.left.width(), e.right.width()])
        .max()
        .unwrap_or(0);

    let mut var_nodes: FxHashMap<u32, (usize, u32)> = FxHashMap::default();
    let mut domains: Vec<DomainInfo> = Vec::new();
    let materialize = |op: &Operand, domains: &mut Vec<DomainInfo>,
                           var_nodes: &mut FxHashMap<u32, (usize, u32)>|
     -> Option<usize> {
        match op {
            Operand::Var {
                id,
                nat_width,
                shift,
                width,
            } => {
                let exponent = shift + (global - width);
                if let Some(&(n, seen)) = var_nodes.get(id) {
                    return (seen == exponent).then_some(n);
                }
                domains.push(DomainInfo {
                    stride: BigUint::one() << exponent,
                    cap: ((BigUint::one() << *nat_width) - BigUint::one()) << exponent,
                    fixed: None,
                });
                var_nodes.insert(*id, (domains.len() - 1, exponent));
                Some(domains.len() - 1)
            }
            Operand::Const { value, width } => {
                let scaled = value.clone() << (global - width);
                domains.push(DomainInfo {
                    stride: BigUint::one(),
                    cap: scaled.clone(),
                    fixed: Some(scaled),
                });
                Some(domains.len() - 1)
            }
        }
    };

    let mut arcs: Vec<(usize, usize, bool)> = Vec::new();
    for e in edges_in {
        let l = materialize(&e.left, &mut domains, &mut var_nodes)?;
        let r = materialize(&e.right, &mut domains, &mut var_nodes)?;
        arcs.push((l, r, e.rel == Rel::Lt));
        if e.both_ways {
            arcs.push((r, l, false));
        }
    }
    let n = domains.len();
    let mut fwd: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut rev: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(from, to, _) in &arcs {
        fwd[from].push(to);
        rev[to].push(from);
    }

    // Kosaraju, pass one: finish order.
    let mut finish: Vec<usize> = Vec::with_capacity(n);
    let mut seen = vec![false; n];
    for start in 0..n {
        if seen[start] {
            continue;
        }
        // Iterative DFS with an explicit phase marker.
        let mut stack = vec![(start, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                finish.push(v);
                continue;
            }
            if seen[v] {
                continue;
            }
            seen[v] = true;
            stack.push((v, true));
            for &w in &fwd[v] {
                if !seen[w] {
                    stack.push((w, false));
                }
            }
        }
    }

    // Pass two on the transpose: components, sources first.
    let mut component = vec![usize::MAX; n];
    let mut comps: Vec<Vec<usize>> = Vec::new();
    for &start in finish.iter().rev() {
        if component[start] != usize::MAX {
            continue;
        }
        let id = comps.len();
        let mut members = Vec::new();
        let mut stack = vec![start];
        component[start] = id;
        while let Some(v) = stack.pop() {
            members.push(v);
            for &w in &rev[v] {
                if component[w] == usize::MAX {
                    component[w] = id;
                    stack.push(w);
                }
            }
        }
        comps.push(members);
    }

    // Internal strict edge: the cycle forces equality, contradiction.
    for &(from, to, strict) in &arcs {
        if component[from] == component[to] && strict {
            return Some(false);
        }
    }

    let mut comp_domains: Vec<DomainInfo> = Vec::with_capacity(comps.len());
    for members in &comps {
        let mut dom: Option<DomainInfo> = None;
        for &m in members {
            dom = Some(match dom {
                None => domains[m].clone(),
                Some(d) => {
                    let fixed = match (&d.fixed, &domains[m].fixed) {
                        (Some(a), Some(b)) if a != b => return Some(false),
                        (Some(a), _) => Some(a.clone()),
                        (_, b) => b.clone(),
                    };
                    DomainInfo {
                        stride: d.stride.clone().max(domains[m].stride.clone()),
                        cap: d.cap.clone().min(domains[m].cap.clone()),
                        fixed,
                    }
                }
            });
        }
        comp_domains.push(dom?);
    }

    // Minimal assignment in topological (discovery) order.
    let mut values: Vec<Option<BigUint>> = vec![None; comps.len()];
    for idx in 0..comps.len() {
        let dom = &comp_domains[idx];
        let mut floor = BigUint::ZERO;
        for &(from, to, strict) in &arcs {
            if component[to] != idx || component[from] == idx {
                continue;
            }
            let pred = values[component[from]].clone()?;
            let req = if strict {
                ((&pred / &dom.stride) + BigUint::one()) * &dom.stride
            } else {
                ((&pred + &dom.stride - BigUint::one()) / &dom.stride) * &dom.stride
            };
            floor = floor.max(req);
        }
        let value = match &dom.fixed {
            Some(v) => {
                if *v < floor || v % &dom.stride != BigUint::ZERO {
                    return Some(false);
                }
                v.clone()
            }
            None => ((&floor + &dom.stride - BigUint::one()) / &dom.stride) * &dom.stride,
        };
        if value > dom.cap {
            return Some(false);
        }
        values[idx] = Some(value);
    }
    Some(true)
}

#[cfg(test)]
mod tests {
    use super::super::context::Context;
    use super::*;

    #[test]
    fn real_disequality_without_pinning_is_feasible() {
        // x <= y and x != y: satisfiable over the reals without splitting.
        let mut ctx = Context::new();
        let x = ctx.mk_real_const("x").unwrap();
        let y = ctx.mk_real_const("y").unwrap();
        let le = ctx.mk_le(x, y).unwrap();
        let eq = ctx.mk_eq(x, y).unwrap();
        let mut budget = 100;
        let verdict = conjunction(&ctx, &[(le.0, true), (eq.0, false)], &mut budget);
        assert_eq!(verdict, Feas::Feasible);
    }

    #[test]
    fn pinned_real_disequality_is_infeasible() {
        // x <= y, y <= x, x != y.
        let mut ctx = Context::new();
        let x = ctx.mk_real_const("x").unwrap();
        let y = ctx.mk_real_const("y").unwrap();
        let le1 = ctx.mk_le(x, y).unwrap();
        let le2 = ctx.mk_le(y, x).unwrap();
        let eq = ctx.mk_eq(x, y).unwrap();
        let mut budget = 100;
        let verdict = conjunction(
            &ctx,
            &[(le1.0, true), (le2.0, true), (eq.0, false)],
            &mut budget,
        );
        assert_eq!(verdict, Feas::Infeasible);
    }

    #[test]
    fn integer_sandwich_forces_split_infeasibility() {
        // x < y and y < x + 1 over integers.
        let mut ctx = Context::new();
        let x = ctx.mk_int_const("x").unwrap();
        let y = ctx.mk_int_const("y").unwrap();
        let one = ctx.mk_int(1);
        let x1 = ctx.mk_add(x, one).unwrap();
        let lt1 = ctx.mk_lt(x, y).unwrap();
        let lt2 = ctx.mk_lt(y, x1).unwrap();
        let mut budget = 100;
        let verdict = conjunction(&ctx, &[(lt1.0, true), (lt2.0, true)], &mut budget);
        assert_eq!(verdict, Feas::Infeasible);
    }

    #[test]
    fn bv_equality_classes_fall_out_of_sccs() {
        // a = b, b = c, a < c is infeasible.
        let mut ctx = Context::new();
        let a = ctx.mk_bv_const("a", 16).unwrap();
        let b = ctx.mk_bv_const("b", 16).unwrap();
        let c = ctx.mk_bv_const("c", 16).unwrap();
        let e1 = ctx.mk_eq_bv(a, b).unwrap();
        let e2 = ctx.mk_eq_bv(b, c).unwrap();
        let lt = ctx.mk_bvult(a, c).unwrap();
        let mut budget = 100;
        let verdict = conjunction(
            &ctx,
            &[(e1.0, true), (e2.0, true), (lt.0, true)],
            &mut budget,
        );
        assert_eq!(verdict, Feas::Infeasible);
    }

    #[test]
    fn bv_domain_cap_is_enforced() {
        // v > 3 for a 2-bit vector is infeasible.
        let mut ctx = Context::new();
        let v = ctx.mk_bv_const("v", 2).unwrap();
        let three = ctx.mk_bv_numeral("3", 2).unwrap();
        let gt = ctx.mk_bvult(three, v).unwrap();
        let mut budget = 100;
        let verdict = conjunction(&ctx, &[(gt.0, true)], &mut budget);
        assert_eq!(verdict, Feas::Infeasible);
    }
}
