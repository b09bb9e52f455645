//! Decision procedure for the cirrus engine.
//!
//! Boolean search is recursive with three-valued evaluation; the branch
//! atom is taken from the first assertion that is still undecided. Theory
//! leaves are expanded over disequality splits with an explicit worklist.
//! Numeric conjunctions go through SPFA (queue-based Bellman-Ford);
//! bit-vector conjunctions are decided by repeated cycle contraction of the
//! order graph followed by a minimal assignment over the acyclic remainder.

use super::context::{Context, Term, TermNode, TermSort};
use super::CheckStatus;
use num_bigint::BigUint;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

pub(crate) fn check(ctx: &Context) -> CheckStatus {
    if ctx.assertions.is_empty() {
        return CheckStatus::Sat;
    }
    let mut atoms = Vec::new();
    let mut seen = FxHashSet::default();
    for &root in &ctx.assertions {
        gather_atoms(ctx, root, &mut atoms, &mut seen);
    }
    tracing::debug!(atoms = atoms.len(), "cirrus check");
    let mut assign = FxHashMap::default();
    let mut budget = ctx.budget();
    descend(ctx, &atoms, &mut assign, &mut budget)
}

fn gather_atoms(ctx: &Context, t: Term, atoms: &mut Vec<Term>, seen: &mut FxHashSet<Term>) {
    match ctx.node(t) {
        TermNode::Conj(children) | TermNode::Disj(children) => {
            for &c in children {
                gather_atoms(ctx, c, atoms, seen);
            }
        }
        TermNode::Not(inner) => gather_atoms(ctx, *inner, atoms, seen),
        TermNode::True | TermNode::False => {}
        _ => {
            if ctx.sort(t) == TermSort::Bool && seen.insert(t) {
                atoms.push(t);
            }
        }
    }
}

fn eval(ctx: &Context, t: Term, assign: &FxHashMap<Term, bool>) -> Option<bool> {
    match ctx.node(t) {
        TermNode::True => Some(true),
        TermNode::False => Some(false),
        TermNode::Not(x) => eval(ctx, *x, assign).map(|v| !v),
        TermNode::Conj(children) => {
            let mut result = Some(true);
            for &c in children {
                match eval(ctx, c, assign) {
                    Some(false) => return Some(false),
                    Some(true) => {}
                    None => result = None,
                }
            }
            result
        }
        TermNode::Disj(children) => {
            let mut result = Some(false);
            for &c in children {
                match eval(ctx, c, assign) {
                    Some(true) => return Some(true),
                    Some(false) => {}
                    None => result = None,
                }
            }
            result
        }
        _ => assign.get(&t).copied(),
    }
}

/// First unassigned atom inside the first undecided assertion.
fn undecided_atom(
    ctx: &Context,
    t: Term,
    assign: &FxHashMap<Term, bool>,
) -> Option<Term> {
    match ctx.node(t) {
        TermNode::Conj(children) | TermNode::Disj(children) => children
            .iter()
            .find_map(|&c| undecided_atom(ctx, c, assign)),
        TermNode::Not(inner) => undecided_atom(ctx, *inner, assign),
        TermNode::True | TermNode::False => None,
        _ => (!assign.contains_key(&t)).then_some(t),
    }
}

fn descend(
    ctx: &Context,
    atoms: &[Term],
    assign: &mut FxHashMap<Term, bool>,
    budget: &mut u64,
) -> CheckStatus {
    if *budget == 0 {
        return CheckStatus::Undetermined;
    }
    *budget -= 1;

    let mut undecided_root = None;
    for &root in &ctx.assertions {
        match eval(ctx, root, assign) {
            Some(false) => return CheckStatus::Unsat,
            Some(true) => {}
            None => {
                if undecided_root.is_none() {
                    undecided_root = Some(root);
                }
            }
        }
    }
    let Some(open) = undecided_root else {
        let lits: Vec<(Term, bool)> = atoms
            .iter()
            .filter_map(|a| assign.get(a).map(|&v| (*a, v)))
            .collect();
        return theory(ctx, &lits, budget);
    };
    let Some(pick) = undecided_atom(ctx, open, assign) else {
        return CheckStatus::Undetermined;
    };
    let mut undetermined = false;
    for value in [true, false] {
        assign.insert(pick, value);
        match descend(ctx, atoms, assign, budget) {
            CheckStatus::Sat => {
                assign.remove(&pick);
                return CheckStatus::Sat;
            }
            CheckStatus::Undetermined => undetermined = true,
            CheckStatus::Unsat => {}
        }
        assign.remove(&pick);
    }
    if undetermined {
        CheckStatus::Undetermined
    } else {
        CheckStatus::Unsat
    }
}

/// `x - y <= c` with `eps` strict steps; `None` endpoints are the origin.
#[derive(Clone)]
struct NumCon {
    x: Option<Term>,
    y: Option<Term>,
    c: BigRational,
    eps: u32,
}

#[derive(Clone)]
enum BvSide {
    Var {
        term: Term,
        nat_width: u32,
        shift: u32,
        width: u32,
    },
    Lit {
        value: BigUint,
        width: u32,
    },
}

impl BvSide {
    fn width(&self) -> u32 {
        match self {
            BvSide::Var { width, .. } | BvSide::Lit { width, .. } => *width,
        }
    }
}

#[derive(Clone)]
struct BvCon {
    left: BvSide,
    right: BvSide,
    strict: bool,
    equal: bool,
}

fn theory(ctx: &Context, lits: &[(Term, bool)], budget: &mut u64) -> CheckStatus {
    let mut nums: Vec<NumCon> = Vec::new();
    let mut num_diseqs: Vec<(Option<Term>, Option<Term>, BigRational, bool)> = Vec::new();
    let mut bvs: Vec<BvCon> = Vec::new();
    let mut bv_diseqs: Vec<(BvSide, BvSide)> = Vec::new();

    for &(atom, value) in lits {
        match ctx.node(atom) {
            TermNode::Unint(_) => {}
            TermNode::Eq(l, r) if matches!(ctx.sort(*l), TermSort::BitVec(_)) => {
                let (Some(a), Some(b)) = (bv_side(ctx, *l), bv_side(ctx, *r)) else {
                    return CheckStatus::Undetermined;
                };
                if value {
                    bvs.push(BvCon {
                        left: a,
                        right: b,
                        strict: false,
                        equal: true,
                    });
                } else {
                    bv_diseqs.push((a, b));
                }
            }
            TermNode::Eq(l, r) | TermNode::Le(l, r) | TermNode::Lt(l, r) => {
                let is_int = ctx.sort(*l) == TermSort::Int;
                let (Some((xv, xc)), Some((yv, yc))) = (num_side(ctx, *l), num_side(ctx, *r))
                else {
                    return CheckStatus::Undetermined;
                };
                let offset = yc - xc;
                match (ctx.node(atom), value) {
                    (TermNode::Eq(..), true) => {
                        nums.push(bound(xv, yv, offset.clone(), false, is_int));
                        nums.push(bound(yv, xv, -offset, false, is_int));
                    }
                    (TermNode::Eq(..), false) => num_diseqs.push((xv, yv, offset, is_int)),
                    (TermNode::Le(..), true) => nums.push(bound(xv, yv, offset, false, is_int)),
                    (TermNode::Le(..), false) => nums.push(bound(yv, xv, -offset, true, is_int)),
                    (TermNode::Lt(..), true) => nums.push(bound(xv, yv, offset, true, is_int)),
                    (TermNode::Lt(..), false) => nums.push(bound(yv, xv, -offset, false, is_int)),
                    _ => return CheckStatus::Undetermined,
                }
            }
            TermNode::BvLe(l, r) | TermNode::BvLt(l, r) => {
                let strict_op = matches!(ctx.node(atom), TermNode::BvLt(..));
                let (Some(a), Some(b)) = (bv_side(ctx, *l), bv_side(ctx, *r)) else {
                    return CheckStatus::Undetermined;
                };
                let (left, right, strict) = match (value, strict_op) {
                    (true, s) => (a, b, s),
                    (false, s) => (b, a, !s),
                };
                bvs.push(BvCon {
                    left,
                    right,
                    strict,
                    equal: false,
                });
            }
            _ => return CheckStatus::Undetermined,
        }
    }

    // Worklist over disequality splits; every leaf is one full conjunction.
    let mut work: Vec<(Vec<NumCon>, Vec<BvCon>, usize, usize)> = vec![(nums, bvs, 0, 0)];
    let mut any_feasible = false;
    let mut undetermined = false;
    while let Some((base_nums, base_bvs, di, bi)) = work.pop() {
        if di < num_diseqs.len() {
            let (x, y, c, is_int) = num_diseqs[di].clone();
            for (a, b, off) in [(x, y, c.clone()), (y, x, -c)] {
                let mut nums = base_nums.clone();
                nums.push(bound(a, b, off, true, is_int));
                work.push((nums, base_bvs.clone(), di + 1, bi));
            }
            continue;
        }
        if bi < bv_diseqs.len() {
            let (a, b) = bv_diseqs[bi].clone();
            for (l, r) in [(a.clone(), b.clone()), (b, a)] {
                let mut bvs = base_bvs.clone();
                bvs.push(BvCon {
                    left: l,
                    right: r,
                    strict: true,
                    equal: false,
                });
                work.push((base_nums.clone(), bvs, di, bi + 1));
            }
            continue;
        }
        if *budget == 0 {
            undetermined = true;
            break;
        }
        *budget -= 1;
        if !spfa_feasible(&base_nums) {
            continue;
        }
        match bv_feasible(&base_bvs) {
            Some(true) => {
                any_feasible = true;
                break;
            }
            Some(false) => {}
            None => undetermined = true,
        }
    }
    if any_feasible {
        CheckStatus::Sat
    } else if undetermined {
        CheckStatus::Undetermined
    } else {
        CheckStatus::Unsat
    }
}

fn bound(x: Option<Term>, y: Option<Term>, mut c: BigRational, strict: bool, is_int: bool) -> NumCon {
    let mut eps = 0;
    if strict {
        if is_int {
            c -= BigRational::one();
        } else {
            eps = 1;
        }
    }
    NumCon { x, y, c, eps }
}

fn num_side(ctx: &Context, t: Term) -> Option<(Option<Term>, BigRational)> {
    match ctx.node(t) {
        TermNode::Unint(_) => Some((Some(t), BigRational::zero())),
        TermNode::IntLit(i) => Some((None, BigRational::from(i.clone()))),
        TermNode::RatLit(r) => Some((None, r.clone())),
        TermNode::Add(l, r) => {
            let ((lv, lc), (rv, rc)) = (num_side(ctx, *l)?, num_side(ctx, *r)?);
            match (lv, rv) {
                (Some(_), Some(_)) => None,
                (v, None) | (None, v) => Some((v, lc + rc)),
            }
        }
        _ => None,
    }
}

fn bv_side(ctx: &Context, t: Term) -> Option<BvSide> {
    match ctx.node(t) {
        TermNode::Unint(_) => match ctx.sort(t) {
            TermSort::BitVec(w) => Some(BvSide::Var {
                term: t,
                nat_width: w,
                shift: 0,
                width: w,
            }),
            _ => None,
        },
        TermNode::BvLit(v) => match ctx.sort(t) {
            TermSort::BitVec(w) => Some(BvSide::Lit {
                value: v.clone(),
                width: w,
            }),
            _ => None,
        },
        TermNode::ExtendLow(inner, extra) => match bv_side(ctx, *inner)? {
            BvSide::Var {
                term,
                nat_width,
                shift,
                width,
            } => Some(BvSide::Var {
                term,
                nat_width,
                shift: shift + extra,
                width: width + extra,
            }),
            BvSide::Lit { value, width } => Some(BvSide::Lit {
                value: value << *extra,
                width: width + extra,
            }),
        },
        _ => None,
    }
}

/// Queue-based Bellman-Ford; a node relaxed more than `n` times sits on a
/// negative cycle.
fn spfa_feasible(cons: &[NumCon]) -> bool {
    if cons.is_empty() {
        return true;
    }
    let mut index: FxHashMap<Option<Term>, usize> = FxHashMap::default();
    index.insert(None, 0);
    for c in cons {
        for v in [c.x, c.y] {
            let next = index.len();
            index.entry(v).or_insert(next);
        }
    }
    let n = index.len();
    let mut adj: Vec<Vec<(usize, BigRational, u32)>> = vec![Vec::new(); n];
    for c in cons {
        // x - y <= c: edge y -> x.
        adj[index[&c.y]].push((index[&c.x], c.c.clone(), c.eps));
    }
    let mut dist: Vec<(BigRational, u32)> = vec![(BigRational::zero(), 0); n];
    let mut relaxed = vec![0usize; n];
    let mut queued = vec![true; n];
    let mut queue: VecDeque<usize> = (0..n).collect();
    while let Some(u) = queue.pop_front() {
        queued[u] = false;
        let du = dist[u].clone();
        for (v, w, eps) in adj[u].clone() {
            let cand = (&du.0 + &w, du.1 + eps);
            let better = cand.0 < dist[v].0 || (cand.0 == dist[v].0 && cand.1 > dist[v].1);
            if better {
                dist[v] = cand;
                relaxed[v] += 1;
                if relaxed[v] > n {
                    return false;
                }
                if !queued[v] {
                    queued[v] = true;
                    queue.push_back(v);
                }
            }
        }
    }
    true
}

#[derive(Clone)]
struct BvDomain {
    stride: BigUint,
    cap: BigUint,
    fixed: Option<BigUint>,
}

struct Classes(Vec<usize>);

impl Classes {
    fn find(&mut self, i: usize) -> usize {
        if self.0[i] != i {
            let r = self.find(self.0[i]);
            self.0[i] = r;
        }
        self.0[i]
    }
    fn union(&mut self, a: usize, b: usize) -> usize {
        let (ra, rb) = (self.find(a), self.find(b));
        self.0[rb] = ra;
        ra
    }
}

/// Cycle contraction: any cycle in the order graph forces its members
/// equal, so contract non-strict cycles and fail on strict ones; the
/// remainder is a DAG assigned minimal values in Kahn order.
fn bv_feasible(cons: &[BvCon]) -> Option<bool> {
    if cons.is_empty() {
        return Some(true);
    }
    let widest = cons
        .iter()
        .flat_map(|c| [c.left.width(), c.right.width()])
        .max()
        .unwrap_or(0);

    let mut domains: Vec<BvDomain> = Vec::new();
    let mut by_term: FxHashMap<Term, (usize, u32)> = FxHashMap::default();
    let node_of = |side: &BvSide,
                       domains: &mut Vec<BvDomain>,
                       by_term: &mut FxHashMap<Term, (usize, u32)>|
     -> Option<usize> {
        match side {
            BvSide::Var {
                term,
                nat_width,
                shift,
                width,
            } => {
                let exponent = shift + (widest - width);
                if let Some(&(idx, prior)) = by_term.get(term) {
                    return (prior == exponent).then_some(idx);
                }
                domains.push(BvDomain {
                    stride: BigUint::one() << exponent,
                    cap: ((BigUint::one() << *nat_width) - BigUint::one()) << exponent,
                    fixed: None,
                });
                by_term.insert(*term, (domains.len() - 1, exponent));
                Some(domains.len() - 1)
            }
            BvSide::Lit { value, width } => {
                let scaled = value.clone() << (widest - width);
                domains.push(BvDomain {
                    stride: BigUint::one(),
                    cap: scaled.clone(),
                    fixed: Some(scaled),
                });
                Some(domains.len() - 1)
            }
        }
    };

    let mut classes = Classes((0..0).collect());
    let mut raw_edges: Vec<(usize, usize, bool)> = Vec::new();
    let mut eq_pairs: Vec<(usize, usize)> = Vec::new();
    for c in cons {
        let l = node_of(&c.left, &mut domains, &mut by_term)?;
        let r = node_of(&c.right, &mut domains, &mut by_term)?;
        if c.equal {
            eq_pairs.push((l, r));
        } else {
            raw_edges.push((l, r, c.strict));
        }
    }
    classes.0 = (0..domains.len()).collect();
    let mut merged = domains.clone();
    let merge_into = |merged: &mut Vec<BvDomain>, root: usize, other: usize| -> bool {
        let fixed = match (&merged[root].fixed, &merged[other].fixed) {
            (Some(a), Some(b)) if a != b => return false,
            (Some(a), _) => Some(a.clone()),
            (_, b) => b.clone(),
        };
        merged[root] = BvDomain {
            stride: merged[root].stride.clone().max(merged[other].stride.clone()),
            cap: merged[root].cap.clone().min(merged[other].cap.clone()),
            fixed,
        };
        true
    };
    for (a, b) in eq_pairs {
        let (ra, rb) = (classes.find(a), classes.find(b));
        if ra == rb {
            continue;
        }
        let root = classes.union(ra, rb);
        let other = if root == ra { rb } else { ra };
        if !merge_into(&mut merged, root, other) {
            return Some(false);
        }
    }

    // Contract cycles until the rep graph is acyclic.
    loop {
        let edges: Vec<(usize, usize, bool)> = raw_edges
            .iter()
            .map(|&(l, r, s)| (classes.find(l), classes.find(r), s))
            .collect();
        for &(l, r, s) in &edges {
            if l == r && s {
                return Some(false);
            }
        }
        match find_cycle(&edges) {
            None => break,
            Some(cycle_nodes) => {
                let on_cycle: FxHashSet<usize> = cycle_nodes.iter().copied().collect();
                for &(l, r, s) in &edges {
                    if s && on_cycle.contains(&l) && on_cycle.contains(&r) && l != r {
                        // A strict edge inside the contracted cycle.
                        return Some(false);
                    }
                }
                let mut iter = cycle_nodes.iter();
                let first = *iter.next()?;
                for &other in iter {
                    let (ra, rb) = (classes.find(first), classes.find(other));
                    if ra == rb {
                        continue;
                    }
                    let root = classes.union(ra, rb);
                    let o = if root == ra { rb } else { ra };
                    if !merge_into(&mut merged, root, o) {
                        return Some(false);
                    }
                }
            }
        }
    }

    let edges: Vec<(usize, usize, bool)> = raw_edges
        .iter()
        .map(|&(l, r, s)| (classes.find(l), classes.find(r), s))
        .filter(|&(l, r, _)| l != r)
        .collect();
    let reps: Vec<usize> = {
        let mut all: Vec<usize> = (0..domains.len()).map(|i| classes.find(i)).collect();
        all.sort_unstable();
        all.dedup();
        all
    };
    let mut indegree: FxHashMap<usize, usize> = reps.iter().map(|&r| (r, 0)).collect();
    for &(_, to, _) in &edges {
        *indegree.get_mut(&to)? += 1;
    }
    let mut ready: VecDeque<usize> = reps
        .iter()
        .copied()
        .filter(|r| indegree[r] == 0)
        .collect();
    let mut value: FxHashMap<usize, BigUint> = FxHashMap::default();
    let mut done = 0usize;
    while let Some(node) = ready.pop_front() {
        done += 1;
        let dom = &merged[node];
        let mut floor = BigUint::ZERO;
        for &(from, to, strict) in &edges {
            if to != node {
                continue;
            }
            let pred = value.get(&from)?.clone();
            let req = if strict {
                ((&pred / &dom.stride) + BigUint::one()) * &dom.stride
            } else {
                ((&pred + &dom.stride - BigUint::one()) / &dom.stride) * &dom.stride
            };
            floor = floor.max(req);
        }
        let chosen = match &dom.fixed {
            Some(v) => {
                if *v < floor || v % &dom.stride != BigUint::ZERO {
                    return Some(false);
                }
                v.clone()
            }
            None => ((&floor + &dom.stride - BigUint::one()) / &dom.stride) * &dom.stride,
        };
        if chosen > dom.cap {
            return Some(false);
        }
        value.insert(node, chosen);
        for &(from, to, _) in &edges {
            if from != node {
                continue;
            }
            let d = indegree.get_mut(&to)?;
            *d -= 1;
            if *d == 0 {
                ready.push_back(to);
            }
        }
    }
    if done != reps.len() {
        // Leftover nodes would mean an uncontracted cycle.
        return None;
    }
    Some(true)
}

/// Locate one directed cycle, returned as its set of nodes.
fn find_cycle(edges: &[(usize, usize, bool)]) -> Option<Vec<usize>> {
    let mut adj: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    let mut nodes: FxHashSet<usize> = FxHashSet::default();
    for &(l, r, _) in edges {
        nodes.insert(l);
        nodes.insert(r);
        if l != r {
            adj.entry(l).or_default().push(r);
        }
    }
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }
    fn dfs(
        u: usize,
        adj: &FxHashMap<usize, Vec<usize>>,
        color: &mut FxHashMap<usize, Color>,
        parent: &mut FxHashMap<usize, usize>,
    ) -> Option<(usize, usize)> {
        color.insert(u, Color::Gray);
        for &v in adj.get(&u).map(Vec::as_slice).unwrap_or(&[]) {
            match color.get(&v).copied().unwrap_or(Color::White) {
                Color::White => {
                    parent.insert(v, u);
                    if let Some(found) = dfs(v, adj, color, parent) {
                        return Some(found);
                    }
                }
                Color::Gray => return Some((u, v)),
                Color::Black => {}
            }
        }
        color.insert(u, Color::Black);
        None
    }
    let mut color = FxHashMap::default();
    let mut parent = FxHashMap::default();
    for &n in &nodes {
        if color.get(&n).copied().unwrap_or(Color::White) == Color::White {
            if let Some((back_from, back_to)) = dfs(n, &adj, &mut color, &mut parent) {
                let mut cycle = vec![back_from];
                let mut cur = back_from;
                while cur != back_to {
                    cur = parent[&cur];
                    cycle.push(cur);
                }
                return Some(cycle);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::super::context::{Context, TermSort};
    use super::super::CheckStatus;

    #[test]
    fn pure_boolean_conjunction() {
        let mut ctx = Context::new();
        let t = ctx.true_term();
        let f = ctx.false_term();
        let both = ctx.and_terms(&[t, f]).unwrap();
        ctx.assert_term(both).unwrap();
        assert_eq!(ctx.check(), CheckStatus::Unsat);
        ctx.reset();
        let either = ctx.or_terms(&[t, f]).unwrap();
        ctx.assert_term(either).unwrap();
        assert_eq!(ctx.check(), CheckStatus::Sat);
    }

    #[test]
    fn native_strict_less_on_integers() {
        // x < y and y < x + 1 has no integer solution.
        let mut ctx = Context::new();
        let x = ctx.new_uninterpreted("t.x", TermSort::Int).unwrap();
        let y = ctx.new_uninterpreted("t.y", TermSort::Int).unwrap();
        let one = ctx.int_const(1);
        let x1 = ctx.add(x, one).unwrap();
        let a = ctx.lt_term(x, y).unwrap();
        let b = ctx.lt_term(y, x1).unwrap();
        ctx.assert_term(a).unwrap();
        ctx.assert_term(b).unwrap();
        assert_eq!(ctx.check(), CheckStatus::Unsat);
    }

    #[test]
    fn strict_less_on_reals_is_dense() {
        let mut ctx = Context::new();
        let x = ctx.new_uninterpreted("t.x", TermSort::Real).unwrap();
        let y = ctx.new_uninterpreted("t.y", TermSort::Real).unwrap();
        let one = ctx.rational_const("1").unwrap();
        let x1 = ctx.add(x, one).unwrap();
        let a = ctx.lt_term(x, y).unwrap();
        let b = ctx.lt_term(y, x1).unwrap();
        ctx.assert_term(a).unwrap();
        ctx.assert_term(b).unwrap();
        assert_eq!(ctx.check(), CheckStatus::Sat);
    }

    #[test]
    fn zero_extension_ordering_chain() {
        // "aaa" < pad(sy2) < "aba" is satisfiable for a 2-character sy2.
        let mut ctx = Context::new();
        let sy = ctx.new_uninterpreted("t.sy2", TermSort::BitVec(32)).unwrap();
        let sy_pad = ctx.zero_extend_low(sy, 16).unwrap();
        let aaa = literal(&mut ctx, "aaa");
        let aba = literal(&mut ctx, "aba");
        let lo = ctx.bv_lt(aaa, sy_pad).unwrap();
        let hi = ctx.bv_lt(sy_pad, aba).unwrap();
        ctx.assert_term(lo).unwrap();
        ctx.assert_term(hi).unwrap();
        assert_eq!(ctx.check(), CheckStatus::Sat);
    }

    #[test]
    fn strict_order_is_irreflexive() {
        let mut ctx = Context::new();
        let s = ctx.new_uninterpreted("t.s", TermSort::BitVec(48)).unwrap();
        let lt = ctx.bv_lt(s, s).unwrap();
        ctx.assert_term(lt).unwrap();
        assert_eq!(ctx.check(), CheckStatus::Unsat);
    }

    fn literal(ctx: &mut Context, s: &str) -> super::Term {
        let mut bits = String::new();
        for ch in s.chars() {
            let u = ch as u32;
            for b in (0..16).rev() {
                bits.push(if u >> b & 1 == 1 { '1' } else { '0' });
            }
        }
        ctx.bv_from_bits(&bits).unwrap()
    }
}
