//! Assertion store and search loop for the boreal engine.

use super::context::{Context, Node};
use super::feas::{self, Feas};
use super::{BoolAst, SatResult};
use rustc_hash::{FxHashMap, FxHashSet};

/// Holds assertions and decides them against a [`Context`].
#[derive(Debug)]
pub struct Solver {
    assertions: Vec<BoolAst>,
    branch_budget: u64,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Empty solver with the default search budget.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assertions: Vec::new(),
            branch_budget: 100_000,
        }
    }

    /// Cap the number of search steps one `check` may take.
    pub fn set_branch_budget(&mut self, budget: u64) {
        self.branch_budget = budget;
    }

    /// Add a formula to the asserted conjunction.
    pub fn assert(&mut self, formula: BoolAst) {
        self.assertions.push(formula);
    }

    /// Drop all assertions; the context and its asts are untouched.
    pub fn reset(&mut self) {
        tracing::trace!(dropped = self.assertions.len(), "boreal reset");
        self.assertions.clear();
    }

    /// Decide the asserted conjunction. Iterative trail-based search:
    /// decide an atom, evaluate, flip on conflict, pop exhausted decisions.
    #[must_use]
    pub fn check(&self, ctx: &Context) -> SatResult {
        if self.assertions.is_empty() {
            return SatResult::Sat;
        }
        let mut atoms = Vec::new();
        let mut seen = FxHashSet::default();
        for a in &self.assertions {
            collect_atoms(ctx, a.0, &mut atoms, &mut seen);
        }
        tracing::debug!(
            assertions = self.assertions.len(),
            atoms = atoms.len(),
            "boreal check"
        );

        let mut assign: FxHashMap<u32, bool> = FxHashMap::default();
        let mut trail: Vec<(u32, bool, bool)> = Vec::new();
        let mut budget = self.branch_budget;
        let mut saw_unknown = false;

        loop {
            if budget == 0 {
                return SatResult::Unknown;
            }
            budget -= 1;

            let mut verdict = Some(true);
            for a in &self.assertions {
                match eval(ctx, a.0, &assign) {
                    Some(false) => {
                        verdict = Some(false);
                        break;
                    }
                    Some(true) => {}
                    None => verdict = None,
                }
            }

            let conflict = match verdict {
                Some(false) => true,
                Some(true) => {
                    let lits: Vec<(u32, bool)> = atoms
                        .iter()
                        .filter_map(|a| assign.get(a).map(|&v| (*a, v)))
                        .collect();
                    match feas::conjunction(ctx, &lits, &mut budget) {
                        Feas::Feasible => return SatResult::Sat,
                        Feas::Infeasible => true,
                        Feas::Unknown => {
                            saw_unknown = true;
                            true
                        }
                    }
                }
                None => {
                    let pick = atoms.iter().find(|a| !assign.contains_key(*a)).copied();
                    match pick {
                        Some(atom) => {
                            trail.push((atom, true, false));
                            assign.insert(atom, true);
                            continue;
                        }
                        // Fully assigned yet undecided: out of fragment.
                        None => return SatResult::Unknown,
                    }
                }
            };

            if conflict {
                let mut resolved = false;
                while let Some((atom, value, flipped)) = trail.pop() {
                    assign.remove(&atom);
                    if !flipped {
                        trail.push((atom, !value, true));
                        assign.insert(atom, !value);
                        resolved = true;
                        break;
                    }
                }
                if !resolved {
                    return if saw_unknown {
                        SatResult::Unknown
                    } else {
                        SatResult::Unsat
                    };
                }
            }
        }
    }
}

fn collect_atoms(ctx: &Context, id: u32, atoms: &mut Vec<u32>, seen: &mut FxHashSet<u32>) {
    match ctx.node(id) {
        Node::And(children) | Node::Or(children) => {
            for &c in children {
                collect_atoms(ctx, c, atoms, seen);
            }
        }
        Node::Not(inner) => collect_atoms(ctx, *inner, atoms, seen),
        Node::True | Node::False => {}
        Node::BoolVar(_)
        | Node::EqArith(..)
        | Node::Le(..)
        | Node::Lt(..)
        | Node::EqBv(..)
        | Node::Ule(..)
        | Node::Ult(..) => {
            if seen.insert(id) {
                atoms.push(id);
            }
        }
        _ => {}
    }
}

fn eval(ctx: &Context, id: u32, assign: &FxHashMap<u32, bool>) -> Option<bool> {
    match ctx.node(id) {
        Node::True => Some(true),
        Node::False => Some(false),
        Node::Not(inner) => eval(ctx, *inner, assign).map(|v| !v),
        Node::And(children) => {
            let mut all = Some(true);
            for &c in children {
                match eval(ctx, c, assign) {
                    Some(false) => return Some(false),
                    Some(true) => {}
                    None => all = None,
                }
            }
            all
        }
        Node::Or(children) => {
            let mut any = Some(false);
            for &c in children {
                match eval(ctx, c, assign) {
                    Some(true) => return Some(true),
                    Some(false) => {}
                    None => any = None,
                }
            }
            any
        }
        _ => assign.get(&id).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_and_of_true_false_is_unsat() {
        let mut ctx = Context::new();
        let t = ctx.mk_true();
        let f = ctx.mk_false();
        let and = ctx.mk_and(&[t, f]).unwrap();
        let mut solver = Solver::new();
        solver.assert(and);
        assert_eq!(solver.check(&ctx), SatResult::Unsat);
    }

    #[test]
    fn nary_or_short_circuits() {
        let mut ctx = Context::new();
        let t = ctx.mk_true();
        let f = ctx.mk_false();
        let or = ctx.mk_or(&[f, f, t]).unwrap();
        let mut solver = Solver::new();
        solver.assert(or);
        assert_eq!(solver.check(&ctx), SatResult::Sat);
    }

    #[test]
    fn reset_clears_only_assertions() {
        let mut ctx = Context::new();
        let f = ctx.mk_false();
        let mut solver = Solver::new();
        solver.assert(f);
        assert_eq!(solver.check(&ctx), SatResult::Unsat);
        solver.reset();
        assert_eq!(solver.check(&ctx), SatResult::Sat);
        // Handles survive the reset.
        solver.assert(f);
        assert_eq!(solver.check(&ctx), SatResult::Unsat);
    }

    #[test]
    fn integer_equalities_with_offsets() {
        let mut ctx = Context::new();
        let x = ctx.mk_int_const("t.x").unwrap();
        let y = ctx.mk_int_const("t.y").unwrap();
        let n21 = ctx.mk_int(21);
        let x21 = ctx.mk_eq(x, n21).unwrap();
        let y21 = ctx.mk_eq(y, n21).unwrap();
        let xy = ctx.mk_eq(x, y).unwrap();
        let mut solver = Solver::new();
        for f in [x21, y21, xy] {
            solver.assert(f);
        }
        assert_eq!(solver.check(&ctx), SatResult::Sat);

        solver.reset();
        let minus1 = ctx.mk_int(-1);
        let y_off = ctx.mk_add(y, minus1).unwrap();
        let shifted = ctx.mk_eq(x, y_off).unwrap();
        for f in [x21, y21, shifted] {
            solver.assert(f);
        }
        assert_eq!(solver.check(&ctx), SatResult::Unsat);
    }

    #[test]
    fn budget_exhaustion_is_unknown() {
        let mut ctx = Context::new();
        let p = ctx.mk_bool_const("t.p").unwrap();
        let q = ctx.mk_bool_const("t.q").unwrap();
        let or = ctx.mk_or(&[p, q]).unwrap();
        let mut solver = Solver::new();
        solver.set_branch_budget(1);
        solver.assert(or);
        assert_eq!(solver.check(&ctx), SatResult::Unknown);
    }
}
