//! Boolean search for the quill engine.
//!
//! Recursive three-valued DPLL over the formula's atoms: evaluate every
//! asserted root under the partial assignment, prune falsified branches,
//! hand fully-satisfied branches to the theory layer, otherwise split on
//! the first unassigned atom. Assigned literals bind the whole subtree, so
//! a theory conflict prunes the subtree, not just one leaf.

use super::term::{Env, Sort, TermId, TermKind};
use super::theory::{self, TheoryVerdict};
use super::Status;
use rustc_hash::{FxHashMap, FxHashSet};

pub(crate) fn solve(env: &Env) -> Status {
    let roots = env.asserted.clone();
    if roots.is_empty() {
        return Status::Sat;
    }
    let mut atoms = Vec::new();
    let mut seen = FxHashSet::default();
    for &r in &roots {
        collect_atoms(env, r, &mut atoms, &mut seen);
    }
    tracing::debug!(roots = roots.len(), atoms = atoms.len(), "quill solve");

    let mut budget = env.config.branch_budget;
    let mut assign: FxHashMap<TermId, bool> = FxHashMap::default();
    search(env, &roots, &atoms, &mut assign, &mut budget)
}

fn collect_atoms(env: &Env, t: TermId, atoms: &mut Vec<TermId>, seen: &mut FxHashSet<TermId>) {
    match &env.data(t).kind {
        TermKind::And(l, r) | TermKind::Or(l, r) => {
            collect_atoms(env, *l, atoms, seen);
            collect_atoms(env, *r, atoms, seen);
        }
        TermKind::Not(x) => collect_atoms(env, *x, atoms, seen),
        TermKind::True | TermKind::False => {}
        _ => {
            if env.data(t).sort == Sort::Bool && seen.insert(t) {
                atoms.push(t);
            }
        }
    }
}

/// Three-valued evaluation under a partial atom assignment.
fn eval(env: &Env, t: TermId, assign: &FxHashMap<TermId, bool>) -> Option<bool> {
    match &env.data(t).kind {
        TermKind::True => Some(true),
        TermKind::False => Some(false),
        TermKind::Not(x) => eval(env, *x, assign).map(|v| !v),
        TermKind::And(l, r) => match (eval(env, *l, assign), eval(env, *r, assign)) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        TermKind::Or(l, r) => match (eval(env, *l, assign), eval(env, *r, assign)) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
        _ => assign.get(&t).copied(),
    }
}

fn search(
    env: &Env,
    roots: &[TermId],
    atoms: &[TermId],
    assign: &mut FxHashMap<TermId, bool>,
    budget: &mut u64,
) -> Status {
    if *budget == 0 {
        return Status::Unknown;
    }
    *budget -= 1;

    let mut all_true = true;
    for &r in roots {
        match eval(env, r, assign) {
            Some(false) => return Status::Unsat,
            Some(true) => {}
            None => all_true = false,
        }
    }
    if all_true {
        // Deterministic literal order: walk the atom list, not the map.
        let lits: Vec<(TermId, bool)> = atoms
            .iter()
            .filter_map(|a| assign.get(a).map(|&v| (*a, v)))
            .collect();
        return match theory::check(env, &lits, budget) {
            TheoryVerdict::Consistent => Status::Sat,
            TheoryVerdict::Inconsistent => Status::Unsat,
            TheoryVerdict::Unknown => Status::Unknown,
        };
    }

    let Some(&pick) = atoms.iter().find(|a| !assign.contains_key(*a)) else {
        // Every atom assigned yet some root undecided: cannot happen for
        // well-sorted terms, treat as out of fragment.
        return Status::Unknown;
    };
    let mut saw_unknown = false;
    for value in [true, false] {
        assign.insert(pick, value);
        match search(env, roots, atoms, assign, budget) {
            Status::Sat => {
                assign.remove(&pick);
                return Status::Sat;
            }
            Status::Unknown => saw_unknown = true,
            Status::Unsat => {}
        }
        assign.remove(&pick);
    }
    if saw_unknown {
        Status::Unknown
    } else {
        Status::Unsat
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Config, Env, Sort, Status};

    #[test]
    fn empty_environment_is_satisfiable() {
        let env = Env::new(&Config::default());
        assert_eq!(env.solve(), Status::Sat);
    }

    #[test]
    fn boolean_structure_alone() {
        let mut env = Env::new(&Config::default());
        let p = env.declare_const("t.p", Sort::Bool).unwrap();
        let np = env.make_not(p).unwrap();
        let both = env.make_and(p, np).unwrap();
        env.assert_formula(both).unwrap();
        assert_eq!(env.solve(), Status::Unsat);

        env.reset();
        let either = env.make_or(p, np).unwrap();
        env.assert_formula(either).unwrap();
        assert_eq!(env.solve(), Status::Sat);
    }

    #[test]
    fn implication_chain() {
        // (p -> q) and (q -> r) and p and not r: unsat.
        let mut env = Env::new(&Config::default());
        let p = env.declare_const("t.p", Sort::Bool).unwrap();
        let q = env.declare_const("t.q", Sort::Bool).unwrap();
        let r = env.declare_const("t.r", Sort::Bool).unwrap();
        let np = env.make_not(p).unwrap();
        let nq = env.make_not(q).unwrap();
        let nr = env.make_not(r).unwrap();
        let pq = env.make_or(np, q).unwrap();
        let qr = env.make_or(nq, r).unwrap();
        for t in [pq, qr, p, nr] {
            env.assert_formula(t).unwrap();
        }
        assert_eq!(env.solve(), Status::Unsat);

        env.reset();
        for t in [pq, qr, p, r] {
            env.assert_formula(t).unwrap();
        }
        assert_eq!(env.solve(), Status::Sat);
    }

    #[test]
    fn integer_difference_scenario() {
        // x = 21 and y = 21 and x = y: sat; x = y - 1 instead: unsat.
        let mut env = Env::new(&Config::default());
        let x = env.declare_const("t.x", Sort::Int).unwrap();
        let y = env.declare_const("t.y", Sort::Int).unwrap();
        let twenty_one = env.make_number("21").unwrap();
        let x21 = env.make_equal(x, twenty_one).unwrap();
        let y21 = env.make_equal(y, twenty_one).unwrap();
        let xy = env.make_equal(x, y).unwrap();
        for t in [x21, y21, xy] {
            env.assert_formula(t).unwrap();
        }
        assert_eq!(env.solve(), Status::Sat);

        env.reset();
        let minus_one = env.make_number("-1").unwrap();
        let y_minus = env.make_plus(y, minus_one).unwrap();
        let xy1 = env.make_equal(x, y_minus).unwrap();
        for t in [x21, y21, xy1] {
            env.assert_formula(t).unwrap();
        }
        assert_eq!(env.solve(), Status::Unsat);
    }

    #[test]
    fn exhausted_budget_reports_unknown() {
        let mut env = Env::new(&Config {
            branch_budget: 1,
        });
        let p = env.declare_const("t.p", Sort::Bool).unwrap();
        let q = env.declare_const("t.q", Sort::Bool).unwrap();
        let or = env.make_or(p, q).unwrap();
        env.assert_formula(or).unwrap();
        assert_eq!(env.solve(), Status::Unknown);
    }
}
