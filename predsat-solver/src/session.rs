//! Solver sessions: one per backend, two lifecycle policies.
//!
//! A session owns its backend context exclusively and is driven through
//! [`SatChecker::is_satisfiable`]. Under [`Lifecycle::PerCall`] every check
//! opens a fresh context and closes it on every exit path, error paths
//! included. Under [`Lifecycle::Resetting`] the context is allocated once,
//! reset between checks, never closed per call, and torn down when the
//! session is dropped; callers must not reuse a column name at a different
//! type within the session's lifetime, and a violation surfaces as a
//! translation failure rather than a wrong verdict.
//!
//! The lifecycle operations are public so embedders can drive the state
//! machine directly; `is_satisfiable` never leaves a per-call context open.

use crate::backend::boreal::BorealBuilder;
use crate::backend::cirrus::CirrusBuilder;
use crate::backend::quill::QuillBuilder;
use crate::outcome::{CheckError, Satisfiability};
use crate::translate::translate;
use predsat_core::Expr;
use predsat_engines::boreal;
use predsat_engines::cirrus;
use predsat_engines::quill;

/// The closed set of interchangeable backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Environment-handle engine, binary connectives, derived strict less.
    Quill,
    /// Context/solver split, hash-consed asts, decimal bit-vector numerals.
    Boreal,
    /// Flat term table, variadic connectives, native low-side extension.
    Cirrus,
}

/// Context lifecycle policy of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Open a fresh context per check and close it on every exit path.
    PerCall,
    /// Keep one context for the session's lifetime, resetting between
    /// checks. Faster for high-volume checking; stale terms survive
    /// resets.
    Resetting,
}

/// The satisfiability-checking surface a caller sees.
pub trait SatChecker {
    /// Decide the expression, driving the session lifecycle according to
    /// its policy.
    fn is_satisfiable(&mut self, expr: &Expr) -> Result<Satisfiability, CheckError>;

    /// SMT-LIB 2 rendering of the most recently translated formula, for
    /// diagnostics.
    fn last_formula(&self) -> Option<&str>;
}

/// Build a session for a backend and lifecycle policy.
#[must_use]
pub fn session(backend: Backend, lifecycle: Lifecycle) -> Box<dyn SatChecker> {
    match backend {
        Backend::Quill => Box::new(QuillSession::new(lifecycle)),
        Backend::Boreal => Box::new(BorealSession::new(lifecycle)),
        Backend::Cirrus => Box::new(CirrusSession::new(lifecycle)),
    }
}

fn resource(reason: &str) -> CheckError {
    CheckError::Resource {
        reason: reason.to_string(),
    }
}

fn translation<E: std::error::Error + Send + Sync + 'static>(source: E) -> CheckError {
    CheckError::Translation {
        source: Box::new(source),
    }
}

fn assertion<E: std::error::Error + Send + Sync + 'static>(source: E) -> CheckError {
    CheckError::Assertion {
        source: Box::new(source),
    }
}

/// Run the per-call or resetting preamble, the check body, and the
/// mandatory close for per-call sessions.
macro_rules! drive_lifecycle {
    ($self:ident, $expr:ident) => {{
        match $self.lifecycle {
            Lifecycle::PerCall => {
                $self.open()?;
                let verdict = $self.check_open($expr);
                let closed = $self.close();
                let verdict = verdict?;
                closed?;
                Ok(verdict)
            }
            Lifecycle::Resetting => {
                if $self.is_open() {
                    $self.reset()?;
                } else {
                    $self.open()?;
                }
                $self.check_open($expr)
            }
        }
    }};
}

/// Session over the quill engine.
#[derive(Debug)]
pub struct QuillSession {
    lifecycle: Lifecycle,
    config: quill::Config,
    env: Option<quill::Env>,
    last_formula: Option<String>,
}

impl QuillSession {
    /// Closed session with the default engine configuration.
    #[must_use]
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self::with_config(lifecycle, quill::Config::default())
    }

    /// Closed session with an explicit engine configuration.
    #[must_use]
    pub fn with_config(lifecycle: Lifecycle, config: quill::Config) -> Self {
        Self {
            lifecycle,
            config,
            env: None,
            last_formula: None,
        }
    }

    /// Whether a context is currently allocated.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.env.is_some()
    }

    /// Allocate the environment. Fails if one is already open.
    pub fn open(&mut self) -> Result<(), CheckError> {
        if self.env.is_some() {
            return Err(resource("quill session is already open"));
        }
        tracing::debug!("opening quill environment");
        self.env = Some(quill::Env::new(&self.config));
        Ok(())
    }

    /// Discard assertions, keep the environment. Fails when closed.
    pub fn reset(&mut self) -> Result<(), CheckError> {
        match self.env.as_mut() {
            Some(env) => {
                env.reset();
                Ok(())
            }
            None => Err(resource("cannot reset a closed quill session")),
        }
    }

    /// Release the environment. Fails when already closed.
    pub fn close(&mut self) -> Result<(), CheckError> {
        if self.env.take().is_none() {
            return Err(resource("quill session is not open"));
        }
        tracing::debug!("closed quill environment");
        Ok(())
    }

    fn check_open(&mut self, expr: &Expr) -> Result<Satisfiability, CheckError> {
        let env = self
            .env
            .as_mut()
            .ok_or_else(|| resource("quill session is not open"))?;
        let mut builder = QuillBuilder { env };
        let formula = translate(&mut builder, expr).map_err(translation)?;
        let env = builder.env;
        let rendered = env.to_smtlib2(formula);
        env.assert_formula(formula).map_err(assertion)?;
        let status = env.solve();
        self.last_formula = Some(rendered);
        match status {
            quill::Status::Sat => Ok(Satisfiability::Satisfiable),
            quill::Status::Unsat => Ok(Satisfiability::Unsatisfiable),
            quill::Status::Unknown => Err(CheckError::Indeterminate),
        }
    }
}

impl SatChecker for QuillSession {
    fn is_satisfiable(&mut self, expr: &Expr) -> Result<Satisfiability, CheckError> {
        drive_lifecycle!(self, expr)
    }

    fn last_formula(&self) -> Option<&str> {
        self.last_formula.as_deref()
    }
}

/// Session over the boreal engine.
#[derive(Debug)]
pub struct BorealSession {
    lifecycle: Lifecycle,
    branch_budget: u64,
    state: Option<(boreal::Context, boreal::Solver)>,
    last_formula: Option<String>,
}

impl BorealSession {
    /// Closed session with the default search budget.
    #[must_use]
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self {
            lifecycle,
            branch_budget: 100_000,
            state: None,
            last_formula: None,
        }
    }

    /// Whether a context is currently allocated.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Allocate context and solver. Fails if already open.
    pub fn open(&mut self) -> Result<(), CheckError> {
        if self.state.is_some() {
            return Err(resource("boreal session is already open"));
        }
        tracing::debug!("opening boreal context");
        let mut solver = boreal::Solver::new();
        solver.set_branch_budget(self.branch_budget);
        self.state = Some((boreal::Context::new(), solver));
        Ok(())
    }

    /// Drop assertions, keep the context's interned asts. Fails when
    /// closed.
    pub fn reset(&mut self) -> Result<(), CheckError> {
        match self.state.as_mut() {
            Some((_, solver)) => {
                solver.reset();
                Ok(())
            }
            None => Err(resource("cannot reset a closed boreal session")),
        }
    }

    /// Release context and solver. Fails when already closed.
    pub fn close(&mut self) -> Result<(), CheckError> {
        if self.state.take().is_none() {
            return Err(resource("boreal session is not open"));
        }
        tracing::debug!("closed boreal context");
        Ok(())
    }

    fn check_open(&mut self, expr: &Expr) -> Result<Satisfiability, CheckError> {
        let Some((ctx, solver)) = self.state.as_mut() else {
            return Err(resource("boreal session is not open"));
        };
        let mut builder = BorealBuilder { ctx };
        let formula = translate(&mut builder, expr).map_err(translation)?;
        let ctx = builder.ctx;
        let rendered = ctx.to_smtlib2(formula);
        solver.assert(formula);
        let status = solver.check(ctx);
        self.last_formula = Some(rendered);
        match status {
            boreal::SatResult::Sat => Ok(Satisfiability::Satisfiable),
            boreal::SatResult::Unsat => Ok(Satisfiability::Unsatisfiable),
            boreal::SatResult::Unknown => Err(CheckError::Indeterminate),
        }
    }
}

impl SatChecker for BorealSession {
    fn is_satisfiable(&mut self, expr: &Expr) -> Result<Satisfiability, CheckError> {
        drive_lifecycle!(self, expr)
    }

    fn last_formula(&self) -> Option<&str> {
        self.last_formula.as_deref()
    }
}

/// Session over the cirrus engine.
#[derive(Debug)]
pub struct CirrusSession {
    lifecycle: Lifecycle,
    config: cirrus::ContextConfig,
    ctx: Option<cirrus::Context>,
    last_formula: Option<String>,
}

impl CirrusSession {
    /// Closed session with the default context configuration.
    #[must_use]
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self::with_config(lifecycle, cirrus::ContextConfig::default())
    }

    /// Closed session with an explicit context configuration.
    #[must_use]
    pub fn with_config(lifecycle: Lifecycle, config: cirrus::ContextConfig) -> Self {
        Self {
            lifecycle,
            config,
            ctx: None,
            last_formula: None,
        }
    }

    /// Whether a context is currently allocated.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.ctx.is_some()
    }

    /// Allocate the context. Fails if already open.
    pub fn open(&mut self) -> Result<(), CheckError> {
        if self.ctx.is_some() {
            return Err(resource("cirrus session is already open"));
        }
        tracing::debug!("opening cirrus context");
        self.ctx = Some(cirrus::Context::with_config(&self.config));
        Ok(())
    }

    /// Drop assertions, keep the term table. Fails when closed.
    pub fn reset(&mut self) -> Result<(), CheckError> {
        match self.ctx.as_mut() {
            Some(ctx) => {
                ctx.reset();
                Ok(())
            }
            None => Err(resource("cannot reset a closed cirrus session")),
        }
    }

    /// Release the context. Fails when already closed.
    pub fn close(&mut self) -> Result<(), CheckError> {
        if self.ctx.take().is_none() {
            return Err(resource("cirrus session is not open"));
        }
        tracing::debug!("closed cirrus context");
        Ok(())
    }

    fn check_open(&mut self, expr: &Expr) -> Result<Satisfiability, CheckError> {
        let ctx = self
            .ctx
            .as_mut()
            .ok_or_else(|| resource("cirrus session is not open"))?;
        let mut builder = CirrusBuilder { ctx };
        let formula = translate(&mut builder, expr).map_err(translation)?;
        let ctx = builder.ctx;
        let rendered = ctx.to_smtlib2(formula);
        ctx.assert_term(formula).map_err(assertion)?;
        let status = ctx.check();
        self.last_formula = Some(rendered);
        match status {
            cirrus::CheckStatus::Sat => Ok(Satisfiability::Satisfiable),
            cirrus::CheckStatus::Unsat => Ok(Satisfiability::Unsatisfiable),
            cirrus::CheckStatus::Undetermined => Err(CheckError::Indeterminate),
        }
    }
}

impl SatChecker for CirrusSession {
    fn is_satisfiable(&mut self, expr: &Expr) -> Result<Satisfiability, CheckError> {
        drive_lifecycle!(self, expr)
    }

    fn last_formula(&self) -> Option<&str> {
        self.last_formula.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predsat_core::{CmpOp, Expr};

    #[test]
    fn per_call_sessions_close_after_success_and_failure() {
        let mut s = QuillSession::new(Lifecycle::PerCall);
        let sat = s.is_satisfiable(&Expr::bool_lit(true)).unwrap();
        assert!(sat.is_satisfiable());
        assert!(!s.is_open());

        // A second check reopens cleanly.
        let unsat = s.is_satisfiable(&Expr::not(Expr::bool_lit(true))).unwrap();
        assert!(!unsat.is_satisfiable());
        assert!(!s.is_open());
    }

    #[test]
    fn reset_on_closed_session_is_a_resource_error() {
        let mut q = QuillSession::new(Lifecycle::PerCall);
        assert!(matches!(q.reset(), Err(CheckError::Resource { .. })));
        let mut b = BorealSession::new(Lifecycle::PerCall);
        assert!(matches!(b.reset(), Err(CheckError::Resource { .. })));
        let mut c = CirrusSession::new(Lifecycle::PerCall);
        assert!(matches!(c.reset(), Err(CheckError::Resource { .. })));
    }

    #[test]
    fn double_open_is_a_resource_error() {
        let mut s = BorealSession::new(Lifecycle::PerCall);
        s.open().unwrap();
        assert!(matches!(s.open(), Err(CheckError::Resource { .. })));
        s.close().unwrap();
        assert!(matches!(s.close(), Err(CheckError::Resource { .. })));
    }

    #[test]
    fn resetting_sessions_keep_their_context() {
        let mut s = CirrusSession::new(Lifecycle::Resetting);
        assert!(s
            .is_satisfiable(&Expr::bool_lit(true))
            .unwrap()
            .is_satisfiable());
        assert!(s.is_open());
        assert!(!s
            .is_satisfiable(&Expr::bool_lit(false))
            .unwrap()
            .is_satisfiable());
        assert!(s.is_open());
    }

    #[test]
    fn tautology_fold_reaches_the_backend_as_true() {
        // Both operands absent: the comparison itself must become `true`,
        // so its negation is unsatisfiable.
        let cmp = Expr::int_cmp(CmpOp::Less, None, None, 7).unwrap();
        for backend in [Backend::Quill, Backend::Boreal, Backend::Cirrus] {
            let mut s = session(backend, Lifecycle::PerCall);
            assert!(s.is_satisfiable(&cmp).unwrap().is_satisfiable());
            let negated = Expr::not(cmp.clone());
            assert!(!s.is_satisfiable(&negated).unwrap().is_satisfiable());
        }
    }

    #[test]
    fn last_formula_is_recorded() {
        let mut s = QuillSession::new(Lifecycle::PerCall);
        let x = predsat_core::Column::new("t", "x", 1, predsat_core::ColumnType::Integer);
        let e = Expr::int_cmp(CmpOp::LessOrEqual, Some(x), None, 4).unwrap();
        s.is_satisfiable(&e).unwrap();
        assert_eq!(s.last_formula(), Some("(<= t.x 4)"));
    }
}
