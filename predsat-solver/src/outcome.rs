//! Check outcomes and the error taxonomy.

use thiserror::Error;

/// Definite verdict of a satisfiability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfiability {
    /// Some assignment satisfies the expression.
    Satisfiable,
    /// No assignment does.
    Unsatisfiable,
}

impl Satisfiability {
    /// `true` exactly for [`Satisfiability::Satisfiable`].
    #[must_use]
    pub fn is_satisfiable(self) -> bool {
        matches!(self, Satisfiability::Satisfiable)
    }
}

/// Why a check failed to produce a verdict.
///
/// Failures always surface; none of them is ever coerced into
/// [`Satisfiability::Unsatisfiable`].
#[derive(Debug, Error)]
pub enum CheckError {
    /// Context allocation or lifecycle misuse. Fatal, not retried.
    #[error("solver resource failure: {reason}")]
    Resource {
        /// What went wrong.
        reason: String,
    },
    /// The expression could not be mapped to a backend term.
    #[error("could not translate expression")]
    Translation {
        /// The backend construction error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The backend rejected a term that was already built.
    #[error("backend rejected the asserted term")]
    Assertion {
        /// The backend assertion error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The decision procedure returned neither SAT nor UNSAT.
    #[error("decision procedure returned no verdict")]
    Indeterminate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_projection() {
        assert!(Satisfiability::Satisfiable.is_satisfiable());
        assert!(!Satisfiability::Unsatisfiable.is_satisfiable());
    }

    #[test]
    fn errors_carry_their_source() {
        use std::error::Error as _;
        let inner: Box<dyn std::error::Error + Send + Sync> =
            "width mismatch".to_string().into();
        let err = CheckError::Translation { source: inner };
        assert!(err.source().is_some());
    }
}
