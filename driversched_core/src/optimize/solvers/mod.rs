//! Solver interfaces
//!
//! Every backend implements [`Solver`]. The backends used here need the objective
//! coefficient of a column when the column is created, so they stage the problem in a
//! [`StagedProblem`] and only translate it when [`Solver::solve`] is called.
use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::optimize::objective::ObjectiveSense;
use crate::optimize::variable::{VariableId, VariableType};
use crate::optimize::ProblemSolution;

#[cfg(feature = "highs")]
pub mod highs;
#[cfg(feature = "microlp")]
pub mod microlp;

/// Capability interface of a linear (mixed integer) programming backend
pub trait Solver {
    /// Name of the backend, used in logs and errors
    fn name(&self) -> &'static str;

    /// Whether the backend honours integer variables
    fn integer_variable_capable(&self) -> bool;

    /// Add a continuous variable, returning its position
    fn add_continuous_variable(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<VariableId, SolverError>;

    /// Add an integer variable, returning its position
    fn add_integer_variable(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<VariableId, SolverError>;

    fn add_equality_constraint(
        &mut self,
        id: &str,
        terms: &[(VariableId, f64)],
        equals: f64,
    ) -> Result<(), SolverError>;

    fn add_inequality_constraint(
        &mut self,
        id: &str,
        terms: &[(VariableId, f64)],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), SolverError>;

    fn add_linear_objective_term(
        &mut self,
        variable: VariableId,
        coefficient: f64,
    ) -> Result<(), SolverError>;

    fn set_objective_sense(&mut self, objective_sense: ObjectiveSense) -> Result<(), SolverError>;

    /// Solve the staged problem
    ///
    /// A non optimal outcome (infeasible, unbounded, halted) is reported through the status
    /// of the returned solution, an `Err` means the backend itself could not be driven.
    fn solve(&mut self) -> Result<ProblemSolution, SolverError>;
}

/// Available solver backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Pure Rust simplex with branch and bound, requires the microlp feature. Only suited
    /// to small instances, it has no time limit and doesn't finish a full week
    Microlp,
    /// HiGHS branch and cut, requires the highs feature (default)
    Highs,
}

impl Display for SolverKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverKind::Microlp => write!(f, "microlp"),
            SolverKind::Highs => write!(f, "highs"),
        }
    }
}

impl Default for SolverKind {
    fn default() -> Self {
        DEFAULT_SOLVER
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "highs")] {
        const DEFAULT_SOLVER: SolverKind = SolverKind::Highs;

        fn highs_solver(time_limit: Option<Duration>) -> Result<Box<dyn Solver>, SolverError> {
            Ok(Box::new(highs::HighsSolver::new(time_limit)))
        }
    } else {
        const DEFAULT_SOLVER: SolverKind = SolverKind::Microlp;

        fn highs_solver(_time_limit: Option<Duration>) -> Result<Box<dyn Solver>, SolverError> {
            Err(SolverError::BackendUnavailable(SolverKind::Highs))
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "microlp")] {
        fn microlp_solver(time_limit: Option<Duration>) -> Result<Box<dyn Solver>, SolverError> {
            if let Some(time_limit) = time_limit {
                warn!(?time_limit, "microlp has no time limit, the solve runs to completion");
            }
            Ok(Box::new(microlp::MicrolpSolver::new()))
        }
    } else {
        fn microlp_solver(_time_limit: Option<Duration>) -> Result<Box<dyn Solver>, SolverError> {
            Err(SolverError::BackendUnavailable(SolverKind::Microlp))
        }
    }
}

/// Create a new solver of the requested kind
///
/// # Parameters
/// - `kind`: Backend to use
/// - `time_limit`: Maximum wall time for a solve, None for no limit. Only HiGHS honours
///   it, microlp always runs to completion
pub fn new_solver(
    kind: SolverKind,
    time_limit: Option<Duration>,
) -> Result<Box<dyn Solver>, SolverError> {
    match kind {
        SolverKind::Microlp => microlp_solver(time_limit),
        SolverKind::Highs => highs_solver(time_limit),
    }
}

/// Errors raised while driving a solver backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Solver backend {0} was not compiled in, enable its cargo feature")]
    BackendUnavailable(SolverKind),
    #[error("Variable {id} has bounds [{lower_bound}, {upper_bound}] the backend can't represent")]
    UnsupportedBounds {
        id: String,
        lower_bound: f64,
        upper_bound: f64,
    },
    #[error("Constraint {0} references a variable the solver doesn't know")]
    UnknownVariable(String),
}

// region Staged Problem
/// A problem staged for translation into a backend
#[derive(Debug, Clone, Default)]
pub(crate) struct StagedProblem {
    pub(crate) variables: Vec<StagedVariable>,
    pub(crate) constraints: Vec<StagedConstraint>,
    pub(crate) sense: Option<ObjectiveSense>,
}

#[derive(Debug, Clone)]
pub(crate) struct StagedVariable {
    pub(crate) id: String,
    pub(crate) variable_type: VariableType,
    pub(crate) lower_bound: f64,
    pub(crate) upper_bound: f64,
    pub(crate) objective_coefficient: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct StagedConstraint {
    pub(crate) id: String,
    pub(crate) terms: Vec<(VariableId, f64)>,
    pub(crate) lower_bound: f64,
    pub(crate) upper_bound: f64,
}

impl StagedProblem {
    pub(crate) fn add_variable(
        &mut self,
        id: &str,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<VariableId, SolverError> {
        if lower_bound.is_nan() || upper_bound.is_nan() || lower_bound > upper_bound {
            return Err(SolverError::UnsupportedBounds {
                id: id.to_string(),
                lower_bound,
                upper_bound,
            });
        }
        self.variables.push(StagedVariable {
            id: id.to_string(),
            variable_type,
            lower_bound,
            upper_bound,
            objective_coefficient: 0.,
        });
        Ok(VariableId(self.variables.len() - 1))
    }

    pub(crate) fn add_constraint(
        &mut self,
        id: &str,
        terms: &[(VariableId, f64)],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), SolverError> {
        if terms.iter().any(|(var, _)| var.index() >= self.variables.len()) {
            return Err(SolverError::UnknownVariable(id.to_string()));
        }
        self.constraints.push(StagedConstraint {
            id: id.to_string(),
            terms: terms.to_vec(),
            lower_bound,
            upper_bound,
        });
        Ok(())
    }

    pub(crate) fn add_objective_term(
        &mut self,
        variable: VariableId,
        coefficient: f64,
    ) -> Result<(), SolverError> {
        match self.variables.get_mut(variable.index()) {
            Some(var) => {
                var.objective_coefficient += coefficient;
                Ok(())
            }
            None => Err(SolverError::UnknownVariable(format!("objective term {}", variable))),
        }
    }

    pub(crate) fn sense(&self) -> ObjectiveSense {
        self.sense.unwrap_or(ObjectiveSense::Minimize)
    }

    /// Objective value of an assignment, including for backends that don't report it
    pub(crate) fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(var, value)| var.objective_coefficient * value)
            .sum()
    }
}
// endregion Staged Problem

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_objective_accumulates() {
        let mut staged = StagedProblem::default();
        let z = staged
            .add_variable("z", VariableType::Integer, 0., f64::INFINITY)
            .unwrap();
        staged.add_objective_term(z, 3.).unwrap();
        staged.add_objective_term(z, 2.).unwrap();
        assert_eq!(staged.objective_value(&[2.]), 10.);
        assert_eq!(staged.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn staged_rejects_unknown_variables() {
        let mut staged = StagedProblem::default();
        let res = staged.add_constraint("c", &[(VariableId(3), 1.)], 0., 1.);
        assert_eq!(res, Err(SolverError::UnknownVariable("c".to_string())));
        let res = staged.add_variable("x", VariableType::Integer, 2., 1.);
        assert!(matches!(res, Err(SolverError::UnsupportedBounds { .. })));
    }

    #[test]
    #[cfg(feature = "highs")]
    fn highs_is_the_default_backend() {
        assert_eq!(SolverKind::default(), SolverKind::Highs);
        let solver = new_solver(SolverKind::default(), Some(Duration::from_secs(60))).unwrap();
        assert_eq!(solver.name(), "highs");
    }

    #[test]
    #[cfg(feature = "microlp")]
    fn microlp_ignores_time_limit() {
        // A tiny limit doesn't turn into a halted solve, microlp runs to completion
        let mut problem = crate::optimize::problem::Problem::new_minimization();
        let a = problem
            .add_new_variable("a", VariableType::Integer, 0., 10.)
            .unwrap();
        problem
            .add_new_inequality_constraint("at_least", &[(a, 2.)], 3., f64::INFINITY)
            .unwrap();
        problem.add_new_linear_objective_term(a, 1.).unwrap();
        let mut solver = new_solver(SolverKind::Microlp, Some(Duration::from_nanos(1))).unwrap();
        assert_eq!(solver.name(), "microlp");
        let solution = problem.solve_with(&mut *solver).unwrap();
        assert_eq!(solution.status, crate::optimize::OptimizationStatus::Optimal);
        assert!((solution.value(a).unwrap() - 2.).abs() < 1e-6);
    }

    #[test]
    #[cfg(not(feature = "microlp"))]
    fn unavailable_backend() {
        assert!(matches!(
            new_solver(SolverKind::Microlp, None),
            Err(SolverError::BackendUnavailable(SolverKind::Microlp))
        ));
    }

    #[test]
    fn solver_kind_serde() {
        let kind: SolverKind = serde_json::from_str("\"highs\"").unwrap();
        assert_eq!(kind, SolverKind::Highs);
        assert_eq!(SolverKind::Microlp.to_string(), "microlp");
    }
}
