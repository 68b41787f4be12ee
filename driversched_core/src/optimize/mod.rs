//! Module for constructing and solving optimization problems

pub mod constraint;
pub mod objective;
pub mod problem;
pub mod solvers;
pub mod variable;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::optimize::variable::VariableId;

/// Struct representing the solution to an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSolution {
    /// The status of the optimization problem, representing if the optimization was
    /// completed successfully
    pub status: OptimizationStatus,
    /// Optimized value of the objective
    ///
    /// Some(f64) if the optimization was completed successfully, None otherwise
    pub objective_value: Option<f64>,
    /// Values of the variables at the optimum,
    ///
    /// Some(Vec), indexed by [`VariableId`], if the problem could be solved, None otherwise
    pub variable_values: Option<Vec<f64>>,
}

impl ProblemSolution {
    /// Create a solution for a problem solved to optimality
    pub fn optimal(objective_value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: OptimizationStatus::Optimal,
            objective_value: Some(objective_value),
            variable_values: Some(variable_values),
        }
    }

    /// Create a solution carrying only a non optimal status
    pub fn without_values(status: OptimizationStatus) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: None,
        }
    }

    /// Value of a variable at the optimum, None if no values are available
    pub fn value(&self, variable: VariableId) -> Option<f64> {
        self.variable_values
            .as_ref()
            .and_then(|values| values.get(variable.index()).copied())
    }
}

/// Status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationStatus {
    /// Problem has not yet attempted to be optimized
    Unoptimized,
    /// Problem has been optimized
    Optimal,
    /// Problem can't be optimized because objective value is not bounded
    Unbounded,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
    /// The solver hit the maximum allowed time before proving optimality
    SolverHalted,
    /// The solver failed for any other reason
    NotSolved,
}

impl OptimizationStatus {
    /// Whether variable values for this status can be used
    pub fn is_optimal(&self) -> bool {
        matches!(self, OptimizationStatus::Optimal)
    }
}

impl Display for OptimizationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizationStatus::Unoptimized => write!(f, "Unoptimized"),
            OptimizationStatus::Optimal => write!(f, "Optimal"),
            OptimizationStatus::Unbounded => write!(f, "Unbounded"),
            OptimizationStatus::Infeasible => write!(f, "Infeasible"),
            OptimizationStatus::SolverHalted => write!(f, "Solver Halted"),
            OptimizationStatus::NotSolved => write!(f, "Not Solved"),
        }
    }
}
