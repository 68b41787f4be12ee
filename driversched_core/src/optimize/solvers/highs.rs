//! Solver interface for HiGHS
//!
//! HiGHS enforces the time limit itself, a solve stopped by it is reported as
//! [`OptimizationStatus::SolverHalted`].
use std::time::Duration;

use ::highs::{HighsModelStatus, RowProblem, Sense};
use tracing::{debug, warn};

use crate::optimize::objective::ObjectiveSense;
use crate::optimize::solvers::{Solver, SolverError, StagedProblem};
use crate::optimize::variable::{VariableId, VariableType};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// HiGHS dual simplex / branch and cut solver
#[derive(Clone, Debug, Default)]
pub struct HighsSolver {
    staged: StagedProblem,
    time_limit: Option<Duration>,
}

impl HighsSolver {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            staged: StagedProblem::default(),
            time_limit,
        }
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn integer_variable_capable(&self) -> bool {
        true
    }

    fn add_continuous_variable(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<VariableId, SolverError> {
        self.staged
            .add_variable(id, VariableType::Continuous, lower_bound, upper_bound)
    }

    fn add_integer_variable(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<VariableId, SolverError> {
        self.staged
            .add_variable(id, VariableType::Integer, lower_bound, upper_bound)
    }

    fn add_equality_constraint(
        &mut self,
        id: &str,
        terms: &[(VariableId, f64)],
        equals: f64,
    ) -> Result<(), SolverError> {
        self.staged.add_constraint(id, terms, equals, equals)
    }

    fn add_inequality_constraint(
        &mut self,
        id: &str,
        terms: &[(VariableId, f64)],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), SolverError> {
        self.staged.add_constraint(id, terms, lower_bound, upper_bound)
    }

    fn add_linear_objective_term(
        &mut self,
        variable: VariableId,
        coefficient: f64,
    ) -> Result<(), SolverError> {
        self.staged.add_objective_term(variable, coefficient)
    }

    fn set_objective_sense(&mut self, objective_sense: ObjectiveSense) -> Result<(), SolverError> {
        self.staged.sense = Some(objective_sense);
        Ok(())
    }

    fn solve(&mut self) -> Result<ProblemSolution, SolverError> {
        let mut problem = RowProblem::default();
        let columns = self
            .staged
            .variables
            .iter()
            .map(|var| match var.variable_type {
                VariableType::Continuous => problem.add_column(
                    var.objective_coefficient,
                    var.lower_bound..=var.upper_bound,
                ),
                VariableType::Integer => problem.add_integer_column(
                    var.objective_coefficient,
                    var.lower_bound..=var.upper_bound,
                ),
            })
            .collect::<Vec<_>>();
        for cons in &self.staged.constraints {
            let factors = cons
                .terms
                .iter()
                .map(|(var, coef)| (columns[var.index()], *coef))
                .collect::<Vec<_>>();
            problem.add_row(cons.lower_bound..=cons.upper_bound, &factors);
        }

        let sense = match self.staged.sense() {
            ObjectiveSense::Minimize => Sense::Minimise,
            ObjectiveSense::Maximize => Sense::Maximise,
        };
        let mut model = problem.optimise(sense);
        model.set_option("output_flag", false);
        if let Some(limit) = self.time_limit {
            model.set_option("time_limit", limit.as_secs_f64());
        }
        debug!(
            variables = columns.len(),
            constraints = self.staged.constraints.len(),
            "solving with highs"
        );
        let solved = model.solve();
        let status = status_from_highs(solved.status());
        if status != OptimizationStatus::Optimal {
            return Ok(ProblemSolution::without_values(status));
        }
        let values = solved.get_solution().columns().to_vec();
        let objective_value = self.staged.objective_value(&values);
        Ok(ProblemSolution::optimal(objective_value, values))
    }
}

/// Map a HiGHS model status onto [`OptimizationStatus`]
fn status_from_highs(status: HighsModelStatus) -> OptimizationStatus {
    match status {
        HighsModelStatus::Optimal => OptimizationStatus::Optimal,
        HighsModelStatus::Infeasible => OptimizationStatus::Infeasible,
        HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
            OptimizationStatus::Unbounded
        }
        HighsModelStatus::ReachedTimeLimit => OptimizationStatus::SolverHalted,
        other => {
            warn!(status = ?other, "highs did not reach optimality");
            OptimizationStatus::NotSolved
        }
    }
}
