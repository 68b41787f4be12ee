//! Solver interface for the microlp solver
//!
//! microlp has no time limit and can't be interrupted, every solve runs to completion. Its
//! branch and bound is fine for small instances but doesn't finish a full week of demand in
//! reasonable time, use the HiGHS backend for those.
use ::microlp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};
use tracing::{debug, warn};

use crate::optimize::objective::ObjectiveSense;
use crate::optimize::solvers::{Solver, SolverError, StagedProblem};
use crate::optimize::variable::{VariableId, VariableType};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Pure Rust simplex solver, integer variables are handled by branch and bound
#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {
    staged: StagedProblem,
}

impl MicrolpSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Solver for MicrolpSolver {
    fn name(&self) -> &'static str {
        "microlp"
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
        // Integer columns take i32 bounds, an infinite lower bound has no representation
        if !lower_bound.is_finite() || lower_bound < i32::MIN as f64 {
            return Err(SolverError::UnsupportedBounds {
                id: id.to_string(),
                lower_bound,
                upper_bound,
            });
        }
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
        Ok(solve_staged(&self.staged))
    }
}

/// Translate a staged problem into microlp and solve it
fn solve_staged(staged: &StagedProblem) -> ProblemSolution {
    let direction = match staged.sense() {
        ObjectiveSense::Minimize => OptimizationDirection::Minimize,
        ObjectiveSense::Maximize => OptimizationDirection::Maximize,
    };
    let mut problem = Problem::new(direction);

    let columns = staged
        .variables
        .iter()
        .map(|var| match var.variable_type {
            VariableType::Continuous => problem.add_var(
                var.objective_coefficient,
                (var.lower_bound, var.upper_bound),
            ),
            VariableType::Integer => problem.add_integer_var(
                var.objective_coefficient,
                (
                    integer_bound(var.lower_bound.ceil()),
                    integer_bound(var.upper_bound.floor()),
                ),
            ),
        })
        .collect::<Vec<_>>();

    for cons in &staged.constraints {
        let expression = || {
            let mut expr = LinearExpr::empty();
            for (var, coef) in &cons.terms {
                expr.add(columns[var.index()], *coef);
            }
            expr
        };
        if cons.lower_bound == cons.upper_bound {
            problem.add_constraint(expression(), ComparisonOp::Eq, cons.lower_bound);
            continue;
        }
        if cons.lower_bound.is_finite() {
            problem.add_constraint(expression(), ComparisonOp::Ge, cons.lower_bound);
        }
        if cons.upper_bound.is_finite() {
            problem.add_constraint(expression(), ComparisonOp::Le, cons.upper_bound);
        }
    }

    debug!(
        variables = columns.len(),
        constraints = staged.constraints.len(),
        "solving with microlp"
    );
    match problem.solve() {
        Ok(solution) => {
            let values = columns.iter().map(|col| solution[*col]).collect::<Vec<_>>();
            ProblemSolution::optimal(solution.objective(), values)
        }
        Err(::microlp::Error::Infeasible) => {
            ProblemSolution::without_values(OptimizationStatus::Infeasible)
        }
        Err(::microlp::Error::Unbounded) => {
            ProblemSolution::without_values(OptimizationStatus::Unbounded)
        }
        #[allow(unreachable_patterns)]
        Err(err) => {
            warn!(error = %err, "microlp failed to solve the problem");
            ProblemSolution::without_values(OptimizationStatus::NotSolved)
        }
    }
}

/// Clamp an already integral bound into the i32 range microlp uses for integer columns
fn integer_bound(bound: f64) -> i32 {
    if bound >= i32::MAX as f64 {
        i32::MAX
    } else if bound <= i32::MIN as f64 {
        i32::MIN
    } else {
        bound as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::problem::Problem as LinearProblem;

    #[test]
    fn small_integer_program() {
        // minimize 3a + 2b, subject to 2a + 2b >= 3, a <= 1
        let mut problem = LinearProblem::new_minimization();
        let a = problem
            .add_new_variable("a", VariableType::Integer, 0., 1.)
            .unwrap();
        let b = problem
            .add_new_variable("b", VariableType::Integer, 0., f64::INFINITY)
            .unwrap();
        problem
            .add_new_inequality_constraint("cover", &[(a, 2.), (b, 2.)], 3., f64::INFINITY)
            .unwrap();
        problem.add_new_linear_objective_term(a, 3.).unwrap();
        problem.add_new_linear_objective_term(b, 2.).unwrap();

        let mut solver = MicrolpSolver::new();
        let solution = problem.solve_with(&mut solver).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        // Two units of b (cost 4) beats a + b (cost 5)
        assert!((solution.objective_value.unwrap() - 4.).abs() < 1e-6);
        assert!((solution.value(a).unwrap()).abs() < 1e-6);
        assert!((solution.value(b).unwrap() - 2.).abs() < 1e-6);
        assert_eq!(problem.status(), OptimizationStatus::Optimal);
    }

    #[test]
    fn infeasible_program() {
        let mut problem = LinearProblem::new_minimization();
        let a = problem
            .add_new_variable("a", VariableType::Integer, 0., 10.)
            .unwrap();
        problem
            .add_new_inequality_constraint("at_least", &[(a, 1.)], 5., f64::INFINITY)
            .unwrap();
        problem
            .add_new_equality_constraint("off", &[(a, 1.)], 0.)
            .unwrap();
        problem.add_new_linear_objective_term(a, 1.).unwrap();

        let mut solver = MicrolpSolver::new();
        let solution = problem.solve_with(&mut solver).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
        assert!(solution.variable_values.is_none());
    }

    #[test]
    fn integer_bounds_are_clamped() {
        assert_eq!(integer_bound(f64::INFINITY), i32::MAX);
        assert_eq!(integer_bound(-1e12), i32::MIN);
        assert_eq!(integer_bound(12.), 12);
    }
}
