//! Provides struct representing an optimization problem
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense};
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::variable::{Variable, VariableBuilder, VariableId, VariableType};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// An optimization problem
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem, in [`VariableId`] order
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem
    constraints: IndexMap<String, Constraint>,
    /// Current status of the optimization problem
    status: OptimizationStatus,
    /// Type of problem
    problem_type: ProblemType,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
            status: OptimizationStatus::Unoptimized,
            problem_type: ProblemType::LinearContinuous,
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Accessors
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn status(&self) -> OptimizationStatus {
        self.status
    }

    pub fn problem_type(&self) -> &ProblemType {
        &self.problem_type
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get a variable by its position
    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get_index(id.index()).map(|(_, var)| var)
    }

    /// Look up the position of a variable from its string id
    pub fn variable_id(&self, id: &str) -> Option<VariableId> {
        self.variables.get_index_of(id).map(VariableId)
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .values()
            .enumerate()
            .map(|(ind, var)| (VariableId(ind), var))
    }

    pub fn constraint(&self, id: &str) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }
    // endregion Accessors

    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }

    // region Adding Variables
    /// Add a variable to the optimization problem, returning its position
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ProblemError> {
        self.validate_variable(&variable)?;
        if variable.is_integer() && self.problem_type == ProblemType::LinearContinuous {
            self.problem_type = ProblemType::LinearMixedInteger;
        }
        let (index, _) = self.variables.insert_full(variable.id.clone(), variable);
        Ok(VariableId(index))
    }

    /// Create a new variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<VariableId, ProblemError> {
        let new_var = VariableBuilder::default()
            .id(id)
            .variable_type(variable_type)
            .lower_bound(lower_bound)
            .upper_bound(upper_bound)
            .build()
            .map_err(|err| ProblemError::UnableToBuildVariable(err.to_string()))?;
        self.add_variable(new_var)
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(&constraint)?;
        self.constraints
            .insert(constraint.get_id().to_string(), constraint);
        Ok(())
    }

    /// Create a new equality constraint and add it to the model
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        terms: &[(VariableId, f64)],
        equals: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(Constraint::new_equality(id, terms, equals))
    }

    /// Create a new inequality constraint and add it to the model
    pub fn add_new_inequality_constraint(
        &mut self,
        id: &str,
        terms: &[(VariableId, f64)],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(Constraint::new_inequality(
            id,
            terms,
            lower_bound,
            upper_bound,
        ))
    }
    // endregion Adding Constraints

    // region Adding Objective Terms
    /// Add a new linear term to the objective
    pub fn add_new_linear_objective_term(
        &mut self,
        variable: VariableId,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        if self.variable(variable).is_none() {
            return Err(ProblemError::NonExistentVariablesInObjective);
        }
        self.objective.add_linear_term(variable, coefficient);
        Ok(())
    }
    // endregion Adding Objective Terms

    // region Solving
    /// Replay the problem into a solver, and solve it
    ///
    /// Variables are handed over in [`VariableId`] order, so the values of the returned
    /// [`ProblemSolution`] can be indexed by the ids issued by this problem.
    pub fn solve_with(&mut self, solver: &mut dyn Solver) -> Result<ProblemSolution, ProblemError> {
        if self.problem_type == ProblemType::LinearMixedInteger
            && !solver.integer_variable_capable()
        {
            return Err(ProblemError::UnsupportedProblemType(solver.name()));
        }
        debug!(
            solver = solver.name(),
            variables = self.num_variables(),
            constraints = self.num_constraints(),
            "handing problem to solver"
        );
        for (id, var) in self.variables() {
            let solver_id = match var.variable_type {
                VariableType::Continuous => {
                    solver.add_continuous_variable(&var.id, var.lower_bound, var.upper_bound)?
                }
                VariableType::Integer => {
                    solver.add_integer_variable(&var.id, var.lower_bound, var.upper_bound)?
                }
            };
            if solver_id != id {
                return Err(ProblemError::SolverOutOfSync(var.id.clone()));
            }
        }
        for cons in self.constraints.values() {
            let terms = cons
                .get_terms()
                .iter()
                .map(|t| (t.variable, t.coefficient))
                .collect::<Vec<_>>();
            match cons {
                Constraint::Equality { id, equals, .. } => {
                    solver.add_equality_constraint(id, &terms, *equals)?
                }
                Constraint::Inequality {
                    id,
                    lower_bound,
                    upper_bound,
                    ..
                } => solver.add_inequality_constraint(id, &terms, *lower_bound, *upper_bound)?,
            }
        }
        for term in self.objective.terms() {
            solver.add_linear_objective_term(term.variable, term.coefficient)?;
        }
        solver.set_objective_sense(self.objective.sense())?;

        let solution = solver.solve()?;
        self.status = solution.status;
        Ok(solution)
    }
    // endregion Solving

    // region Validation Functions
    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: &Variable) -> Result<(), ProblemError> {
        if self.variables.contains_key(&variable.id) {
            return Err(ProblemError::VariableIdAlreadyExists(variable.id.clone()));
        }
        if variable.lower_bound.is_nan()
            || variable.upper_bound.is_nan()
            || variable.lower_bound > variable.upper_bound
        {
            return Err(ProblemError::InvalidVariableBounds(variable.id.clone()));
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(constraint.get_id()) {
            return Err(ProblemError::ConstraintAlreadyExists(
                constraint.get_id().to_string(),
            ));
        }
        match constraint {
            Constraint::Equality { equals, .. } => {
                if !equals.is_finite() {
                    return Err(ProblemError::InvalidConstraintBounds(
                        constraint.get_id().to_string(),
                    ));
                }
            }
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => {
                if lower_bound.is_nan() || upper_bound.is_nan() || lower_bound > upper_bound {
                    return Err(ProblemError::InvalidConstraintBounds(
                        constraint.get_id().to_string(),
                    ));
                }
            }
        }
        for term in constraint.get_terms() {
            if self.variable(term.variable).is_none() {
                return Err(ProblemError::NonExistentVariablesInConstraint(
                    constraint.get_id().to_string(),
                ));
            }
        }
        Ok(())
    }
    // endregion Validation Functions
}

/// Types of optimization problems
#[derive(Clone, Debug, PartialEq)]
pub enum ProblemType {
    /// Problem with linear objectives and constraints, and continuous variables
    LinearContinuous,
    /// Problem with linear objective and constraints, with integer and continuous variables
    LinearMixedInteger,
}

/// Errors associated with the Problem
#[derive(Error, Debug)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add variable {0} with the same id as an existing variable")]
    VariableIdAlreadyExists(String),
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add variable {0} with lower_bound>upper_bound")]
    InvalidVariableBounds(String),
    /// Error when the variable builder rejects its input
    #[error("Unable to build variable: {0}")]
    UnableToBuildVariable(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add constraint {0} with the same id as an existing constraint")]
    ConstraintAlreadyExists(String),
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add constraint {0} with invalid bounds")]
    InvalidConstraintBounds(String),
    /// Error when trying to add a constraint that contains variables not in the model
    #[error("Tried to add constraint {0} with variables not in the model")]
    NonExistentVariablesInConstraint(String),
    /// Error when trying to add an objective term which includes variables not in the model
    #[error("Tried adding an objective term with variables not in the model")]
    NonExistentVariablesInObjective,
    /// Error when the chosen solver can't handle the type of the problem
    #[error("Solver {0} does not support integer variables")]
    UnsupportedProblemType(&'static str),
    /// Error when the solver numbered a variable differently than the problem
    #[error("Solver assigned an unexpected index to variable {0}")]
    SolverOutOfSync(String),
    /// Error raised by the solver backend
    #[error(transparent)]
    Solver(#[from] SolverError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_problem() {
        let max_problem = Problem::new_maximization();
        assert_eq!(max_problem.objective.sense(), ObjectiveSense::Maximize);

        let min_problem = Problem::new_minimization();
        assert_eq!(min_problem.objective.sense(), ObjectiveSense::Minimize);
        assert_eq!(min_problem.status(), OptimizationStatus::Unoptimized);
    }

    #[test]
    fn update_objective_sense() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.update_objective_sense(ObjectiveSense::Minimize);
        assert_eq!(problem.objective.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn add_variables() {
        let mut problem = Problem::new_minimization();

        let x = problem
            .add_new_variable("x", VariableType::Continuous, 0., 100.)
            .unwrap();
        assert_eq!(x.index(), 0);
        assert_eq!(problem.problem_type, ProblemType::LinearContinuous);

        let y = problem
            .add_new_variable("y", VariableType::Integer, 0., f64::INFINITY)
            .unwrap();
        assert_eq!(y.index(), 1);
        assert_eq!(problem.variable_id("y"), Some(y));
        assert_eq!(problem.variable(y).unwrap().variable_type, VariableType::Integer);
        // An integer variable promotes the problem
        assert_eq!(problem.problem_type, ProblemType::LinearMixedInteger);
    }

    #[test]
    fn add_bad_variable() {
        let mut problem = Problem::new_minimization();

        let res = problem.add_new_variable("x", VariableType::Continuous, 100., 64.);
        if let Err(ProblemError::InvalidVariableBounds(id)) = res {
            assert_eq!(id, "x");
        } else {
            panic!("Invalid variable bounds not caught")
        }

        problem
            .add_new_variable("x", VariableType::Integer, 0., 1.)
            .unwrap();
        let res = problem.add_new_variable("x", VariableType::Integer, 0., 1.);
        assert!(matches!(res, Err(ProblemError::VariableIdAlreadyExists(_))));
    }

    #[test]
    fn add_constraint() {
        let mut problem = Problem::new_minimization();
        let x = problem
            .add_new_variable("x", VariableType::Integer, 0., f64::INFINITY)
            .unwrap();
        let z = problem
            .add_new_variable("z", VariableType::Integer, 0., f64::INFINITY)
            .unwrap();

        problem
            .add_new_inequality_constraint("capacity", &[(x, 1.), (z, -1.)], f64::NEG_INFINITY, 0.)
            .unwrap();
        match problem.constraint("capacity").unwrap() {
            Constraint::Inequality { upper_bound, .. } => assert_eq!(*upper_bound, 0.),
            Constraint::Equality { .. } => panic!("Incorrect constraint type added"),
        }

        problem
            .add_new_equality_constraint("off", &[(x, 1.)], 0.)
            .unwrap();
        assert_eq!(problem.num_constraints(), 2);

        let res = problem.add_new_equality_constraint("off", &[(x, 1.)], 0.);
        assert!(matches!(res, Err(ProblemError::ConstraintAlreadyExists(_))));
    }

    #[test]
    fn add_bad_constraint() {
        let mut problem = Problem::new_minimization();
        let x = problem
            .add_new_variable("x", VariableType::Continuous, 0., 10.)
            .unwrap();

        let res = problem.add_new_inequality_constraint("bad", &[(x, 1.)], 5., 1.);
        assert!(matches!(res, Err(ProblemError::InvalidConstraintBounds(_))));

        let res = problem.add_new_equality_constraint("dangling", &[(VariableId(7), 1.)], 0.);
        assert!(matches!(
            res,
            Err(ProblemError::NonExistentVariablesInConstraint(_))
        ));

        let res = problem.add_new_linear_objective_term(VariableId(7), 1.);
        assert!(matches!(
            res,
            Err(ProblemError::NonExistentVariablesInObjective)
        ));
    }
}
