//! Planning pipeline: build the staffing model for a week of demand, solve it, and read the
//! schedule back
use thiserror::Error;
use tracing::{info, info_span};

use crate::configuration::{Configuration, ParameterError};
use crate::demand::availability::{AvailabilityError, AvailabilityMask};
use crate::demand::DemandTable;
use crate::optimize::problem::ProblemError;
use crate::optimize::solvers::{new_solver, SolverError};
use crate::optimize::OptimizationStatus;
use crate::scheduling::{interpret, InterpretError, ModelError, Schedule, StaffingModel, Violation};

/// Result of a successful planning run
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub schedule: Schedule,
    /// Checks the schedule failed, empty for a clean schedule
    pub violations: Vec<Violation>,
}

/// Plan the staffing of a week
///
/// # Parameters
/// - `demand`: Orders expected in every slot of the week
/// - `configuration`: Costs, permanent driver availability, and solver settings
///
/// # Examples
/// ```rust
/// use driversched_core::configuration::Configuration;
/// use driversched_core::demand::DemandTable;
/// use driversched_core::planner::plan_week;
/// let outcome = plan_week(&DemandTable::zeros(), &Configuration::default()).unwrap();
/// assert_eq!(outcome.schedule.permanent_drivers(), 0);
/// assert_eq!(outcome.schedule.total_cost(), 0.);
/// ```
pub fn plan_week(
    demand: &DemandTable,
    configuration: &Configuration,
) -> Result<PlanOutcome, PlanError> {
    let settings = &configuration.solver;
    let span = info_span!("plan_week", solver = %settings.backend);
    let _guard = span.enter();

    let availability = AvailabilityMask::from_settings(&configuration.availability)?;
    info!(
        total_demand = demand.total(),
        available_slots = availability.available_slots(),
        "building staffing model"
    );
    let mut model = StaffingModel::build(demand, &configuration.costs, &availability)?;

    let mut solver = new_solver(settings.backend, settings.time_limit())?;
    let solution = model.solve(&mut *solver)?;
    info!(status = %solution.status, objective = ?solution.objective_value, "solve finished");
    if !solution.status.is_optimal() {
        return Err(PlanError::NotOptimal(solution.status));
    }

    let interpretation = interpret(&model, &solution, settings.integrality_tolerance)?;
    Ok(PlanOutcome {
        schedule: interpretation.schedule,
        violations: interpretation.violations,
    })
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid availability settings: {0}")]
    InvalidAvailability(#[from] AvailabilityError),
    #[error("Invalid model parameters: {0}")]
    InvalidParameters(#[from] ParameterError),
    #[error("Unable to build or solve the model: {0}")]
    Problem(#[from] ProblemError),
    #[error("Unable to create solver: {0}")]
    Solver(#[from] SolverError),
    #[error("An optimal solution could not be found (status: {0})")]
    NotOptimal(OptimizationStatus),
    #[error("Unable to interpret solution: {0}")]
    Interpret(#[from] InterpretError),
}

impl From<ModelError> for PlanError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidParameters(err) => PlanError::InvalidParameters(err),
            ModelError::Problem(err) => PlanError::Problem(err),
        }
    }
}

impl PlanError {
    /// Status of the solve, for runs which failed because no optimal solution was found
    pub fn status(&self) -> Option<OptimizationStatus> {
        match self {
            PlanError::NotOptimal(status)
            | PlanError::Interpret(InterpretError::NotOptimal(status)) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::CostParameters;
    use crate::demand::availability::AvailabilitySettings;
    use crate::optimize::solvers::SolverKind;

    #[test]
    fn rejects_invalid_parameters_before_solving() {
        let configuration = Configuration {
            costs: CostParameters {
                fixed_weekly_cost: -1.,
                ..CostParameters::default()
            },
            ..Configuration::default()
        };
        let res = plan_week(&DemandTable::zeros(), &configuration);
        assert!(matches!(res, Err(PlanError::InvalidParameters(_))));
    }

    #[test]
    fn rejects_invalid_availability() {
        let configuration = Configuration {
            availability: AvailabilitySettings {
                rest_days: vec![9],
                ..AvailabilitySettings::default()
            },
            ..Configuration::default()
        };
        let res = plan_week(&DemandTable::zeros(), &configuration);
        assert!(matches!(
            res,
            Err(PlanError::InvalidAvailability(AvailabilityError::InvalidDay(9)))
        ));
    }

    #[test]
    fn not_optimal_status() {
        let err = PlanError::NotOptimal(OptimizationStatus::SolverHalted);
        assert_eq!(err.status(), Some(OptimizationStatus::SolverHalted));
        let err = PlanError::Solver(SolverError::BackendUnavailable(SolverKind::Microlp));
        assert_eq!(err.status(), None);
    }
}
