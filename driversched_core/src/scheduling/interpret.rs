//! Turns a solver's assignment into a [`Schedule`]
//!
//! Solvers work on continuous relaxations even for integer programs, so values come back
//! as floats close to integers. Every value is rounded to the nearest integer, halves
//! away from zero, and the rounded assignment is checked against the model constraints.
//! Failed checks are collected as [`Violation`]s rather than aborting, so the rest of the
//! schedule can still be reported.
use std::fmt::{Display, Formatter};

use thiserror::Error;
use tracing::{info, warn};

use crate::demand::TimeSlot;
use crate::optimize::variable::VariableId;
use crate::optimize::{OptimizationStatus, ProblemSolution};
use crate::scheduling::model::StaffingModel;
use crate::scheduling::schedule::{Schedule, SlotAssignment};

/// Relative difference between the solver objective and the recomputed cost that is
/// reported as drift
const OBJECTIVE_DRIFT_TOLERANCE: f64 = 1e-6;

/// A schedule, with the checks it failed
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub schedule: Schedule,
    pub violations: Vec<Violation>,
}

/// A check the rounded assignment failed
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Drivers are scheduled in a slot without demand
    DriversWithoutDemand {
        slot: TimeSlot,
        permanent: u32,
        on_demand: u32,
    },
    /// Scheduled drivers can't deliver the slot's orders
    UncoveredDemand {
        slot: TimeSlot,
        demand: u32,
        capacity: f64,
    },
    /// More permanent drivers work in a slot than are hired
    CapacityExceeded {
        slot: TimeSlot,
        permanent: u32,
        hired: u32,
    },
    /// Permanent drivers work in a slot they are off
    UnavailablePermanentDriver { slot: TimeSlot, permanent: u32 },
    /// A solved value was further from an integer than the tolerance allows
    NonIntegral { variable: String, value: f64 },
}

impl Violation {
    /// Slot the violation concerns, None for violations not tied to a slot
    pub fn slot(&self) -> Option<TimeSlot> {
        match self {
            Violation::DriversWithoutDemand { slot, .. }
            | Violation::UncoveredDemand { slot, .. }
            | Violation::CapacityExceeded { slot, .. }
            | Violation::UnavailablePermanentDriver { slot, .. } => Some(*slot),
            Violation::NonIntegral { .. } => None,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::DriversWithoutDemand {
                slot,
                permanent,
                on_demand,
            } => write!(
                f,
                "no demand at {} but {} permanent and {} on-demand drivers scheduled",
                slot, permanent, on_demand
            ),
            Violation::UncoveredDemand {
                slot,
                demand,
                capacity,
            } => write!(
                f,
                "demand of {} at {} exceeds scheduled capacity of {}",
                demand, slot, capacity
            ),
            Violation::CapacityExceeded {
                slot,
                permanent,
                hired,
            } => write!(
                f,
                "{} permanent drivers scheduled at {} but only {} hired",
                permanent, slot, hired
            ),
            Violation::UnavailablePermanentDriver { slot, permanent } => write!(
                f,
                "{} permanent drivers scheduled at {} while permanent drivers are off",
                permanent, slot
            ),
            Violation::NonIntegral { variable, value } => {
                write!(f, "variable {} has non integral value {}", variable, value)
            }
        }
    }
}

/// Interpret a solution of a staffing model
///
/// # Parameters
/// - `model`: The solved model
/// - `solution`: Solution returned by the solver, must be optimal
/// - `tolerance`: Largest distance from an integer a value may have before it is reported
///   as a [`Violation::NonIntegral`]
pub fn interpret(
    model: &StaffingModel,
    solution: &ProblemSolution,
    tolerance: f64,
) -> Result<Interpretation, InterpretError> {
    if !solution.status.is_optimal() {
        return Err(InterpretError::NotOptimal(solution.status));
    }
    let mut violations = Vec::new();
    let mut resolve = |variable: VariableId| -> Result<u32, InterpretError> {
        let id = model
            .problem()
            .variable(variable)
            .map(|var| var.id.clone())
            .unwrap_or_else(|| variable.to_string());
        let value = solution
            .value(variable)
            .ok_or_else(|| InterpretError::MissingValue(id.clone()))?;
        let (count, integral) = round_count(value, tolerance)
            .ok_or_else(|| InterpretError::InvalidValue {
                variable: id.clone(),
                value,
            })?;
        if !integral {
            violations.push(Violation::NonIntegral {
                variable: id,
                value,
            });
        }
        Ok(count)
    };

    let hired = resolve(model.hired())?;
    let mut assignments = Vec::with_capacity(crate::demand::SLOT_COUNT);
    for slot in TimeSlot::all() {
        let vars = model.slot_variables(slot);
        assignments.push(SlotAssignment {
            slot,
            demand: model.demand().demand(slot),
            permanent: resolve(vars.permanent)?,
            on_demand: resolve(vars.on_demand)?,
        });
    }

    for assignment in &assignments {
        check_assignment(model, hired, assignment, &mut violations);
    }

    let schedule = Schedule::new(
        hired,
        assignments,
        *model.costs(),
        solution.objective_value,
    );
    if let Some(objective) = solution.objective_value {
        let total = schedule.total_cost();
        if (objective - total).abs() > OBJECTIVE_DRIFT_TOLERANCE * objective.abs().max(1.) {
            warn!(objective, total, "solver objective differs from the schedule cost");
        }
    }
    for violation in &violations {
        warn!(%violation, "schedule check failed");
    }
    info!(
        permanent_drivers = schedule.permanent_drivers(),
        on_demand_hours = schedule.total_on_demand_hours(),
        total_cost = schedule.total_cost(),
        violations = violations.len(),
        "interpreted solution"
    );
    Ok(Interpretation {
        schedule,
        violations,
    })
}

/// Round a solved value to a driver count
///
/// Returns the count, and whether the value was within `tolerance` of it. None for values
/// that can't be a count (non finite, negative after rounding, or too large).
fn round_count(value: f64, tolerance: f64) -> Option<(u32, bool)> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    if rounded < 0. || rounded > u32::MAX as f64 {
        return None;
    }
    Some((rounded as u32, (value - rounded).abs() <= tolerance))
}

/// Check one rounded slot against the model constraints
fn check_assignment(
    model: &StaffingModel,
    hired: u32,
    assignment: &SlotAssignment,
    violations: &mut Vec<Violation>,
) {
    let slot = assignment.slot;
    if assignment.demand == 0 && (assignment.permanent != 0 || assignment.on_demand != 0) {
        violations.push(Violation::DriversWithoutDemand {
            slot,
            permanent: assignment.permanent,
            on_demand: assignment.on_demand,
        });
    }
    let capacity = assignment.capacity(model.costs());
    if capacity < assignment.demand as f64 {
        violations.push(Violation::UncoveredDemand {
            slot,
            demand: assignment.demand,
            capacity,
        });
    }
    if assignment.permanent > hired {
        violations.push(Violation::CapacityExceeded {
            slot,
            permanent: assignment.permanent,
            hired,
        });
    }
    if assignment.permanent > 0 && !model.availability().is_available(slot) {
        violations.push(Violation::UnavailablePermanentDriver {
            slot,
            permanent: assignment.permanent,
        });
    }
}

/// Errors which prevent a schedule from being built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretError {
    #[error("An optimal solution could not be found (status: {0})")]
    NotOptimal(OptimizationStatus),
    #[error("Solution has no value for variable {0}")]
    MissingValue(String),
    #[error("Variable {variable} has value {value}, which is not a driver count")]
    InvalidValue { variable: String, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::CostParameters;
    use crate::demand::availability::AvailabilityMask;
    use crate::demand::{Day, DemandTable};

    fn slot(hour: u8, day: Day) -> TimeSlot {
        TimeSlot::new(hour, day).unwrap()
    }

    fn model(demand: &DemandTable) -> StaffingModel {
        StaffingModel::build(
            demand,
            &CostParameters::default(),
            &AvailabilityMask::default(),
        )
        .unwrap()
    }

    /// A hand made optimal solution, all zero except for the given values
    fn solution(model: &StaffingModel, values: &[(VariableId, f64)]) -> ProblemSolution {
        let mut all = vec![0.; model.problem().num_variables()];
        for (var, value) in values {
            all[var.index()] = *value;
        }
        let objective = model.problem().objective().evaluate(&all);
        ProblemSolution::optimal(objective, all)
    }

    #[test]
    fn rounding_rule() {
        assert_eq!(round_count(2.0000001, 1e-6), Some((2, true)));
        assert_eq!(round_count(1.9999999, 1e-6), Some((2, true)));
        assert_eq!(round_count(2.5, 1e-6), Some((3, false)));
        assert_eq!(round_count(-1e-9, 1e-6), Some((0, true)));
        assert_eq!(round_count(-0.7, 1e-6), None);
        assert_eq!(round_count(f64::NAN, 1e-6), None);
    }

    #[test]
    fn clean_solution() {
        let busy = slot(9, Day::Wednesday);
        let demand = DemandTable::zeros().with_demand(busy, 5);
        let model = model(&demand);
        let vars = model.slot_variables(busy);
        let sol = solution(
            &model,
            &[
                (model.hired(), 1.),
                (vars.permanent, 1.0000000001),
                (vars.on_demand, 2.),
            ],
        );
        let result = interpret(&model, &sol, 1e-6).unwrap();
        assert!(result.violations.is_empty(), "{:?}", result.violations);
        let schedule = result.schedule;
        assert_eq!(schedule.permanent_drivers(), 1);
        assert_eq!(schedule.assignment(busy).permanent, 1);
        assert_eq!(schedule.assignment(busy).on_demand, 2);
        assert_eq!(schedule.assignment(busy).demand, 5);
        assert_eq!(schedule.total_on_demand_hours(), 2);
        assert_eq!(schedule.permanent_cost(), 863.5 + 6.);
        assert_eq!(schedule.on_demand_cost(), 56.);
    }

    #[test]
    fn drivers_without_demand_are_reported_per_slot() {
        let model = model(&DemandTable::zeros());
        let first = model.slot_variables(slot(3, Day::Monday));
        let second = model.slot_variables(slot(22, Day::Sunday));
        let sol = solution(&model, &[(first.on_demand, 1.), (second.on_demand, 2.)]);
        let result = interpret(&model, &sol, 1e-6).unwrap();
        let without_demand = result
            .violations
            .iter()
            .filter(|v| matches!(v, Violation::DriversWithoutDemand { .. }))
            .collect::<Vec<_>>();
        assert_eq!(without_demand.len(), 2);
        assert_eq!(without_demand[0].slot(), Some(slot(3, Day::Monday)));
        assert_eq!(without_demand[1].slot(), Some(slot(22, Day::Sunday)));
        // The schedule is still produced
        assert_eq!(result.schedule.total_on_demand_hours(), 3);
    }

    #[test]
    fn constraint_checks() {
        let busy = slot(12, Day::Thursday);
        let demand = DemandTable::zeros().with_demand(busy, 7);
        let model = model(&demand);
        let vars = model.slot_variables(busy);
        // Noon on a working day is off for permanent drivers, none are hired, and the
        // capacity of 2 * 1 + 2 * 2.4 (rounded to 2) doesn't cover 7 orders
        let sol = solution(&model, &[(vars.permanent, 1.), (vars.on_demand, 2.4)]);
        let result = interpret(&model, &sol, 1e-6).unwrap();
        let v = &result.violations;
        assert!(v.contains(&Violation::NonIntegral {
            variable: "y_12_4".to_string(),
            value: 2.4
        }));
        assert!(v.contains(&Violation::UncoveredDemand {
            slot: busy,
            demand: 7,
            capacity: 6.
        }));
        assert!(v.contains(&Violation::CapacityExceeded {
            slot: busy,
            permanent: 1,
            hired: 0
        }));
        assert!(v.contains(&Violation::UnavailablePermanentDriver {
            slot: busy,
            permanent: 1
        }));
    }

    #[test]
    fn non_optimal_status_is_fatal() {
        let model = model(&DemandTable::zeros());
        for status in [
            OptimizationStatus::Infeasible,
            OptimizationStatus::Unbounded,
            OptimizationStatus::SolverHalted,
            OptimizationStatus::NotSolved,
        ] {
            let sol = ProblemSolution::without_values(status);
            assert_eq!(
                interpret(&model, &sol, 1e-6),
                Err(InterpretError::NotOptimal(status))
            );
        }
    }

    #[test]
    fn invalid_values_are_fatal() {
        let model = model(&DemandTable::zeros());
        let sol = solution(&model, &[(model.hired(), -3.)]);
        assert!(matches!(
            interpret(&model, &sol, 1e-6),
            Err(InterpretError::InvalidValue { .. })
        ));

        let truncated = ProblemSolution::optimal(0., vec![0.; 3]);
        assert!(matches!(
            interpret(&model, &truncated, 1e-6),
            Err(InterpretError::MissingValue(_))
        ));
    }
}
