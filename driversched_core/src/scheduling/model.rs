//! The staffing model: an integer program choosing how many permanent drivers to hire,
//! and how many drivers of each class work in every hour of the week
//!
//! Variables (all non-negative integers):
//! - `z`: permanent drivers hired for the week
//! - `x_{hour}_{day}`: permanent drivers working in the slot
//! - `y_{hour}_{day}`: on-demand drivers working in the slot
//!
//! Objective, minimized: `z*r1 + sum(x*r2 + y*r3)`
//!
//! Constraints, for every slot:
//! - capacity: `x - z <= 0`
//! - coverage: `x*o1 + y*o2 >= demand`
//! - availability: `x = 0` when permanent drivers are off
use thiserror::Error;
use tracing::debug;

use crate::configuration::{CostParameters, ParameterError};
use crate::demand::availability::AvailabilityMask;
use crate::demand::{DemandTable, TimeSlot, SLOT_COUNT};
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::solvers::Solver;
use crate::optimize::variable::{VariableId, VariableType};
use crate::optimize::ProblemSolution;

/// Variables of a single time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotVariables {
    /// Permanent drivers working in the slot (x)
    pub permanent: VariableId,
    /// On-demand drivers working in the slot (y)
    pub on_demand: VariableId,
}

/// The staffing integer program, with typed handles to its variables
#[derive(Debug, Clone)]
pub struct StaffingModel {
    problem: Problem,
    /// Permanent drivers hired (z)
    hired: VariableId,
    /// Variables of every slot, indexed by [`TimeSlot::index`]
    slots: [SlotVariables; SLOT_COUNT],
    demand: DemandTable,
    costs: CostParameters,
    availability: AvailabilityMask,
}

impl StaffingModel {
    /// Build the staffing model
    ///
    /// # Parameters
    /// - `demand`: Orders expected in every slot
    /// - `costs`: Cost and capacity parameters, rejected if invalid
    /// - `availability`: Slots permanent drivers may work in
    pub fn build(
        demand: &DemandTable,
        costs: &CostParameters,
        availability: &AvailabilityMask,
    ) -> Result<StaffingModel, ModelError> {
        costs.validate()?;

        let mut problem = Problem::new_minimization();
        let hired = problem.add_new_variable("z", VariableType::Integer, 0., f64::INFINITY)?;
        problem.add_new_linear_objective_term(hired, costs.fixed_weekly_cost)?;

        let placeholder = SlotVariables {
            permanent: hired,
            on_demand: hired,
        };
        let mut slots = [placeholder; SLOT_COUNT];
        for slot in TimeSlot::all() {
            let suffix = format!("{}_{}", slot.hour(), slot.day().number());
            let permanent = problem.add_new_variable(
                &format!("x_{}", suffix),
                VariableType::Integer,
                0.,
                f64::INFINITY,
            )?;
            let on_demand = problem.add_new_variable(
                &format!("y_{}", suffix),
                VariableType::Integer,
                0.,
                f64::INFINITY,
            )?;
            problem.add_new_linear_objective_term(permanent, costs.permanent_hourly_cost)?;
            problem.add_new_linear_objective_term(on_demand, costs.on_demand_hourly_cost)?;

            problem.add_new_inequality_constraint(
                &format!("capacity_{}", suffix),
                &[(permanent, 1.), (hired, -1.)],
                f64::NEG_INFINITY,
                0.,
            )?;
            problem.add_new_inequality_constraint(
                &format!("coverage_{}", suffix),
                &[
                    (permanent, costs.permanent_deliveries_per_hour),
                    (on_demand, costs.on_demand_deliveries_per_hour),
                ],
                demand.demand(slot) as f64,
                f64::INFINITY,
            )?;
            if !availability.is_available(slot) {
                problem.add_new_equality_constraint(
                    &format!("availability_{}", suffix),
                    &[(permanent, 1.)],
                    0.,
                )?;
            }
            slots[slot.index()] = SlotVariables {
                permanent,
                on_demand,
            };
        }
        debug!(
            variables = problem.num_variables(),
            constraints = problem.num_constraints(),
            "built staffing model"
        );

        Ok(StaffingModel {
            problem,
            hired,
            slots,
            demand: demand.clone(),
            costs: *costs,
            availability: availability.clone(),
        })
    }

    /// Solve the model with the given solver
    pub fn solve(&mut self, solver: &mut dyn Solver) -> Result<ProblemSolution, ProblemError> {
        self.problem.solve_with(solver)
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Variable holding the number of permanent drivers hired
    pub fn hired(&self) -> VariableId {
        self.hired
    }

    /// Variables of a slot
    pub fn slot_variables(&self, slot: TimeSlot) -> SlotVariables {
        self.slots[slot.index()]
    }

    pub fn demand(&self) -> &DemandTable {
        &self.demand
    }

    pub fn costs(&self) -> &CostParameters {
        &self.costs
    }

    pub fn availability(&self) -> &AvailabilityMask {
        &self.availability
    }
}

/// Errors raised while building the staffing model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid model parameters: {0}")]
    InvalidParameters(#[from] ParameterError),
    #[error("Unable to build model: {0}")]
    Problem(#[from] ProblemError),
}
