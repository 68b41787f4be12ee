//! The resolved weekly schedule
use serde::Serialize;

use crate::configuration::CostParameters;
use crate::demand::{Day, TimeSlot, HOURS_PER_DAY};

/// Drivers scheduled in a single slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotAssignment {
    pub slot: TimeSlot,
    /// Orders expected in the slot
    pub demand: u32,
    /// Permanent drivers working in the slot
    pub permanent: u32,
    /// On-demand drivers working in the slot
    pub on_demand: u32,
}

impl SlotAssignment {
    /// Orders the scheduled drivers can deliver in the slot
    pub fn capacity(&self, costs: &CostParameters) -> f64 {
        self.permanent as f64 * costs.permanent_deliveries_per_hour
            + self.on_demand as f64 * costs.on_demand_deliveries_per_hour
    }
}

/// Schedule of both driver classes over the week
///
/// Built once from a solved model, read only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    /// Permanent drivers hired for the week
    permanent_drivers: u32,
    /// Assignments indexed by [`TimeSlot::index`]
    assignments: Vec<SlotAssignment>,
    costs: CostParameters,
    /// Objective value reported by the solver
    objective_value: Option<f64>,
}

impl Schedule {
    pub(crate) fn new(
        permanent_drivers: u32,
        assignments: Vec<SlotAssignment>,
        costs: CostParameters,
        objective_value: Option<f64>,
    ) -> Schedule {
        Schedule {
            permanent_drivers,
            assignments,
            costs,
            objective_value,
        }
    }

    /// Permanent drivers hired for the week (z)
    pub fn permanent_drivers(&self) -> u32 {
        self.permanent_drivers
    }

    pub fn assignment(&self, slot: TimeSlot) -> &SlotAssignment {
        &self.assignments[slot.index()]
    }

    /// Assignments of every slot, day major
    pub fn assignments(&self) -> &[SlotAssignment] {
        &self.assignments
    }

    pub fn costs(&self) -> &CostParameters {
        &self.costs
    }

    /// Objective value reported by the solver, if it reported one
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Hours worked by on-demand drivers over the week
    pub fn total_on_demand_hours(&self) -> u64 {
        self.assignments.iter().map(|a| a.on_demand as u64).sum()
    }

    /// Hours worked by permanent drivers over the week
    pub fn total_permanent_hours(&self) -> u64 {
        self.assignments.iter().map(|a| a.permanent as u64).sum()
    }

    /// Fixed weekly cost of the hired drivers, plus their hourly cost
    pub fn permanent_cost(&self) -> f64 {
        self.permanent_drivers as f64 * self.costs.fixed_weekly_cost
            + self.total_permanent_hours() as f64 * self.costs.permanent_hourly_cost
    }

    pub fn on_demand_cost(&self) -> f64 {
        self.total_on_demand_hours() as f64 * self.costs.on_demand_hourly_cost
    }

    pub fn total_cost(&self) -> f64 {
        self.permanent_cost() + self.on_demand_cost()
    }

    /// Grid of permanent drivers, one row per hour and one column per day
    pub fn permanent_grid(&self) -> Vec<Vec<u32>> {
        self.grid(|a| a.permanent)
    }

    /// Grid of on-demand drivers, one row per hour and one column per day
    pub fn on_demand_grid(&self) -> Vec<Vec<u32>> {
        self.grid(|a| a.on_demand)
    }

    fn grid(&self, value: impl Fn(&SlotAssignment) -> u32) -> Vec<Vec<u32>> {
        (0..HOURS_PER_DAY)
            .map(|hour| {
                Day::ALL
                    .iter()
                    .map(|day| value(&self.assignments[day.index() * HOURS_PER_DAY + hour]))
                    .collect()
            })
            .collect()
    }

    /// Totals of the schedule
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            permanent_drivers: self.permanent_drivers,
            permanent_hours: self.total_permanent_hours(),
            on_demand_hours: self.total_on_demand_hours(),
            permanent_cost: self.permanent_cost(),
            on_demand_cost: self.on_demand_cost(),
            total_cost: self.total_cost(),
        }
    }
}

/// Aggregated totals of a [`Schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub permanent_drivers: u32,
    pub permanent_hours: u64,
    pub on_demand_hours: u64,
    pub permanent_cost: f64,
    pub on_demand_cost: f64,
    pub total_cost: f64,
}
