//! Human readable report of a schedule
//!
//! The report has one line per slot of the week, in slot order, followed by the totals.
pub mod export;

use std::fmt::{Display, Formatter};

use crate::demand::TimeSlot;
use crate::scheduling::{Schedule, Violation};

/// Label of an hour of the day on a 12 hour clock, e.g. `12 AM`, `9 AM`, `3 PM`
pub fn hour_label(hour: u8) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{} AM", hour),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

/// Report line of a single slot
///
/// Slots without demand which still have drivers scheduled (see
/// [`Violation::DriversWithoutDemand`]) get an error line instead.
pub fn slot_line(schedule: &Schedule, slot: TimeSlot, violations: &[Violation]) -> String {
    let hour = hour_label(slot.hour());
    let day = slot.day();
    let assignment = schedule.assignment(slot);
    if assignment.demand > 0 {
        return format!(
            "At {} on {}, {} permanent drivers and {} on-demand drivers are scheduled.",
            hour, day, assignment.permanent, assignment.on_demand
        );
    }
    let misplaced = violations.iter().any(|violation| {
        matches!(violation, Violation::DriversWithoutDemand { slot: s, .. } if *s == slot)
    });
    if misplaced {
        format!(
            "Error - no demand but drivers scheduled at {} on {}.",
            hour, day
        )
    } else {
        format!(
            "At {} on {}, there is no demand so 0 drivers are scheduled.",
            hour, day
        )
    }
}

/// Report lines of every slot, Monday 12 AM first
pub fn slot_lines(schedule: &Schedule, violations: &[Violation]) -> Vec<String> {
    TimeSlot::all()
        .map(|slot| slot_line(schedule, slot, violations))
        .collect()
}

/// Lines with the totals of the schedule
pub fn summary_lines(schedule: &Schedule) -> Vec<String> {
    let summary = schedule.summary();
    vec![
        format!(
            "Total number of permanent drivers to be hired: {}",
            summary.permanent_drivers
        ),
        format!(
            "Total hours on-demand drivers are used: {}",
            summary.on_demand_hours
        ),
        format!(
            "Total cost for permanent drivers: ${:.2}",
            summary.permanent_cost
        ),
        format!(
            "Total cost for on-demand drivers: ${:.2}",
            summary.on_demand_cost
        ),
    ]
}

/// Full report of a schedule, the slot lines then a blank line and the totals
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    schedule: &'a Schedule,
    violations: &'a [Violation],
}

impl<'a> Report<'a> {
    pub fn new(schedule: &'a Schedule, violations: &'a [Violation]) -> Self {
        Report {
            schedule,
            violations,
        }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for line in slot_lines(self.schedule, self.violations) {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        for line in summary_lines(self.schedule) {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
