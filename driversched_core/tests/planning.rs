use driversched_core::configuration::{Configuration, CostParameters};
use driversched_core::demand::availability::{AvailabilityMask, AvailabilitySettings};
use driversched_core::demand::{Day, DemandTable, TimeSlot};
use driversched_core::io::sample_week;
use driversched_core::planner::{plan_week, PlanOutcome};
use driversched_core::report::summary_lines;
use driversched_core::scheduling::Schedule;

fn slot(hour: u8, day: Day) -> TimeSlot {
    TimeSlot::new(hour, day).unwrap()
}

fn plan(demand: &DemandTable) -> PlanOutcome {
    plan_week(demand, &Configuration::default()).unwrap()
}

/// Check every constraint of the model on a schedule
fn assert_feasible(schedule: &Schedule, demand: &DemandTable, mask: &AvailabilityMask) {
    let costs = schedule.costs();
    for assignment in schedule.assignments() {
        let s = assignment.slot;
        assert_eq!(assignment.demand, demand.demand(s));
        if assignment.demand == 0 {
            assert_eq!(assignment.permanent, 0, "permanent drivers at {}", s);
            assert_eq!(assignment.on_demand, 0, "on-demand drivers at {}", s);
        }
        assert!(
            assignment.capacity(costs) >= assignment.demand as f64,
            "demand not covered at {}",
            s
        );
        assert!(assignment.permanent <= schedule.permanent_drivers());
        if !mask.is_available(s) {
            assert_eq!(assignment.permanent, 0, "unavailable driver at {}", s);
        }
    }
    let expected = schedule.permanent_drivers() as f64 * costs.fixed_weekly_cost
        + schedule.total_permanent_hours() as f64 * costs.permanent_hourly_cost
        + schedule.total_on_demand_hours() as f64 * costs.on_demand_hourly_cost;
    assert!((schedule.total_cost() - expected).abs() < 1e-9);
}

#[test]
fn no_demand() {
    let demand = DemandTable::zeros();
    let outcome = plan(&demand);
    assert!(outcome.violations.is_empty());
    let schedule = outcome.schedule;
    assert_eq!(schedule.permanent_drivers(), 0);
    assert_eq!(schedule.total_permanent_hours(), 0);
    assert_eq!(schedule.total_on_demand_hours(), 0);
    assert_eq!(schedule.total_cost(), 0.);
    assert_feasible(&schedule, &demand, &AvailabilityMask::default());
}

#[test]
fn single_order_outside_shifts() {
    let busy = slot(0, Day::Monday);
    let demand = DemandTable::zeros().with_demand(busy, 1);
    let outcome = plan(&demand);
    assert!(outcome.violations.is_empty());
    let schedule = outcome.schedule;
    assert_eq!(schedule.permanent_drivers(), 0);
    assert_eq!(schedule.assignment(busy).permanent, 0);
    assert_eq!(schedule.assignment(busy).on_demand, 1);
    assert_eq!(schedule.total_cost(), 28.);
    assert_feasible(&schedule, &demand, &AvailabilityMask::default());
}

#[test]
fn odd_demand_rounds_drivers_up() {
    let busy = slot(20, Day::Saturday);
    let demand = DemandTable::zeros().with_demand(busy, 3);
    let schedule = plan(&demand).schedule;
    assert_eq!(schedule.assignment(busy).on_demand, 2);
    assert_eq!(schedule.total_cost(), 56.);
}

#[test]
fn isolated_demand_uses_on_demand_drivers() {
    // One busy available slot doesn't justify the fixed cost of a permanent driver
    let busy = slot(9, Day::Wednesday);
    let demand = DemandTable::zeros().with_demand(busy, 4);
    let schedule = plan(&demand).schedule;
    assert_eq!(schedule.permanent_drivers(), 0);
    assert_eq!(schedule.assignment(busy).permanent, 0);
    assert_eq!(schedule.assignment(busy).on_demand, 2);
    assert_eq!(schedule.total_cost(), 56.);
}

#[test]
fn steady_demand_justifies_hiring() {
    let mask = AvailabilityMask::default();
    let mut demand = DemandTable::zeros();
    for s in TimeSlot::all().filter(|s| mask.is_available(*s)) {
        demand = demand.with_demand(s, 4);
    }
    let outcome = plan(&demand);
    assert!(outcome.violations.is_empty());
    let schedule = outcome.schedule;
    assert_feasible(&schedule, &demand, &mask);
    // 2 * 863.5 + 40 slots * 2 drivers * 6, cheaper than 40 * 2 * 28 on-demand
    assert_eq!(schedule.permanent_drivers(), 2);
    assert_eq!(schedule.total_permanent_hours(), 80);
    assert_eq!(schedule.total_on_demand_hours(), 0);
    assert!((schedule.total_cost() - 2207.).abs() < 1e-6);
    let objective = schedule.objective_value().unwrap();
    assert!((objective - schedule.total_cost()).abs() < 1e-6);
    assert_eq!(
        summary_lines(&schedule)[0],
        "Total number of permanent drivers to be hired: 2"
    );
}

#[test]
fn permanent_drivers_respect_custom_availability() {
    // Drivers available around the clock, except on Monday
    let configuration = Configuration {
        availability: AvailabilitySettings {
            rest_days: vec![1],
            off_hours: vec![],
        },
        ..Configuration::default()
    };
    let mask = AvailabilityMask::from_settings(&configuration.availability).unwrap();
    let mut demand = DemandTable::zeros();
    for s in TimeSlot::all() {
        demand = demand.with_demand(s, 2);
    }
    let outcome = plan_week(&demand, &configuration).unwrap();
    assert!(outcome.violations.is_empty());
    let schedule = outcome.schedule;
    assert_feasible(&schedule, &demand, &mask);
    // 863.5 + 144 * 6 beats 144 * 28, Monday stays on-demand
    assert_eq!(schedule.permanent_drivers(), 1);
    assert_eq!(schedule.assignment(slot(3, Day::Sunday)).permanent, 1);
    assert_eq!(schedule.assignment(slot(3, Day::Sunday)).on_demand, 0);
    assert_eq!(schedule.assignment(slot(12, Day::Monday)).permanent, 0);
    assert_eq!(schedule.assignment(slot(12, Day::Monday)).on_demand, 1);
    assert!((schedule.total_cost() - (863.5 + 864. + 672.)).abs() < 1e-6);
}

#[test]
fn cheaper_permanent_drivers() {
    let configuration = Configuration {
        costs: CostParameters {
            fixed_weekly_cost: 10.,
            ..CostParameters::default()
        },
        ..Configuration::default()
    };
    let busy = slot(10, Day::Thursday);
    let demand = DemandTable::zeros().with_demand(busy, 4);
    let schedule = plan_week(&demand, &configuration).unwrap().schedule;
    assert_eq!(schedule.permanent_drivers(), 2);
    assert_eq!(schedule.assignment(busy).permanent, 2);
    assert_eq!(schedule.assignment(busy).on_demand, 0);
    assert!((schedule.total_cost() - 32.).abs() < 1e-6);
}

#[test]
fn repeated_runs_agree() {
    let mut demand = DemandTable::zeros();
    for (hour, day, orders) in [
        (9, Day::Wednesday, 5),
        (14, Day::Friday, 3),
        (22, Day::Monday, 1),
    ] {
        demand = demand.with_demand(slot(hour, day), orders);
    }
    let first = plan(&demand).schedule;
    let second = plan(&demand).schedule;
    assert!((first.total_cost() - second.total_cost()).abs() < 1e-9);
    assert_feasible(&first, &demand, &AvailabilityMask::default());
}

#[test]
fn sample_week_plan() {
    let demand = sample_week();
    let outcome = plan(&demand);
    assert!(outcome.violations.is_empty(), "{:?}", outcome.violations);
    let schedule = outcome.schedule;
    assert_feasible(&schedule, &demand, &AvailabilityMask::default());
    assert_eq!(schedule.permanent_drivers(), 7);
    assert!((schedule.total_cost() - 28528.5).abs() < 1e-6);
    let objective = schedule.objective_value().unwrap();
    assert!((objective - schedule.total_cost()).abs() < 1e-6 * objective.max(1.));
}
