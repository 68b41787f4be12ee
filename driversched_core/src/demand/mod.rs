//! Hourly demand over a week, and the time slots indexing it
pub mod availability;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hours in a day
pub const HOURS_PER_DAY: usize = 24;
/// Number of days in the planning week
pub const DAYS_PER_WEEK: usize = 7;
/// Number of time slots in the planning week
pub const SLOT_COUNT: usize = HOURS_PER_DAY * DAYS_PER_WEEK;

// region Day
/// Day of the planning week, numbered 1 (Monday) to 7 (Sunday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days in week order
    pub const ALL: [Day; DAYS_PER_WEEK] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Get a day from its number, 1 (Monday) to 7 (Sunday)
    pub fn from_number(number: u8) -> Option<Day> {
        match number {
            1..=7 => Some(Day::ALL[(number - 1) as usize]),
            _ => None,
        }
    }

    /// Number of the day, 1 (Monday) to 7 (Sunday)
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }

    /// Zero based position of the day in the week
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl Display for Day {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
// endregion Day

// region Time Slot
/// One hour of one day of the planning week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    // Field order gives the day major ordering used everywhere
    day: Day,
    hour: u8,
}

impl TimeSlot {
    /// Create a new time slot, None if the hour is not in [0, 23]
    pub fn new(hour: u8, day: Day) -> Option<TimeSlot> {
        if (hour as usize) < HOURS_PER_DAY {
            Some(TimeSlot { day, hour })
        } else {
            None
        }
    }

    /// Get a time slot from its dense index (see [`TimeSlot::index`])
    pub fn from_index(index: usize) -> Option<TimeSlot> {
        if index >= SLOT_COUNT {
            return None;
        }
        Some(TimeSlot {
            day: Day::ALL[index / HOURS_PER_DAY],
            hour: (index % HOURS_PER_DAY) as u8,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn day(&self) -> Day {
        self.day
    }

    /// Dense index of the slot, day major: `(day - 1) * 24 + hour`
    pub fn index(&self) -> usize {
        self.day.index() * HOURS_PER_DAY + self.hour as usize
    }

    /// All slots of the week, Monday 0:00 first, Sunday 23:00 last
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..SLOT_COUNT).filter_map(TimeSlot::from_index)
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:02}:00", self.day, self.hour)
    }
}
// endregion Time Slot

// region Demand Table
/// Expected number of orders for every hour of the week
///
/// The table is fixed after construction, every constructor validates its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemandTable {
    /// Demand indexed by [`TimeSlot::index`]
    demand: Vec<u32>,
}

impl DemandTable {
    /// Create a demand table from a grid with one row per hour (0-23), and one column per
    /// day (Monday-Sunday)
    ///
    /// # Examples
    /// ```rust
    /// use driversched_core::demand::{DemandTable, Day};
    /// let mut grid = vec![vec![0i64; 7]; 24];
    /// grid[9][2] = 12;
    /// let table = DemandTable::from_grid(&grid).unwrap();
    /// assert_eq!(table.demand_at(9, Day::Wednesday), Some(12));
    /// ```
    pub fn from_grid<R: AsRef<[i64]>>(rows: &[R]) -> Result<DemandTable, DemandError> {
        if rows.len() != HOURS_PER_DAY {
            return Err(DemandError::WrongRowCount(rows.len()));
        }
        let mut demand = vec![0u32; SLOT_COUNT];
        for (hour, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != DAYS_PER_WEEK {
                return Err(DemandError::WrongColumnCount {
                    hour,
                    columns: row.len(),
                });
            }
            for (day, value) in Day::ALL.iter().zip(row) {
                let slot = TimeSlot {
                    day: *day,
                    hour: hour as u8,
                };
                demand[slot.index()] = u32::try_from(*value).map_err(|_| {
                    if *value < 0 {
                        DemandError::NegativeDemand { slot, value: *value }
                    } else {
                        DemandError::DemandTooLarge { slot, value: *value }
                    }
                })?;
            }
        }
        Ok(DemandTable { demand })
    }

    /// Create a demand table from a fixed size grid, one row per hour and one column per day
    pub fn from_array(rows: &[[u32; DAYS_PER_WEEK]; HOURS_PER_DAY]) -> DemandTable {
        let mut demand = vec![0u32; SLOT_COUNT];
        for (hour, row) in rows.iter().enumerate() {
            for (day, value) in Day::ALL.iter().zip(row) {
                demand[day.index() * HOURS_PER_DAY + hour] = *value;
            }
        }
        DemandTable { demand }
    }

    /// A table with no demand at all
    pub fn zeros() -> DemandTable {
        DemandTable {
            demand: vec![0; SLOT_COUNT],
        }
    }

    /// Copy of this table with the demand of a single slot replaced
    pub fn with_demand(mut self, slot: TimeSlot, demand: u32) -> DemandTable {
        self.demand[slot.index()] = demand;
        self
    }

    /// Demand in a slot
    pub fn demand(&self, slot: TimeSlot) -> u32 {
        self.demand[slot.index()]
    }

    /// Demand at an hour of a day, None if the hour is out of range
    pub fn demand_at(&self, hour: u8, day: Day) -> Option<u32> {
        TimeSlot::new(hour, day).map(|slot| self.demand(slot))
    }

    /// Total demand over the week
    pub fn total(&self) -> u64 {
        self.demand.iter().map(|d| *d as u64).sum()
    }

    /// Whether there is no demand in any slot
    pub fn is_empty(&self) -> bool {
        self.demand.iter().all(|d| *d == 0)
    }

    /// Iterate over the slots and their demand, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (TimeSlot, u32)> + '_ {
        TimeSlot::all().map(|slot| (slot, self.demand(slot)))
    }

    /// The table as a grid with one row per hour, and one column per day
    pub fn to_grid(&self) -> Vec<Vec<u32>> {
        (0..HOURS_PER_DAY)
            .map(|hour| {
                Day::ALL
                    .iter()
                    .map(|day| self.demand[day.index() * HOURS_PER_DAY + hour])
                    .collect()
            })
            .collect()
    }
}

/// Errors raised while validating a demand grid
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DemandError {
    #[error("Demand grid must have 24 rows (one per hour), found {0}")]
    WrongRowCount(usize),
    #[error("Demand grid row for hour {hour} must have 7 columns (one per day), found {columns}")]
    WrongColumnCount { hour: usize, columns: usize },
    #[error("Demand at {slot} is negative ({value})")]
    NegativeDemand { slot: TimeSlot, value: i64 },
    #[error("Demand at {slot} is too large ({value})")]
    DemandTooLarge { slot: TimeSlot, value: i64 },
}
// endregion Demand Table
