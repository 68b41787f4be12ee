//! When permanent drivers may be scheduled
//!
//! Permanent drivers follow a fixed weekly pattern: whole rest days, and hours outside
//! their shifts on the remaining days. The default pattern rests on Monday and Tuesday,
//! and works 8:00-12:00 and 13:00-17:00 on the other days.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::demand::{Day, TimeSlot, HOURS_PER_DAY, SLOT_COUNT};

/// Settings describing the weekly pattern of permanent drivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilitySettings {
    /// Days (1 = Monday, 7 = Sunday) permanent drivers don't work at all
    pub rest_days: Vec<u8>,
    /// Hours (0-23) permanent drivers don't work on the remaining days
    pub off_hours: Vec<u8>,
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        AvailabilitySettings {
            rest_days: vec![1, 2],
            off_hours: vec![0, 1, 2, 3, 4, 5, 6, 7, 12, 17, 18, 19, 20, 21, 22, 23],
        }
    }
}

/// Whether permanent drivers may work, for every slot of the week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityMask {
    available: [bool; SLOT_COUNT],
}

impl AvailabilityMask {
    /// Build the mask from a set of rest days and off hours
    pub fn from_settings(settings: &AvailabilitySettings) -> Result<Self, AvailabilityError> {
        let mut rest_days = [false; 7];
        for number in &settings.rest_days {
            let day = Day::from_number(*number).ok_or(AvailabilityError::InvalidDay(*number))?;
            rest_days[day.index()] = true;
        }
        let mut off_hours = [false; HOURS_PER_DAY];
        for hour in &settings.off_hours {
            let slot = off_hours
                .get_mut(*hour as usize)
                .ok_or(AvailabilityError::InvalidHour(*hour))?;
            *slot = true;
        }

        let mut available = [false; SLOT_COUNT];
        for slot in TimeSlot::all() {
            available[slot.index()] =
                !rest_days[slot.day().index()] && !off_hours[slot.hour() as usize];
        }
        Ok(AvailabilityMask { available })
    }

    /// A mask allowing permanent drivers in every slot
    pub fn always_available() -> Self {
        AvailabilityMask {
            available: [true; SLOT_COUNT],
        }
    }

    /// Whether permanent drivers may be scheduled in the slot
    pub fn is_available(&self, slot: TimeSlot) -> bool {
        self.available[slot.index()]
    }

    /// Number of slots permanent drivers may be scheduled in
    pub fn available_slots(&self) -> usize {
        self.available.iter().filter(|a| **a).count()
    }
}

impl Default for AvailabilityMask {
    fn default() -> Self {
        let mut available = [false; SLOT_COUNT];
        let settings = AvailabilitySettings::default();
        for slot in TimeSlot::all() {
            available[slot.index()] = !settings.rest_days.contains(&slot.day().number())
                && !settings.off_hours.contains(&slot.hour());
        }
        AvailabilityMask { available }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AvailabilityError {
    #[error("Rest day {0} is not a day of the week (1-7)")]
    InvalidDay(u8),
    #[error("Off hour {0} is not an hour of the day (0-23)")]
    InvalidHour(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(hour: u8, day: Day) -> TimeSlot {
        TimeSlot::new(hour, day).unwrap()
    }

    #[test]
    fn default_pattern() {
        let mask = AvailabilityMask::default();
        // Monday and Tuesday are rest days
        for hour in 0..24 {
            assert!(!mask.is_available(slot(hour, Day::Monday)));
            assert!(!mask.is_available(slot(hour, Day::Tuesday)));
        }
        for day in &Day::ALL[2..] {
            for hour in (8..12).chain(13..17) {
                assert!(mask.is_available(slot(hour, *day)));
            }
            for hour in [0, 7, 12, 17, 23] {
                assert!(!mask.is_available(slot(hour, *day)));
            }
        }
        // Two four hour shifts on five days
        assert_eq!(mask.available_slots(), 40);
        assert_eq!(
            AvailabilityMask::from_settings(&AvailabilitySettings::default()).unwrap(),
            mask
        );
    }

    #[test]
    fn custom_pattern() {
        let settings = AvailabilitySettings {
            rest_days: vec![7],
            off_hours: vec![],
        };
        let mask = AvailabilityMask::from_settings(&settings).unwrap();
        assert!(mask.is_available(slot(0, Day::Monday)));
        assert!(!mask.is_available(slot(12, Day::Sunday)));
        assert_eq!(mask.available_slots(), 144);
    }

    #[test]
    fn rejects_out_of_range_settings() {
        let settings = AvailabilitySettings {
            rest_days: vec![0],
            off_hours: vec![],
        };
        assert_eq!(
            AvailabilityMask::from_settings(&settings),
            Err(AvailabilityError::InvalidDay(0))
        );
        let settings = AvailabilitySettings {
            rest_days: vec![],
            off_hours: vec![24],
        };
        assert_eq!(
            AvailabilityMask::from_settings(&settings),
            Err(AvailabilityError::InvalidHour(24))
        );
    }
}
