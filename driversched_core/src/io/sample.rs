//! Reference week of hourly demand
use crate::demand::{DemandTable, DAYS_PER_WEEK, HOURS_PER_DAY};

/// Orders per hour (rows, 0:00 first) and day (columns, Monday first) of the reference week
const SAMPLE_WEEK: [[u32; DAYS_PER_WEEK]; HOURS_PER_DAY] = [
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [1, 0, 2, 2, 2, 0, 0],
    [3, 3, 1, 1, 4, 3, 3],
    [7, 10, 8, 10, 14, 9, 8],
    [15, 26, 20, 29, 27, 19, 16],
    [16, 20, 24, 22, 28, 25, 26],
    [20, 17, 21, 19, 20, 23, 33],
    [18, 12, 15, 17, 22, 26, 38],
    [17, 9, 15, 20, 14, 29, 34],
    [21, 19, 14, 18, 25, 30, 31],
    [28, 27, 26, 26, 33, 27, 35],
    [26, 34, 31, 34, 38, 31, 29],
    [29, 32, 28, 28, 30, 31, 31],
    [21, 20, 26, 22, 25, 28, 32],
    [11, 12, 12, 18, 21, 17, 20],
    [5, 6, 7, 8, 10, 11, 9],
    [0, 0, 0, 1, 5, 4, 1],
    [0, 0, 0, 0, 4, 4, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
];

/// The reference week of demand, used when no demand file is supplied
pub fn sample_week() -> DemandTable {
    DemandTable::from_array(&SAMPLE_WEEK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::Day;

    #[test]
    fn sample_week_values() {
        let table = sample_week();
        assert_eq!(table.demand_at(5, Day::Monday), Some(1));
        assert_eq!(table.demand_at(11, Day::Sunday), Some(38));
        assert_eq!(table.demand_at(21, Day::Friday), Some(4));
        assert_eq!(table.demand_at(0, Day::Wednesday), Some(0));
        assert_eq!(table.total(), 1_995);
    }
}
