//! Tabular export of a schedule
//!
//! The export is a [`Workbook`] with two sheets, the permanent and the on-demand drivers of
//! every slot, one row per hour and one column per day. It is written to an output
//! directory as an xlsx spreadsheet, along with the whole workbook as JSON.
use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::XlsxError;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::demand::Day;
use crate::report::hour_label;
use crate::scheduling::Schedule;

/// Name of the sheet of permanent drivers
pub const PERMANENT_SHEET: &str = "Permanent Drivers";
/// Name of the sheet of on-demand drivers
pub const ON_DEMAND_SHEET: &str = "On-Demand Drivers";
/// Name of the spreadsheet holding both sheets
pub const SPREADSHEET_FILE: &str = "results.xlsx";
/// Name of the JSON file holding the whole workbook
pub const WORKBOOK_FILE: &str = "results.json";

/// A single sheet, drivers scheduled in every hour of the week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverTable {
    pub name: String,
    /// Column headers, the day names
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// One hour of a [`DriverTable`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Hour label, see [`hour_label`]
    pub label: String,
    /// Drivers for each day, Monday first
    pub values: Vec<u32>,
}

impl DriverTable {
    fn from_grid(name: &str, grid: Vec<Vec<u32>>) -> DriverTable {
        let rows = grid
            .into_iter()
            .enumerate()
            .map(|(hour, values)| TableRow {
                label: hour_label(hour as u8),
                values,
            })
            .collect();
        DriverTable {
            name: name.to_string(),
            columns: Day::ALL.iter().map(|day| day.name().to_string()).collect(),
            rows,
        }
    }

    /// Write the sheet into a spreadsheet, a header row then one row per hour
    fn write_worksheet(&self, workbook: &mut rust_xlsxwriter::Workbook) -> Result<(), XlsxError> {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.name)?;
        worksheet.write_string(0, 0, "Hour")?;
        for (col, column) in self.columns.iter().enumerate() {
            worksheet.write_string(0, col as u16 + 1, column)?;
        }
        for (row, table_row) in self.rows.iter().enumerate() {
            let row = row as u32 + 1;
            worksheet.write_string(row, 0, &table_row.label)?;
            for (col, value) in table_row.values.iter().enumerate() {
                worksheet.write_number(row, col as u16 + 1, *value as f64)?;
            }
        }
        Ok(())
    }
}

/// Both sheets of the export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<DriverTable>,
}

impl Workbook {
    pub fn from_schedule(schedule: &Schedule) -> Workbook {
        Workbook {
            sheets: vec![
                DriverTable::from_grid(PERMANENT_SHEET, schedule.permanent_grid()),
                DriverTable::from_grid(ON_DEMAND_SHEET, schedule.on_demand_grid()),
            ],
        }
    }

    /// Get a sheet by its name
    pub fn sheet(&self, name: &str) -> Option<&DriverTable> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Write the workbook into a directory, created if missing
    ///
    /// Returns the paths of the written files, the spreadsheet then the JSON workbook.
    pub fn write_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>, ExportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut spreadsheet = rust_xlsxwriter::Workbook::new();
        for sheet in &self.sheets {
            sheet.write_worksheet(&mut spreadsheet)?;
        }
        let spreadsheet_path = dir.join(SPREADSHEET_FILE);
        spreadsheet.save(&spreadsheet_path)?;

        let json_path = dir.join(WORKBOOK_FILE);
        fs::write(&json_path, serde_json::to_string_pretty(self)?)?;
        info!(dir = %dir.display(), "exported results");
        Ok(vec![spreadsheet_path, json_path])
    }
}

/// Write the full schedule as JSON
pub fn write_schedule_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> Result<(), ExportError> {
    let schedule_string = serde_json::to_string_pretty(schedule)?;
    fs::write(path, schedule_string)?;
    Ok(())
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unable to serialize results")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Unable to write results due to {0}")]
    UnableToWrite(#[from] std::io::Error),
    #[error("Unable to write spreadsheet due to {0}")]
    SpreadsheetError(#[from] XlsxError),
}
