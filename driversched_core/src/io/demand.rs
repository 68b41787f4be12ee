//! Readers for demand grids
//!
//! A grid has one row per hour (0:00 first) and one column per day (Monday first). It can
//! be stored as JSON, either a bare array of rows or an object with a `demand` field, or as
//! delimited text with one row per line.
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::demand::{DemandError, DemandTable};

/// Accepted JSON layouts of a demand grid
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDemand {
    Grid(Vec<Vec<i64>>),
    Wrapped { demand: Vec<Vec<i64>> },
}

/// Read a demand grid from a file, JSON if the extension is `.json`, delimited text
/// otherwise
pub fn read_demand<P: AsRef<Path>>(path: P) -> Result<DemandTable, DemandReadError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|err| DemandReadError::UnableToRead(format!("{}: {}", path.display(), err)))?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    debug!(path = %path.display(), is_json, "reading demand grid");
    if is_json {
        read_demand_json(&contents)
    } else {
        read_demand_text(&contents)
    }
}

/// Parse a demand grid from JSON
pub fn read_demand_json(json: &str) -> Result<DemandTable, DemandReadError> {
    let grid = match serde_json::from_str::<JsonDemand>(json)
        .map_err(|err| DemandReadError::UnableToParse(err.to_string()))?
    {
        JsonDemand::Grid(grid) | JsonDemand::Wrapped { demand: grid } => grid,
    };
    Ok(DemandTable::from_grid(&grid)?)
}

/// Parse a demand grid from delimited text
///
/// Values are separated by commas, semicolons or whitespace. Blank lines and anything
/// following a `#` are ignored.
pub fn read_demand_text(text: &str) -> Result<DemandTable, DemandReadError> {
    let mut grid: Vec<Vec<i64>> = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let row = content
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|_| DemandReadError::InvalidValue {
                        line: line_number + 1,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        grid.push(row);
    }
    Ok(DemandTable::from_grid(&grid)?)
}

#[derive(Error, Debug)]
pub enum DemandReadError {
    #[error("Unable to read demand file {0}")]
    UnableToRead(String),
    #[error("Unable to parse demand json due to {0}")]
    UnableToParse(String),
    #[error("Invalid demand value {token:?} on line {line}")]
    InvalidValue { line: usize, token: String },
    #[error("Invalid demand grid: {0}")]
    InvalidGrid(#[from] DemandError),
}
