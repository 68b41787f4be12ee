//! Module for reading demand grids
pub mod demand;
pub mod sample;

pub use demand::{read_demand, read_demand_json, read_demand_text, DemandReadError};
pub use sample::sample_week;
