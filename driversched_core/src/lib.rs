//! Core rust implementation of driversched, a crate for planning the weekly staffing of
//! delivery drivers.
//!
//! A week of hourly order demand is turned into an integer program choosing how many
//! permanent drivers to hire, and how many permanent and on-demand drivers work in every
//! hour, at minimum cost. See [`planner::plan_week`] for the whole pipeline.

pub mod configuration;
pub mod demand;
pub mod io;
pub mod optimize;
pub mod planner;
pub mod report;
pub mod scheduling;
