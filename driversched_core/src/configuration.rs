//! Run configuration: cost and capacity parameters, the permanent driver pattern, and
//! solver settings
use std::path::Path;
use std::time::Duration;

use derive_builder::Builder;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::demand::availability::AvailabilitySettings;
use crate::optimize::solvers::SolverKind;

/// Prefix of environment variables overriding the configuration
pub const ENV_PREFIX: &str = "DRIVERSCHED_";

/// Complete configuration of a planning run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub costs: CostParameters,
    pub availability: AvailabilitySettings,
    pub solver: SolverSettings,
}

impl Configuration {
    /// Load the configuration
    ///
    /// Values from the TOML file at `path` (if given) are overridden by `DRIVERSCHED_`
    /// prefixed environment variables, using `__` to separate nested keys
    /// (e.g. `DRIVERSCHED_COSTS__R1=900`). Anything left unset keeps its default.
    pub fn load(path: Option<&Path>) -> Result<Configuration, ConfigurationError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigurationError::FileNotFound(path.display().to_string()));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Configuration::extract(figment)
    }

    /// Parse a configuration from a TOML string, on top of the defaults
    pub fn from_toml_str(toml: &str) -> Result<Configuration, ConfigurationError> {
        Configuration::extract(Figment::new().merge(Toml::string(toml)))
    }

    fn extract(figment: Figment) -> Result<Configuration, ConfigurationError> {
        let config: Configuration = figment
            .extract()
            .map_err(|err| ConfigurationError::UnableToParse(err.to_string()))?;
        config.costs.validate()?;
        Ok(config)
    }
}

// region Cost Parameters
/// Cost and capacity parameters of the two driver classes
#[derive(Builder, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate_parameters"))]
#[serde(default)]
pub struct CostParameters {
    /// Fixed weekly cost of one permanent driver (r1)
    #[builder(default = "863.5")]
    #[serde(alias = "r1")]
    pub fixed_weekly_cost: f64,
    /// Hourly (travel) cost of a working permanent driver (r2)
    #[builder(default = "6.")]
    #[serde(alias = "r2")]
    pub permanent_hourly_cost: f64,
    /// Hourly cost of an on-demand driver (r3)
    #[builder(default = "28.")]
    #[serde(alias = "r3")]
    pub on_demand_hourly_cost: f64,
    /// Orders a permanent driver delivers per hour (o1)
    #[builder(default = "2.")]
    #[serde(alias = "o1")]
    pub permanent_deliveries_per_hour: f64,
    /// Orders an on-demand driver delivers per hour (o2)
    #[builder(default = "2.")]
    #[serde(alias = "o2")]
    pub on_demand_deliveries_per_hour: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        CostParameters {
            fixed_weekly_cost: 863.5,
            permanent_hourly_cost: 6.,
            on_demand_hourly_cost: 28.,
            permanent_deliveries_per_hour: 2.,
            on_demand_deliveries_per_hour: 2.,
        }
    }
}

impl CostParameters {
    /// Check that every parameter is finite, costs are non-negative, and capacities are
    /// positive
    pub fn validate(&self) -> Result<(), ParameterError> {
        let costs = [
            ("fixed_weekly_cost", self.fixed_weekly_cost),
            ("permanent_hourly_cost", self.permanent_hourly_cost),
            ("on_demand_hourly_cost", self.on_demand_hourly_cost),
        ];
        for (name, value) in costs {
            if !value.is_finite() || value < 0. {
                return Err(ParameterError::InvalidCost { name, value });
            }
        }
        let capacities = [
            (
                "permanent_deliveries_per_hour",
                self.permanent_deliveries_per_hour,
            ),
            (
                "on_demand_deliveries_per_hour",
                self.on_demand_deliveries_per_hour,
            ),
        ];
        for (name, value) in capacities {
            if !value.is_finite() || value <= 0. {
                return Err(ParameterError::InvalidCapacity { name, value });
            }
        }
        Ok(())
    }
}

impl CostParametersBuilder {
    fn validate_parameters(&self) -> Result<(), String> {
        let params = CostParameters {
            fixed_weekly_cost: self.fixed_weekly_cost.unwrap_or(863.5),
            permanent_hourly_cost: self.permanent_hourly_cost.unwrap_or(6.),
            on_demand_hourly_cost: self.on_demand_hourly_cost.unwrap_or(28.),
            permanent_deliveries_per_hour: self.permanent_deliveries_per_hour.unwrap_or(2.),
            on_demand_deliveries_per_hour: self.on_demand_deliveries_per_hour.unwrap_or(2.),
        };
        params.validate().map_err(|err| err.to_string())
    }
}

/// Errors for invalid cost or capacity parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Cost parameter {name} must be finite and non-negative, got {value}")]
    InvalidCost { name: &'static str, value: f64 },
    #[error("Capacity parameter {name} must be finite and positive, got {value}")]
    InvalidCapacity { name: &'static str, value: f64 },
}
// endregion Cost Parameters

// region Solver Settings
/// Settings of the solver invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Backend used to solve the model
    pub backend: SolverKind,
    /// Maximum solve time in seconds, a solve running longer is treated as not solved.
    /// Zero disables the limit
    pub time_limit_seconds: Option<f64>,
    /// Largest distance from an integer a solved value may have
    pub integrality_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            backend: SolverKind::default(),
            time_limit_seconds: Some(60.),
            integrality_tolerance: 1e-6,
        }
    }
}

impl SolverSettings {
    /// Time limit as a duration, None when unset or not a usable number of seconds
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_seconds
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|limit| !limit.is_zero())
    }
}
// endregion Solver Settings

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration file {0} not found")]
    FileNotFound(String),
    #[error("Unable to parse configuration due to {0}")]
    UnableToParse(String),
    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),
}
