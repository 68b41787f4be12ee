use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use driversched_core::configuration::Configuration;
use driversched_core::io::{read_demand, sample_week};
use driversched_core::optimize::solvers::SolverKind;
use driversched_core::planner::plan_week;
use driversched_core::report::export::{write_schedule_json, Workbook};
use driversched_core::report::Report;

/// Plan the weekly staffing of permanent and on-demand delivery drivers
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Demand grid, JSON or delimited text with one row per hour and one column per day.
    /// The built in sample week is used when missing
    #[arg(long)]
    demand: Option<PathBuf>,
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory the driver tables are exported to
    #[arg(long, default_value = "results")]
    output: PathBuf,
    /// Don't export the driver tables
    #[arg(long)]
    no_export: bool,
    /// Also write the full schedule as JSON to this file
    #[arg(long)]
    schedule_json: Option<PathBuf>,
    /// Solver backend, overriding the configuration
    #[arg(long, value_enum)]
    solver: Option<Backend>,
    /// Solve time limit in seconds, overriding the configuration (0 disables the limit).
    /// Only HiGHS enforces it
    #[arg(long)]
    time_limit: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Microlp,
    Highs,
}

impl From<Backend> for SolverKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Microlp => SolverKind::Microlp,
            Backend::Highs => SolverKind::Highs,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing();

    let mut configuration =
        Configuration::load(args.config.as_deref()).context("Unable to load configuration")?;
    if let Some(backend) = args.solver {
        configuration.solver.backend = backend.into();
    }
    if let Some(seconds) = args.time_limit {
        configuration.solver.time_limit_seconds = Some(seconds);
    }

    let demand = match &args.demand {
        Some(path) => read_demand(path)
            .with_context(|| format!("Unable to read demand from {}", path.display()))?,
        None => {
            info!("no demand file given, using the sample week");
            sample_week()
        }
    };

    let outcome = match plan_week(&demand, &configuration) {
        Ok(outcome) => outcome,
        Err(err) => match err.status() {
            Some(status) => {
                println!("An optimal solution could not be found.");
                println!("Status: {}", status);
                return Ok(ExitCode::FAILURE);
            }
            None => return Err(anyhow::Error::from(err).context("Unable to plan the week")),
        },
    };

    print!("{}", Report::new(&outcome.schedule, &outcome.violations));

    if let Some(path) = &args.schedule_json {
        write_schedule_json(&outcome.schedule, path)
            .with_context(|| format!("Unable to write schedule to {}", path.display()))?;
    }
    if !args.no_export {
        Workbook::from_schedule(&outcome.schedule)
            .write_dir(&args.output)
            .with_context(|| format!("Unable to export results to {}", args.output.display()))?;
        println!("Results exported to {}", args.output.display());
    }
    Ok(ExitCode::SUCCESS)
}

