use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::logging;
use crate::simulation::{self, SimulationOutcome};
use crate::utils::progress::SimulationSpinner;
use namdrestart::workflows;
use tracing::{error, info};

pub async fn run(config: AppConfig, quiet: bool) -> Result<()> {
    let reporter = logging::event_reporter();

    info!("Preparing restart from {}", config.prepare.previous_dir.display());
    let prepared = workflows::prepare::run(&config.prepare, &reporter)?;

    let Some(simulation) = config.simulation else {
        info!("Done.");
        return Ok(());
    };

    let spinner = SimulationSpinner::new(quiet);
    match simulation::run(&simulation, &prepared, &spinner).await? {
        SimulationOutcome::Finished { .. } => {
            info!("Dynamic finished.");
            Ok(())
        }
        SimulationOutcome::EndedWithErrors { status, errors } => {
            error!("Dynamic ended with error status: {}", status);
            eprintln!("{}", errors.trim_end());
            Err(CliError::Simulation {
                err_path: prepared.err_path(),
            })
        }
    }
}
