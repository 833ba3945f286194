use crate::config::SimulationConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::SimulationSpinner;
use namdrestart::core::checkpoint::{backup, resolver};
use namdrestart::engine::report::Reporter;
use namdrestart::workflows::prepare::PreparedRestart;
use std::ffi::OsString;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// How a finished simulation left its error stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutcome {
    Finished { status: ExitStatus },
    EndedWithErrors { status: ExitStatus, errors: String },
}

/// Arguments passed to the executable: the core count when more than one, then the
/// configuration file.
pub fn command_args(threads: usize, conf_path: &Path) -> Vec<OsString> {
    let mut args = Vec::with_capacity(2);
    if threads != 1 {
        args.push(OsString::from(format!("+p{}", threads)));
    }
    args.push(conf_path.as_os_str().to_os_string());
    args
}

/// Runs the simulation on the prepared configuration and waits for it to exit.
///
/// Standard output and error go to the restart's `.log` and `.err` files. While
/// the process runs, the restart directory is polled at `config.poll_interval` and,
/// with backups enabled, its newest checkpoint triple is copied to backup names.
pub async fn run(
    config: &SimulationConfig,
    prepared: &PreparedRestart,
    spinner: &SimulationSpinner,
) -> Result<SimulationOutcome> {
    info!("Running NAMD with {} cores.", config.threads);
    let mut child = spawn(config, prepared)?;

    spinner.start(format!(
        "Running NAMD on {}",
        prepared.conf_path.display()
    ));
    let status = supervise(&mut child, config, &prepared.restart_dir, spinner).await;
    spinner.finish();
    let status = status?;
    debug!("NAMD exited with {}", status);

    let errors = std::fs::read_to_string(prepared.err_path())?;
    if errors.len() > 1 {
        Ok(SimulationOutcome::EndedWithErrors { status, errors })
    } else {
        Ok(SimulationOutcome::Finished { status })
    }
}

fn spawn(config: &SimulationConfig, prepared: &PreparedRestart) -> Result<Child> {
    let log = File::create(prepared.log_path())?;
    let err = File::create(prepared.err_path())?;
    let args = command_args(config.threads, &prepared.conf_path);
    debug!("Launching {} {:?}", config.executable, args);

    // The command owns the output handles and is dropped right after spawning.
    Command::new(&config.executable)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(err))
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => CliError::ExecutableMissing {
                executable: config.executable.clone(),
                source,
            },
            _ => CliError::Io(source),
        })
}

async fn supervise(
    child: &mut Child,
    config: &SimulationConfig,
    restart_dir: &Path,
    spinner: &SimulationSpinner,
) -> Result<ExitStatus> {
    let mut ticker = time::interval_at(Instant::now() + config.poll_interval, config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut backups = 0usize;

    loop {
        tokio::select! {
            status = child.wait() => return Ok(status?),
            _ = ticker.tick() => {
                trace!("NAMD still running.");
                if config.backup && backup_restart_files(restart_dir) {
                    backups += 1;
                    spinner.set_message(format!("Running NAMD ({} backups taken)", backups));
                }
            }
        }
    }
}

/// Copies the newest checkpoint triple in `directory` to backup names.
///
/// Failures are expected while the simulation rewrites its files and only skip
/// this round.
fn backup_restart_files(directory: &Path) -> bool {
    let set = match resolver::resolve(directory, &Reporter::silent()) {
        Ok(set) => set,
        Err(e) => {
            debug!("Skipping backup: {}", e);
            return false;
        }
    };
    match backup::backup_checkpoints(&set) {
        Ok(written) => {
            debug!("Backed up {} restart files.", written.len());
            !written.is_empty()
        }
        Err(e) => {
            debug!("Skipping backup: {}", e);
            false
        }
    }
}
