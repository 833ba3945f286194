mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod simulation;
mod utils;

use crate::cli::Cli;
use crate::config::PartialAppConfig;
use crate::error::{CliError, Result};
use tracing::{debug, error, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_grouped();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone()) {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }

    let result = tokio::select! {
        result = run_app(cli) => result,
        _ = interrupted() => Err(CliError::Interrupted),
    };

    if let Err(e) = result {
        match e {
            CliError::Interrupted => error!("{}", e),
            _ => {
                error!("❌ Command failed: {}", e);
                eprintln!("\n❌ Error: {}", e);
            }
        }
        std::process::exit(1);
    }
}

async fn run_app(cli: Cli) -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    debug!(
        "namd-restart v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let partial_config = PartialAppConfig::load(cli.config.as_deref())?;
    let app_config = partial_config.merge_with_cli(&cli)?;

    commands::restart::run(app_config, cli.quiet).await
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for interrupts: {}", e);
        std::future::pending::<()>().await;
    }
}
