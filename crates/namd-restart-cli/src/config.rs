mod defaults;
mod models;

pub use defaults::DefaultsConfig;
pub use models::{AppConfig, SimulationConfig};

use crate::cli::Cli;
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use namdrestart::workflows::prepare::PrepareConfigBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSimulationConfig {
    executable: Option<String>,
    threads: Option<usize>,
    backup: Option<bool>,
    poll_interval_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAppConfig {
    simulation: Option<PartialSimulationConfig>,
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `explicit`, or the per-user config file when present, or nothing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match user_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No configuration file found, using built-in defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli(self, cli: &Cli) -> Result<AppConfig> {
        let defaults = DefaultsConfig::default();

        let prepare = PrepareConfigBuilder::new()
            .previous_dir(cli.previous.clone())
            .restart_dir(cli.restart.clone())
            .conf_path(cli.conf.clone())
            .file_name(cli.file_name.clone())
            .run_steps(cli.run)
            .extra_options(cli.option_groups.clone())
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        if cli.no_namd {
            return Ok(AppConfig {
                prepare,
                simulation: None,
            });
        }

        let file = self.simulation.unwrap_or_default();

        let threads = cli
            .threads
            .or(file.threads)
            .unwrap_or(defaults.threads);
        if threads == 0 {
            return Err(CliError::Config(
                "The number of threads must be at least 1.".to_string(),
            ));
        }

        let poll_interval_secs = file
            .poll_interval_secs
            .unwrap_or(defaults.poll_interval_secs);
        if poll_interval_secs == 0 {
            return Err(CliError::Config(
                "'poll-interval-secs' must be at least 1.".to_string(),
            ));
        }

        Ok(AppConfig {
            prepare,
            simulation: Some(SimulationConfig {
                executable: cli
                    .namd_exe
                    .clone()
                    .or(file.executable)
                    .unwrap_or(defaults.executable),
                threads,
                backup: cli.backup || file.backup.unwrap_or(defaults.backup),
                poll_interval: Duration::from_secs(poll_interval_secs),
            }),
        })
    }
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "namd-restart", "namd-restart")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
