use crate::core::checkpoint::CheckpointSet;
use crate::core::checkpoint::resolver;
use crate::core::io::conf::ConfFile;
use crate::core::io::traits::{InputFile, OutputFile};
use crate::core::io::xsc;
use crate::engine::error::RestartError;
use crate::engine::report::{Reporter, RestartEvent};
use crate::engine::rewriter::ConfigRewriter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const CONF_EXTENSION: &str = ".conf";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Everything needed to prepare a restart.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareConfig {
    pub previous_dir: PathBuf,
    pub restart_dir: PathBuf,
    pub conf_path: Option<PathBuf>,
    pub file_name: Option<String>,
    pub run_steps: Option<u64>,
    pub extra_options: Vec<Vec<String>>,
}

#[derive(Default)]
pub struct PrepareConfigBuilder {
    previous_dir: Option<PathBuf>,
    restart_dir: Option<PathBuf>,
    conf_path: Option<PathBuf>,
    file_name: Option<String>,
    run_steps: Option<u64>,
    extra_options: Vec<Vec<String>>,
}

impl PrepareConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_dir(mut self, path: PathBuf) -> Self {
        self.previous_dir = Some(path);
        self
    }
    pub fn restart_dir(mut self, path: PathBuf) -> Self {
        self.restart_dir = Some(path);
        self
    }
    pub fn conf_path(mut self, path: Option<PathBuf>) -> Self {
        self.conf_path = path;
        self
    }
    pub fn file_name(mut self, name: Option<String>) -> Self {
        self.file_name = name;
        self
    }
    pub fn run_steps(mut self, steps: Option<u64>) -> Self {
        self.run_steps = steps;
        self
    }
    pub fn extra_options(mut self, options: Vec<Vec<String>>) -> Self {
        self.extra_options = options;
        self
    }

    pub fn build(self) -> Result<PrepareConfig, ConfigError> {
        Ok(PrepareConfig {
            previous_dir: self
                .previous_dir
                .ok_or(ConfigError::MissingParameter("previous_dir"))?,
            restart_dir: self
                .restart_dir
                .ok_or(ConfigError::MissingParameter("restart_dir"))?,
            conf_path: self.conf_path,
            file_name: self.file_name,
            run_steps: self.run_steps,
            extra_options: self.extra_options,
        })
    }
}

/// Result of a successful preparation, with everything needed to launch the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRestart {
    pub restart_dir: PathBuf,
    pub file_name: String,
    pub conf_path: PathBuf,
    pub last_step: u64,
    pub run_steps: Option<u64>,
    pub checkpoints: CheckpointSet,
}

impl PreparedRestart {
    /// Where the simulation's standard output goes.
    pub fn log_path(&self) -> PathBuf {
        self.restart_dir.join(format!("{}.log", self.file_name))
    }

    /// Where the simulation's standard error goes.
    pub fn err_path(&self) -> PathBuf {
        self.restart_dir.join(format!("{}.err", self.file_name))
    }
}

/// Prepares a restart of the run in `config.previous_dir` inside `config.restart_dir`.
///
/// Nothing is written unless every step up to the final save succeeds.
///
/// # Errors
///
/// Returns a [`RestartError`] describing the first step that failed.
pub fn run(config: &PrepareConfig, reporter: &Reporter) -> Result<PreparedRestart, RestartError> {
    let source_conf = match &config.conf_path {
        Some(path) => path.clone(),
        None => discover_configuration(&config.previous_dir, reporter)?,
    };

    let checkpoints = resolver::resolve(&config.previous_dir, reporter)?;
    let file_name = config
        .file_name
        .clone()
        .unwrap_or_else(|| checkpoints.output_name());

    let document =
        ConfFile::read_from_path(&source_conf).map_err(|source| RestartError::ReadConf {
            path: source_conf.clone(),
            source,
        })?;

    let last_step =
        xsc::read_last_step(checkpoints.xsc()).map_err(|source| RestartError::Xsc {
            path: checkpoints.xsc().to_path_buf(),
            source,
        })?;
    reporter.report(RestartEvent::RestartStep { step: last_step });

    let mut rewriter = ConfigRewriter::new(document, reporter);
    rewriter.insert_restart_block(
        last_step,
        &checkpoints,
        &config.restart_dir.join(&file_name),
    )?;
    let run_steps = rewriter.set_run_steps(last_step, config.run_steps);
    rewriter.apply_additional_options(&config.extra_options)?;
    let document = rewriter.into_document();

    prepare_output_directory(&config.restart_dir, reporter).map_err(|source| {
        RestartError::OutputDirectory {
            path: config.restart_dir.clone(),
            source,
        }
    })?;

    let conf_path = config.restart_dir.join(format!("{}{}", file_name, CONF_EXTENSION));
    reporter.report(RestartEvent::SavingConfiguration {
        path: conf_path.clone(),
    });
    ConfFile::write_to_path(&document, &conf_path).map_err(|source| RestartError::WriteConf {
        path: conf_path.clone(),
        source,
    })?;

    Ok(PreparedRestart {
        restart_dir: config.restart_dir.clone(),
        file_name,
        conf_path,
        last_step,
        run_steps,
        checkpoints,
    })
}

/// Finds the single `.conf` file anywhere under `directory`.
///
/// # Errors
///
/// Fails when there is no such file, more than one, or the directory cannot be walked.
pub fn discover_configuration(
    directory: &Path,
    reporter: &Reporter,
) -> Result<PathBuf, RestartError> {
    reporter.report(RestartEvent::SearchingConfiguration {
        directory: directory.to_path_buf(),
    });

    let mut candidates = Vec::new();
    if directory.is_dir() {
        for entry in WalkDir::new(directory).sort_by_file_name() {
            let entry = entry.map_err(|source| RestartError::Scan {
                directory: directory.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_file()
                && entry.file_name().to_string_lossy().ends_with(CONF_EXTENSION)
            {
                candidates.push(entry.into_path());
            }
        }
    }

    match candidates.len() {
        0 => Err(RestartError::ConfNotFound {
            directory: directory.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(RestartError::AmbiguousConf {
            directory: directory.to_path_buf(),
            candidates,
        }),
    }
}

/// Creates the restart folder if needed, warning when it already has content.
fn prepare_output_directory(path: &Path, reporter: &Reporter) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        reporter.report(RestartEvent::OutputDirectoryCreated {
            path: path.to_path_buf(),
        });
    } else if fs::read_dir(path)?.next().is_some() {
        reporter.report(RestartEvent::OutputDirectoryNotEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
