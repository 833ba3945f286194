use crate::core::checkpoint::{Generation, Role};
use std::fmt;
use std::path::PathBuf;

/// How loudly an event should be surfaced by whoever listens to the [`Reporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// Everything the restart preparation has to say while it works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartEvent {
    SearchingConfiguration { directory: PathBuf },
    SearchingCheckpoints { directory: PathBuf },
    CheckpointsNotFound { directory: PathBuf },
    CheckpointsUnusable { directory: PathBuf },
    GenerationRejected { generation: Generation, empty_file: PathBuf },
    GenerationFallback { generation: Generation },
    UnrecognizedCheckpoint { path: PathBuf },
    DuplicateCheckpoint { role: Role, path: PathBuf },
    CheckpointsReady { generation: Generation },
    RestartStep { step: u64 },
    OutputDirectoryCreated { path: PathBuf },
    OutputDirectoryNotEmpty { path: PathBuf },
    PreparingConfiguration,
    DirectiveNotFound { keyword: String },
    RunStepsUnreadable { line: String },
    SettingRunSteps { steps: u64 },
    SettingParameter { directive: String },
    SavingConfiguration { path: PathBuf },
}

impl RestartEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::GenerationRejected { .. } | Self::OutputDirectoryCreated { .. } => {
                Severity::Debug
            }
            Self::SearchingConfiguration { .. }
            | Self::SearchingCheckpoints { .. }
            | Self::CheckpointsReady { .. }
            | Self::RestartStep { .. }
            | Self::PreparingConfiguration
            | Self::SettingRunSteps { .. }
            | Self::SettingParameter { .. }
            | Self::SavingConfiguration { .. } => Severity::Info,
            Self::GenerationFallback { .. }
            | Self::OutputDirectoryNotEmpty { .. }
            | Self::DirectiveNotFound { .. }
            | Self::RunStepsUnreadable { .. } => Severity::Warning,
            Self::UnrecognizedCheckpoint { .. } | Self::DuplicateCheckpoint { .. } => {
                Severity::Error
            }
            Self::CheckpointsNotFound { .. } | Self::CheckpointsUnusable { .. } => {
                Severity::Critical
            }
        }
    }
}

impl fmt::Display for RestartEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearchingConfiguration { directory } => {
                write!(f, "Searching conf file in {}.", directory.display())
            }
            Self::SearchingCheckpoints { directory } => {
                write!(f, "Searching restart files in {}.", directory.display())
            }
            Self::CheckpointsNotFound { .. } => write!(f, "Restart files not found. Aborting!"),
            Self::CheckpointsUnusable { .. } => {
                write!(f, "Restart files empty or missing. Aborting!")
            }
            Self::GenerationRejected {
                generation,
                empty_file,
            } => write!(
                f,
                "Skipping {} restart files: {} is empty.",
                generation,
                empty_file.display()
            ),
            Self::GenerationFallback { generation } => write!(
                f,
                "Restart files empty or missing, using {} restart files.",
                generation
            ),
            Self::UnrecognizedCheckpoint { path } => {
                write!(f, "Unrecognized restart file: {}.", path.display())
            }
            Self::DuplicateCheckpoint { role, path } => {
                write!(f, "Another {} restart file found: {}.", role, path.display())
            }
            Self::CheckpointsReady { generation } => {
                write!(f, "Restart files ready ({} generation).", generation)
            }
            Self::RestartStep { step } => write!(f, "Using restart step {}.", step),
            Self::OutputDirectoryCreated { path } => {
                write!(f, "Created output folder {}.", path.display())
            }
            Self::OutputDirectoryNotEmpty { .. } => {
                write!(f, "Output folder not empty. Overwriting.")
            }
            Self::PreparingConfiguration => write!(f, "Preparing .conf file."),
            Self::DirectiveNotFound { keyword } => {
                write!(f, "Option \"{}\" not found. Ignoring.", keyword)
            }
            Self::RunStepsUnreadable { line } => write!(
                f,
                "Could not read the step count from \"{}\". Keeping it unchanged.",
                line.trim_end()
            ),
            Self::SettingRunSteps { steps } => write!(f, "Setting run steps to {}.", steps),
            Self::SettingParameter { directive } => {
                write!(f, "Setting parameter \"{}\".", directive)
            }
            Self::SavingConfiguration { path } => {
                write!(f, "Saving .conf file at {}.", path.display())
            }
        }
    }
}

pub type ReportCallback<'a> = Box<dyn Fn(&RestartEvent) + Send + Sync + 'a>;

/// Logging port handed to the resolver and rewriter.
///
/// A reporter built with [`Reporter::new`] (or [`Reporter::silent`]) swallows every
/// event, which is how the backup poller keeps its repeated scans quiet.
#[derive(Default)]
pub struct Reporter<'a> {
    callback: Option<ReportCallback<'a>>,
}

impl<'a> Reporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ReportCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }

    #[inline]
    pub fn report(&self, event: RestartEvent) {
        if let Some(cb) = &self.callback {
            cb(&event);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::recording_reporter;
    use super::*;

    #[test]
    fn silent_reporter_drops_events() {
        let reporter = Reporter::silent();
        assert!(reporter.is_silent());
        reporter.report(RestartEvent::PreparingConfiguration);
    }

    #[test]
    fn callback_receives_events_in_order() {
        let (reporter, events) = recording_reporter();
        reporter.report(RestartEvent::PreparingConfiguration);
        reporter.report(RestartEvent::RestartStep { step: 7 });

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                RestartEvent::PreparingConfiguration,
                RestartEvent::RestartStep { step: 7 }
            ]
        );
    }

    #[test]
    fn fallback_generations_are_warnings() {
        let event = RestartEvent::GenerationFallback {
            generation: Generation::Aged,
        };
        assert_eq!(event.severity(), Severity::Warning);
        assert_eq!(
            event.to_string(),
            "Restart files empty or missing, using old restart files."
        );
    }

    #[test]
    fn missing_directive_message_quotes_the_keyword() {
        let event = RestartEvent::DirectiveNotFound {
            keyword: "reinitvels".to_string(),
        };
        assert_eq!(event.to_string(), "Option \"reinitvels\" not found. Ignoring.");
    }
}
