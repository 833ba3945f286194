use crate::error::{CliError, Result};
use namdrestart::engine::report::{Reporter, RestartEvent, Severity};
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true);

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Forwards restart events from the core library to `tracing`.
pub fn event_reporter() -> Reporter<'static> {
    Reporter::with_callback(Box::new(|event: &RestartEvent| match event.severity() {
        Severity::Debug => debug!("{}", event),
        Severity::Info => info!("{}", event),
        Severity::Warning => warn!("{}", event),
        Severity::Error => error!("{}", event),
        Severity::Critical => error!(critical = true, "{}", event),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::Path;
    use std::sync::Once;
    use tracing::trace;

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(2, false, None).expect("Failed to set up global logger for tests");
        });
    }

    fn file_subscriber(path: &Path) -> impl tracing::Subscriber + Send + Sync {
        let file = File::create(path).unwrap();
        tracing_subscriber::registry()
            .with(LevelFilter::TRACE)
            .with(fmt::layer().with_writer(file).with_ansi(false))
    }

    #[test]
    fn verbosity_maps_onto_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::INFO);
        assert_eq!(level_filter(1, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(5, false), LevelFilter::TRACE);
        assert_eq!(level_filter(2, true), LevelFilter::ERROR);
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn reporter_forwards_events_with_their_severity() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("events.log");

        tracing::subscriber::with_default(file_subscriber(&log_path), || {
            let reporter = event_reporter();
            reporter.report(RestartEvent::RestartStep { step: 400 });
            reporter.report(RestartEvent::DirectiveNotFound {
                keyword: "minimize".to_string(),
            });
            reporter.report(RestartEvent::CheckpointsUnusable {
                directory: PathBuf::from("prod"),
            });
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("INFO"));
        assert!(content.contains("Using restart step 400."));
        assert!(content.contains("WARN"));
        assert!(content.contains("Option \"minimize\" not found. Ignoring."));
        assert!(content.contains("ERROR"));
        assert!(content.contains("critical=true"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
