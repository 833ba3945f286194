use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 120;

/// Console spinner shown while the simulation runs.
pub struct SimulationSpinner {
    pb: ProgressBar,
}

impl SimulationSpinner {
    pub fn new(hidden: bool) -> Self {
        let target = if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let pb = ProgressBar::with_draw_target(None, target)
            .with_style(Self::spinner_style())
            .with_message("Running NAMD");
        Self { pb }
    }

    pub fn start(&self, message: impl Into<String>) {
        self.pb.set_message(message.into());
        self.pb
            .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.pb.set_message(message.into());
    }

    pub fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Drop for SimulationSpinner {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
