use namdrestart::workflows::prepare::PrepareConfig;
use std::time::Duration;

pub struct AppConfig {
    pub prepare: PrepareConfig,
    /// `None` when the simulation is not to be launched.
    pub simulation: Option<SimulationConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    pub executable: String,
    pub threads: usize,
    pub backup: bool,
    pub poll_interval: Duration,
}
