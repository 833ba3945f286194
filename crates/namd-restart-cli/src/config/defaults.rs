/// Built-in values used when neither the command line nor the config file sets them.
pub struct DefaultsConfig {
    pub executable: String,
    pub threads: usize,
    pub backup: bool,
    pub poll_interval_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            executable: "namd".to_string(),
            threads: 1,
            backup: false,
            poll_interval_secs: 300,
        }
    }
}
