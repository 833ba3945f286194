use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "namd-restart",
    version,
    about = "Automatically restart NAMD dynamics from the last valid restart files.",
    override_usage = "namd-restart -i <path/to/previous_run/> -o <path/to/restart_output/>",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    // --- Required ---
    /// Previous dynamic folder.
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    pub previous: PathBuf,

    /// Restart output folder.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub restart: PathBuf,

    // --- Restart options ---
    /// Previous .conf file. Searched for in the previous dynamic folder when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub conf: Option<PathBuf>,

    /// Name for the output files. Taken from the restart files when omitted.
    #[arg(short, long, value_name = "NAME")]
    pub file_name: Option<String>,

    /// Number of steps to run. Defaults to the steps left over from the previous run.
    #[arg(short, long, value_name = "STEPS")]
    pub run: Option<u64>,

    /// Additional option to include in the .conf file. Can be used multiple times.
    /// Example: -a langevinTemp 300 -a set temperature 300
    #[arg(short = 'a', long = "add-options", value_name = "OPTION", num_args(1..))]
    pub options: Vec<String>,

    /// The `--add-options` values, one group per occurrence.
    #[arg(skip)]
    pub option_groups: Vec<Vec<String>>,

    // --- Simulation ---
    /// Path to the NAMD executable [default: namd].
    #[arg(short = 'e', long, value_name = "PATH")]
    pub namd_exe: Option<String>,

    /// Do not run NAMD once the .conf file is ready.
    #[arg(short = 'N', long)]
    pub no_namd: bool,

    /// Back up the restart files periodically while NAMD runs.
    #[arg(short = 'B', long)]
    pub backup: bool,

    /// Number of cores NAMD runs on [default: 1].
    #[arg(short, long, value_name = "NUM")]
    pub threads: Option<usize>,

    // --- Ambient ---
    /// Increase verbosity level (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// TOML file with default simulation settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses the process arguments, exiting with a usage message on error.
    pub fn parse_grouped() -> Self {
        Self::try_parse_grouped_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parses `args`, keeping the values of each `-a` occurrence together.
    pub fn try_parse_grouped_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;
        cli.option_groups = option_groups(&matches);
        Ok(cli)
    }
}

fn option_groups(matches: &ArgMatches) -> Vec<Vec<String>> {
    matches
        .get_occurrences::<String>("options")
        .map(|occurrences| {
            occurrences
                .map(|values| values.cloned().collect())
                .collect()
        })
        .unwrap_or_default()
}
