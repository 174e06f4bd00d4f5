//! CLI argument definitions for `gpaplanner`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gpa_planner::config::ConfigOverrides;
use logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key (e.g., `level`, `exports_dir`, `major_credits`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Reset one configuration value to its default.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (asks for confirmation).
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SolveCommand {
    /// Semester average needed to reach a target CGPA.
    Required {
        /// Credits taken this semester
        #[arg(long, value_name = "N")]
        credits: f64,
        /// Target CGPA
        #[arg(long, value_name = "X")]
        target: f64,
    },
    /// CGPA after a semester at a given average.
    Project {
        /// Expected semester average
        #[arg(long, value_name = "X")]
        average: f64,
        /// Credits taken this semester
        #[arg(long, value_name = "N")]
        credits: f64,
    },
    /// Credits needed at a maintained average to reach a target CGPA.
    Credits {
        /// Target CGPA
        #[arg(long, value_name = "X")]
        target: f64,
        /// Average maintained from now on
        #[arg(long, value_name = "Y")]
        average: f64,
    },
}

/// Where the solver baseline comes from
#[derive(Debug, Clone, clap::Args)]
pub struct BaselineArgs {
    /// Take the baseline from a transcript dump
    #[arg(long, value_name = "FILE", conflicts_with_all = ["cgpa", "credits_done"])]
    pub transcript: Option<PathBuf>,

    /// Current CGPA
    #[arg(long, value_name = "X", requires = "credits_done")]
    pub cgpa: Option<f64>,

    /// Credits the current CGPA is weighted by
    #[arg(long, value_name = "N", requires = "cgpa")]
    pub credits_done: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Parse a transcript dump and compute the retake-aware CGPA.
    Transcript {
        /// Transcript text file (copied from the student portal)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Hypothetical grade for a current-semester row (0-based), e.g. `2=A-`
        #[arg(short, long = "grade", value_name = "ROW=GRADE")]
        grades: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Write a JSON snapshot to the exports directory
        #[arg(long)]
        export: bool,

        /// Write a report (format from the extension: .md or .json)
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },
    /// Answer CGPA what-if questions.
    Solve {
        #[command(flatten)]
        baseline: BaselineArgs,

        /// Write the transcript snapshot with this answer attached
        #[arg(long, requires = "transcript")]
        export: bool,

        #[command(subcommand)]
        question: SolveCommand,
    },
    /// Evaluate a TOML trajectory against the degree requirements.
    Trajectory {
        /// Trajectory TOML file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Project planned grades on top of this transcript's history
        #[arg(long, value_name = "FILE")]
        transcript: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gpaplanner",
    about = "Transcript GPA resolution and CGPA planning",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config exports directory
    #[arg(long = "config-exports-dir", value_name = "DIR")]
    pub config_exports_dir: Option<PathBuf>,

    /// Override config exports directory (short form)
    #[arg(long = "exports-dir", value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--exports-dir`) take precedence over
    /// long-form flags (e.g., `--config-exports-dir`) when both are given.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            exports_dir: path_string(self.exports_dir.as_ref())
                .or_else(|| path_string(self.config_exports_dir.as_ref())),
            reports_dir: path_string(self.reports_dir.as_ref())
                .or_else(|| path_string(self.config_reports_dir.as_ref())),
        }
    }
}
