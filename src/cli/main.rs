//! Command-line interface entry point for `gpaplanner`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use commands::transcript::TranscriptOptions;
use gpa_planner::config::Config;
use logger::{enable_debug, enable_verbose, error, info, init_file_logging, set_level, Level};
use std::path::PathBuf;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path =
        (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Transcript {
            input_file,
            grades,
            json,
            export,
            report,
        } => {
            let options = TranscriptOptions {
                grades,
                json,
                export,
                report,
            };
            commands::transcript::run(&input_file, &options, &config, verbose)
        }
        Command::Solve {
            baseline,
            export,
            question,
        } => commands::solve::run(&baseline, &question, export, &config, verbose),
        Command::Trajectory {
            input_file,
            transcript,
            json,
        } => commands::trajectory::run(&input_file, transcript.as_deref(), json, &config),
    };

    if let Err(message) = result {
        error!("Command failed");
        eprintln!("{message}");
        std::process::exit(1);
    }
}
