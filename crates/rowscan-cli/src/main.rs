//! `rowscan` command-line tool.

use clap::{ColorChoice, Parser};
use rowscan_cli::logging::{LogConfig, init_logging};
use std::io::{self, IsTerminal};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_copy, run_count, run_preview};
use crate::summary::{print_count, print_preview};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error:#}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Preview(args) => run_preview(args).map(|preview| print_preview(&preview)),
        Command::Copy(args) => run_copy(args).map(|rows| {
            if args.output.is_some() {
                eprintln!("copied {rows} rows");
            }
        }),
        Command::Count(args) => run_count(args).map(print_count),
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = cli
        .log_level
        .unwrap_or_else(|| cli.verbosity.tracing_level_filter());
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(cli.log_format)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
