//! colcmp CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::error;
use tracing::level_filters::LevelFilter;

use colcmp_cli::cache::CacheStore;
use colcmp_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use colcmp_cli::commands::{run_cache, run_columns, run_compare, run_group};
use colcmp_cli::logging::{LogConfig, LogFormat, init_logging};
use colcmp_cli::summary::{print_cache, print_columns, print_compare_summary, print_group_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let cache = CacheStore::resolve(cli.cache_dir.clone());
    match &cli.command {
        Command::Compare(args) => {
            let result = run_compare(args, &cache)?;
            print_compare_summary(&result, args.output.preview_rows);
        }
        Command::Group(args) => {
            let result = run_group(args, &cache)?;
            print_group_summary(&result, args.output.preview_rows);
        }
        Command::Columns(args) => print_columns(&run_columns(args)?),
        Command::Cache { action } => print_cache(&run_cache(*action, &cache)?),
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_level_filter(cli.verbosity.tracing_level_filter())
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config.with_ansi(with_ansi)
}
