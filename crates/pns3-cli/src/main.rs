//! PNS3 CLI - Bounds on the probabilities of causation.

use anyhow::Context;
use clap::Parser;
use pns3_cli::commands;
use pns3_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().context("loading ~/.pns3/config.toml")?,
    };

    let mut settings = config.settings;
    if let Some(format) = cli.format {
        settings.format = format.into();
    }
    if let Some(precision) = cli.precision {
        settings.precision = precision;
    }
    settings.validate()?;

    let color_enabled = !cli.no_color && settings.color;
    let formatter = Formatter::new(settings.format, color_enabled, settings.precision);

    let output = match cli.command {
        Command::Bounds(args) => commands::execute_bounds(args, &formatter)?,
        Command::Merge(args) => commands::execute_merge(args, &formatter)?,
        Command::Study(args) => commands::execute_study(args, &formatter)?,
        Command::Demo => commands::execute_demo(&formatter)?,
    };
    println!("{}", output);

    Ok(())
}

/// Log to stderr: warn by default, `-v` info, `-vv` debug; `RUST_LOG` wins.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
