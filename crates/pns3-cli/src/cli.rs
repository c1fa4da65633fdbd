//! CLI command definitions and argument parsing.

use clap::{ArgAction, Args, Parser, Subcommand};
use pns3_domain::Assumptions;
use std::path::PathBuf;

/// PNS3 - Bounds on the probabilities of causation from observational and
/// experimental data.
#[derive(Debug, Parser)]
#[command(name = "pns3")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Decimal places for printed probabilities
    #[arg(short, long, global = true)]
    pub precision: Option<usize>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PNS3_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Plain-text report (default)
    Text,
    /// JSON format
    Json,
    /// Table format
    Table,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute PNS3 bounds for each stratum of a scenario, or for one
    /// stratum given inline
    Bounds(BoundsArgs),

    /// Merge the admissible E_{y|x} bounds of a two-stratum scenario
    Merge(ScenarioArgs),

    /// Run a two-stratum scenario through a study session
    Study(ScenarioArgs),

    /// Run the built-in female/male worked example
    Demo,
}

/// Arguments for the bounds command.
#[derive(Debug, Args)]
pub struct BoundsArgs {
    /// Scenario file (TOML or JSON)
    #[arg(conflicts_with_all = ["o1b0", "o1b1", "px1", "e1b0", "e1b1"])]
    pub file: Option<PathBuf>,

    /// O_{1|0}: observed P(y=1 | x=0)
    #[arg(long, requires_all = ["o1b1", "px1"])]
    pub o1b0: Option<f64>,

    /// O_{1|1}: observed P(y=1 | x=1)
    #[arg(long, requires_all = ["o1b0", "px1"])]
    pub o1b1: Option<f64>,

    /// P(x=1): observed share of treated units
    #[arg(long, requires_all = ["o1b0", "o1b1"])]
    pub px1: Option<f64>,

    /// E_{1|0}: experimental P(y=1 | do(x=0))
    #[arg(long, requires = "e1b1")]
    pub e1b0: Option<f64>,

    /// E_{1|1}: experimental P(y=1 | do(x=1))
    #[arg(long, requires = "e1b0")]
    pub e1b1: Option<f64>,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

/// Arguments naming a scenario file.
#[derive(Debug, Args)]
pub struct ScenarioArgs {
    /// Scenario file (TOML or JSON)
    pub file: PathBuf,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

/// Assumption flags, added to any assumptions a scenario file declares.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct AssumptionArgs {
    /// Assume monotonicity: no unit is harmed by treatment
    #[arg(long)]
    pub monotonicity: bool,

    /// Assume exogeneity: no confounding between X and Y
    #[arg(long)]
    pub exogeneity: bool,

    /// Assume strong exogeneity (implies exogeneity)
    #[arg(long)]
    pub strong_exogeneity: bool,
}

impl AssumptionArgs {
    /// Combine the flags with a base set of assumptions.
    pub fn apply_to(&self, base: Assumptions) -> Assumptions {
        base.with_monotonicity(base.monotonicity() || self.monotonicity)
            .with_exogeneity(base.exogeneity() || self.exogeneity)
            .with_strong_exogeneity(base.strong_exogeneity() || self.strong_exogeneity)
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Table => crate::config::OutputFormat::Table,
        }
    }
}
