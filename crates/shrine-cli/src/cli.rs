use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "shrineplan - Plans stat builds around the shrine, keeping as many points unspent as possible.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the build that satisfies every requirement with the most points left over.
    Optimize(OptimizeArgs),
    /// Run the shrine on an explicit pre-shrine allocation.
    Simulate(SimulateArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Rule overrides shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RulesArgs {
    /// Path to a rules file in TOML format. Falls back to the user's default rules file.
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Override the total point budget.
    #[arg(long, value_name = "INT")]
    pub max_total_points: Option<u32>,

    /// Override the highest value any stat may end at.
    #[arg(long, value_name = "INT")]
    pub max_stat_value: Option<u32>,

    /// Override how far below its investment an ordinary stat may fall in the shrine.
    #[arg(long, value_name = "INT")]
    pub bottleneck_limit: Option<u32>,

    /// Set a specific rules value, overriding the rules file and flags.
    /// Can be used multiple times. Example: -S shrine.bottleneck-limit=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `optimize` subcommand.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Path to a requirements file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Add a requirement. Can be used multiple times.
    /// Example: -r Strength=40:pre -r Agility=30 (no condition means 'any')
    #[arg(short = 'r', long = "require", value_name = "NAME=VALUE[:COND]")]
    pub requirements: Vec<String>,

    #[command(flatten)]
    pub rules: RulesArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `simulate` subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Points invested in a stat before the shrine. Can be used multiple times.
    /// Example: -a Strength=60 -a Agility=1
    #[arg(short = 'a', long = "allocate", value_name = "NAME=POINTS", required = true)]
    pub allocations: Vec<String>,

    #[command(flatten)]
    pub rules: RulesArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
