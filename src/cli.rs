use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Soil water balance model.
#[derive(Parser)]
#[command(name = "swbm", version, about = "Single-reservoir soil water balance model")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate one parameter set, score it and export the trajectory.
    Run(RunArgs),
    /// Simulate and score every parameter set listed in the config.
    Sweep(SweepArgs),
    /// Simulate one parameter set and chart the trajectory.
    Plot(PlotArgs),
}

/// Input and evaluation window overrides shared by all subcommands.
#[derive(clap::Args)]
pub struct CommonArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "swbm.toml")]
    pub config: PathBuf,

    /// Override the raw input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Start of the evaluation window (YYYY-MM-DD, inclusive).
    #[arg(long)]
    pub start: Option<String>,

    /// End of the evaluation window (YYYY-MM-DD, inclusive).
    #[arg(long)]
    pub end: Option<String>,

    /// Simulate only the first N days.
    #[arg(short = 'n', long = "n-days")]
    pub n_days: Option<usize>,
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override the output CSV path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Restrict the exported rows to one calendar year.
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(clap::Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args)]
pub struct PlotArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Chart file; the extension picks the format (svg, png, pdf).
    #[arg(short, long, default_value = "swbm.svg")]
    pub output: PathBuf,

    /// Chart one calendar year instead of the whole run.
    #[arg(long)]
    pub year: Option<i32>,
}
