use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tracediff",
    about = "Inspect snapshot hierarchies and property values with change indicators",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with [view] and [builder] tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a snapshot hierarchy, annotated against the previous snapshot
    Diff(DiffArgs),
    /// Show a raw JSON value as a property tree
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Snapshot tree (JSON) to display
    pub new: PathBuf,
    /// Previous snapshot to compare against
    #[arg(short, long)]
    pub previous: Option<PathBuf>,
    #[arg(long)]
    pub filter: Option<String>,
    #[arg(long)]
    pub only_visible: bool,
    #[arg(long)]
    pub flat: bool,
    #[arg(long)]
    pub simplify_names: bool,
    /// Node id to pin (repeatable)
    #[arg(long = "pin")]
    pub pins: Vec<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// JSON value to display
    pub new: PathBuf,
    /// Previous value to compare against
    #[arg(short, long)]
    pub previous: Option<PathBuf>,
    #[arg(long)]
    pub root_name: Option<String>,
}
