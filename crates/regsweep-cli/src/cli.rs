use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "regsweep",
    about = "regsweep — remove images only stale registry tags still reference",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file; command-line flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Collect images referenced only by stale tags (dry run unless --execute)
    Sweep(SweepArgs),
    /// List tags with their current image and last update
    Tags(TagsArgs),
}

#[derive(Args)]
pub struct SweepArgs {
    /// Registry store root
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Tags not updated for this many days are stale
    #[arg(long)]
    pub retention_days: Option<u64>,
    /// Actually delete images instead of reporting
    #[arg(long)]
    pub execute: bool,
}

#[derive(Args)]
pub struct TagsArgs {
    /// Registry store root
    #[arg(long)]
    pub root: Option<PathBuf>,
}
