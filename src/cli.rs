use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leetwatch")]
#[command(about = "Tracks LeetCode progress and reports newly solved and newly published problems")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/leetwatch/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file (overrides data_file from the config)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Show debug output
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Refresh the stored snapshot if it is older than the ttl (default)
    Refresh(RefreshArgs),

    /// Display the stored snapshot
    Show(ShowArgs),

    /// Compare an older snapshot file against the stored one, without notifying
    Diff(DiffArgs),
}

#[derive(Parser, Default)]
pub struct RefreshArgs {
    /// LeetCode username to track
    #[arg(long)]
    pub user: Option<String>,

    /// Minimum snapshot age before refetching, e.g. "7m" or "1h"
    #[arg(long)]
    pub ttl: Option<String>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also list every solved problem
    #[arg(long, default_value_t = false)]
    pub solved: bool,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Older snapshot file to compare from
    #[arg(long)]
    pub against: PathBuf,
}
