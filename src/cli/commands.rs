use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chronic",
    about = concat!("chronic v", env!("CARGO_PKG_VERSION"), " - keyboard-first tasks and projects"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Workspace file to open
    #[arg(short = 'w', long, global = true, default_value = "chronic.json")]
    pub workspace: PathBuf,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the key bindings
    Keys(KeysArgs),
    /// Validate the config and workspace files
    Check(CheckArgs),
}

#[derive(Args)]
pub struct KeysArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
