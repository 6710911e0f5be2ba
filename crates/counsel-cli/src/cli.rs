use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "counsel")]
#[command(about = "Session client for the Counsel legal practice platform")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides api.base_url from config.toml)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
