//! CLI interface for monsync.
//!
//! There are no subcommands: running the binary performs one sync.

mod commands;
mod utils;

use clap::Parser;
use std::path::PathBuf;

use crate::SyncResult;

pub use commands::*;
pub use utils::*;

#[derive(Parser, Debug)]
#[command(name = "monsync")]
#[command(about = "Synchronize Zabbix templates, external scripts and Grafana dashboards from git")]
#[command(version)]
pub struct Cli {
    /// Configuration file (JSON, or TOML with a .toml extension)
    #[arg(long, short = 'c', env = "MONSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reuse this directory for checkouts instead of a fresh temp dir
    #[arg(long, short = 'w')]
    pub work_dir: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Treat configuration warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Run one sync
    pub async fn run(self) -> SyncResult<()> {
        sync(self.config, self.work_dir, self.strict).await
    }
}
