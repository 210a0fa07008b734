pub mod config;
pub mod scan;
pub mod services;

use clap::{Parser, Subcommand};
use netpro_common::network::port::PortSelection;

#[derive(Parser)]
#[command(name = "netpro")]
#[command(about = "Network administration toolkit.", version)]
pub struct CommandLine {
    /// Suppress the banner and decorative output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep a host for open TCP ports
    #[command(alias = "s")]
    Scan {
        /// Hostname or IP literal to scan
        host: String,
        /// Ports to sweep: "443", "1-1000", "22,80,8000-8100", or a
        /// service name like "http"
        #[arg(short, long, default_value = "1-1000")]
        ports: PortSelection,
        /// Per-probe timeout in milliseconds (overrides settings)
        #[arg(long)]
        timeout: Option<u64>,
        /// Maximum probes in flight at once (overrides settings)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// List well-known service ports
    #[command(alias = "ls")]
    Services,
    /// Show or update persisted settings
    #[command(alias = "c")]
    Config {
        /// Persist a new per-probe timeout in milliseconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Persist a new concurrency cap
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
