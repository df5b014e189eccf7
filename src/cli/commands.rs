//! CLI commands

use clap::{Parser, Subcommand};

/// View-Tally CLI
#[derive(Parser)]
#[command(name = "view-tally")]
#[command(about = "Cooldown-deduplicated view counting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run synthetic view traffic through an in-memory service
    Simulate {
        /// Number of distinct clients
        #[arg(long, default_value = "50")]
        clients: usize,
        /// Number of registered resources
        #[arg(long, default_value = "20")]
        resources: usize,
        /// Total views to submit
        #[arg(long, default_value = "10000")]
        views: u64,
        /// Cooldown between countable views, in seconds
        #[arg(long, default_value = "300")]
        cooldown_secs: u64,
        /// Simulated time step between consecutive views, in milliseconds
        #[arg(long, default_value = "250")]
        step_ms: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Encode a numeric identifier as a base36 public id
    Encode {
        /// Numeric identifier
        id: u64,
    },
    /// Decode a base36 public id back to its numeric identifier
    Decode {
        /// Public identifier
        id: String,
    },
}
