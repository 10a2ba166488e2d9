//! Command-line interface definitions.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "votegate", about = "Ledger-backed voting gateway", version)]
pub struct Cli {
    /// Configuration directory
    #[arg(long, default_value = "config", global = true)]
    pub config_dir: String,

    /// Use the in-memory ledger instead of the configured chain
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Listen port (overrides configuration)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create an organization on the ledger
    CreateOrg {
        /// Organization name
        name: String,
    },
    /// Create a poll under an organization
    CreatePoll {
        /// Owning organization id
        #[arg(long)]
        org: u64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Option label; repeat once per option
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        /// Image hash aligned with each option; repeat once per option
        #[arg(long = "image")]
        images: Vec<String>,
        /// Unix timestamp at which voting opens
        #[arg(long)]
        start: i64,
        /// Unix timestamp at which voting closes
        #[arg(long)]
        end: i64,
    },
    /// Cast a vote
    Vote {
        #[arg(long)]
        poll: u64,
        /// Zero-based option index
        #[arg(long)]
        option: u64,
    },
    /// Read per-option tallies for a poll
    Results {
        /// Poll id
        poll: u64,
    },
}
