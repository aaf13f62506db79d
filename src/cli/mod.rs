// src/cli/mod.rs — CLI definition (clap derive)

pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vonk", about = "Cross-tool personalization context engine", version)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the context API server (default command)
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show store statistics (stored contexts, mirrored events)
    Status,
    /// Print the stored context snapshot for a user
    Inspect {
        /// User id to look up
        user_id: String,
    },
}
