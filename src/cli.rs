//! Command-line interface for congo_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Congo game server
#[derive(Parser, Debug)]
#[command(name = "congo_server")]
#[command(about = "Turn-based Congo match server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP action server
    Serve {
        /// Path to the server configuration file
        #[arg(short, long, default_value = "congo.toml")]
        config: PathBuf,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the server configuration file
        #[arg(short, long, default_value = "congo.toml")]
        config: PathBuf,

        /// Path to the database file
        #[arg(long)]
        db_path: Option<String>,
    },
}
