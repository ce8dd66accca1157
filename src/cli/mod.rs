//! CLI module for keymint

pub mod serve;

use clap::{Parser, Subcommand};

/// keymint - API key issuance and lifecycle management service
#[derive(Parser)]
#[command(name = "keymint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
