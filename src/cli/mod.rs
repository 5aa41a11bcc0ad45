//! CLI module for the Deckroom Gateway
//!
//! Provides subcommands for running the gateway:
//! - `serve`: run the HTTP API server

pub mod serve;

use clap::{Parser, Subcommand};

/// Deckroom Gateway - visitor routing workflows for shared documents
#[derive(Parser)]
#[command(name = "deckroom-gateway")]
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
