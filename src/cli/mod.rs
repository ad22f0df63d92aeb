//! Command-line interface

pub mod serve;

use clap::{Parser, Subcommand};

/// Person Registry - REST service for user and admin records
#[derive(Parser)]
#[command(name = "person-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}
