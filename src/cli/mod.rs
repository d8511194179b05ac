//! Command-line interface. `serve` is the default when no subcommand is
//! given.

use clap::{Parser, Subcommand};

/// Rostrum - API gateway for the party website
/// Proxies front-end requests to the backend that owns the data
#[derive(Parser)]
#[command(name = "rostrum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the gateway server
    #[command(alias = "-s", alias = "--serve")]
    Serve,

    /// Probe the configured upstream once and report reachability
    #[command(alias = "-c", alias = "--check")]
    Check,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}
