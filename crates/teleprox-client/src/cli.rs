//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ClientConfig;

/// teleprox - inspect and drive remote objects on a control server
#[derive(Debug, Parser)]
#[command(name = "teleprox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "TELEPROX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server host
    #[arg(long, env = "TELEPROX_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "TELEPROX_PORT")]
    pub port: Option<u16>,

    /// Socket deadline in seconds (0 waits forever)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the objects exposed at the top level
    Objects,

    /// Show the API of a remote object
    Api {
        /// Object name (omit for the top-level object)
        #[arg(default_value = "")]
        object: String,
    },

    /// Call a method on a remote object
    Call {
        /// Object name
        object: String,
        /// Method name
        method: String,
        /// Arguments, parsed as JSON (bare words become strings)
        args: Vec<String>,
    },

    /// Read a property of a remote object
    Get {
        /// Object name
        object: String,
        /// Property name
        property: String,
    },

    /// Write a property of a remote object
    Set {
        /// Object name
        object: String,
        /// Property name
        property: String,
        /// New value, parsed as JSON (bare words become strings)
        value: String,
    },
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn effective_config(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config
    }
}
