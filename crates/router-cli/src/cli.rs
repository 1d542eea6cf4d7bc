//! CLI argument definitions for the inference router.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use clap::{Parser, Subcommand};

/// Inference router -- intent analysis and tool dispatch over an
/// OpenAI-compatible chat-completion endpoint.
#[derive(Parser)]
#[command(
    name = "router",
    version,
    about = "Inference router -- intent analysis and tool dispatch",
    long_about = "Analyzes chat messages for tool-using intent, validates LLM replies, and \
                  dispatches to registered tools, all behind an OpenAI-compatible HTTP endpoint."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Address to bind the HTTP server to.
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on.
        #[arg(long, short)]
        port: Option<u16>,

        /// Path to a YAML configuration file (defaults to `$ROUTER_CONFIG_PATH`
        /// or `config.yaml`).
        #[arg(long)]
        config: Option<String>,
    },

    /// Initialize the tool registry and report each tool's health.
    Status {
        /// Path to a YAML configuration file (defaults to `$ROUTER_CONFIG_PATH`
        /// or `config.yaml`).
        #[arg(long)]
        config: Option<String>,
    },
}
