//! CLI entry point for the inference router.
//!
//! Provides the `router` command with two subcommands: `serve`, which runs
//! the HTTP endpoint, and `status`, which initializes the tool registry and
//! reports each tool's health.

mod cli;
mod helpers;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use router_agent::RegistryInit;
use router_kernel::Tool;
use router_tools::ProjectsTool;
use router_web::{AppConfig, AppState, WebServer};

use crate::cli::{Cli, Commands};
use crate::helpers::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, port, config } => cmd_serve(bind, port, config).await,
        Commands::Status { config } => cmd_status(config).await,
    }
}

fn load_config(config: Option<String>) -> AppConfig {
    AppConfig::load(config.as_deref().map(PathBuf::from).as_deref())
}

async fn cmd_serve(bind: Option<String>, port: Option<u16>, config: Option<String>) -> Result<()> {
    init_tracing("info");

    let mut config = load_config(config);
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!(
        bind = %config.server.bind_addr,
        port = config.server.port,
        model = %config.llm.model,
        "starting inference router"
    );

    let state = AppState::new(config);
    let server = WebServer::new(state);

    println!();
    println!("  Inference router v{}", env!("CARGO_PKG_VERSION"));
    println!("  Listening:  http://{}", server.addr());
    println!("  Endpoint:   POST /v1/chat/completions");
    println!("  Liveness:   GET  /healthz");
    println!();

    server.start().await.map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}

async fn cmd_status(config: Option<String>) -> Result<()> {
    init_tracing("warn");

    let config = load_config(config);
    let projects_root = config.projects_root.clone();
    let state = AppState::new(config);

    let init: RegistryInit = std::sync::Arc::new(move |reg: router_kernel::ToolRegistry| {
        let root = projects_root.clone();
        Box::pin(async move {
            reg.register(std::sync::Arc::new(ProjectsTool::new(root)) as std::sync::Arc<dyn Tool>);
            Ok(())
        })
    });

    state
        .registry
        .ensure_initialized(init)
        .await
        .context("failed to initialize tool registry")?;

    let results = state.registry.health_check_all().await;

    println!();
    println!("  Inference router status");
    println!("  ========================");
    println!();
    println!("  LLM base URL:  {}", state.config.llm.base_url);
    println!("  LLM model:     {}", state.config.llm.model);
    println!();
    println!("  {:<20} {}", "TOOL", "HEALTH");
    println!("  {}", "-".repeat(32));

    let mut any_unhealthy = false;
    for (name, healthy) in &results {
        let label = if *healthy { "OK" } else { "UNHEALTHY" };
        if !healthy {
            any_unhealthy = true;
        }
        println!("  {:<20} {}", name, label);
    }
    println!();

    if any_unhealthy {
        std::process::exit(1);
    }

    Ok(())
}
