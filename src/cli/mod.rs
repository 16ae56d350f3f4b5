// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod serve;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::FlowConfig;

/// Lupiya WhatsApp Flow endpoint
#[derive(Parser, Debug)]
#[command(name = "lupiya-flow-endpoint")]
#[command(version)]
#[command(about = "Encrypted WhatsApp Flow endpoint for Lupiya loan services", long_about = None)]
pub struct Cli {
    /// Extra `.env` file to load before reading configuration
    #[arg(long, global = true, env = "FLOW_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the flow endpoint (default)
    Serve(serve::ServeArgs),

    /// Validate configuration and the private key, then exit
    CheckConfig(serve::ServeArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    dotenv::dotenv().ok();
    if let Some(path) = &cli.env_file {
        dotenv::from_path(path)
            .map_err(|e| anyhow!("failed to load {}: {}", path.display(), e))?;
    }

    match cli.command {
        None => serve::run(FlowConfig::from_env()).await,
        Some(Commands::Serve(args)) => {
            let mut config = FlowConfig::from_env();
            args.apply(&mut config);
            serve::run(config).await
        }
        Some(Commands::CheckConfig(args)) => {
            let mut config = FlowConfig::from_env();
            args.apply(&mut config);
            serve::check(&config)
        }
    }
}
