// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{start_server, AppState};
use crate::config::FlowConfig;
use crate::crypto::KeyLoadError;
use crate::upstream::LupiyaClient;
use crate::version;

/// Flags overriding the environment
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen host (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// PEM private key file (overrides PRIVATE_KEY_PATH)
    #[arg(long)]
    pub private_key_path: Option<PathBuf>,
}

impl ServeArgs {
    pub fn apply(&self, config: &mut FlowConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = &self.private_key_path {
            config.private_key_path = Some(path.clone());
            // An explicit file wins over inline PEM
            config.private_key_pem = None;
        }
    }
}

/// Load the private key, tolerating its absence
///
/// A missing key leaves the endpoint up (POST / answers 500); a key that is
/// present but unusable is a startup error.
fn load_key(config: &FlowConfig) -> Result<Option<RsaPrivateKey>> {
    match config.load_private_key() {
        Ok(key) => {
            info!("🔐 Private key loaded - encrypted flows enabled");
            Ok(Some(key))
        }
        Err(KeyLoadError::Missing(hint)) => {
            warn!("⚠️ No private key configured: {}", hint);
            warn!("   POST / will answer 500 until a key is provided");
            Ok(None)
        }
        Err(e) => Err(anyhow!("invalid private key: {}", e)),
    }
}

fn warn_open_modes(config: &FlowConfig) {
    if config.app_secret.is_none() {
        warn!("⚠️ APP_SECRET not set - request signatures are NOT verified");
    }
    if config.lupiya.access_token.is_none() {
        warn!("⚠️ LUPIYA_ACCESS_TOKEN not set - account queries will fail");
    }
}

/// Start the server
pub async fn run(config: FlowConfig) -> Result<()> {
    config.validate().map_err(|e| anyhow!(e))?;

    info!("🚀 Starting {}", version::get_version_string());
    info!("📦 BUILD VERSION: {}", version::VERSION);

    let private_key = load_key(&config)?;
    warn_open_modes(&config);

    let client = LupiyaClient::new(&config.lupiya)?;
    info!(
        base_url = %config.lupiya.base_url,
        has_token = client.has_token(),
        "🏦 Lupiya client ready"
    );

    let state = AppState::new(config, private_key, Arc::new(client));
    start_server(state).await
}

/// Validate configuration without serving
pub fn check(config: &FlowConfig) -> Result<()> {
    config.validate().map_err(|e| anyhow!(e))?;

    println!("✅ Configuration valid");
    println!("   Listen:          {}:{}", config.host, config.port);
    println!("   Lupiya base URL: {}", config.lupiya.base_url);

    match load_key(config)? {
        Some(key) => println!("✅ Private key: {} bits", key.size() * 8),
        None => println!("⚠️ Private key: not configured"),
    }
    println!(
        "   Signature check: {}",
        if config.app_secret.is_some() { "enabled" } else { "DISABLED" }
    );
    println!(
        "   Lupiya token:    {}",
        if config.lupiya.access_token.is_some() { "set" } else { "missing" }
    );

    Ok(())
}
