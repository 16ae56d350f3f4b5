// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the Flow endpoint
//!
//! Everything is read once at startup and shared read-only afterwards.
//!
//! | Variable                 | Default                          |
//! |--------------------------|----------------------------------|
//! | `HOST`                   | `0.0.0.0`                        |
//! | `PORT`                   | `10000`                          |
//! | `REQUEST_TIMEOUT_SECS`   | `30`                             |
//! | `PRIVATE_KEY`            | none (PEM text)                  |
//! | `PRIVATE_KEY_PATH`       | none (PEM file, if no `PRIVATE_KEY`) |
//! | `PASSPHRASE`             | none                             |
//! | `APP_SECRET`             | none (signature check disabled)  |
//! | `LUPIYA_BASE_URL`        | `https://backend.qa.lupiya.com`  |
//! | `LUPIYA_ACCESS_TOKEN`    | none                             |
//! | `LUPIYA_TIMEOUT_SECS`    | `10`                             |
//! | `LUPIYA_TOKEN_TTL_SECS`  | `3600`                           |

use rsa::RsaPrivateKey;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::crypto::{load_private_key_file, parse_private_key, KeyLoadError};

pub const DEFAULT_LUPIYA_BASE_URL: &str = "https://backend.qa.lupiya.com";

/// Upstream loan-service configuration
#[derive(Clone)]
pub struct LupiyaConfig {
    /// Base URL of the Lupiya backend
    pub base_url: String,
    /// Value sent in the `access_token` header
    pub access_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long a fetched token is reused
    pub token_ttl: Duration,
}

impl Default for LupiyaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LUPIYA_BASE_URL.to_string(),
            access_token: None,
            timeout: Duration::from_secs(10),
            token_ttl: Duration::from_secs(3600),
        }
    }
}

impl fmt::Debug for LupiyaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LupiyaConfig")
            .field("base_url", &self.base_url)
            .field("has_access_token", &self.access_token.is_some())
            .field("timeout", &self.timeout)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Endpoint configuration
#[derive(Clone)]
pub struct FlowConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on handling any single request
    pub request_timeout: Duration,
    /// Inline PEM text (takes precedence over `private_key_path`)
    pub private_key_pem: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub passphrase: Option<String>,
    /// Shared secret for `x-hub-signature-256`; `None` disables the check
    pub app_secret: Option<String>,
    pub lupiya: LupiyaConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            request_timeout: Duration::from_secs(30),
            private_key_pem: None,
            private_key_path: None,
            passphrase: None,
            app_secret: None,
            lupiya: LupiyaConfig::default(),
        }
    }
}

// Secrets are reported as present/absent only
impl fmt::Debug for FlowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("has_private_key_pem", &self.private_key_pem.is_some())
            .field("private_key_path", &self.private_key_path)
            .field("has_passphrase", &self.passphrase.is_some())
            .field("has_app_secret", &self.app_secret.is_some())
            .field("lupiya", &self.lupiya)
            .finish()
    }
}

impl FlowConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let secs = |name: &str, default: u64| {
            get(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(default))
        };

        Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(10000),
            request_timeout: secs("REQUEST_TIMEOUT_SECS", 30),
            private_key_pem: get("PRIVATE_KEY"),
            private_key_path: get("PRIVATE_KEY_PATH").map(PathBuf::from),
            passphrase: get("PASSPHRASE"),
            app_secret: get("APP_SECRET"),
            lupiya: LupiyaConfig {
                base_url: get("LUPIYA_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_LUPIYA_BASE_URL.to_string()),
                access_token: get("LUPIYA_ACCESS_TOKEN"),
                timeout: secs("LUPIYA_TIMEOUT_SECS", 10),
                token_ttl: secs("LUPIYA_TOKEN_TTL_SECS", 3600),
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout.is_zero() {
            return Err("Request timeout must be greater than 0".to_string());
        }
        if self.lupiya.timeout.is_zero() {
            return Err("Lupiya timeout must be greater than 0".to_string());
        }
        if !self.lupiya.base_url.starts_with("http://")
            && !self.lupiya.base_url.starts_with("https://")
        {
            return Err(format!(
                "LUPIYA_BASE_URL must be an http(s) URL, got '{}'",
                self.lupiya.base_url
            ));
        }
        Ok(())
    }

    /// Whether any private key source is configured
    pub fn has_private_key(&self) -> bool {
        self.private_key_pem.is_some() || self.private_key_path.is_some()
    }

    /// Parse the configured private key
    ///
    /// # Errors
    ///
    /// `KeyLoadError::Missing` when neither `PRIVATE_KEY` nor
    /// `PRIVATE_KEY_PATH` is set; otherwise any parse/read failure.
    pub fn load_private_key(&self) -> Result<RsaPrivateKey, KeyLoadError> {
        let passphrase = self.passphrase.as_deref();

        if let Some(pem) = &self.private_key_pem {
            return parse_private_key(pem, passphrase);
        }
        if let Some(path) = &self.private_key_path {
            return load_private_key_file(path, passphrase);
        }

        Err(KeyLoadError::Missing(
            "set PRIVATE_KEY or PRIVATE_KEY_PATH".to_string(),
        ))
    }
}
