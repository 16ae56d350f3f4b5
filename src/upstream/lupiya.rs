// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lupiya loan-service API client
//!
//! Thin REST wrapper over the WhatsApp messaging endpoints of the Lupiya
//! backend. Requests carry the `access_token` header; the token is served
//! from an [`AccessTokenCache`] owned by the client. No retries.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::service::AccountService;
use super::token_cache::{AccessTokenCache, Clock, SystemClock};
use super::types::{
    BankDetails, CustomerVerification, LoanStatement, TopupRange, UpstreamError, UssdPayment,
    WalletBalance,
};
use crate::config::LupiyaConfig;

const API_PREFIX: &str = "/api/v1/services/messaging/whatsapp";

/// Lupiya API client
pub struct LupiyaClient<C: Clock = SystemClock> {
    base_url: String,
    client: Client,
    timeout: Duration,
    configured_token: Option<String>,
    tokens: AccessTokenCache<C>,
}

impl LupiyaClient<SystemClock> {
    /// Create a client on the system clock
    pub fn new(config: &LupiyaConfig) -> Result<Self, UpstreamError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> LupiyaClient<C> {
    /// Create a client whose token cache uses `clock`
    pub fn with_clock(config: &LupiyaConfig, clock: C) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout: config.timeout,
            configured_token: config.access_token.clone(),
            tokens: AccessTokenCache::with_clock(clock, config.token_ttl),
        })
    }

    /// Whether an access token is available
    pub fn has_token(&self) -> bool {
        self.configured_token.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, path)
    }

    fn access_token(&self) -> Result<String, UpstreamError> {
        self.tokens.get_or_refresh(|| {
            self.configured_token
                .clone()
                .ok_or(UpstreamError::MissingAccessToken)
        })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, UpstreamError> {
        let token = self.access_token()?;
        debug!(path, "➡️  POST Lupiya");

        let response = self
            .client
            .post(self.endpoint(path))
            .header("access_token", token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.decode(path, response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let token = self.access_token()?;
        debug!(path, "➡️  GET Lupiya");

        let response = self
            .client
            .get(self.endpoint(path))
            .header("access_token", token)
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.decode(path, response).await
    }

    fn transport_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> Result<T, UpstreamError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(path, status = status.as_u16(), "Lupiya rejected access token");
            self.tokens.invalidate();
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(path, status = status.as_u16(), "❌ Lupiya request failed");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::Decode(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl<C: Clock + 'static> AccountService for LupiyaClient<C> {
    async fn loan_statement(&self, id_number: &str) -> Result<LoanStatement, UpstreamError> {
        self.post_json("loan-statement", json!({ "idNumber": id_number }))
            .await
    }

    async fn wallet_balance(&self, id_number: &str) -> Result<WalletBalance, UpstreamError> {
        self.post_json("wallet-balance", json!({ "idNumber": id_number }))
            .await
    }

    async fn bank_details(&self) -> Result<BankDetails, UpstreamError> {
        self.get_json("bank-repayment-details", &[]).await
    }

    async fn topup_range(&self, id_number: &str) -> Result<TopupRange, UpstreamError> {
        self.post_json("top-up-range", json!({ "idNumber": id_number }))
            .await
    }

    async fn request_ussd_payment(
        &self,
        id_number: &str,
        phone_number: &str,
    ) -> Result<UssdPayment, UpstreamError> {
        self.post_json(
            "request-ussd-payment",
            json!({ "idNumber": id_number, "phoneNumber": phone_number }),
        )
        .await
    }

    async fn verify_customer(
        &self,
        id_number: &str,
    ) -> Result<CustomerVerification, UpstreamError> {
        self.get_json("verify-customer-account", &[("idNumber", id_number)])
            .await
    }
}
