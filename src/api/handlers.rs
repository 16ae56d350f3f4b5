// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::http_server::AppState;
use crate::flow::{self, handle_data_exchange, DataExchangeRequest};
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamInfo {
    pub base_url: String,
    pub has_token: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub version: String,
    /// Build, Flow JSON version and feature list
    pub build: Value,
    pub private_key_loaded: bool,
    /// False when running in open mode (no `APP_SECRET`)
    pub signature_check: bool,
    pub lupiya: UpstreamInfo,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: version::SERVICE_NAME.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        build: version::get_version_info(),
        private_key_loaded: state.private_key.is_some(),
        signature_check: state.config.app_secret.is_some(),
        lupiya: UpstreamInfo {
            base_url: state.config.lupiya.base_url.clone(),
            has_token: state.config.lupiya.access_token.is_some(),
        },
    })
}

/// `POST /data-exchange`; always 200, failures render `ERROR_SCREEN`
pub async fn data_exchange_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DataExchangeRequest>,
) -> Json<Value> {
    let screen = handle_data_exchange(state.accounts.as_ref(), &request).await;
    Json(screen.to_response())
}

pub async fn wallet_balance_flow_handler() -> Json<Value> {
    Json(flow::wallet_balance_flow())
}

pub async fn bank_details_flow_handler() -> Json<Value> {
    Json(flow::bank_details_flow())
}

pub async fn ussd_payment_flow_handler() -> Json<Value> {
    Json(flow::ussd_payment_flow())
}
