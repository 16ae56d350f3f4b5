// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Plain JSON account routes mounted under `/api`

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::errors::ApiError;
use super::http_server::AppState;
use crate::flow::{
    BANK_DETAILS_FAILURE, LOAN_STATEMENT_FAILURE, TOPUP_RANGE_FAILURE, USSD_PAYMENT_FAILURE,
    WALLET_BALANCE_FAILURE,
};

const VERIFY_CUSTOMER_FAILURE: &str = "Failed to verify customer account";

/// Body of the single-NRC POST routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NrcRequest {
    #[serde(default)]
    pub nrc: Option<String>,
}

/// Body of `POST /loan-topup-range`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdNumberRequest {
    #[serde(default)]
    pub id_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UssdPaymentRequest {
    #[serde(default)]
    pub nrc: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCustomerQuery {
    #[serde(default)]
    pub id_number: Option<String>,
}

/// Success envelope
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub success: bool,
    pub data: Value,
}

impl AccountResponse {
    fn ok(data: Value) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

type ApiResult = Result<Json<AccountResponse>, ApiError>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/loan-statement", post(loan_statement_post))
        .route("/loan-statement/:nrc", get(loan_statement_get))
        .route("/wallet-balance", post(wallet_balance_post))
        .route("/wallet-balance/:nrc", get(wallet_balance_get))
        .route("/topup-range", post(topup_range_post))
        .route("/topup-range/:nrc", get(topup_range_get))
        .route("/loan-topup-range", post(loan_topup_range))
        .route("/bank-details", get(bank_details))
        .route("/ussd-payment", post(ussd_payment))
        .route("/verify-customer-account", get(verify_customer_account))
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest(message.to_string()))
}

fn required_nrc(value: Option<String>) -> Result<String, ApiError> {
    required(value, "NRC number is required")
}

async fn loan_statement(state: &AppState, nrc: &str) -> ApiResult {
    info!("📊 Loan statement requested");
    let statement = state
        .accounts
        .loan_statement(nrc)
        .await
        .map_err(ApiError::upstream(LOAN_STATEMENT_FAILURE))?;
    Ok(AccountResponse::ok(json!(statement.items())))
}

async fn loan_statement_post(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NrcRequest>,
) -> ApiResult {
    let nrc = required_nrc(request.nrc)?;
    loan_statement(&state, &nrc).await
}

async fn loan_statement_get(
    State(state): State<Arc<AppState>>,
    Path(nrc): Path<String>,
) -> ApiResult {
    loan_statement(&state, &nrc).await
}

async fn wallet_balance(state: &AppState, nrc: &str) -> ApiResult {
    info!("💰 Wallet balance requested");
    let balance = state
        .accounts
        .wallet_balance(nrc)
        .await
        .map_err(ApiError::upstream(WALLET_BALANCE_FAILURE))?;
    Ok(AccountResponse::ok(
        json!({ "walletBalance": balance.wallet_balance }),
    ))
}

async fn wallet_balance_post(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NrcRequest>,
) -> ApiResult {
    let nrc = required_nrc(request.nrc)?;
    wallet_balance(&state, &nrc).await
}

async fn wallet_balance_get(
    State(state): State<Arc<AppState>>,
    Path(nrc): Path<String>,
) -> ApiResult {
    wallet_balance(&state, &nrc).await
}

/// Top-up range, only for verified customers
async fn topup_range(state: &AppState, nrc: &str) -> ApiResult {
    let verification = state
        .accounts
        .verify_customer(nrc)
        .await
        .map_err(ApiError::upstream(VERIFY_CUSTOMER_FAILURE))?;
    if !verification.verified {
        warn!("Top-up range refused: customer not verified");
        return Err(ApiError::NotFound(
            "Customer not verified. Topup range unavailable.".to_string(),
        ));
    }

    info!("💰 Top-up range requested");
    let range = state
        .accounts
        .topup_range(nrc)
        .await
        .map_err(ApiError::upstream(TOPUP_RANGE_FAILURE))?;
    Ok(AccountResponse::ok(json!(range)))
}

async fn topup_range_post(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NrcRequest>,
) -> ApiResult {
    let nrc = required_nrc(request.nrc)?;
    topup_range(&state, &nrc).await
}

async fn topup_range_get(
    State(state): State<Arc<AppState>>,
    Path(nrc): Path<String>,
) -> ApiResult {
    topup_range(&state, &nrc).await
}

async fn loan_topup_range(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IdNumberRequest>,
) -> ApiResult {
    let id_number = required(request.id_number, "idNumber is required")?;
    topup_range(&state, &id_number).await
}

async fn bank_details(State(state): State<Arc<AppState>>) -> ApiResult {
    info!("🏦 Bank details requested");
    let details = state
        .accounts
        .bank_details()
        .await
        .map_err(ApiError::upstream(BANK_DETAILS_FAILURE))?;
    Ok(AccountResponse::ok(json!(details.data)))
}

async fn ussd_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UssdPaymentRequest>,
) -> ApiResult {
    const MESSAGE: &str = "NRC number and phone number are required";
    let nrc = required(request.nrc, MESSAGE)?;
    let phone = required(request.phone_number, MESSAGE)?;

    info!("📱 USSD payment requested");
    let payment = state
        .accounts
        .request_ussd_payment(&nrc, &phone)
        .await
        .map_err(ApiError::upstream(USSD_PAYMENT_FAILURE))?;
    Ok(AccountResponse::ok(json!(payment)))
}

async fn verify_customer_account(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyCustomerQuery>,
) -> ApiResult {
    let id_number = required(query.id_number, "idNumber is required")?;

    let result = state
        .accounts
        .verify_customer(&id_number)
        .await
        .map_err(ApiError::upstream(VERIFY_CUSTOMER_FAILURE))?;
    if !result.verified {
        return Err(ApiError::NotFound(
            result
                .message
                .unwrap_or_else(|| "Customer account not found.".to_string()),
        ));
    }

    Ok(AccountResponse::ok(json!({
        "verified": true,
        "message": result
            .message
            .unwrap_or_else(|| "Customer account verified successfully.".to_string()),
    })))
}
