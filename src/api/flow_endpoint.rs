// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encrypted flow endpoint (`POST /`)
//!
//! ```text
//! raw body ─▶ signature gate ─▶ decrypt (blocking pool) ─▶ dispatch ─▶ encrypt ─▶ 200 text/plain
//!                  │ 432               │ 421 / 500            │ 500
//! ```

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::errors::ApiError;
use super::http_server::AppState;
use crate::crypto::{
    decrypt_request, encrypt_response, is_valid_signature, DecryptedRequest, Envelope,
    FlowCryptoError, SIGNATURE_HEADER,
};

pub async fn flow_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    if !is_valid_signature(&body, signature, state.config.app_secret.as_deref()) {
        warn!("🚫 Flow request rejected: signature mismatch");
        return Err(ApiError::SignatureInvalid);
    }

    let private_key = state.private_key.clone().ok_or_else(|| {
        warn!("⚠️  Flow request received but no private key is loaded");
        ApiError::PrivateKeyMissing
    })?;

    let envelope: Envelope =
        serde_json::from_slice(&body).map_err(|e| FlowCryptoError::EnvelopeMalformed {
            field: "body",
            reason: e.to_string(),
        })?;

    // RSA is CPU-bound
    let decrypted = tokio::task::spawn_blocking(move || decrypt_request(&envelope, &private_key))
        .await
        .map_err(|e| ApiError::InternalError(format!("decrypt task failed: {}", e)))?
        .map_err(|e| {
            warn!(kind = e.kind(), status = e.status_code(), "🔒 Flow request decryption failed: {}", e);
            e
        })?;

    let DecryptedRequest {
        session_key,
        iv,
        body,
    } = decrypted;

    debug!(
        action = body.get("action").and_then(|a| a.as_str()).unwrap_or_default(),
        screen = body.get("screen").and_then(|s| s.as_str()).unwrap_or_default(),
        "🔓 Flow request decrypted"
    );

    let response = state.dispatcher.next_screen(body).await?;
    let encrypted = encrypt_response(&response, &session_key, &iv)?;

    Ok(([(header::CONTENT_TYPE, "text/plain")], encrypted).into_response())
}
