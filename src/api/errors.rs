// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use crate::crypto::FlowCryptoError;
use crate::flow::DispatchError;
use crate::upstream::UpstreamError;

/// WhatsApp's "refresh and retry" status for a rejected signature
pub const SIGNATURE_INVALID_STATUS: u16 = 432;

/// JSON error body of the `/api` routes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// `x-hub-signature-256` did not match the body
    SignatureInvalid,
    /// No private key is loaded
    PrivateKeyMissing,
    /// Envelope could not be decrypted, or the response encrypted
    Crypto(FlowCryptoError),
    /// Dispatcher has no route for the request
    Dispatch(DispatchError),
    InternalError(String),
    /// Missing or malformed input on a plain JSON route
    InvalidRequest(String),
    NotFound(String),
    /// Loan service call failed on a plain JSON route; only `label`
    /// reaches the client
    Upstream {
        label: &'static str,
        source: UpstreamError,
    },
}

impl ApiError {
    /// `map_err` adapter that logs the upstream failure and keeps only `label`
    pub fn upstream(label: &'static str) -> impl FnOnce(UpstreamError) -> ApiError {
        move |source| {
            error!(label, "❌ Lupiya request failed: {}", source);
            ApiError::Upstream { label, source }
        }
    }

    /// Whether this error belongs to the encrypted transport, whose
    /// responses never carry a body
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::SignatureInvalid
                | ApiError::PrivateKeyMissing
                | ApiError::Crypto(_)
                | ApiError::Dispatch(_)
                | ApiError::InternalError(_)
        )
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::SignatureInvalid => SIGNATURE_INVALID_STATUS,
            ApiError::Crypto(e) => e.status_code(),
            ApiError::PrivateKeyMissing
            | ApiError::Dispatch(_)
            | ApiError::InternalError(_)
            | ApiError::Upstream { .. } => 500,
            ApiError::InvalidRequest(_) => 400,
            ApiError::NotFound(_) => 404,
        }
    }

    /// JSON body for the plain routes; `None` for transport errors
    pub fn to_response(&self) -> Option<ErrorResponse> {
        if self.is_transport() {
            return None;
        }

        let message = match self {
            ApiError::Upstream { label, .. } => format!("❌ Error: {}", label),
            ApiError::InvalidRequest(msg) | ApiError::NotFound(msg) => format!("❌ {}", msg),
            _ => format!("❌ Error: {}", self),
        };

        Some(ErrorResponse {
            success: false,
            message,
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::SignatureInvalid => write!(f, "Request signature is invalid"),
            ApiError::PrivateKeyMissing => write!(f, "Private key is not configured"),
            ApiError::Crypto(e) => write!(f, "Crypto error: {}", e),
            ApiError::Dispatch(e) => write!(f, "Dispatch error: {}", e),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Upstream { label, source } => write!(f, "{}: {}", label, source),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<FlowCryptoError> for ApiError {
    fn from(e: FlowCryptoError) -> Self {
        ApiError::Crypto(e)
    }
}

impl From<DispatchError> for ApiError {
    fn from(e: DispatchError) -> Self {
        ApiError::Dispatch(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.to_response() {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}
