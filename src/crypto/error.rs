// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Flow Crypto Error Types
//!
//! Error types for the Flow envelope transport.
//!
//! ## Error Variants
//!
//! - **EnvelopeMalformed**: a wire field failed base64 decoding or has the wrong size
//! - **KeyRecoveryFailed**: RSA-OAEP unwrapping of the session key failed
//! - **PayloadIntegrityFailed**: AES-GCM authentication tag did not verify
//! - **PayloadMalformed**: decrypted bytes are not a UTF-8 JSON document
//! - **EncryptionFailed**: response serialization or sealing failed
//!
//! ## Client Visibility
//!
//! Only the HTTP status derived from [`FlowCryptoError::status_code`] ever
//! reaches the client. `KeyRecoveryFailed` maps to 421 so the client restarts
//! the flow handshake; every other variant collapses into a bodiless 500.
//! The `reason` strings are for server logs.

use std::fmt;

/// HTTP status returned when the session key cannot be recovered.
pub const KEY_RECOVERY_STATUS: u16 = 421;

/// Errors produced while opening a request envelope or sealing a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowCryptoError {
    /// A wire field could not be decoded or has the wrong size
    EnvelopeMalformed {
        /// Envelope field that failed (e.g., "initial_vector")
        field: &'static str,
        /// Specific failure reason
        reason: String,
    },

    /// Asymmetric unwrapping of the session key failed
    ///
    /// This error occurs when:
    /// - The key was wrapped for a different public key
    /// - The wrapped key ciphertext is corrupted
    /// - OAEP padding does not verify
    /// - The recovered key is not 16 bytes
    KeyRecoveryFailed {
        /// Specific failure reason
        reason: String,
    },

    /// AES-GCM tag verification failed (tampered data, wrong key or wrong IV)
    PayloadIntegrityFailed,

    /// Decrypted payload is not valid UTF-8 JSON
    PayloadMalformed {
        /// Specific failure reason
        reason: String,
    },

    /// Sealing the response failed
    EncryptionFailed {
        /// Specific failure reason
        reason: String,
    },
}

impl FlowCryptoError {
    /// HTTP status the transport endpoint answers with for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            FlowCryptoError::KeyRecoveryFailed { .. } => KEY_RECOVERY_STATUS,
            _ => 500,
        }
    }

    /// Short stable label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            FlowCryptoError::EnvelopeMalformed { .. } => "envelope_malformed",
            FlowCryptoError::KeyRecoveryFailed { .. } => "key_recovery_failed",
            FlowCryptoError::PayloadIntegrityFailed => "payload_integrity_failed",
            FlowCryptoError::PayloadMalformed { .. } => "payload_malformed",
            FlowCryptoError::EncryptionFailed { .. } => "encryption_failed",
        }
    }
}

impl fmt::Display for FlowCryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowCryptoError::EnvelopeMalformed { field, reason } => {
                write!(f, "Malformed envelope field '{}': {}", field, reason)
            }
            FlowCryptoError::KeyRecoveryFailed { reason } => {
                write!(f, "Session key recovery failed: {}", reason)
            }
            FlowCryptoError::PayloadIntegrityFailed => {
                write!(f, "Payload integrity check failed")
            }
            FlowCryptoError::PayloadMalformed { reason } => {
                write!(f, "Payload not valid JSON: {}", reason)
            }
            FlowCryptoError::EncryptionFailed { reason } => {
                write!(f, "Response encryption failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for FlowCryptoError {}

// Conversion from base64 decode errors; the field is filled in by the caller
// through `map_err` where it is known.
impl From<base64::DecodeError> for FlowCryptoError {
    fn from(err: base64::DecodeError) -> Self {
        FlowCryptoError::EnvelopeMalformed {
            field: "base64_field",
            reason: format!("base64 decode error: {}", err),
        }
    }
}
