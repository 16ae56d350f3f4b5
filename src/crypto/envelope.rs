// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Flow Envelope Decryption and Response Encryption
//!
//! Every data-exchange request from WhatsApp arrives as a hybrid envelope:
//!
//! ```text
//! {
//!   "encrypted_flow_data": base64(AES-128-GCM(body) || tag),
//!   "encrypted_aes_key":   base64(RSA-OAEP-SHA256(session_key)),
//!   "initial_vector":      base64(iv)
//! }
//! ```
//!
//! The response is sealed with the same session key under the bitwise
//! complement of the request IV and returned as a bare base64 string.
//!
//! ## Security Considerations
//!
//! - The session key lives only as long as the request and is zeroized on drop
//! - The private key is borrowed, never cloned or retained
//! - Failure reasons are for logs; clients only see the status code

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::{Oaep, RsaPrivateKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::aes_gcm::{decrypt_aes_128_gcm, encrypt_aes_128_gcm, IV_SIZE, KEY_SIZE};
use super::error::FlowCryptoError;

/// Encrypted request envelope as posted by WhatsApp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub encrypted_flow_data: String,
    pub encrypted_aes_key: String,
    pub initial_vector: String,
}

/// Per-request AES-128 session key
///
/// Zeroized when dropped; `Debug` never prints the key bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; KEY_SIZE]);

impl SessionKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionKey([REDACTED])")
    }
}

/// Result of opening an envelope
#[derive(Debug)]
pub struct DecryptedRequest {
    /// Session key for sealing the response
    pub session_key: SessionKey,
    /// Request IV; the response uses its complement
    pub iv: [u8; IV_SIZE],
    /// Decrypted flow state (`action`, `screen`, `data`, `version`, `flow_token`)
    pub body: Value,
}

/// Open a request envelope
///
/// # Steps
///
/// 1. Base64-decode the three envelope fields
/// 2. Unwrap the session key with RSA-OAEP (SHA-256)
/// 3. AES-128-GCM decrypt `encrypted_flow_data` (trailing 16 bytes are the tag)
/// 4. Parse the plaintext as JSON
///
/// # Errors
///
/// - `EnvelopeMalformed`: bad base64, IV not 16 bytes, data shorter than the tag
/// - `KeyRecoveryFailed`: RSA failure or unwrapped key not 16 bytes
/// - `PayloadIntegrityFailed`: tag mismatch
/// - `PayloadMalformed`: plaintext is not JSON
pub fn decrypt_request(
    envelope: &Envelope,
    private_key: &RsaPrivateKey,
) -> Result<DecryptedRequest, FlowCryptoError> {
    let flow_data = decode_field("encrypted_flow_data", &envelope.encrypted_flow_data)?;
    let wrapped_key = decode_field("encrypted_aes_key", &envelope.encrypted_aes_key)?;
    let iv_bytes = decode_field("initial_vector", &envelope.initial_vector)?;

    let iv: [u8; IV_SIZE] =
        iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| FlowCryptoError::EnvelopeMalformed {
                field: "initial_vector",
                reason: format!("expected {} bytes, got {}", IV_SIZE, iv_bytes.len()),
            })?;

    let session_key = unwrap_session_key(&wrapped_key, private_key)?;

    let plaintext = Zeroizing::new(decrypt_aes_128_gcm(
        &flow_data,
        session_key.as_bytes(),
        &iv,
    )?);

    let body: Value =
        serde_json::from_slice(&plaintext).map_err(|e| FlowCryptoError::PayloadMalformed {
            reason: e.to_string(),
        })?;

    Ok(DecryptedRequest {
        session_key,
        iv,
        body,
    })
}

/// Seal a response body for the client
///
/// Serializes `body` as compact JSON, encrypts it with the session key under
/// the flipped IV and returns `base64(ciphertext || tag)`.
pub fn encrypt_response<T: Serialize + ?Sized>(
    body: &T,
    session_key: &SessionKey,
    request_iv: &[u8; IV_SIZE],
) -> Result<String, FlowCryptoError> {
    let response_iv = flip_iv(request_iv);

    let plaintext = serde_json::to_vec(body).map_err(|e| FlowCryptoError::EncryptionFailed {
        reason: format!("response body is not serializable: {}", e),
    })?;

    let sealed = encrypt_aes_128_gcm(&plaintext, session_key.as_bytes(), &response_iv)?;
    Ok(STANDARD.encode(sealed))
}

/// Bitwise complement of every IV byte
pub fn flip_iv(iv: &[u8; IV_SIZE]) -> [u8; IV_SIZE] {
    let mut flipped = [0u8; IV_SIZE];
    for (out, byte) in flipped.iter_mut().zip(iv.iter()) {
        *out = !byte;
    }
    flipped
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, FlowCryptoError> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| FlowCryptoError::EnvelopeMalformed {
            field,
            reason: format!("base64 decode error: {}", e),
        })
}

fn unwrap_session_key(
    wrapped_key: &[u8],
    private_key: &RsaPrivateKey,
) -> Result<SessionKey, FlowCryptoError> {
    let raw = Zeroizing::new(
        private_key
            .decrypt(Oaep::new::<Sha256>(), wrapped_key)
            .map_err(|e| FlowCryptoError::KeyRecoveryFailed {
                reason: e.to_string(),
            })?,
    );

    let bytes: [u8; KEY_SIZE] =
        raw.as_slice()
            .try_into()
            .map_err(|_| FlowCryptoError::KeyRecoveryFailed {
                reason: format!("expected {}-byte session key, got {}", KEY_SIZE, raw.len()),
            })?;

    Ok(SessionKey::from_bytes(bytes))
}
