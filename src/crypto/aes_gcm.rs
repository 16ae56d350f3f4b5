// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-128-GCM for WhatsApp Flow payloads
//!
//! WhatsApp Flows seal request and response bodies with AES-128-GCM using a
//! 16-byte IV (not the 12-byte nonce most libraries default to) and append
//! the authentication tag to the ciphertext:
//!
//! ```text
//! [ciphertext (variable length) | tag (16 bytes)]
//! ```
//!
//! - Key: 16 bytes, recovered per request from the envelope
//! - IV: 16 bytes, supplied by the client (flipped for responses)
//! - No Additional Authenticated Data (AAD)

use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit, Payload},
    aes::Aes128,
    AesGcm, Nonce,
};

use super::error::FlowCryptoError;

/// AES-128-GCM with the 16-byte IV WhatsApp Flows use
pub type Aes128Gcm16 = AesGcm<Aes128, U16>;

/// Session key size in bytes
pub const KEY_SIZE: usize = 16;

/// IV size in bytes
pub const IV_SIZE: usize = 16;

/// Authentication tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Decrypt a `ciphertext || tag` blob
///
/// # Errors
///
/// - `EnvelopeMalformed` if the blob is shorter than the tag
/// - `PayloadIntegrityFailed` if the tag does not verify (wrong key, wrong
///   IV or tampered data)
pub fn decrypt_aes_128_gcm(
    sealed: &[u8],
    key: &[u8; KEY_SIZE],
    iv: &[u8; IV_SIZE],
) -> Result<Vec<u8>, FlowCryptoError> {
    // Tag is the trailing 16 bytes; an empty plaintext is still 16 bytes long
    if sealed.len() < TAG_SIZE {
        return Err(FlowCryptoError::EnvelopeMalformed {
            field: "encrypted_flow_data",
            reason: format!(
                "expected at least {} bytes for the authentication tag, got {}",
                TAG_SIZE,
                sealed.len()
            ),
        });
    }

    let cipher = Aes128Gcm16::new_from_slice(key).map_err(|e| {
        FlowCryptoError::EncryptionFailed {
            reason: format!("failed to create AES-128-GCM cipher: {}", e),
        }
    })?;

    cipher
        .decrypt(
            Nonce::<U16>::from_slice(iv),
            Payload {
                msg: sealed,
                aad: b"",
            },
        )
        .map_err(|_| FlowCryptoError::PayloadIntegrityFailed)
}

/// Encrypt `plaintext`, returning `ciphertext || tag`
pub fn encrypt_aes_128_gcm(
    plaintext: &[u8],
    key: &[u8; KEY_SIZE],
    iv: &[u8; IV_SIZE],
) -> Result<Vec<u8>, FlowCryptoError> {
    let cipher = Aes128Gcm16::new_from_slice(key).map_err(|e| {
        FlowCryptoError::EncryptionFailed {
            reason: format!("failed to create AES-128-GCM cipher: {}", e),
        }
    })?;

    cipher
        .encrypt(
            Nonce::<U16>::from_slice(iv),
            Payload {
                msg: plaintext,
                aad: b"",
            },
        )
        .map_err(|e| FlowCryptoError::EncryptionFailed {
            reason: format!("AES-128-GCM encryption failed: {}", e),
        })
}
