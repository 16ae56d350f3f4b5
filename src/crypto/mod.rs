// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! WhatsApp Flow Transport Crypto
//!
//! This module implements the cryptographic layer between WhatsApp and the
//! Flow endpoint:
//!
//! - **Signature**: HMAC-SHA256 request signature gate (`x-hub-signature-256`)
//! - **Envelope**: RSA-OAEP session key unwrap + AES-128-GCM body decryption
//! - **Response**: AES-128-GCM sealing under the flipped IV
//! - **Private Key**: PEM loading for the Flow's RSA key
//!
//! ## Security Considerations
//!
//! - Session keys exist for one request only and are zeroized on drop
//! - The private key is loaded once and shared read-only
//! - Signature digests are compared in constant time
//! - Failure details are logged server-side only
//!
//! ## Protocol Flow
//!
//! 1. WhatsApp generates a random AES-128 key and 16-byte IV
//! 2. WhatsApp wraps the key with the Flow's RSA public key (OAEP, SHA-256)
//! 3. WhatsApp encrypts the flow state with AES-128-GCM and signs the body
//! 4. Endpoint verifies the signature, unwraps the key, decrypts the body
//! 5. Endpoint encrypts the next screen with the same key and the flipped IV
//! 6. Endpoint returns the base64 ciphertext as the raw response body

pub mod aes_gcm;
pub mod envelope;
pub mod error;
pub mod private_key;
pub mod signature;

pub use aes_gcm::{decrypt_aes_128_gcm, encrypt_aes_128_gcm, IV_SIZE, KEY_SIZE, TAG_SIZE};
pub use envelope::{
    decrypt_request, encrypt_response, flip_iv, DecryptedRequest, Envelope, SessionKey,
};
pub use error::FlowCryptoError;
pub use private_key::{load_private_key_file, parse_private_key, KeyLoadError};
pub use signature::{compute_signature, is_valid_signature, SIGNATURE_HEADER};
