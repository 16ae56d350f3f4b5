// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request Signature Verification
//!
//! Meta signs every webhook and Flow request with HMAC-SHA256 over the exact
//! raw body bytes using the app secret, and sends the digest in the
//! `x-hub-signature-256` header as `sha256=<hex>`.
//!
//! Verification fails closed: a missing header, a missing `sha256=` prefix,
//! malformed hex or a digest mismatch all yield `false`. The only permissive
//! path is when no app secret is configured at all (local development), which
//! is logged as a warning on every request.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Header carrying the request signature
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Prefix in front of the hex digest
pub const SIGNATURE_PREFIX: &str = "sha256=";

type HmacSha256 = Hmac<Sha256>;

/// Check a request signature
///
/// # Arguments
///
/// * `raw_body` - Request body exactly as received (before JSON parsing)
/// * `signature_header` - Value of `x-hub-signature-256`, if present
/// * `app_secret` - Shared secret; `None` disables the check
pub fn is_valid_signature(
    raw_body: &[u8],
    signature_header: Option<&str>,
    app_secret: Option<&str>,
) -> bool {
    let Some(secret) = app_secret else {
        warn!("⚠️  APP_SECRET not configured - request signature check is DISABLED");
        return true;
    };

    let Some(header) = signature_header else {
        debug!("Signature header missing");
        return false;
    };

    let Some(hex_digest) = header.trim().strip_prefix(SIGNATURE_PREFIX) else {
        debug!("Signature header missing sha256= prefix");
        return false;
    };

    let provided = match hex::decode(hex_digest) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Signature header is not valid hex: {}", e);
            return false;
        }
    };

    let Some(expected) = hmac_sha256(secret.as_bytes(), raw_body) else {
        return false;
    };

    constant_time_eq(&expected, &provided)
}

/// Compute the `sha256=<hex>` header value for a body
///
/// Used by clients and tests to sign requests the same way Meta does.
pub fn compute_signature(raw_body: &[u8], app_secret: &str) -> String {
    let digest = hmac_sha256(app_secret.as_bytes(), raw_body).unwrap_or_default();
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(digest))
}

fn hmac_sha256(secret: &[u8], body: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(body);
    Some(mac.finalize().into_bytes().to_vec())
}

/// Constant-time byte comparison
///
/// The length check is public information (a SHA-256 digest is always 32
/// bytes); the content comparison does not short-circuit on the first
/// differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
