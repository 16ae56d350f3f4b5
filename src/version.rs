// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Lupiya Flow endpoint

/// Service name reported by `/health`
pub const SERVICE_NAME: &str = "Lupiya WhatsApp Flow Endpoint";

/// Full version string with feature description
pub const VERSION: &str = "v2.1.0-encrypted-flows-2025-10-20";

/// Semantic version number
pub const VERSION_NUMBER: &str = "2.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-10-20";

/// WhatsApp Flow JSON version emitted in screens and definitions
pub const FLOW_JSON_VERSION: &str = "7.1";

/// Data API version declared by the flow definitions
pub const FLOW_DATA_API_VERSION: &str = "3.0";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "rsa-oaep-key-unwrap",
    "aes-128-gcm",
    "iv-flip-responses",
    "hub-signature-check",
    "loan-intake-flow",
    "account-queries",
    "token-cache",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {} ({})", SERVICE_NAME, VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "flow_json_version": FLOW_JSON_VERSION,
        "features": FEATURES,
    })
}
