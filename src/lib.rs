// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod flow;
pub mod upstream;
pub mod version;

// Re-export main types
pub use api::{create_app, AppState};
pub use config::{FlowConfig, LupiyaConfig};
pub use crypto::{decrypt_request, encrypt_response, Envelope, FlowCryptoError, SessionKey};
pub use flow::{DispatchError, FlowDispatcher, LoanFlowDispatcher};
pub use upstream::{AccountService, LupiyaClient, UpstreamError};
