// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod accounts;
pub mod errors;
pub mod flow_endpoint;
pub mod handlers;
pub mod http_server;

pub use errors::{ApiError, ErrorResponse, SIGNATURE_INVALID_STATUS};
pub use handlers::{HealthResponse, UpstreamInfo};
pub use http_server::{create_app, start_server, AppState};
