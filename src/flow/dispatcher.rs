// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Next-screen dispatch for decrypted flow requests

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::data_exchange::{handle_data_exchange, AccountQuery, DataExchangeRequest};
use super::screens::{self, CONFIRMATION, LOAN_FORM, LOAN_FORM_FIELDS, SUMMARY, TERMS, UPLOAD};
use crate::upstream::AccountService;

/// Dispatch failures
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route matches the request's action and screen
    #[error("Unhandled flow request (action: {action:?}, screen: {screen:?})")]
    Unhandled {
        action: Option<String>,
        screen: Option<String>,
    },

    /// Decrypted body is not a JSON object
    #[error("Flow request body must be a JSON object")]
    NotAnObject,
}

/// Maps a decrypted request body to the next screen response
#[async_trait]
pub trait FlowDispatcher: Send + Sync {
    async fn next_screen(&self, body: Value) -> Result<Value, DispatchError>;
}

/// Loan application intake flow
///
/// ```text
/// INIT -> LOAN_FORM -> UPLOAD -> SUMMARY -> CONFIRMATION -> TERMS -> (close)
/// ```
///
/// `data_exchange` requests whose `data.action` names an account query are
/// answered from the account service instead.
pub struct LoanFlowDispatcher {
    accounts: Arc<dyn AccountService>,
}

impl LoanFlowDispatcher {
    pub fn new(accounts: Arc<dyn AccountService>) -> Self {
        Self { accounts }
    }

    async fn account_query(&self, data: &Map<String, Value>) -> Value {
        let request = DataExchangeRequest {
            action: string_field(data, "action"),
            nrc_number: string_field(data, "nrc_number"),
            phone_number: string_field(data, "phone_number"),
        };
        handle_data_exchange(self.accounts.as_ref(), &request)
            .await
            .to_navigation()
    }
}

#[async_trait]
impl FlowDispatcher for LoanFlowDispatcher {
    async fn next_screen(&self, body: Value) -> Result<Value, DispatchError> {
        let Value::Object(mut body) = body else {
            return Err(DispatchError::NotAnObject);
        };

        let action = string_field(&body, "action");
        let screen = string_field(&body, "screen");
        let flow_token = body.remove("flow_token");
        let data = match body.remove("data") {
            Some(Value::Object(data)) => data,
            _ => Map::new(),
        };

        if action.as_deref() == Some("ping") {
            return Ok(json!({ "data": { "status": "active" } }));
        }

        if data.get("error").is_some_and(is_truthy) {
            warn!(error = %data["error"], "⚠️  Flow client reported an error");
            return Ok(json!({ "data": { "acknowledged": true } }));
        }

        if action.as_deref() == Some("INIT") {
            return Ok(screens::loan_form());
        }

        if action.as_deref() == Some("data_exchange") {
            let query = data.get("action").and_then(Value::as_str);
            if query.is_some_and(AccountQuery::is_account_action) {
                return Ok(self.account_query(&data).await);
            }

            debug!(screen = screen.as_deref().unwrap_or_default(), "Flow data exchange");
            match screen.as_deref() {
                Some(LOAN_FORM) => {
                    // Absent fields stay absent; the screen declares them as strings
                    let carried = LOAN_FORM_FIELDS
                        .iter()
                        .filter_map(|field| {
                            data.get(*field)
                                .map(|value| (field.to_string(), value.clone()))
                        })
                        .collect();
                    return Ok(screens::navigate(UPLOAD, carried));
                }
                Some(UPLOAD) => return Ok(screens::navigate(SUMMARY, data)),
                Some(SUMMARY) => return Ok(screens::navigate(CONFIRMATION, data)),
                Some(CONFIRMATION) => {
                    let mut next = data;
                    let confirmed = next
                        .get("confirmed")
                        .filter(|v| is_truthy(v))
                        .cloned()
                        .unwrap_or(Value::Bool(true));
                    next.insert("confirmed".to_string(), confirmed);
                    return Ok(screens::navigate(TERMS, next));
                }
                Some(TERMS) => {
                    let mut params = Map::new();
                    if let Some(token) = flow_token {
                        params.insert("flow_token".to_string(), token);
                    }
                    params.extend(data);
                    return Ok(json!({
                        "data": {
                            "extension_message_response": { "params": params }
                        }
                    }));
                }
                _ => {}
            }
        }

        error!(
            action = action.as_deref().unwrap_or_default(),
            screen = screen.as_deref().unwrap_or_default(),
            "❌ Unhandled flow request"
        );
        Err(DispatchError::Unhandled { action, screen })
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// JSON truthiness: null, false, 0 and "" are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
