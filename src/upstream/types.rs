// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the Lupiya loan-service API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Upstream fields that are sometimes a single object and sometimes a list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// A single loan statement line
///
/// The upstream has shipped two shapes over time (per-loan summary and
/// per-payment history), so every field is optional and unknown fields are
/// kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatementItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_payments_made: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outstanding_balance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_payment: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_balance: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `loan-statement`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanStatement {
    #[serde(default)]
    pub data: Option<OneOrMany<StatementItem>>,
}

impl LoanStatement {
    /// Statement lines, normalizing object/array/null to a list
    pub fn items(&self) -> Vec<StatementItem> {
        self.data.clone().map(OneOrMany::into_vec).unwrap_or_default()
    }
}

/// Response of `wallet-balance`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    #[serde(default)]
    pub wallet_balance: Value,
}

/// One bank account customers can repay into
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub bank_name: String,
    pub bank_account_number: String,
    #[serde(default)]
    pub bank_branch: Option<String>,
}

/// Response of `bank-repayment-details`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankDetails {
    #[serde(default)]
    pub data: Vec<BankAccount>,
}

/// Top-up bounds, as reported in the `amountRange` shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountRange {
    pub min: Value,
    pub max: Value,
}

/// Top-up bounds, as reported in the `data[]` shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopupItem {
    #[serde(default)]
    pub min_topup: Value,
    #[serde(default)]
    pub max_topup: Value,
}

/// Response of `top-up-range`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopupRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_range: Option<AmountRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<OneOrMany<TopupItem>>,
}

impl TopupRange {
    /// Bounds as `(min, max)` pairs regardless of response shape
    pub fn bounds(&self) -> Vec<(Value, Value)> {
        if let Some(range) = &self.amount_range {
            return vec![(range.min.clone(), range.max.clone())];
        }
        self.data
            .clone()
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|item| (item.min_topup, item.max_topup))
            .collect()
    }
}

/// Response of `request-ussd-payment`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UssdPayment {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `verify-customer-account`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerVerification {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Errors that can occur talking to the loan service
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No access token configured
    #[error("Lupiya access token is not configured")]
    MissingAccessToken,

    /// Request timed out
    #[error("Lupiya request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Connection or protocol failure
    #[error("Lupiya transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("Lupiya API error: {status} - {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Lupiya response decode error: {0}")]
    Decode(String),
}

/// Render a JSON number or numeric string with fixed decimals
///
/// Missing or non-numeric values render as zero.
pub fn format_amount(value: Option<&Value>, decimals: usize) -> String {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    format!("{:.*}", decimals, amount)
}
