// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Account-query data exchange
//!
//! Maps an account-query action (`get_wallet_balance`, ...) to an upstream
//! call and renders the outcome as a terminal result screen. Failures never
//! propagate: they become an `ERROR_SCREEN` so the customer always gets an
//! answer.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::upstream::{
    format_amount, AccountService, BankDetails, LoanStatement, StatementItem, TopupRange,
    UpstreamError, UssdPayment, WalletBalance,
};
use crate::version::FLOW_JSON_VERSION;

pub const ERROR_SCREEN: &str = "ERROR_SCREEN";

/// Customer-facing failure labels; upstream detail only goes to logs
pub const LOAN_STATEMENT_FAILURE: &str = "Failed to fetch loan statement";
pub const WALLET_BALANCE_FAILURE: &str = "Failed to fetch wallet balance";
pub const BANK_DETAILS_FAILURE: &str = "Failed to fetch bank details";
pub const TOPUP_RANGE_FAILURE: &str = "Failed to fetch loan topup range";
pub const USSD_PAYMENT_FAILURE: &str = "Failed to request USSD payment";

/// Plain data-exchange request (`POST /data-exchange`, or the `data` object
/// of an encrypted `data_exchange` action)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataExchangeRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub nrc_number: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// A supported account query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountQuery {
    LoanStatement { nrc: String },
    WalletBalance { nrc: String },
    BankDetails,
    TopupRange { nrc: String },
    UssdPayment { nrc: String, phone: String },
}

/// Data-exchange failures (rendered, never returned to the transport)
#[derive(Debug, Error)]
pub enum DataExchangeError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{label}")]
    Upstream {
        label: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl AccountQuery {
    /// Action names routed here
    pub const ACTIONS: &'static [&'static str] = &[
        "get_loan_statement",
        "get_wallet_balance",
        "get_bank_details",
        "get_topup_range",
        "request_ussd_payment",
    ];

    /// Whether `action` names an account query
    pub fn is_account_action(action: &str) -> bool {
        Self::ACTIONS.contains(&action)
    }

    /// Build a query from a request, checking its required fields
    pub fn from_request(request: &DataExchangeRequest) -> Result<Self, DataExchangeError> {
        let action = request.action.as_deref().unwrap_or_default();
        let nrc = || {
            non_empty(request.nrc_number.as_deref())
                .ok_or(DataExchangeError::MissingField("nrc_number"))
        };

        match action {
            "get_loan_statement" => Ok(Self::LoanStatement { nrc: nrc()? }),
            "get_wallet_balance" => Ok(Self::WalletBalance { nrc: nrc()? }),
            "get_bank_details" => Ok(Self::BankDetails),
            "get_topup_range" => Ok(Self::TopupRange { nrc: nrc()? }),
            "request_ussd_payment" => Ok(Self::UssdPayment {
                nrc: nrc()?,
                phone: non_empty(request.phone_number.as_deref())
                    .ok_or(DataExchangeError::MissingField("phone_number"))?,
            }),
            other => Err(DataExchangeError::UnknownAction(other.to_string())),
        }
    }

    /// Customer-facing description of a failed call
    fn failure_label(&self) -> &'static str {
        match self {
            Self::LoanStatement { .. } => LOAN_STATEMENT_FAILURE,
            Self::WalletBalance { .. } => WALLET_BALANCE_FAILURE,
            Self::BankDetails => BANK_DETAILS_FAILURE,
            Self::TopupRange { .. } => TOPUP_RANGE_FAILURE,
            Self::UssdPayment { .. } => USSD_PAYMENT_FAILURE,
        }
    }

    /// Run the query against the account service
    pub async fn run(&self, accounts: &dyn AccountService) -> Result<ResultScreen, DataExchangeError> {
        let outcome = match self {
            Self::LoanStatement { nrc } => accounts
                .loan_statement(nrc)
                .await
                .map(|s| loan_statement_screen(&s)),
            Self::WalletBalance { nrc } => accounts
                .wallet_balance(nrc)
                .await
                .map(|b| wallet_balance_screen(&b)),
            Self::BankDetails => accounts.bank_details().await.map(|d| bank_details_screen(&d)),
            Self::TopupRange { nrc } => accounts
                .topup_range(nrc)
                .await
                .map(|r| topup_range_screen(&r)),
            Self::UssdPayment { nrc, phone } => accounts
                .request_ussd_payment(nrc, phone)
                .await
                .map(|p| ussd_payment_screen(&p)),
        };

        outcome.map_err(|source| DataExchangeError::Upstream {
            label: self.failure_label(),
            source,
        })
    }
}

/// A terminal single-column result screen
#[derive(Debug, Clone, PartialEq)]
pub struct ResultScreen {
    pub id: &'static str,
    pub title: &'static str,
    pub heading: &'static str,
    pub body: String,
}

impl ResultScreen {
    /// The error screen shown for any failed data exchange
    pub fn error(message: &str) -> Self {
        Self {
            id: ERROR_SCREEN,
            title: "Error",
            heading: "Service Error",
            body: format!(
                "Sorry, we encountered an error: {}\n\nPlease try again later.",
                message
            ),
        }
    }

    /// Full screen layout as served by `POST /data-exchange`
    pub fn to_layout(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "terminal": true,
            "layout": {
                "type": "SingleColumnLayout",
                "children": [
                    { "type": "TextHeading", "text": self.heading },
                    { "type": "TextBody", "text": self.body },
                ]
            }
        })
    }

    /// `{"version", "screen"}` envelope of the plain data-exchange route
    pub fn to_response(&self) -> Value {
        json!({
            "version": FLOW_JSON_VERSION,
            "screen": self.to_layout(),
        })
    }

    /// Navigation response for the encrypted flow endpoint
    pub fn to_navigation(&self) -> Value {
        let mut data = Map::new();
        data.insert("title".to_string(), json!(self.title));
        data.insert("heading".to_string(), json!(self.heading));
        data.insert("body".to_string(), json!(self.body));
        super::screens::navigate(self.id, data)
    }
}

/// Resolve a data-exchange request to a result screen
///
/// Unknown actions, missing fields and upstream failures all yield the
/// error screen.
pub async fn handle_data_exchange(
    accounts: &dyn AccountService,
    request: &DataExchangeRequest,
) -> ResultScreen {
    let result = match AccountQuery::from_request(request) {
        Ok(query) => {
            info!(action = request.action.as_deref().unwrap_or_default(), "🔄 Data exchange");
            query.run(accounts).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(screen) => screen,
        Err(e) => {
            match &e {
                DataExchangeError::Upstream { source, .. } => {
                    error!(error = %source, "❌ Data exchange upstream failure")
                }
                other => error!(error = %other, "❌ Data exchange rejected"),
            }
            ResultScreen::error(&e.to_string())
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Display a JSON scalar without quotes
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "0".to_string(),
        other => other.to_string(),
    }
}

/// Date part of an ISO timestamp
fn display_date(value: Option<&str>) -> &str {
    match value {
        Some(v) => v.split('T').next().unwrap_or(v),
        None => "N/A",
    }
}

fn statement_line(item: &StatementItem) -> String {
    // Payment history lines carry dateOfPayment; loan summaries do not
    if item.date_of_payment.is_some() {
        format!(
            "Date: {}\nType: {}\nAmount: ZMW {}\nBalance: ZMW {}\n",
            display_date(item.date_of_payment.as_deref()),
            item.kind.as_deref().unwrap_or("N/A"),
            format_amount(item.amount_paid.as_ref(), 2),
            format_amount(item.loan_balance.as_ref(), 2),
        )
    } else {
        format!(
            "Date: {}\nLoan Type: {}\nAmount Paid: ZMW {}\nOutstanding Balance: ZMW {}\n",
            display_date(item.loan_start_date.as_deref()),
            item.loan_type.as_deref().unwrap_or("N/A"),
            format_amount(item.total_payments_made.as_ref(), 2),
            format_amount(item.outstanding_balance.as_ref(), 1),
        )
    }
}

fn loan_statement_screen(statement: &LoanStatement) -> ResultScreen {
    let items = statement.items();
    let body = if items.is_empty() {
        "No loan statement data found.".to_string()
    } else {
        items
            .iter()
            .map(statement_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    ResultScreen {
        id: "LOAN_STATEMENT_RESULT",
        title: "Loan Statement",
        heading: "Your Loan Statement",
        body,
    }
}

fn wallet_balance_screen(balance: &WalletBalance) -> ResultScreen {
    ResultScreen {
        id: "WALLET_BALANCE_RESULT",
        title: "Wallet Balance",
        heading: "Your Wallet Balance",
        body: format!("Current Balance: ZMW {}", display_value(&balance.wallet_balance)),
    }
}

fn bank_details_screen(details: &BankDetails) -> ResultScreen {
    let body = if details.data.is_empty() {
        "No bank details available.".to_string()
    } else {
        details
            .data
            .iter()
            .map(|bank| {
                format!(
                    "Bank: {}\nAccount: {}\nBranch: {}\n",
                    bank.bank_name,
                    bank.bank_account_number,
                    bank.bank_branch.as_deref().unwrap_or("N/A"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    ResultScreen {
        id: "BANK_DETAILS_RESULT",
        title: "Bank Details",
        heading: "Bank Repayment Details",
        body,
    }
}

fn topup_range_screen(range: &TopupRange) -> ResultScreen {
    let bounds = range.bounds();
    let body = if bounds.is_empty() {
        "No topup range data available.".to_string()
    } else {
        let mut lines = Vec::new();
        if let Some(loan_type) = &range.loan_type {
            lines.push(format!("Loan Type: {}", loan_type));
        }
        for (min, max) in &bounds {
            lines.push(format!("Minimum: ZMW {}", format_amount(Some(min), 2)));
            lines.push(format!("Maximum: ZMW {}", format_amount(Some(max), 2)));
        }
        lines.join("\n")
    };

    ResultScreen {
        id: "TOPUP_RANGE_RESULT",
        title: "Loan Topup",
        heading: "Loan Topup Available",
        body,
    }
}

fn ussd_payment_screen(payment: &UssdPayment) -> ResultScreen {
    ResultScreen {
        id: "USSD_PAYMENT_RESULT",
        title: "USSD Payment",
        heading: "Payment Request Sent",
        body: payment
            .message
            .clone()
            .unwrap_or_else(|| "Check your phone to approve the payment.".to_string()),
    }
}
