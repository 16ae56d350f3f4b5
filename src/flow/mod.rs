// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Flow screen logic
//!
//! Everything here works on plaintext JSON; encryption is handled by
//! [`crate::crypto`] before and after dispatch.

pub mod data_exchange;
pub mod definitions;
pub mod dispatcher;
pub mod screens;

pub use data_exchange::{
    handle_data_exchange, AccountQuery, DataExchangeError, DataExchangeRequest, ResultScreen,
    BANK_DETAILS_FAILURE, ERROR_SCREEN, LOAN_STATEMENT_FAILURE, TOPUP_RANGE_FAILURE,
    USSD_PAYMENT_FAILURE, WALLET_BALANCE_FAILURE,
};
pub use definitions::{bank_details_flow, ussd_payment_flow, wallet_balance_flow};
pub use dispatcher::{DispatchError, FlowDispatcher, LoanFlowDispatcher};
