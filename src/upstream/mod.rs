// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upstream loan-service integration
//!
//! Read-only account queries relayed to the Lupiya backend:
//! - Loan statement, wallet balance and top-up range by NRC number
//! - Bank repayment details
//! - USSD payment prompts
//! - Customer account verification
//!
//! Callers depend on the [`AccountService`] trait; [`LupiyaClient`] is the
//! production implementation.

pub mod lupiya;
pub mod service;
pub mod token_cache;
pub mod types;

pub use lupiya::LupiyaClient;
pub use service::AccountService;
pub use token_cache::{AccessTokenCache, Clock, ManualClock, SystemClock};
pub use types::{
    format_amount, AmountRange, BankAccount, BankDetails, CustomerVerification, LoanStatement,
    OneOrMany, StatementItem, TopupItem, TopupRange, UpstreamError, UssdPayment, WalletBalance,
};
