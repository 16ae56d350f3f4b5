// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Account service trait definition

use async_trait::async_trait;

use super::types::{
    BankDetails, CustomerVerification, LoanStatement, TopupRange, UpstreamError, UssdPayment,
    WalletBalance,
};

/// Read-only account queries against the loan-servicing backend
///
/// `id_number` is the customer's NRC (national registration card) number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn loan_statement(&self, id_number: &str) -> Result<LoanStatement, UpstreamError>;

    async fn wallet_balance(&self, id_number: &str) -> Result<WalletBalance, UpstreamError>;

    async fn bank_details(&self) -> Result<BankDetails, UpstreamError>;

    async fn topup_range(&self, id_number: &str) -> Result<TopupRange, UpstreamError>;

    async fn request_ussd_payment(
        &self,
        id_number: &str,
        phone_number: &str,
    ) -> Result<UssdPayment, UpstreamError>;

    async fn verify_customer(&self, id_number: &str)
        -> Result<CustomerVerification, UpstreamError>;
}
