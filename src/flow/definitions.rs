// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static flow definitions for the single-screen account query flows

use serde_json::{json, Map, Value};

use crate::version::{FLOW_DATA_API_VERSION, FLOW_JSON_VERSION};

const NRC_HELPER: &str = "Enter your NRC number (e.g., 123456/78/9)";

fn single_screen_flow(id: &str, title: &str, children: Value) -> Value {
    let mut routing_model = Map::new();
    routing_model.insert(id.to_string(), json!([]));

    json!({
        "version": FLOW_JSON_VERSION,
        "data_api_version": FLOW_DATA_API_VERSION,
        "routing_model": routing_model,
        "screens": [
            {
                "id": id,
                "title": title,
                "layout": {
                    "type": "SingleColumnLayout",
                    "children": children,
                }
            }
        ]
    })
}

fn nrc_input() -> Value {
    json!({
        "type": "TextInput",
        "label": "NRC Number",
        "name": "nrc_number",
        "helper-text": NRC_HELPER,
        "required": true
    })
}

/// `GET /wallet-balance`
pub fn wallet_balance_flow() -> Value {
    single_screen_flow(
        "WALLET_BALANCE_FORM",
        "Wallet Balance",
        json!([
            { "type": "TextHeading", "text": "Check Wallet Balance" },
            { "type": "TextBody", "text": "Enter your NRC number to check your wallet balance:" },
            {
                "type": "Form",
                "name": "wallet_balance_form",
                "children": [
                    nrc_input(),
                    {
                        "type": "Footer",
                        "label": "Check Balance",
                        "on-click-action": {
                            "name": "data_exchange",
                            "payload": {
                                "action": "get_wallet_balance",
                                "nrc_number": "${form.nrc_number}"
                            }
                        }
                    }
                ]
            }
        ]),
    )
}

/// `GET /bank-details`
pub fn bank_details_flow() -> Value {
    single_screen_flow(
        "BANK_DETAILS_FORM",
        "Bank Details",
        json!([
            { "type": "TextHeading", "text": "Bank Repayment Details" },
            { "type": "TextBody", "text": "Get bank details for loan repayment:" },
            {
                "type": "Form",
                "name": "bank_details_form",
                "children": [
                    {
                        "type": "Footer",
                        "label": "Get Bank Details",
                        "on-click-action": {
                            "name": "data_exchange",
                            "payload": { "action": "get_bank_details" }
                        }
                    }
                ]
            }
        ]),
    )
}

/// `GET /ussd-payment`
pub fn ussd_payment_flow() -> Value {
    single_screen_flow(
        "USSD_PAYMENT_FORM",
        "USSD Payment",
        json!([
            { "type": "TextHeading", "text": "Request USSD Payment" },
            { "type": "TextBody", "text": "Request a USSD payment prompt to your mobile money:" },
            {
                "type": "Form",
                "name": "ussd_payment_form",
                "children": [
                    nrc_input(),
                    {
                        "type": "TextInput",
                        "label": "Phone Number",
                        "name": "phone_number",
                        "input-type": "phone",
                        "helper-text": "Enter phone number in E.164 format (e.g., +260971234567)",
                        "required": true
                    },
                    {
                        "type": "Footer",
                        "label": "Request Payment",
                        "on-click-action": {
                            "name": "data_exchange",
                            "payload": {
                                "action": "request_ussd_payment",
                                "nrc_number": "${form.nrc_number}",
                                "phone_number": "${form.phone_number}"
                            }
                        }
                    }
                ]
            }
        ]),
    )
}
