// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Loan intake screen sequence
//!
//! Walks INIT -> LOAN_FORM -> UPLOAD -> SUMMARY -> CONFIRMATION -> TERMS and
//! checks what each transition carries forward.

use lupiya_flow_endpoint::flow::{DispatchError, FlowDispatcher, LoanFlowDispatcher};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::common::StubAccounts;

fn dispatcher() -> LoanFlowDispatcher {
    LoanFlowDispatcher::new(Arc::new(StubAccounts::default()))
}

fn applicant() -> Value {
    json!({
        "first_name": "Chanda",
        "last_name": "Mulenga",
        "nrc_number": "123456/78/9",
        "dob": "1990-04-12",
        "phone": "+260971234567",
        "email": "chanda@example.com",
        "employment_status": "employed",
        "loan_amount": "5000",
        "loan_duration": "6",
        "loan_purpose": "School fees"
    })
}

async fn submit(screen: &str, data: Value) -> Value {
    dispatcher()
        .next_screen(json!({
            "version": "3.0",
            "action": "data_exchange",
            "screen": screen,
            "data": data,
            "flow_token": "flow-token-42"
        }))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_init_opens_loan_form() {
    let response = dispatcher()
        .next_screen(json!({"action": "INIT", "flow_token": "flow-token-42"}))
        .await
        .unwrap();

    assert_eq!(response["screen"], "LOAN_FORM");
    let ids: Vec<&str> = response["data"]["employment_status"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["employed", "self_employed", "unemployed", "student"]);
}

#[tokio::test]
async fn test_loan_form_copies_only_form_fields() {
    let mut data = applicant();
    data["unexpected"] = json!("dropped");

    let response = submit("LOAN_FORM", data).await;

    assert_eq!(response["screen"], "UPLOAD");
    assert_eq!(response["data"], applicant());
}

#[tokio::test]
async fn test_loan_form_missing_fields_are_omitted() {
    let response = submit("LOAN_FORM", json!({"first_name": "Chanda"})).await;

    assert_eq!(response["screen"], "UPLOAD");
    assert_eq!(response["data"], json!({"first_name": "Chanda"}));
}

#[tokio::test]
async fn test_falsy_error_field_does_not_interrupt_flow() {
    for error in [json!(false), json!(""), json!(0), Value::Null] {
        let response = submit("LOAN_FORM", json!({"error": error, "first_name": "A"})).await;
        assert_eq!(response["screen"], "UPLOAD", "error = {}", error);
        assert_eq!(response["data"], json!({"first_name": "A"}));
    }
}

#[tokio::test]
async fn test_upload_to_summary_keeps_documents() {
    let mut data = applicant();
    data["documents"] = json!([{"file_name": "payslip.pdf", "media_id": "m-1"}]);

    let response = submit("UPLOAD", data.clone()).await;

    assert_eq!(response["screen"], "SUMMARY");
    assert_eq!(response["data"], data);
}

#[tokio::test]
async fn test_upload_without_documents_adds_no_key() {
    let response = submit("UPLOAD", applicant()).await;

    assert_eq!(response["screen"], "SUMMARY");
    assert!(!response["data"].as_object().unwrap().contains_key("documents"));
}

#[tokio::test]
async fn test_summary_to_confirmation() {
    let response = submit("SUMMARY", applicant()).await;
    assert_eq!(response["screen"], "CONFIRMATION");
    assert_eq!(response["data"], applicant());
}

#[tokio::test]
async fn test_confirmation_defaults_confirmed() {
    let response = submit("CONFIRMATION", applicant()).await;
    assert_eq!(response["screen"], "TERMS");
    assert_eq!(response["data"]["confirmed"], true);
    assert_eq!(response["data"]["first_name"], "Chanda");

    let mut data = applicant();
    data["confirmed"] = json!("yes");
    let response = submit("CONFIRMATION", data).await;
    assert_eq!(response["data"]["confirmed"], "yes");
}

#[tokio::test]
async fn test_terms_closes_flow_with_params() {
    let mut data = applicant();
    data["accepted_terms"] = json!(true);

    let response = submit("TERMS", data).await;

    let params = &response["data"]["extension_message_response"]["params"];
    assert_eq!(params["flow_token"], "flow-token-42");
    assert_eq!(params["first_name"], "Chanda");
    assert_eq!(params["accepted_terms"], true);
    assert!(response.get("screen").is_none());
}

#[tokio::test]
async fn test_terms_without_flow_token_omits_it() {
    let response = dispatcher()
        .next_screen(json!({
            "action": "data_exchange",
            "screen": "TERMS",
            "data": {"x": 1}
        }))
        .await
        .unwrap();

    assert_eq!(
        response,
        json!({"data": {"extension_message_response": {"params": {"x": 1}}}})
    );
}

#[tokio::test]
async fn test_unknown_action_is_an_error() {
    let result = dispatcher()
        .next_screen(json!({"action": "BACK", "screen": "SUMMARY"}))
        .await;

    match result {
        Err(DispatchError::Unhandled { action, screen }) => {
            assert_eq!(action.as_deref(), Some("BACK"));
            assert_eq!(screen.as_deref(), Some("SUMMARY"));
        }
        other => panic!("expected Unhandled, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ping_and_error_notifications_take_priority() {
    let response = dispatcher()
        .next_screen(json!({"action": "ping", "data": {"error": "ignored"}}))
        .await
        .unwrap();
    assert_eq!(response, json!({"data": {"status": "active"}}));

    let response = dispatcher()
        .next_screen(json!({"action": "INIT", "data": {"error": "timeout"}}))
        .await
        .unwrap();
    assert_eq!(response, json!({"data": {"acknowledged": true}}));
}
