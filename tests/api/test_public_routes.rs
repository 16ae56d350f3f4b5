// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Health, plain data exchange and static flow definitions

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;
use tower::util::ServiceExt;

use crate::common::{body_json, test_app, StubAccounts};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn data_exchange(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/data-exchange")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_configuration() {
    let app = test_app(Some("secret"), true, StubAccounts::default());
    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["private_key_loaded"], true);
    assert_eq!(body["signature_check"], true);
    assert_eq!(body["lupiya"]["has_token"], true);
    assert_eq!(body["lupiya"]["base_url"], "https://backend.qa.lupiya.com");
    assert_eq!(body["version"], lupiya_flow_endpoint::version::VERSION_NUMBER);
    assert_eq!(body["build"]["flow_json_version"], "7.1");
    assert!(body["build"]["features"]
        .as_array()
        .unwrap()
        .contains(&json!("iv-flip-responses")));
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_health_without_key_or_secret() {
    let app = test_app(None, false, StubAccounts::default());
    let body = body_json(app.oneshot(get("/health")).await.unwrap()).await;

    assert_eq!(body["private_key_loaded"], false);
    assert_eq!(body["signature_check"], false);
}

#[tokio::test]
async fn test_data_exchange_wallet_balance() {
    let app = test_app(None, false, StubAccounts::default());
    let response = app
        .oneshot(data_exchange(json!({
            "action": "get_wallet_balance",
            "nrc_number": "123456/78/9"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["version"], "7.1");
    assert_eq!(body["screen"]["id"], "WALLET_BALANCE_RESULT");
    assert_eq!(body["screen"]["terminal"], true);
    assert_eq!(
        body["screen"]["layout"]["children"][1]["text"],
        "Current Balance: ZMW 321.5"
    );
}

#[tokio::test]
async fn test_data_exchange_errors_render_error_screen() {
    let app = test_app(None, false, StubAccounts::default());
    let response = app
        .oneshot(data_exchange(json!({"action": "close_account"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["screen"]["id"], "ERROR_SCREEN");

    let app = test_app(None, false, StubAccounts::failing());
    let response = app
        .oneshot(data_exchange(json!({"action": "get_bank_details"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["screen"]["id"], "ERROR_SCREEN");
    assert!(body["screen"]["layout"]["children"][1]["text"]
        .as_str()
        .unwrap()
        .contains("Failed to fetch bank details"));
}

#[tokio::test]
async fn test_flow_definitions() {
    for (uri, screen) in [
        ("/wallet-balance", "WALLET_BALANCE_FORM"),
        ("/bank-details", "BANK_DETAILS_FORM"),
        ("/ussd-payment", "USSD_PAYMENT_FORM"),
    ] {
        let app = test_app(None, false, StubAccounts::default());
        let response = app.oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["version"], "7.1");
        assert_eq!(body["data_api_version"], "3.0");
        assert_eq!(body["screens"][0]["id"], screen);
    }
}
