// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encrypted flow endpoint (`POST /`) status mapping and round trips

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use lupiya_flow_endpoint::crypto::{compute_signature, Envelope};
use rsa::RsaPublicKey;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use crate::common::{
    body_bytes, open_response, other_key, seal, seal_bytes, test_app, StubAccounts, TEST_IV,
    TEST_KEY,
};

const SECRET: &str = "test-app-secret";

fn signed_request(body: Vec<u8>, secret: &str) -> Request<Body> {
    let signature = compute_signature(&body, secret);
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header("content-type", "application/json")
        .header("x-hub-signature-256", signature)
        .body(Body::from(body))
        .unwrap()
}

fn envelope_bytes(envelope: &Envelope) -> Vec<u8> {
    serde_json::to_vec(envelope).unwrap()
}

async fn exchange(app: Router, body: &Value) -> Value {
    let envelope = seal(body, &TEST_KEY, &TEST_IV);
    let response = app
        .oneshot(signed_request(envelope_bytes(&envelope), SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain"
    );

    let encoded = String::from_utf8(body_bytes(response).await).unwrap();
    open_response(&encoded, &TEST_KEY, &TEST_IV)
}

#[tokio::test]
async fn test_ping_round_trip() {
    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let response = exchange(app, &json!({"action": "ping", "version": "3.0"})).await;
    assert_eq!(response, json!({"data": {"status": "active"}}));
}

#[tokio::test]
async fn test_init_returns_loan_form() {
    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let response = exchange(app, &json!({"action": "INIT", "flow_token": "ft-1"})).await;

    assert_eq!(response["screen"], "LOAN_FORM");
    assert_eq!(response["data"]["employment_status"][0]["id"], "employed");
}

#[tokio::test]
async fn test_account_query_through_encrypted_flow() {
    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let response = exchange(
        app,
        &json!({
            "action": "data_exchange",
            "screen": "BANK_DETAILS_FORM",
            "data": {"action": "get_bank_details"}
        }),
    )
    .await;

    assert_eq!(response["screen"], "BANK_DETAILS_RESULT");
    assert!(response["data"]["body"]
        .as_str()
        .unwrap()
        .contains("Bank: Zanaco"));
}

#[tokio::test]
async fn test_bad_signature_is_432_with_empty_body() {
    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let envelope = seal(&json!({"action": "ping"}), &TEST_KEY, &TEST_IV);

    let response = app
        .oneshot(signed_request(envelope_bytes(&envelope), "not-the-secret"))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 432);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_missing_signature_is_432() {
    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let envelope = seal(&json!({"action": "ping"}), &TEST_KEY, &TEST_IV);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::from(envelope_bytes(&envelope)))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status().as_u16(), 432);
}

#[tokio::test]
async fn test_open_mode_accepts_unsigned_requests() {
    let app = test_app(None, true, StubAccounts::default());
    let envelope = seal(&json!({"action": "ping"}), &TEST_KEY, &TEST_IV);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::from(envelope_bytes(&envelope)))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_private_key_is_500() {
    let app = test_app(Some(SECRET), false, StubAccounts::default());
    let envelope = seal(&json!({"action": "ping"}), &TEST_KEY, &TEST_IV);

    let response = app
        .oneshot(signed_request(envelope_bytes(&envelope), SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_key_for_other_recipient_is_421() {
    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let public = RsaPublicKey::from(other_key());
    let envelope = seal_bytes(br#"{"action":"ping"}"#, &TEST_KEY, &TEST_IV, &public);

    let response = app
        .oneshot(signed_request(envelope_bytes(&envelope), SECRET))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 421);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_tampered_payload_is_500() {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let mut envelope = seal(&json!({"action": "ping"}), &TEST_KEY, &TEST_IV);
    let mut data = STANDARD.decode(&envelope.encrypted_flow_data).unwrap();
    data[2] ^= 0xff;
    envelope.encrypted_flow_data = STANDARD.encode(&data);

    let response = app
        .oneshot(signed_request(envelope_bytes(&envelope), SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_non_envelope_body_is_500() {
    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let response = app
        .oneshot(signed_request(b"{\"hello\":\"world\"}".to_vec(), SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unhandled_screen_is_500() {
    let app = test_app(Some(SECRET), true, StubAccounts::default());
    let envelope = seal(
        &json!({"action": "data_exchange", "screen": "UNKNOWN_SCREEN", "data": {}}),
        &TEST_KEY,
        &TEST_IV,
    );

    let response = app
        .oneshot(signed_request(envelope_bytes(&envelope), SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_bytes(response).await.is_empty());
}
