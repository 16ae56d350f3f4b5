// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Screen identifiers and fixed screen payloads of the loan intake flow

use serde_json::{json, Map, Value};

pub const LOAN_FORM: &str = "LOAN_FORM";
pub const UPLOAD: &str = "UPLOAD";
pub const SUMMARY: &str = "SUMMARY";
pub const CONFIRMATION: &str = "CONFIRMATION";
pub const TERMS: &str = "TERMS";

/// Fields the LOAN_FORM screen submits and UPLOAD receives
pub const LOAN_FORM_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "nrc_number",
    "dob",
    "phone",
    "email",
    "employment_status",
    "loan_amount",
    "loan_duration",
    "loan_purpose",
];

/// `(id, title)` choices for the employment status dropdown
pub const EMPLOYMENT_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("employed", "Employed"),
    ("self_employed", "Self-Employed"),
    ("unemployed", "Unemployed"),
    ("student", "Student"),
];

/// Navigation response to `screen` carrying `data`
pub fn navigate(screen: &str, data: Map<String, Value>) -> Value {
    json!({
        "screen": screen,
        "data": data,
    })
}

/// The opening LOAN_FORM screen
pub fn loan_form() -> Value {
    let options: Vec<Value> = EMPLOYMENT_STATUS_OPTIONS
        .iter()
        .map(|(id, title)| json!({ "id": id, "title": title }))
        .collect();

    let mut data = Map::new();
    data.insert("employment_status".to_string(), Value::Array(options));
    navigate(LOAN_FORM, data)
}
