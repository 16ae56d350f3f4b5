// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Private key loading from PEM text and files

use lupiya_flow_endpoint::config::FlowConfig;
use lupiya_flow_endpoint::crypto::{load_private_key_file, parse_private_key, KeyLoadError};
use pkcs8::{pkcs5::pbes2, LineEnding, PrivateKeyInfo};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::EncodePrivateKey;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::common::server_key;

/// Encrypted PKCS#8 with cheap PBKDF2 parameters
fn encrypted_pkcs8_pem(passphrase: &str) -> String {
    let der = server_key().to_pkcs8_der().unwrap();
    let info = PrivateKeyInfo::try_from(der.as_bytes()).unwrap();

    let salt = [0x5au8; 16];
    let iv = [0xa5u8; 16];
    let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(2048, &salt, &iv).unwrap();

    let encrypted = info.encrypt_with_params(params, passphrase).unwrap();
    encrypted
        .to_pem("ENCRYPTED PRIVATE KEY", LineEnding::LF)
        .unwrap()
        .to_string()
}

#[test]
fn test_pkcs1_pem() {
    let pem = server_key().to_pkcs1_pem(LineEnding::LF).unwrap();
    let key = parse_private_key(&pem, None).unwrap();
    assert_eq!(&key, server_key());
}

#[test]
fn test_pkcs8_pem() {
    let pem = server_key().to_pkcs8_pem(LineEnding::LF).unwrap();
    let key = parse_private_key(&pem, None).unwrap();
    assert_eq!(&key, server_key());
}

#[test]
fn test_escaped_newlines_from_environment() {
    let pem = server_key().to_pkcs8_pem(LineEnding::LF).unwrap();
    let escaped = pem.trim_end().replace('\n', "\\n");
    assert!(!escaped.contains('\n'));

    let key = parse_private_key(&escaped, None).unwrap();
    assert_eq!(&key, server_key());
}

#[test]
fn test_encrypted_pkcs8_with_passphrase() {
    let pem = encrypted_pkcs8_pem("correct horse");

    let key = parse_private_key(&pem, Some("correct horse")).unwrap();
    assert_eq!(&key, server_key());

    assert!(matches!(
        parse_private_key(&pem, Some("wrong")),
        Err(KeyLoadError::Invalid {
            format: "encrypted PKCS#8",
            ..
        })
    ));
    assert!(matches!(
        parse_private_key(&pem, None),
        Err(KeyLoadError::PassphraseRequired)
    ));
}

#[test]
fn test_load_from_file() {
    let pem = server_key().to_pkcs1_pem(LineEnding::LF).unwrap();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(pem.as_bytes()).unwrap();

    let key = load_private_key_file(file.path(), None).unwrap();
    assert_eq!(&key, server_key());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.pem");

    assert!(matches!(
        load_private_key_file(&missing, None),
        Err(KeyLoadError::Unreadable { .. })
    ));
}

#[test]
fn test_config_prefers_inline_pem() {
    let dir = tempfile::tempdir().unwrap();
    let inline = server_key().to_pkcs8_pem(LineEnding::LF).unwrap();

    let config = FlowConfig {
        private_key_pem: Some(inline.to_string()),
        private_key_path: Some(dir.path().join("ignored.pem")),
        ..FlowConfig::default()
    };
    assert_eq!(&config.load_private_key().unwrap(), server_key());
}

#[test]
fn test_key_material_not_in_errors() {
    let pem = encrypted_pkcs8_pem("s3cr3t-passphrase");
    let err = parse_private_key(&pem, Some("other-passphrase")).unwrap_err();

    let message = err.to_string();
    assert!(!message.contains("s3cr3t-passphrase"));
    assert!(!message.contains("other-passphrase"));
}
