//! End-to-end verification, derivation, and initialization scenarios.

use blindhash::protocol::{decode_hex, derive_hash2_hex};
use blindhash::{AppConfig, BlindHashClient, BlindHashError};

mod common;
use common::{base_url, start_fixed_backend, start_programmable_backend};

const HASH1_HEX: &str = "4fd2a1b3c4d5e6f708192a3b4c5d6e7f";
const SALT2_HEX: &str = "a1b2c3d4e5f60718";
const NEW_SALT2_HEX: &str = "0f1e2d3c4b5a6978";

fn expected_hash2(salt2_hex: &str) -> String {
    let hash1 = decode_hex("hash1Hex", HASH1_HEX).unwrap();
    let salt2 = decode_hex("salt2Hex", salt2_hex).unwrap();
    derive_hash2_hex(&hash1, &salt2)
}

async fn client_with_body(body: &str) -> BlindHashClient {
    let (addr, _) = start_fixed_backend(200, body).await;
    let config = AppConfig::with_servers(vec![base_url(addr)]);
    BlindHashClient::from_config("app1", &config).unwrap()
}

#[tokio::test]
async fn verify_password_matches() {
    let body = format!(r#"{{"s2": "{SALT2_HEX}", "vid": 3}}"#);
    let client = client_with_body(&body).await;

    let outcome = client
        .verify_password(HASH1_HEX, &expected_hash2(SALT2_HEX), None)
        .await
        .unwrap();
    assert!(outcome.matched);
    assert_eq!(outcome.new_version_id, None);
    assert_eq!(outcome.new_hash2_hex, None);
}

#[tokio::test]
async fn verify_password_mismatch() {
    let body = format!(r#"{{"s2": "{SALT2_HEX}", "vid": 3}}"#);
    let client = client_with_body(&body).await;

    let wrong = "ff".repeat(64);
    let outcome = client.verify_password(HASH1_HEX, &wrong, None).await.unwrap();
    assert!(!outcome.matched);
}

#[tokio::test]
async fn match_with_upgrade_returns_new_hash() {
    let body = format!(
        r#"{{"s2": "{SALT2_HEX}", "vid": 3, "new_s2": "{NEW_SALT2_HEX}", "new_vid": 4}}"#
    );
    let client = client_with_body(&body).await;

    let outcome = client
        .verify_password(HASH1_HEX, &expected_hash2(SALT2_HEX), Some(3))
        .await
        .unwrap();
    assert!(outcome.matched);
    assert_eq!(outcome.new_version_id, Some(4));
    assert_eq!(outcome.new_hash2_hex, Some(expected_hash2(NEW_SALT2_HEX)));
}

#[tokio::test]
async fn mismatch_suppresses_upgrade_fields() {
    let body = format!(
        r#"{{"s2": "{SALT2_HEX}", "vid": 3, "new_s2": "{NEW_SALT2_HEX}", "new_vid": 4}}"#
    );
    let client = client_with_body(&body).await;

    let wrong = "00".repeat(64);
    let outcome = client
        .verify_password(HASH1_HEX, &wrong, Some(3))
        .await
        .unwrap();
    assert!(!outcome.matched);
    assert_eq!(outcome.new_version_id, None);
    assert_eq!(outcome.new_hash2_hex, None);
}

#[tokio::test]
async fn new_password_derives_under_latest_settings() {
    let body = format!(r#"{{"s2": "{SALT2_HEX}", "vid": 7}}"#);
    let client = client_with_body(&body).await;

    let stored = client.new_password(HASH1_HEX).await.unwrap();
    assert_eq!(stored.version_id, 7);
    assert_eq!(stored.hash2_hex, expected_hash2(SALT2_HEX));

    // The derived value round-trips through verification.
    let outcome = client
        .verify_password(HASH1_HEX, &stored.hash2_hex, Some(stored.version_id))
        .await
        .unwrap();
    assert!(outcome.matched);
}

#[tokio::test]
async fn pinned_request_carries_version_segment() {
    let (addr, _) = start_programmable_backend(|path| async move {
        // /{appId}/{hash1Hex}/{versionId-or-empty}
        let segment = path.rsplit('/').next().unwrap_or_default().to_string();
        let body = if segment.is_empty() {
            format!(r#"{{"s2": "{SALT2_HEX}", "vid": 9}}"#)
        } else {
            format!(r#"{{"s2": "{SALT2_HEX}"}}"#)
        };
        (200, body)
    })
    .await;

    let config = AppConfig::with_servers(vec![base_url(addr)]);
    let client = BlindHashClient::from_config("app1", &config).unwrap();

    let latest = client.get_salt(HASH1_HEX, None).await.unwrap();
    assert_eq!(latest.version_id, 9);

    let pinned = client.get_salt(HASH1_HEX, Some(5)).await.unwrap();
    assert_eq!(pinned.version_id, 5);

    // Zero normalizes to latest.
    let zero = client.get_salt(HASH1_HEX, Some(0)).await.unwrap();
    assert_eq!(zero.version_id, 9);
}

#[tokio::test]
async fn init_fetches_configuration_and_serves_requests() {
    let (salt_addr, _) = start_fixed_backend(200, r#"{"s2": "0102", "vid": 1}"#).await;

    let config_body = format!(
        r#"{{"servers": ["{}"], "timeout": 1000, "retries": 1, "stats": 1}}"#,
        base_url(salt_addr)
    );
    let (config_addr, config_hits) = start_fixed_backend(200, &config_body).await;

    let client = BlindHashClient::init_with_base("app1", &base_url(config_addr))
        .await
        .unwrap();
    assert_eq!(common::hits(&config_hits), 1);

    let response = client.get_salt(HASH1_HEX, None).await.unwrap();
    assert_eq!(response.salt2_hex, "0102");
    assert!(client.get_stats().is_some());
    client.close();
}

#[tokio::test]
async fn init_surfaces_configuration_failure() {
    let (config_addr, _) = start_fixed_backend(500, "nope").await;

    let err = BlindHashClient::init_with_base("app1", &base_url(config_addr))
        .await
        .unwrap_err();
    assert!(matches!(err, BlindHashError::Config(_)));
}
