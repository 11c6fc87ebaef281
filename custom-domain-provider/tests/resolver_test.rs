//! DNS-over-HTTPS resolver tests against a local mock server

#![allow(clippy::unwrap_used, clippy::expect_used)]

use custom_domain_provider::{DnsRecordType, DnsResolver, DohResolver, ResolverSettings};
use httpmock::prelude::*;
use serde_json::json;

fn resolver_for(server: &MockServer) -> DohResolver {
    DohResolver::new(&ResolverSettings {
        endpoint: server.url("/dns-query"),
        timeout_secs: 5,
    })
    .expect("resolver builds")
}

#[tokio::test]
async fn cname_lookup_returns_target() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/dns-query")
                .query_param("name", "go.example.com")
                .query_param("type", "CNAME")
                .header("Accept", "application/dns-json");
            then.status(200).json_body(json!({
                "Status": 0,
                "Answer": [
                    { "name": "go.example.com.", "type": 5, "TTL": 300, "data": "cname.shortlinks.example." }
                ]
            }));
        })
        .await;

    let values = resolver_for(&server)
        .query_records("go.example.com", DnsRecordType::Cname)
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(values, vec!["cname.shortlinks.example".to_string()]);
}

#[tokio::test]
async fn a_lookup_returns_addresses() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/dns-query")
                .query_param("type", "A");
            then.status(200).json_body(json!({
                "Status": 0,
                "Answer": [
                    { "name": "example.com.", "type": 1, "TTL": 60, "data": "76.76.21.21" },
                    { "name": "example.com.", "type": 1, "TTL": 60, "data": "76.76.21.22" }
                ]
            }));
        })
        .await;

    let values = resolver_for(&server)
        .query_records("example.com", DnsRecordType::A)
        .await
        .unwrap();
    assert_eq!(values, vec!["76.76.21.21", "76.76.21.22"]);
}

#[tokio::test]
async fn nxdomain_is_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/dns-query");
            then.status(200).json_body(json!({ "Status": 3 }));
        })
        .await;

    let values = resolver_for(&server)
        .query_records("missing.example.com", DnsRecordType::Cname)
        .await
        .unwrap();
    assert!(values.is_empty());
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/dns-query");
            then.status(500).body("oops");
        })
        .await;

    let result = resolver_for(&server)
        .query_records("go.example.com", DnsRecordType::Cname)
        .await;
    assert!(result.is_err());
}
