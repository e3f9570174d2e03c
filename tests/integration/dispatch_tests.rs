//! Dispatch Integration Tests
//!
//! Tests full signal delivery against a local endpoint:
//! - Success on 200/201
//! - Remote rejection and transport failure as typed errors
//! - Best-effort mode swallowing every failure
//! - No request sent for invalid signals

use crate::mock_endpoint::MockEndpoint;
use axum::http::StatusCode;
use davinci_signal::{
    spawn_best_effort, SignalConfig, SignalDispatcher, SignalError, SignalKind, SignalRequest,
    Signaler, TokenReference,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const API_KEY: &str = "integration-key";

fn dispatcher_for(base_url: &str) -> SignalDispatcher {
    SignalDispatcher::new(SignalConfig::new(base_url, API_KEY)).unwrap()
}

fn cake() -> SignalRequest {
    SignalRequest::foreign_token("Binance", "0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82", "cake")
}

fn usdc_hbar() -> SignalRequest {
    SignalRequest::liquidity_token(
        "hedera",
        "0.0.1080216",
        "USDC - HBAR",
        TokenReference::new("hedera", "0.0.456858"),
        TokenReference::new("hedera", "0.0.1062664"),
    )
}

// =============================================================================
// SUCCESS PATH
// =============================================================================

#[tokio::test]
async fn test_foreign_token_created() {
    let endpoint = MockEndpoint::start(StatusCode::CREATED).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);

    let outcome = dispatcher.dispatch(&cake()).await.unwrap();

    assert_eq!(outcome.kind, SignalKind::Token);
    assert_eq!(outcome.status, 201);
    assert_eq!(outcome.routing_key.network, "Binance");

    let recorded = endpoint.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].network, "Binance");
    assert_eq!(recorded[0].address, "0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82");
    assert_eq!(recorded[0].api_key.as_deref(), Some(API_KEY));
    assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(recorded[0].body, json!({"type": "TOKEN", "title": "cake"}));
}

#[tokio::test]
async fn test_liquidity_token_ok() {
    let endpoint = MockEndpoint::start(StatusCode::OK).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);

    let outcome = dispatcher.dispatch(&usdc_hbar()).await.unwrap();
    assert_eq!(outcome.status, 200);

    let recorded = endpoint.recorded();
    assert_eq!(recorded[0].network, "hedera");
    assert_eq!(recorded[0].address, "0.0.1080216");
    assert_eq!(
        recorded[0].body,
        json!({
            "type": "LP",
            "title": "USDC - HBAR",
            "token0": {"network": "hedera", "address": "0.0.456858"},
            "token1": {"network": "hedera", "address": "0.0.1062664"}
        })
    );
}

#[tokio::test]
async fn test_repeated_signal_sends_identical_requests() {
    let endpoint = MockEndpoint::start(StatusCode::OK).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);
    let signal = SignalRequest::wrapped_token(
        "Ethereum",
        "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
        "Wrapped ETH",
        TokenReference::new("Ethereum", "ETH"),
    );

    dispatcher.dispatch(&signal).await.unwrap();
    dispatcher.dispatch(&signal).await.unwrap();

    let recorded = endpoint.recorded();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0], recorded[1]);
}

// =============================================================================
// FAILURE PATH
// =============================================================================

#[tokio::test]
async fn test_restricted_network_sends_nothing() {
    let endpoint = MockEndpoint::start(StatusCode::CREATED).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);

    let result = dispatcher
        .dispatch(&SignalRequest::foreign_token("hedera", "0.0.1", "x"))
        .await;

    assert!(matches!(result, Err(SignalError::Validation(_))));
    assert!(endpoint.recorded().is_empty());
}

#[tokio::test]
async fn test_server_error_is_remote_rejection() {
    let endpoint = MockEndpoint::start(StatusCode::INTERNAL_SERVER_ERROR).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);

    match dispatcher.dispatch(&cake()).await {
        Err(SignalError::RemoteRejection { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "mock response");
        }
        other => panic!("Expected remote rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_other_success_codes_are_rejections() {
    let endpoint = MockEndpoint::start(StatusCode::ACCEPTED).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);

    let result = dispatcher.dispatch(&cake()).await;
    assert!(matches!(
        result,
        Err(SignalError::RemoteRejection { status: 202, .. })
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dispatcher = dispatcher_for(&format!("http://{}/api/v1/tokens", addr));
    let result = dispatcher.dispatch(&cake()).await;

    assert!(matches!(result, Err(SignalError::Transport(_))));
}

#[tokio::test]
async fn test_deadline_abandons_slow_call() {
    let endpoint =
        MockEndpoint::start_with_delay(StatusCode::OK, Some(Duration::from_millis(500))).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);

    let result = dispatcher
        .dispatch_with_deadline(&cake(), Duration::from_millis(50))
        .await;

    assert!(matches!(result, Err(SignalError::DeadlineElapsed(_))));
}

#[tokio::test]
async fn test_configured_timeout_is_transport_error() {
    let endpoint =
        MockEndpoint::start_with_delay(StatusCode::OK, Some(Duration::from_millis(500))).await;
    let mut config = SignalConfig::new(&endpoint.base_url, API_KEY);
    config.timeout_ms = Some(50);
    let dispatcher = SignalDispatcher::new(config).unwrap();

    match dispatcher.dispatch(&cake()).await {
        Err(SignalError::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("Expected timeout, got {:?}", other),
    }
}

// =============================================================================
// BEST-EFFORT MODE
// =============================================================================

#[tokio::test]
async fn test_best_effort_reports_server_error_without_failing() {
    let endpoint = MockEndpoint::start(StatusCode::INTERNAL_SERVER_ERROR).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);

    dispatcher.signal_best_effort(&cake()).await;

    assert_eq!(endpoint.recorded().len(), 1);
}

#[tokio::test]
async fn test_best_effort_skips_invalid_signal() {
    let endpoint = MockEndpoint::start(StatusCode::CREATED).await;
    let dispatcher = dispatcher_for(&endpoint.base_url);

    dispatcher
        .signal_best_effort(&SignalRequest::foreign_token("HEDERA", "0.0.1", "x"))
        .await;

    assert!(endpoint.recorded().is_empty());
}

#[tokio::test]
async fn test_spawned_signals_are_independent() {
    let endpoint = MockEndpoint::start(StatusCode::CREATED).await;
    let dispatcher: Arc<dyn Signaler> = Arc::new(dispatcher_for(&endpoint.base_url));

    let handles = vec![
        spawn_best_effort(dispatcher.clone(), cake()),
        spawn_best_effort(dispatcher.clone(), usdc_hbar()),
        spawn_best_effort(
            dispatcher.clone(),
            SignalRequest::foreign_token("hedera", "0.0.1", "x"),
        ),
    ];
    for handle in handles {
        handle.await.unwrap();
    }

    let mut addresses: Vec<String> = endpoint
        .recorded()
        .into_iter()
        .map(|r| r.address)
        .collect();
    addresses.sort();
    assert_eq!(
        addresses,
        vec![
            "0.0.1080216".to_string(),
            "0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82".to_string()
        ]
    );
}
