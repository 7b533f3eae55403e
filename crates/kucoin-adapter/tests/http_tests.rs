/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - HTTP endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use common::{client_for, setup_mock_server, test_credentials};
use kucoin_adapter::{
    ApiKeyVersion, ClientConfig, Credentials, Environment, KucoinClient, KucoinError,
    OrderCreateRequest, RequestSigner, Side,
};
use rust_decimal::Decimal;
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let client = assert_ok!(KucoinClient::new());
    assert_eq!(client.base_url().as_str(), "https://api.kucoin.com/");
    assert!(client.credentials().is_none());
}

#[test]
fn test_client_with_sandbox_config() {
    let config = ClientConfig {
        environment: Environment::Sandbox,
        ..ClientConfig::default()
    };
    let client = assert_ok!(KucoinClient::with_config(config));
    assert_eq!(client.base_url().as_str(), "https://openapi-sandbox.kucoin.com/");
}

#[test]
fn test_client_credentials_roundtrip() {
    let mut client = assert_ok!(KucoinClient::new());
    let credentials = Credentials {
        key_version: ApiKeyVersion::V1,
        ..test_credentials()
    };

    client.set_credentials(credentials.clone());
    let stored = client.credentials().expect("credentials should be set");
    assert_eq!(stored, &credentials);

    let debug = format!("{stored:?}");
    assert!(debug.contains("test-key"));
    assert!(!debug.contains("test-secret"));
    assert!(!debug.contains("test-passphrase"));
}

#[test]
fn test_error_classification() {
    let timeout_err = KucoinError::Timeout { duration: 30 };
    assert!(timeout_err.is_retryable());

    let rate_limited = KucoinError::Api {
        code: "429000".to_string(),
        message: "Too Many Requests".to_string(),
    };
    assert!(rate_limited.is_retryable());
    assert!(!rate_limited.is_auth_error());

    let bad_sign = KucoinError::Api {
        code: "400005".to_string(),
        message: "Invalid KC-API-SIGN".to_string(),
    };
    assert!(bad_sign.is_auth_error());
    assert!(!bad_sign.is_retryable());
    assert_eq!(bad_sign.api_code(), Some("400005"));
}

#[tokio::test]
async fn test_signed_request_headers_verify() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": [{
                "id": "5bd6e9286d99522a52e458de",
                "currency": "BTC",
                "type": "main",
                "balance": "237582.04299",
                "available": "237582.032",
                "holds": "0.01099"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let accounts = assert_ok!(client.list_accounts(Some("BTC"), None).await);
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].currency, "BTC");

    let requests = server.received_requests().await.expect("recording enabled");
    let request = &requests[0];
    let header = |name: &str| {
        request
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .unwrap_or_else(|| panic!("missing header {name}"))
    };

    let timestamp: i64 = header("KC-API-TIMESTAMP").parse().expect("numeric timestamp");
    let path_and_query = format!(
        "{}?{}",
        request.url.path(),
        request.url.query().expect("currency query")
    );
    assert_eq!(path_and_query, "/api/v1/accounts?currency=BTC");

    let signer = RequestSigner::new("test-secret");
    let expected_sign = assert_ok!(signer.sign_request(timestamp, "GET", &path_and_query, ""));
    let expected_passphrase = assert_ok!(signer.sign_passphrase("test-passphrase"));

    assert_eq!(header("KC-API-KEY"), "test-key");
    assert_eq!(header("KC-API-SIGN"), expected_sign);
    assert_eq!(header("KC-API-PASSPHRASE"), expected_passphrase);
    assert_eq!(header("KC-API-KEY-VERSION"), "2");
}

#[tokio::test]
async fn test_public_request_is_unsigned() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/timestamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": 1546837113087_i64
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let time = assert_ok!(client.get_server_time().await);
    assert_eq!(time, 1546837113087);

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("KC-API-SIGN").is_none());
}

#[tokio::test]
async fn test_create_then_cancel_limit_order() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders"))
        .and(body_partial_json(json!({
            "side": "buy",
            "symbol": "ETH-BTC",
            "type": "limit",
            "price": "0.000001",
            "size": "1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {"orderId": "X"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/orders/X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let order = OrderCreateRequest::limit("ETH-BTC", Side::Buy, Decimal::new(1, 6), Decimal::ONE);
    assert!(!order.client_oid.is_empty());

    let created = assert_ok!(client.create_order(&order).await);
    assert_eq!(created.order_id, "X");

    let cancelled = assert_ok!(client.cancel_order(&created.order_id).await);
    assert!(cancelled.cancelled_order_ids.is_empty());
}

#[tokio::test]
async fn test_api_error_envelope_surfaces_code() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200004",
            "msg": "Balance insufficient!"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let order = OrderCreateRequest::market("ETH-BTC", Side::Sell, Decimal::TEN);
    let err = client.create_order(&order).await.unwrap_err();

    assert_eq!(err.api_code(), Some("200004"));
    assert!(err.to_string().contains("Balance insufficient!"));
}

#[tokio::test]
async fn test_non_envelope_http_error_keeps_status() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/market/allTickers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_all_tickers().await.unwrap_err();
    assert_eq!(err.api_code(), Some("503"));
}

#[tokio::test]
async fn test_private_call_without_credentials_sends_nothing() {
    let server = setup_mock_server().await;
    let client = assert_ok!(KucoinClient::with_config_and_base_url(
        ClientConfig::default(),
        &server.uri()
    ));

    let err = client.list_accounts(None, None).await.unwrap_err();
    assert!(err.is_auth_error());

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}
