#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mhac_api::{DeviceClient, Error, SensorReading, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DeviceClient::with_client(reqwest::Client::new(), &base_url).unwrap();
    (server, client)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn rejected(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": false,
        "error": { "code": code, "message": message }
    }))
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_session_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api.cgi"))
        .and(body_partial_json(json!({
            "command": "login",
            "data": { "username": "admin", "password": "admin" }
        })))
        .respond_with(ok(json!({ "id": { "sessionID": "S3SS10N" } })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "admin".to_string().into();
    let session = client.login("admin", &secret).await.unwrap();
    assert_eq!(session, "S3SS10N");
}

#[tokio::test]
async fn test_login_rejected_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api.cgi"))
        .respond_with(rejected(1, "invalid credentials"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("invalid credentials"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_sends_session() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "command": "logout",
            "data": { "sessionID": "abc" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    tokio_test::assert_ok!(client.logout("abc").await);
}

// ── Informational commands ──────────────────────────────────────────

#[tokio::test]
async fn test_get_info_without_session() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "command": "getinfo" })))
        .respond_with(ok(json!({
            "info": {
                "deviceModel": "MH-AC-WIFI-1",
                "sn": "0123456789",
                "fwVersion": "1.3.3",
                "wlanSTAMAC": "CC:3F:1D:01:02:03"
            }
        })))
        .mount(&server)
        .await;

    let info = client.get_info().await.unwrap();
    assert_eq!(info.model.as_deref(), Some("MH-AC-WIFI-1"));
    assert_eq!(info.serial_number.as_deref(), Some("0123456789"));
    assert_eq!(info.wlan_mac.as_deref(), Some("CC:3F:1D:01:02:03"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["data"].get("sessionID").is_none(), "{body}");
}

#[tokio::test]
async fn test_exchange_with_debug_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "command": "getavailableservices",
            "data": { "sessionID": "s1" }
        })))
        .respond_with(ok(json!({ "userinfo": { "servicelist": ["getinfo"] } })))
        .expect(1)
        .mount(&server)
        .await;

    // The request data is rendered into the debug event before the
    // session id is attached.
    let services = client.get_available_services("s1").await.unwrap();
    assert_eq!(services, vec!["getinfo"]);
}

#[tokio::test]
async fn test_available_services_and_datapoints() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "command": "getavailableservices",
            "data": { "sessionID": "s1" }
        })))
        .respond_with(ok(json!({
            "userinfo": { "servicelist": ["getdatapointvalue", "setdatapointvalue"] }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "command": "getavailabledatapoints" })))
        .respond_with(ok(json!({
            "dp": { "datapoints": [{ "uid": 1, "rw": "rw" }, { "uid": 10, "rw": "r" }] }
        })))
        .mount(&server)
        .await;

    let services = client.get_available_services("s1").await.unwrap();
    assert_eq!(services, vec!["getdatapointvalue", "setdatapointvalue"]);

    let datapoints = client.get_available_datapoints("s1").await.unwrap();
    assert_eq!(datapoints.len(), 2);
    assert_eq!(datapoints[1]["uid"], 10);
}

// ── Datapoint commands ──────────────────────────────────────────────

#[tokio::test]
async fn test_get_all_values() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "command": "getdatapointvalue",
            "data": { "uid": "all", "sessionID": "s1" }
        })))
        .respond_with(ok(json!({
            "dpval": [
                { "uid": 1, "value": 1 },
                { "uid": 9, "value": 245 },
                { "uid": 37, "value": -35 }
            ]
        })))
        .mount(&server)
        .await;

    let readings = client.get_all_values("s1").await.unwrap();
    assert_eq!(
        readings,
        vec![
            SensorReading::new(1, 1),
            SensorReading::new(9, 245),
            SensorReading::new(37, -35),
        ]
    );
}

#[tokio::test]
async fn test_set_value() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "command": "setdatapointvalue",
            "data": { "uid": 4, "value": 3, "sessionID": "s1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_value("s1", 4, 3).await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_success_false_is_protocol_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(rejected(5, "wrong session"))
        .mount(&server)
        .await;

    let result = client.get_all_values("stale").await;

    match result {
        Err(Error::Protocol {
            ref command,
            ref message,
        }) => {
            assert_eq!(command, "getdatapointvalue");
            assert!(message.contains("wrong session"), "got: {message}");
        }
        other => panic!("expected Protocol error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_200_is_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.get_info().await;
    assert!(
        matches!(result, Err(Error::Http { status: 500, .. })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.get_all_values("s1").await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_hung_exchange_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ok(json!({})).set_delay(std::time::Duration::from_millis(500)))
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(std::time::Duration::from_millis(50));
    let client = DeviceClient::new(&server.uri(), &transport).unwrap();

    let result = client.get_info().await;
    assert!(
        matches!(result, Err(Error::Timeout { timeout_ms: 50 })),
        "expected Timeout error, got: {result:?}"
    );
    assert!(result.unwrap_err().is_unreachable());
}
