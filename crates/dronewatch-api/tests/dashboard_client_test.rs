#![allow(clippy::unwrap_used)]
// Integration tests for `DashboardClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dronewatch_api::{DashboardClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DashboardClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DashboardClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_installs_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dashboard/login"))
        .and(body_json(json!({"username": "operator", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "OK",
            "data": { "id": "operator", "token": "tok-123" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    let resp = client.login("operator", &secret).await.unwrap();

    assert_eq!(resp.data.id.as_deref(), Some("operator"));
    assert!(client.has_token());
}

#[tokio::test]
async fn test_login_rejected_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dashboard/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": false,
            "message": "invalid credentials",
            "data": {}
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("operator", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("invalid credentials"));
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_login_without_token_in_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dashboard/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "OK",
            "data": { "id": "operator" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    let result = client.login("operator", &secret).await;

    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_register_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dashboard/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "registered",
            "data": { "id": "newbie" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    let resp = client.register("newbie", &secret).await.unwrap();

    assert_eq!(resp.data.id.as_deref(), Some("newbie"));
}

// ── Drone roster tests ──────────────────────────────────────────────

#[tokio::test]
async fn test_alive_drones_sends_bearer_header() {
    let (server, client) = setup().await;
    client.set_token("tok-abc".to_string().into());

    Mock::given(method("GET"))
        .and(path("/api/dashboard/alive-drones"))
        .and(header("Auth", "Bearer tok-abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["Aero-X1", "Sentinel-V2"])),
        )
        .mount(&server)
        .await;

    let serials = client.alive_drones().await.unwrap();

    assert_eq!(serials, vec!["Aero-X1", "Sentinel-V2"]);
}

// ── Telemetry tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_telemetry() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/drone/telemetry/Aero-X1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "speed": 12.5,
                "power": 88.0,
                "latitude": 37.5665,
                "longitude": 126.978,
                "person_count": 3
            },
            "updatedAt": 1_700_000_000_000_i64
        })))
        .mount(&server)
        .await;

    let resp = client.telemetry("Aero-X1").await.unwrap();

    assert_eq!(resp.data.speed, Some(12.5));
    assert_eq!(resp.data.person_count, Some(3));
    assert_eq!(resp.updated_at, 1_700_000_000_000);
}

#[tokio::test]
async fn test_telemetry_with_missing_fields() {
    let (server, client) = setup().await;

    // Fields the drone never reported are absent from the payload.
    Mock::given(method("GET"))
        .and(path("/api/dashboard/drone/telemetry/Aero-X1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "speed": 4.0 },
            "updatedAt": 0
        })))
        .mount(&server)
        .await;

    let resp = client.telemetry("Aero-X1").await.unwrap();

    assert_eq!(resp.data.speed, Some(4.0));
    assert_eq!(resp.data.power, None);
    assert_eq!(resp.data.latitude, None);
    assert_eq!(resp.updated_at, 0);
}

// ── Event tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_event() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/drone/event/Sentinel-V2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "speed": 0.0,
                "power": 41.0,
                "latitude": 37.0,
                "longitude": 127.0,
                "person_count": 1,
                "event_detail": {
                    "message": "PERSON DETECTED",
                    "image": "https://cdn.example.net/frame-991.jpg"
                },
                "type": "ALERT"
            },
            "updatedAt": 1_700_000_123_456_i64
        })))
        .mount(&server)
        .await;

    let resp = client.event("Sentinel-V2").await.unwrap();

    assert_eq!(resp.data.event_detail.message, "PERSON DETECTED");
    assert_eq!(resp.data.severity, Some(dronewatch_api::types::Severity::Alert));
    assert_eq!(resp.updated_at, 1_700_000_123_456);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.alive_drones().await;

    match result {
        Err(ref e @ Error::SessionExpired) => assert!(e.is_auth_expired()),
        other => panic!("expected SessionExpired, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_carries_backend_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/drone/telemetry/ghost"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "no such drone"
        })))
        .mount(&server)
        .await;

    let result = client.telemetry("ghost").await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("no such drone"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/alive-drones"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let result = client.alive_drones().await;

    assert!(matches!(result, Err(Error::Deserialization { .. })));
}
