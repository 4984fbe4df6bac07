//! Full relay stack against a mock Gemini server on a local port.

use axum::http::StatusCode;
use ecg_relay::prompt::SINGLE_IMAGE_PROMPT;
use ecg_relay::{AppState, GeminiClient, router};

use crate::common::{FormPart, MockGeminiServer, TEST_API_KEY, analyze_request, send, test_config};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";

async fn relay_against(mock: &MockGeminiServer) -> axum::Router {
    let state = AppState::from_config(test_config(&mock.base_url)).unwrap();
    router(state)
}

#[tokio::test]
async fn test_successful_roundtrip() {
    let mock = MockGeminiServer::start(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"parts":[{"text":"X"}]}}]}"#,
    )
    .await;

    let (status, body) = send(
        relay_against(&mock).await,
        analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"analysis": "X"}));
    assert_eq!(mock.hits(), 1);

    let seen = mock.seen();
    assert_eq!(seen[0].path, "/v1beta/models/gemini-2.0-flash:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some(TEST_API_KEY));

    let parts = &seen[0].body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], SINGLE_IMAGE_PROMPT);
    assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
    assert_eq!(parts[1]["inline_data"]["data"], "iVBORw0KGgpmYWtlLXBuZw==");
}

#[tokio::test]
async fn test_upstream_error_message_is_surfaced() {
    let mock = MockGeminiServer::start(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":{"code":429,"message":"rate limited"}}"#,
    )
    .await;

    let (status, body) = send(
        relay_against(&mock).await,
        analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)]),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["message"].as_str().unwrap().contains("rate limited"));
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn test_upstream_error_without_message() {
    let mock = MockGeminiServer::start(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").await;

    let (status, body) = send(
        relay_against(&mock).await,
        analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Error from Gemini API: Unknown error");
}

#[tokio::test]
async fn test_empty_candidates_is_invalid_response() {
    let mock = MockGeminiServer::start(StatusCode::OK, r#"{"candidates":[]}"#).await;

    let (status, body) = send(
        relay_against(&mock).await,
        analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)]),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("did not return a valid analysis")
    );
}

#[tokio::test]
async fn test_non_json_success_is_invalid_response() {
    let mock = MockGeminiServer::start(StatusCode::OK, "not json").await;

    let (status, body) = send(
        relay_against(&mock).await,
        analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)]),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Gemini API did not return a valid analysis.");
}

#[tokio::test]
async fn test_no_outbound_call_without_images() {
    let mock = MockGeminiServer::start(StatusCode::OK, r#"{"candidates":[]}"#).await;

    let (status, _) = send(relay_against(&mock).await, analyze_request(&[])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn test_unreachable_upstream_is_internal_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let state = AppState::from_config(test_config(&format!("http://{addr}"))).unwrap();
    let (status, body) = send(
        router(state),
        analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)]),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Internal server error. Please check server logs for details."
    );
}

#[tokio::test]
async fn test_client_endpoint_uses_configured_origin() {
    let mock = MockGeminiServer::start(StatusCode::OK, "{}").await;
    let client = GeminiClient::new(&test_config(&mock.base_url)).unwrap();
    assert!(client.endpoint().starts_with(&mock.base_url));
}
