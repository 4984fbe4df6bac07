//! `/api/analyze` and `/health` against an in-process upstream stub.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use ecg_relay::RelayConfig;
use ecg_relay::prompt::{MULTI_IMAGE_PROMPT, SINGLE_IMAGE_PROMPT};

use crate::common::{
    BOUNDARY, FormPart, StubReply, StubUpstream, TEST_API_KEY, analyze_request, send, stub_router,
    test_config,
};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";
const JPEG: &[u8] = b"\xff\xd8\xfffake-jpeg";

fn ok_stub(text: &str) -> std::sync::Arc<StubUpstream> {
    StubUpstream::new(StubReply::Text(text.to_string()))
}

#[tokio::test]
async fn test_single_image_returns_analysis() {
    let stub = ok_stub("Sinus rhythm.\nNo acute changes.");
    let router = stub_router(test_config("http://unused"), stub.clone());

    let (status, body) = send(router, analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], "Sinus rhythm.\nNo acute changes.");
    assert_eq!(stub.call_count(), 1);

    let call = stub.last_call().unwrap();
    assert_eq!(call.api_key, TEST_API_KEY);
    assert_eq!(call.prompt, SINGLE_IMAGE_PROMPT);
    assert_eq!(call.images.len(), 1);
    assert_eq!(call.images[0].file_name, "ecg.png");
    assert_eq!(call.images[0].mime_type, "image/png");
    assert_eq!(&*call.images[0].data, PNG);
}

#[tokio::test]
async fn test_multiple_images_keep_order_and_use_multi_prompt() {
    let stub = ok_stub("Combined reading");
    let router = stub_router(test_config("http://unused"), stub.clone());

    let request = analyze_request(&[
        FormPart::image("lead-i.jpg", "image/jpeg", JPEG),
        FormPart::image("lead-ii.png", "image/png", PNG),
        FormPart::image("lead-iii.png", "image/png", b"third"),
    ]);
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], "Combined reading");
    assert_eq!(stub.call_count(), 1);

    let call = stub.last_call().unwrap();
    assert_eq!(call.prompt, MULTI_IMAGE_PROMPT);
    let names: Vec<_> = call.images.iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(names, ["lead-i.jpg", "lead-ii.png", "lead-iii.png"]);
    assert_eq!(call.images[0].mime_type, "image/jpeg");
}

#[tokio::test]
async fn test_other_fields_are_ignored() {
    let stub = ok_stub("ok");
    let router = stub_router(test_config("http://unused"), stub.clone());

    let request = analyze_request(&[
        FormPart {
            field: "notes",
            file_name: None,
            content_type: "text/plain",
            data: b"patient is 54",
        },
        FormPart {
            field: "image",
            file_name: Some("wrong-field.png"),
            content_type: "image/png",
            data: PNG,
        },
        FormPart::image("ecg.png", "image/png", PNG),
    ]);
    let (status, _) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let call = stub.last_call().unwrap();
    assert_eq!(call.images.len(), 1);
    assert_eq!(call.images[0].file_name, "ecg.png");
}

#[tokio::test]
async fn test_no_images_is_bad_request() {
    let stub = ok_stub("unused");
    let router = stub_router(test_config("http://unused"), stub.clone());

    let (status, body) = send(router, analyze_request(&[])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "No images provided. Please upload one or more ECG images."
    );
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_no_images_checked_before_api_key() {
    let stub = ok_stub("unused");
    let router = stub_router(RelayConfig::default(), stub.clone());

    let (status, _) = send(router, analyze_request(&[])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_missing_api_key_is_server_error() {
    let stub = ok_stub("unused");
    let router = stub_router(RelayConfig::default(), stub.clone());

    let (status, body) =
        send(router, analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)])).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "API key not configured. Please set GOOGLE_CLOUD_API_KEY in your environment variables."
    );
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_upstream_status_is_propagated() {
    let stub = StubUpstream::new(StubReply::UpstreamError(
        StatusCode::TOO_MANY_REQUESTS,
        "rate limited".to_string(),
    ));
    let router = stub_router(test_config("http://unused"), stub.clone());

    let (status, body) =
        send(router, analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)])).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["message"], "Error from Gemini API: rate limited");
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_invalid_upstream_reply_is_server_error() {
    let stub = StubUpstream::new(StubReply::Invalid);
    let router = stub_router(test_config("http://unused"), stub);

    let (status, body) =
        send(router, analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)])).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Gemini API did not return a valid analysis.");
}

#[tokio::test]
async fn test_internal_failure_hides_details() {
    let stub = StubUpstream::new(StubReply::Internal);
    let router = stub_router(test_config("http://unused"), stub);

    let (status, body) =
        send(router, analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)])).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Internal server error. Please check server logs for details."
    );
    assert!(!body.to_string().contains("connection reset"));
}

#[tokio::test]
async fn test_panicking_upstream_yields_generic_error() {
    let stub = StubUpstream::new(StubReply::Panic);
    let router = stub_router(test_config("http://unused"), stub);

    let (status, body) =
        send(router, analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)])).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Internal server error. Please check server logs for details."
    );
}

#[tokio::test]
async fn test_non_multipart_body_is_internal_error() {
    let stub = ok_stub("unused");
    let router = stub_router(test_config("http://unused"), stub.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"images":[]}"#))
        .unwrap();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Internal server error. Please check server logs for details."
    );
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_truncated_multipart_is_internal_error() {
    let stub = ok_stub("unused");
    let router = stub_router(test_config("http://unused"), stub.clone());

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\npartial"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, _) = send(router, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_repeated_requests_are_independent() {
    let stub = ok_stub("Same answer");
    let config = test_config("http://unused");

    let first = send(
        stub_router(config.clone(), stub.clone()),
        analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)]),
    )
    .await;
    let second = send(
        stub_router(config, stub.clone()),
        analyze_request(&[FormPart::image("ecg.png", "image/png", PNG)]),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(stub.call_count(), 2);
}

#[tokio::test]
async fn test_health() {
    let router = stub_router(RelayConfig::default(), ok_stub("unused"));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
