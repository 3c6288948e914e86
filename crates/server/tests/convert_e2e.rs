//! E2E tests for the conversion API using the mock converter.

mod common;

use std::io::{Cursor, Read};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use convertino_core::{BatchLimits, Config};

use common::{TestFixture, TestUpload};

fn png(name: &str) -> TestUpload {
    TestUpload::new(name, "image/png", format!("png:{}", name).as_bytes())
}

fn mp4(name: &str) -> TestUpload {
    TestUpload::new(name, "video/mp4", format!("mp4:{}", name).as_bytes())
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (entry.name().to_string(), data)
        })
        .collect()
}

// =============================================================================
// Informational endpoints
// =============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/health").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_formats_lists_registry_and_rules() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/formats").await;

    assert_status!(response, StatusCode::OK);
    let categories = response.body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 3);

    let video = categories
        .iter()
        .find(|c| c["category"] == "video")
        .unwrap();
    assert_eq!(video["converts_to"], serde_json::json!(["video", "audio"]));
    assert!(video["extensions"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("mp4")));

    assert_eq!(response.body["max_files"], 5);
    assert_eq!(response.body["max_file_size_bytes"], 10 * 1024 * 1024);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.get("/api/v1/health").await;

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = fixture.send(request).await;

    assert_status!(response, StatusCode::OK);
    let text = String::from_utf8_lossy(&response.body);
    assert!(text.contains("convertino_http_requests_total"));
}

// =============================================================================
// Successful conversions
// =============================================================================

#[tokio::test]
async fn test_single_file_returned_directly() {
    let fixture = TestFixture::new();

    let response = fixture.convert(Some("jpg"), &[png("photo.png")]).await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.header("content-type"),
        Some("application/octet-stream")
    );
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"photo.jpg\"")
    );
    assert_eq!(&response.body[..], b"png:photo.png");
    assert_eq!(fixture.leftover_files(), 0);
}

#[tokio::test]
async fn test_multiple_files_returned_as_archive() {
    let fixture = TestFixture::new();

    let response = fixture
        .convert(Some("mp3"), &[mp4("one.mp4"), mp4("two.mp4")])
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("application/zip"));
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"converted_files.zip\"")
    );

    let entries = zip_entries(&response.body);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, "one.mp3");
    assert_eq!(entries[0].1, b"mp4:one.mp4");
    assert_eq!(entries[1].0, "two.mp3");
    assert_eq!(fixture.leftover_files(), 0);
}

#[tokio::test]
async fn test_failed_file_is_left_out_of_archive() {
    let fixture = TestFixture::new();
    fixture.converter.fail_for_name("_broken.", 1).await;

    let response = fixture
        .convert(
            Some("png"),
            &[png("a.png"), png("broken.png"), png("c.png")],
        )
        .await;

    assert_status!(response, StatusCode::OK);
    let names: Vec<_> = zip_entries(&response.body)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["a.png", "c.png"]);
    assert_eq!(fixture.leftover_files(), 0);
}

#[tokio::test]
async fn test_target_format_is_normalized() {
    let fixture = TestFixture::new();

    let response = fixture.convert(Some(".WAV"), &[mp4("clip.mp4")]).await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"clip.wav\"")
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_all_conversions_failing_is_server_error() {
    let fixture = TestFixture::new();
    fixture.converter.fail_all(1).await;

    let response = fixture
        .convert(Some("jpg"), &[png("a.png"), png("b.png")])
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json()["error"],
        "None of the 2 submitted file(s) could be converted"
    );
    assert_eq!(fixture.leftover_files(), 0);
}

#[tokio::test]
async fn test_too_many_files_is_bad_request() {
    let fixture = TestFixture::new();
    let files: Vec<_> = (0..6).map(|i| png(&format!("{}.png", i))).collect();

    let response = fixture.convert(Some("jpg"), &files).await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "Too many files: 6 submitted, at most 5 allowed per request"
    );
    assert_eq!(fixture.converter.run_count().await, 0);
}

#[tokio::test]
async fn test_incompatible_conversion_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture.convert(Some("mp4"), &[png("a.png")]).await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    let error = response.json()["error"].as_str().unwrap().to_string();
    assert!(error.contains("not allowed"), "got {}", error);
    assert_eq!(fixture.converter.run_count().await, 0);
}

#[tokio::test]
async fn test_unsupported_target_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture.convert(Some("exe"), &[png("a.png")]).await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "Target format 'exe' is not supported"
    );
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture
        .convert(Some("jpg"), &[TestUpload::without_type("a.png", b"data")])
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "File 'a.png' has unsupported type 'none'"
    );
}

#[tokio::test]
async fn test_no_files_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture.convert(Some("jpg"), &[]).await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "No files were submitted");
}

#[tokio::test]
async fn test_missing_target_format_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture.convert(None, &[png("a.png")]).await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Missing 'targetFormat' field");
}

#[tokio::test]
async fn test_malformed_multipart_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture
        .post_raw(
            "/api/v1/convert",
            b"--convertino-test-boundary\r\nContent-Disposition: form-data; name=\"files\"\r\n\r\nno terminator"
                .to_vec(),
            "multipart/form-data; boundary=convertino-test-boundary",
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(fixture.converter.run_count().await, 0);
}

#[tokio::test]
async fn test_wrong_content_type_is_rejected() {
    let fixture = TestFixture::new();

    let response = fixture
        .post_raw("/api/v1/convert", b"{}".to_vec(), "application/json")
        .await;

    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_body_over_limit_is_rejected() {
    let mut config = Config::default();
    config.limits = BatchLimits {
        max_files: 1,
        max_file_size_bytes: 16,
    };
    let fixture = TestFixture::with_config(config);
    let big = vec![0u8; 2 * 1024 * 1024];

    let response = fixture
        .convert(Some("jpg"), &[TestUpload::new("big.png", "image/png", &big)])
        .await;

    assert_status!(response, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        response.json()["error"],
        "Request body exceeds the 1048592 byte limit (at most 1 file(s) of 16 bytes each)"
    );
    assert_eq!(fixture.converter.run_count().await, 0);
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_preflight_for_frontend_origin() {
    let fixture = TestFixture::new();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/convert")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = fixture.send(request).await;

    assert!(response.status.is_success());
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some("http://localhost:5173")
    );
}

#[tokio::test]
async fn test_cors_exposes_content_disposition() {
    let fixture = TestFixture::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/convert")
        .header("Origin", "http://localhost:5173")
        .header(
            "Content-Type",
            "multipart/form-data; boundary=convertino-test-boundary",
        )
        .body(Body::from(common::multipart_body(
            Some("jpg"),
            &[png("a.png")],
        )))
        .unwrap();

    let response = fixture.send(request).await;

    assert_status!(response, StatusCode::OK);
    let exposed = response
        .header("access-control-expose-headers")
        .unwrap()
        .to_lowercase();
    assert!(exposed.contains("content-disposition"));
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let fixture = TestFixture::new();
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/health")
        .header("Origin", "http://evil.example.com")
        .body(Body::empty())
        .unwrap();

    let response = fixture.send(request).await;

    assert_status!(response, StatusCode::OK);
    assert!(response.header("access-control-allow-origin").is_none());
}
