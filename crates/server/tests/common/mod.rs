//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with the mock converter injected, enabling E2E testing of the upload
//! endpoint without ffmpeg installed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use convertino_core::{testing::MockConverter, Config, ExternalConverter};
use convertino_server::state::AppState;

/// Multipart boundary used by every test request.
const BOUNDARY: &str = "convertino-test-boundary";

/// Test fixture for E2E testing with a mock converter.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_convert() {
///     let fixture = TestFixture::new();
///
///     let response = fixture
///         .convert(Some("jpg"), &[TestUpload::new("a.png", "image/png", b"png")])
///         .await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock converter - control per-file outcomes
    pub converter: MockConverter,
    /// Temporary directory used as the converter's work directory
    pub temp_dir: TempDir,
}

/// JSON response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Raw response from a test request
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// A file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct TestUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl TestUpload {
    pub fn new(filename: &str, content_type: &str, data: &[u8]) -> Self {
        Self {
            filename: filename.to_string(),
            content_type: Some(content_type.to_string()),
            data: data.to_vec(),
        }
    }

    pub fn without_type(filename: &str, data: &[u8]) -> Self {
        Self {
            filename: filename.to_string(),
            content_type: None,
            data: data.to_vec(),
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a test fixture with custom configuration.
    ///
    /// The converter's temp directory is always redirected into the fixture.
    pub fn with_config(mut config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        config.converter.temp_dir = temp_dir.path().join("work");

        let converter = MockConverter::new();
        let state = Arc::new(AppState::from_converter(
            config,
            Arc::new(converter.clone()) as Arc<dyn ExternalConverter>,
        ));

        let router = convertino_server::api::create_router(state);

        Self {
            router,
            converter,
            temp_dir,
        }
    }

    /// Files left in the converter's work directory.
    pub fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path().join("work"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let raw = self.send(request).await;
        TestResponse {
            status: raw.status,
            body: raw.json(),
        }
    }

    /// Submit a conversion request to `/api/v1/convert`.
    pub async fn convert(&self, target_format: Option<&str>, files: &[TestUpload]) -> RawResponse {
        self.post_raw(
            "/api/v1/convert",
            multipart_body(target_format, files),
            &format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .await
    }

    /// Send a POST request with a raw body and content type.
    pub async fn post_raw(&self, path: &str, body: Vec<u8>, content_type: &str) -> RawResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Send a request with extra headers (e.g. for CORS preflight).
    pub async fn send(&self, request: Request<Body>) -> RawResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        RawResponse {
            status,
            headers,
            body,
        }
    }
}

/// Build a `multipart/form-data` body with the convert endpoint's fields.
pub fn multipart_body(target_format: Option<&str>, files: &[TestUpload]) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(target) = target_format {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"targetFormat\"\r\n\r\n");
        body.extend_from_slice(target.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for file in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                file.filename
            )
            .as_bytes(),
        );
        if let Some(content_type) = &file.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}",
            $status, $response.status,
        );
    };
}
