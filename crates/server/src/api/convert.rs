//! Conversion upload handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use convertino_core::{Config, ConversionError, ConversionRequest, PackagedOutput, UploadedFile};
use tracing::{error, info, warn};

use super::handlers::ErrorResponse;
use crate::metrics::UPLOADED_BYTES;
use crate::state::AppState;

/// Multipart field carrying the requested output format.
pub const TARGET_FORMAT_FIELD: &str = "targetFormat";
/// Multipart field carrying an uploaded file; may repeat.
pub const FILES_FIELD: &str = "files";

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// POST /api/v1/convert
///
/// Converts the uploaded files to `targetFormat`. Responds with the converted
/// file itself, or with a zip archive when more than one file converted.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let request = read_request(multipart, state.config()).await?;
    info!(
        format = %request.target_format,
        files = request.files.len(),
        "Received conversion request"
    );

    let output = state.service().process(&request).await.map_err(|e| {
        if e.is_client_error() {
            warn!(error = %e, "Conversion request rejected");
            api_error(StatusCode::BAD_REQUEST, e.to_string())
        } else {
            error!(error = %e, "Conversion request failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    download_response(output).await
}

async fn read_request(
    mut multipart: Multipart,
    config: &Config,
) -> Result<ConversionRequest, ApiError> {
    let mut target_format: Option<String> = None;
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(e, "Malformed multipart request", config)),
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            TARGET_FORMAT_FIELD => match field.text().await {
                Ok(text) => target_format = Some(text),
                Err(e) => return Err(multipart_error(e, "Failed to read targetFormat", config)),
            },
            FILES_FIELD => files.push(read_file(field, config).await?),
            other => {
                warn!(field = %other, "Ignoring unexpected multipart field");
            }
        }
    }

    let target_format = target_format.ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Missing '{}' field", TARGET_FORMAT_FIELD),
        )
    })?;

    Ok(ConversionRequest::new(target_format, files))
}

async fn read_file(field: Field<'_>, config: &Config) -> Result<UploadedFile, ApiError> {
    let filename = field.file_name().map(|s| s.to_string());
    let content_type = field.content_type().map(|s| s.to_string());

    match field.bytes().await {
        Ok(bytes) => {
            UPLOADED_BYTES.observe(bytes.len() as f64);
            Ok(UploadedFile {
                filename,
                content_type,
                data: bytes.to_vec(),
            })
        }
        Err(e) => Err(multipart_error(e, "Failed to read file", config)),
    }
}

/// Maps a multipart read failure to a response, naming the size limits when
/// the body was cut off for being too large.
fn multipart_error(e: MultipartError, context: &str, config: &Config) -> ApiError {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return api_error(
            status,
            format!(
                "Request body exceeds the {} byte limit (at most {} file(s) of {} bytes each)",
                config.max_body_bytes(),
                config.limits.max_files,
                config.limits.max_file_size_bytes
            ),
        );
    }
    api_error(status, format!("{}: {}", context, e.body_text()))
}

async fn download_response(output: PackagedOutput) -> Result<Response, ApiError> {
    let data = tokio::fs::read(output.path()).await.map_err(|e| {
        error!(error = %e, path = %output.path().display(), "Converted file unreadable");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ConversionError::Io(e).to_string(),
        )
    })?;

    let disposition = content_disposition(output.download_name());
    let content_type = HeaderValue::from_static(output.content_type());
    drop(output);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(data),
    )
        .into_response())
}

fn content_disposition(filename: &str) -> HeaderValue {
    HeaderValue::from_bytes(format!("attachment; filename=\"{}\"", filename).as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
