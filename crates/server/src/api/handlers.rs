use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use convertino_core::{MediaCategory, SanitizedConfig};

use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

#[derive(Debug, Serialize)]
pub struct FormatCategory {
    pub category: MediaCategory,
    pub mime_types: Vec<String>,
    pub extensions: Vec<String>,
    /// Categories files of this kind can be converted into.
    pub converts_to: Vec<MediaCategory>,
}

#[derive(Debug, Serialize)]
pub struct FormatsResponse {
    pub categories: Vec<FormatCategory>,
    pub max_files: usize,
    pub max_file_size_bytes: u64,
}

/// GET /api/v1/formats
///
/// Supported upload types, target formats and batch limits.
pub async fn list_formats(State(state): State<Arc<AppState>>) -> Json<FormatsResponse> {
    let service = state.service();
    let categories = service
        .registry()
        .entries()
        .iter()
        .map(|entry| FormatCategory {
            category: entry.category,
            mime_types: entry.mime_types.clone(),
            extensions: entry.extensions.clone(),
            converts_to: entry.category.allowed_targets(),
        })
        .collect();

    let limits = service.limits();
    Json(FormatsResponse {
        categories,
        max_files: limits.max_files,
        max_file_size_bytes: limits.max_file_size_bytes,
    })
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
