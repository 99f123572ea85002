use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

/// Open liveness probe, outside the authenticated `/api` surface.
pub async fn health() -> ApiSuccess<HealthData> {
    ApiSuccess::new(
        StatusCode::OK,
        HealthData {
            status: "ok".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: String,
}
