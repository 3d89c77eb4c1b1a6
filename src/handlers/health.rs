use actix_web::{http::StatusCode, HttpResponse};

use super::recover;
use crate::errors::ApiError;
use crate::types::envelope::{write_json, HealthStatus};

/// Heartbeat: a live server answers `{"status":"healthy"}` with a 200.
pub async fn health() -> Result<HttpResponse, ApiError> {
    recover("health", async {
        Ok(write_json(StatusCode::OK, &HealthStatus::healthy()))
    })
    .await
}
