//! Request handlers of the validation service.

use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    Extension, Json,
};
use http::StatusCode;
use log::{error, info};
use uuid::Uuid;

use crate::backend::models::{RejectedResponse, ValidateRequest};
use crate::config::Config;
use crate::utils::error_messages::{INTERNAL_ERROR, VALIDATION_ERROR};
use crate::validation::{FetchError, HttpImageFetcher, Validator};

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

/// Validates a prompt and/or a list of image URLs.
///
/// Image fetching is blocking, so each request runs on tokio's blocking pool
/// with its own HTTP client.
pub async fn validate(
    Extension(config): Extension<Arc<Config>>,
    Json(request): Json<ValidateRequest>,
) -> axum::response::Result<Response> {
    let request_id = Uuid::new_v4();
    info!("[{}] Validation request received", request_id);

    let ValidateRequest {
        prompt_text,
        image_urls,
        options,
    } = request;
    let options = options.unwrap_or_else(|| config.default_options.clone());
    let timeout = config.fetch_timeout;

    let outcome = tokio::task::spawn_blocking(move || -> Result<_, FetchError> {
        let fetcher = HttpImageFetcher::new(timeout)?;
        Ok(Validator::new(fetcher).validate(&prompt_text, &image_urls, &options))
    })
    .await
    .map_err(|e| {
        error!("[{}] Validation task failed: {}", request_id, e);
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
    })?
    .map_err(|e| {
        error!("[{}] Could not build HTTP client: {}", request_id, e);
        (StatusCode::INTERNAL_SERVER_ERROR, VALIDATION_ERROR)
    })?;

    match outcome {
        Ok(verdict) => {
            info!("[{}] Responding with {}", request_id, verdict.status_code);
            Ok(Json(verdict).into_response())
        }
        Err(rejection) => {
            info!("[{}] Rejecting with {}", request_id, rejection.code());
            let body = RejectedResponse {
                status_code: rejection.code(),
                error_message: rejection.message().to_string(),
            };
            Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
        }
    }
}
