//! Route configuration for the validation service.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::backend::handlers::{health, validate};
use crate::config::Config;

/// Builds the main router with its shared configuration
pub fn get_router(config: Arc<Config>) -> Router {
    let router = Router::new()
        .route("/validate", post(validate))
        .route("/health", get(health))
        .layer(Extension(config));

    // Allow requests from any origin (debug builds only)
    if cfg!(debug_assertions) {
        let cors = CorsLayer::new()
            .allow_methods(tower_http::cors::AllowMethods::any())
            .allow_headers(Any)
            .allow_origin(Any);
        router.layer(cors)
    } else {
        router
    }
}
