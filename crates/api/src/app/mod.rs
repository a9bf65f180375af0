//! HTTP API application wiring (Axum router + service wiring).

use std::sync::Arc;

use axum::http::HeaderName;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use shelfwise_auth::AccessTokenValidator;
use shelfwise_infra::AppConfig;

use crate::middleware::{self, TOKEN_EXPIRING_HEADER, TOKEN_REMAINING_MINUTES_HEADER};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from process configuration (used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(router(Arc::new(services)))
}

/// Router over already-built services.
pub fn router(services: Arc<AppServices>) -> Router {
    let validator: Arc<dyn AccessTokenValidator> = Arc::new(services.credentials.token_service().clone());
    let auth_state = middleware::AuthState { validator };

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router(auth_state))
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

fn cors_layer() -> CorsLayer {
    let exposed: [HeaderName; 2] = [TOKEN_EXPIRING_HEADER, TOKEN_REMAINING_MINUTES_HEADER];
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(exposed)
}
