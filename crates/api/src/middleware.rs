use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use shelfwise_auth::{AccessTokenValidator, sliding_window_remaining};

use crate::app::errors;
use crate::context::PrincipalContext;

pub const TOKEN_EXPIRING_HEADER: HeaderName = HeaderName::from_static("x-token-expiring");
pub const TOKEN_REMAINING_MINUTES_HEADER: HeaderName = HeaderName::from_static("x-token-remaining-minutes");

#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn AccessTokenValidator>,
}

/// Require a valid bearer token; attach the principal and sliding-expiration hints.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(unauthorized)?;

    let now = Utc::now();
    let claims = state.validator.validate(token, now).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        unauthorized()
    })?;

    req.extensions_mut().insert(PrincipalContext::from(&claims));

    let mut res = next.run(req).await;

    if let Some(remaining_minutes) = sliding_window_remaining(&claims, now) {
        let headers = res.headers_mut();
        headers.insert(TOKEN_EXPIRING_HEADER, HeaderValue::from_static("true"));
        headers.insert(TOKEN_REMAINING_MINUTES_HEADER, HeaderValue::from(remaining_minutes));
    }

    Ok(res)
}

fn unauthorized() -> Response {
    errors::json_error(StatusCode::UNAUTHORIZED, "Unauthorized.", Vec::new())
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
