use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Response,
    routing::post,
    Router,
};

use shelfwise_auth::FORGOT_PASSWORD_MESSAGE;

use crate::app::dto::{self, ApiJson};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::middleware::{auth_middleware, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let protected = Router::new()
        .route("/change-password", post(change_password))
        .route_layer(from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-otp", post(verify_otp))
        .route("/reset-password", post(reset_password))
        .merge(protected)
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::RegisterRequest>,
) -> Response {
    match services.credentials.register(body.into()).await {
        Ok(_) => errors::ok::<()>(StatusCode::CREATED, "Registration successful.", None),
        Err(e) => errors::credential_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::LoginRequest>,
) -> Response {
    if let Err(fields) = body.validate() {
        return errors::validation_error(fields);
    }

    match services.credentials.login(&body.email, &body.password).await {
        Ok(outcome) => errors::ok(
            StatusCode::OK,
            "Login successful.",
            Some(dto::LoginResponse::from(outcome)),
        ),
        Err(e) => errors::credential_error_to_response(e),
    }
}

pub async fn refresh_token(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::RefreshTokenRequest>,
) -> Response {
    if let Err(fields) = body.validate() {
        return errors::validation_error(fields);
    }

    match services
        .credentials
        .refresh(&body.access_token, &body.refresh_token)
        .await
    {
        Ok(tokens) => errors::ok(
            StatusCode::OK,
            "Token refreshed successfully.",
            Some(dto::RefreshTokenResponse::from(tokens)),
        ),
        Err(e) => errors::credential_error_to_response(e),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::ChangePasswordRequest>,
) -> Response {
    if let Err(fields) = body.validate() {
        return errors::validation_error(fields);
    }

    match services
        .credentials
        .change_password(
            principal.user_id(),
            &body.old_password,
            &body.new_password,
            &body.confirm_password,
        )
        .await
    {
        Ok(()) => errors::ok::<()>(StatusCode::OK, "Password changed successfully.", None),
        Err(e) => errors::credential_error_to_response(e),
    }
}

pub async fn forgot_password(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::ForgotPasswordRequest>,
) -> Response {
    if let Err(fields) = body.validate() {
        return errors::validation_error(fields);
    }

    match services.credentials.forgot_password(&body.email).await {
        Ok(()) => errors::ok::<()>(StatusCode::OK, FORGOT_PASSWORD_MESSAGE, None),
        Err(e) => errors::credential_error_to_response(e),
    }
}

pub async fn verify_otp(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::VerifyOtpRequest>,
) -> Response {
    if let Err(fields) = body.validate() {
        return errors::validation_error(fields);
    }

    match services.credentials.verify_otp(&body.email, &body.otp_code).await {
        Ok(reset_token) => errors::ok(StatusCode::OK, "OTP verified successfully.", Some(reset_token)),
        Err(e) => errors::credential_error_to_response(e),
    }
}

pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::ResetPasswordRequest>,
) -> Response {
    if let Err(fields) = body.validate() {
        return errors::validation_error(fields);
    }

    match services
        .credentials
        .reset_password(&body.email, &body.reset_token, &body.new_password)
        .await
    {
        Ok(()) => errors::ok::<()>(StatusCode::OK, "Password reset successfully.", None),
        Err(e) => errors::credential_error_to_response(e),
    }
}
