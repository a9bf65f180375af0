use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use shelfwise_auth::CredentialError;
use shelfwise_catalog::CatalogError;
use shelfwise_inventory::LedgerError;
use shelfwise_purchasing::PurchaseError;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation successful";

/// Uniform JSON envelope returned by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub status_code: u16,
    pub errors: Vec<String>,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

pub fn ok<T: Serialize>(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Response {
    ApiResponse {
        success: true,
        message: message.into(),
        data,
        status_code: status.as_u16(),
        errors: Vec::new(),
    }
    .into_response()
}

pub fn json_error(status: StatusCode, message: impl Into<String>, errors: Vec<String>) -> Response {
    ApiResponse::<()> {
        success: false,
        message: message.into(),
        data: None,
        status_code: status.as_u16(),
        errors,
    }
    .into_response()
}

pub fn validation_error(errors: Vec<String>) -> Response {
    json_error(StatusCode::BAD_REQUEST, "Validation failed.", errors)
}

pub fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found", Vec::new())
}

fn internal(detail: impl std::fmt::Display) -> Response {
    tracing::error!(error = %detail, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.", Vec::new())
}

pub fn credential_error_to_response(err: CredentialError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = ?err, "credential operation failed");
    }
    json_error(status, err.to_string(), err.details())
}

pub fn ledger_error_to_response(err: LedgerError) -> Response {
    match err {
        LedgerError::NotFound => not_found(),
        LedgerError::Storage(e) => internal(e),
    }
}

pub fn purchase_error_to_response(err: PurchaseError) -> Response {
    match err {
        PurchaseError::ValidationFailed(errors) => validation_error(errors),
        PurchaseError::NotFound => not_found(),
        PurchaseError::Storage(e) => internal(e),
    }
}

pub fn catalog_error_to_response(err: CatalogError) -> Response {
    match err {
        CatalogError::ValidationFailed(errors) => validation_error(errors),
        CatalogError::NotFound => not_found(),
        CatalogError::Storage(e) => internal(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_camel_case_and_keeps_null_data() {
        let body = ApiResponse::<()> {
            success: false,
            message: "Not found".into(),
            data: None,
            status_code: 404,
            errors: Vec::new(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "message": "Not found",
                "data": null,
                "statusCode": 404,
                "errors": []
            })
        );
    }

    #[test]
    fn credential_errors_keep_their_status() {
        assert_eq!(
            credential_error_to_response(CredentialError::DuplicateEmail).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            credential_error_to_response(CredentialError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            credential_error_to_response(CredentialError::EmailDeliveryFailure("smtp down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_level_is_404() {
        assert_eq!(ledger_error_to_response(LedgerError::NotFound).status(), StatusCode::NOT_FOUND);
    }
}
