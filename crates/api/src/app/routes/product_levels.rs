use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, post},
    Router,
};

use shelfwise_core::ProductId;

use crate::app::dto::{self, ApiJson};
use crate::app::errors::{self, DEFAULT_SUCCESS_MESSAGE};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;
use crate::middleware::{auth_middleware, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/", get(list_levels))
        .route("/:product_id", get(get_level))
        .route("/set-reorder/:product_id", post(set_reorder_level))
        .route("/adjust/:product_id", post(adjust_in_stock))
        .route_layer(from_fn_with_state(auth_state, auth_middleware))
}

pub async fn list_levels(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.ledger.list().await {
        Ok(levels) => {
            let body: Vec<dto::ProductLevelResponse> = levels.iter().map(Into::into).collect();
            errors::ok(StatusCode::OK, DEFAULT_SUCCESS_MESSAGE, Some(body))
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_level(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
) -> Response {
    let product_id: ProductId = match parse_id(&product_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.ledger.get_by_product(product_id).await {
        Ok(Some(level)) => errors::ok(
            StatusCode::OK,
            DEFAULT_SUCCESS_MESSAGE,
            Some(dto::ProductLevelResponse::from(&level)),
        ),
        Ok(None) => errors::not_found(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn set_reorder_level(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
    ApiJson(body): ApiJson<dto::SetReorderRequest>,
) -> Response {
    let product_id: ProductId = match parse_id(&product_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.ledger.set_reorder_level(product_id, body.reorder_level).await {
        Ok(level) => errors::ok(
            StatusCode::OK,
            DEFAULT_SUCCESS_MESSAGE,
            Some(dto::ProductLevelResponse::from(&level)),
        ),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn adjust_in_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
    ApiJson(body): ApiJson<dto::AdjustStockRequest>,
) -> Response {
    let product_id: ProductId = match parse_id(&product_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.ledger.adjust_in_stock(product_id, body.quantity_delta).await {
        Ok(level) => errors::ok(
            StatusCode::OK,
            DEFAULT_SUCCESS_MESSAGE,
            Some(dto::ProductLevelResponse::from(&level)),
        ),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
