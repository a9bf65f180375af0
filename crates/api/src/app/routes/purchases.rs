use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Response,
    routing::get,
    Router,
};

use shelfwise_core::PurchaseId;
use shelfwise_purchasing::StockSync;

use crate::app::dto::{self, ApiJson};
use crate::app::errors::{self, DEFAULT_SUCCESS_MESSAGE};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::middleware::{auth_middleware, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/", get(list_purchases).post(create_purchase))
        .route("/:id", get(get_purchase).put(update_purchase).delete(delete_purchase))
        .route_layer(from_fn_with_state(auth_state, auth_middleware))
}

/// Success message, noting when the stock level could not be brought in line.
fn with_stock_note(base: &str, stock: &StockSync) -> String {
    if stock.is_degraded() {
        format!("{base} (stock level not updated)")
    } else {
        base.to_string()
    }
}

pub async fn list_purchases(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.purchases.list().await {
        Ok(purchases) => {
            let body: Vec<dto::PurchaseResponse> = purchases.iter().map(Into::into).collect();
            errors::ok(StatusCode::OK, DEFAULT_SUCCESS_MESSAGE, Some(body))
        }
        Err(e) => errors::purchase_error_to_response(e),
    }
}

pub async fn create_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::PurchaseRequest>,
) -> Response {
    let mut draft: shelfwise_purchasing::PurchaseDraft = body.into();
    if draft.created_by.trim().is_empty() {
        draft.created_by = principal.email().to_string();
    }

    match services.purchases.create(draft).await {
        Ok(recorded) => errors::ok(
            StatusCode::CREATED,
            with_stock_note("Created", &recorded.stock),
            Some(dto::PurchaseResponse::from(&recorded.value)),
        ),
        Err(e) => errors::purchase_error_to_response(e),
    }
}

pub async fn get_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: PurchaseId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.purchases.get(id).await {
        Ok(purchase) => errors::ok(
            StatusCode::OK,
            DEFAULT_SUCCESS_MESSAGE,
            Some(dto::PurchaseResponse::from(&purchase)),
        ),
        Err(e) => errors::purchase_error_to_response(e),
    }
}

pub async fn update_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::PurchaseRequest>,
) -> Response {
    let id: PurchaseId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.purchases.update(id, body.into()).await {
        Ok(purchase) => errors::ok(
            StatusCode::OK,
            DEFAULT_SUCCESS_MESSAGE,
            Some(dto::PurchaseResponse::from(&purchase)),
        ),
        Err(e) => errors::purchase_error_to_response(e),
    }
}

pub async fn delete_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: PurchaseId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.purchases.delete(id).await {
        Ok(recorded) => errors::ok::<()>(StatusCode::OK, with_stock_note("Deleted", &recorded.stock), None),
        Err(e) => errors::purchase_error_to_response(e),
    }
}
