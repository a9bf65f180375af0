//! Catalog endpoints: categories, sub-categories, units and products.
//!
//! Every record kind shares the same handlers; [`Resource`] ties a record to
//! its wire types and its slot in [`AppServices`].

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Response,
    routing::get,
    Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use shelfwise_catalog::{CatalogRecord, Category, Product, ProductDraft, RecordService, SubCategory, Unit};

use crate::app::dto::{self, ApiJson};
use crate::app::errors::{self, DEFAULT_SUCCESS_MESSAGE};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::middleware::{auth_middleware, AuthState};

trait Resource: CatalogRecord {
    type Request: DeserializeOwned + Into<Self::Draft> + Send + 'static;
    type Response: Serialize + for<'a> From<&'a Self>;

    fn service(services: &AppServices) -> &RecordService<Self>;

    fn parse(raw: &str) -> Result<Self::Id, Response>;
}

impl Resource for Category {
    type Request = dto::CategoryRequest;
    type Response = dto::CategoryResponse;

    fn service(services: &AppServices) -> &RecordService<Self> {
        &services.catalog.categories
    }

    fn parse(raw: &str) -> Result<Self::Id, Response> {
        parse_id(raw)
    }
}

impl Resource for SubCategory {
    type Request = dto::SubCategoryRequest;
    type Response = dto::SubCategoryResponse;

    fn service(services: &AppServices) -> &RecordService<Self> {
        &services.catalog.sub_categories
    }

    fn parse(raw: &str) -> Result<Self::Id, Response> {
        parse_id(raw)
    }
}

impl Resource for Unit {
    type Request = dto::UnitRequest;
    type Response = dto::UnitResponse;

    fn service(services: &AppServices) -> &RecordService<Self> {
        &services.catalog.units
    }

    fn parse(raw: &str) -> Result<Self::Id, Response> {
        parse_id(raw)
    }
}

impl Resource for Product {
    type Request = dto::ProductRequest;
    type Response = dto::ProductResponse;

    fn service(services: &AppServices) -> &RecordService<Self> {
        &services.catalog.products
    }

    fn parse(raw: &str) -> Result<Self::Id, Response> {
        parse_id(raw)
    }
}

pub fn categories_router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/", get(list_categories).post(create::<Category>))
        .route(
            "/:id",
            get(show::<Category>).put(update::<Category>).delete(delete::<Category>),
        )
        .route_layer(from_fn_with_state(auth_state, auth_middleware))
}

pub fn sub_categories_router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/", get(list::<SubCategory>).post(create::<SubCategory>))
        .route(
            "/:id",
            get(show::<SubCategory>)
                .put(update::<SubCategory>)
                .delete(delete::<SubCategory>),
        )
        .route_layer(from_fn_with_state(auth_state, auth_middleware))
}

pub fn units_router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/", get(list::<Unit>).post(create::<Unit>))
        .route("/:id", get(show::<Unit>).put(update::<Unit>).delete(delete::<Unit>))
        .route_layer(from_fn_with_state(auth_state, auth_middleware))
}

/// Products are create and read only.
pub fn products_router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/", get(list::<Product>).post(create_product))
        .route("/:id", get(show::<Product>))
        .route_layer(from_fn_with_state(auth_state, auth_middleware))
}

fn respond<E: Resource>(status: StatusCode, message: &str, record: &E) -> Response {
    errors::ok(status, message, Some(E::Response::from(record)))
}

async fn list<E: Resource>(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match E::service(&services).list().await {
        Ok(records) => {
            let body: Vec<E::Response> = records.iter().map(E::Response::from).collect();
            errors::ok(StatusCode::OK, DEFAULT_SUCCESS_MESSAGE, Some(body))
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.catalog.list_categories().await {
        Ok(summaries) => {
            let body: Vec<dto::CategoryResponse> = summaries.iter().map(Into::into).collect();
            errors::ok(StatusCode::OK, DEFAULT_SUCCESS_MESSAGE, Some(body))
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

async fn show<E: Resource>(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id = match E::parse(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match E::service(&services).get(id).await {
        Ok(record) => respond(StatusCode::OK, DEFAULT_SUCCESS_MESSAGE, &record),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

async fn create<E: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<E::Request>,
) -> Response {
    match E::service(&services).create(body.into()).await {
        Ok(record) => respond(StatusCode::CREATED, "Created", &record),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::ProductRequest>,
) -> Response {
    let mut draft: ProductDraft = body.into();
    if draft.created_by.trim().is_empty() {
        draft.created_by = principal.email().to_string();
    }

    match services.catalog.products.create(draft).await {
        Ok(product) => respond(StatusCode::CREATED, "Created", &product),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

async fn update<E: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<E::Request>,
) -> Response {
    let id = match E::parse(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match E::service(&services).update(id, body.into()).await {
        Ok(record) => respond(StatusCode::OK, DEFAULT_SUCCESS_MESSAGE, &record),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

async fn delete<E: Resource>(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id = match E::parse(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match E::service(&services).delete(id).await {
        Ok(()) => errors::ok::<()>(StatusCode::OK, "Deleted", None),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
