use axum::Router;

use crate::middleware::AuthState;

pub mod auth;
pub mod catalog;
pub mod product_levels;
pub mod purchases;
pub mod system;

/// Router for everything under `/api`. Each area applies the bearer check to
/// the routes that need it.
pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .nest("/auth", auth::router(auth_state.clone()))
        .nest("/categories", catalog::categories_router(auth_state.clone()))
        .nest("/subcategories", catalog::sub_categories_router(auth_state.clone()))
        .nest("/units", catalog::units_router(auth_state.clone()))
        .nest("/products", catalog::products_router(auth_state.clone()))
        .nest("/productlevels", product_levels::router(auth_state.clone()))
        .nest("/purchases", purchases::router(auth_state))
}

/// Parse an id path segment. Malformed ids match no resource.
pub(crate) fn parse_id<T: std::str::FromStr>(raw: &str) -> Result<T, axum::response::Response> {
    raw.parse().map_err(|_| crate::app::errors::not_found())
}
