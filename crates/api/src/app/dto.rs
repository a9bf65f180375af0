//! Request/response bodies. Field names follow the camelCase wire format.

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelfwise_auth::{LoginOutcome, Registration, TokenPair};
use shelfwise_catalog::{
    Category, CategoryDraft, CategorySummary, Product, ProductDraft, SubCategory, SubCategoryDraft, Unit, UnitDraft,
};
use shelfwise_core::{CategoryId, ProductId, PurchaseId, SubCategoryId, UnitId};
use shelfwise_inventory::ProductLevel;
use shelfwise_purchasing::{Purchase, PurchaseDraft};

use crate::app::errors;

pub const OTP_CODE_LEN: usize = 4;

/// JSON body extractor whose rejections use the response envelope.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "Invalid request body.",
                vec![rejection.body_text()],
            )),
        }
    }
}

fn require(errors: &mut Vec<String>, value: &str, field: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field} is required."));
    }
}

fn into_result(errors: Vec<String>) -> Result<(), Vec<String>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// -------------------------
// Auth
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub user_type: i32,
}

impl From<RegisterRequest> for Registration {
    fn from(value: RegisterRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            password: value.password,
            user_type: value.user_type,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, &self.email, "Email");
        require(&mut errors, &self.password, "Password");
        into_result(errors)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user_name: String,
    pub user_type: i32,
    pub email: String,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(value: LoginOutcome) -> Self {
        Self {
            access_token: value.tokens.access_token,
            refresh_token: value.tokens.refresh_token,
            expires_in: value.tokens.expires_in,
            user_name: value.name,
            user_type: value.user_type,
            email: value.email,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl RefreshTokenRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, &self.access_token, "Access token");
        require(&mut errors, &self.refresh_token, "Refresh token");
        into_result(errors)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl From<TokenPair> for RefreshTokenResponse {
    fn from(value: TokenPair) -> Self {
        Self {
            access_token: value.access_token,
            refresh_token: value.refresh_token,
            expires_in: value.expires_in,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, &self.old_password, "Old password");
        require(&mut errors, &self.new_password, "New password");
        require(&mut errors, &self.confirm_password, "Confirm password");
        into_result(errors)
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

impl ForgotPasswordRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, &self.email, "Email");
        into_result(errors)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp_code: String,
}

impl VerifyOtpRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, &self.email, "Email");
        if self.otp_code.trim().chars().count() != OTP_CODE_LEN {
            errors.push(format!("OTP code must be {OTP_CODE_LEN} characters."));
        }
        into_result(errors)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub reset_token: String,
    #[serde(default)]
    pub new_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, &self.email, "Email");
        require(&mut errors, &self.reset_token, "Reset token");
        require(&mut errors, &self.new_password, "New password");
        into_result(errors)
    }
}

// -------------------------
// Product levels
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetReorderRequest {
    #[serde(rename = "reOrderLevel")]
    pub reorder_level: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    pub quantity_delta: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLevelResponse {
    pub id: String,
    pub product_id: String,
    pub purchase_quantity: i32,
    pub in_stock_quantity: i32,
    #[serde(rename = "reOrderLevel")]
    pub reorder_level: i32,
    pub needs_reorder: bool,
}

impl From<&ProductLevel> for ProductLevelResponse {
    fn from(level: &ProductLevel) -> Self {
        Self {
            id: level.id.to_string(),
            product_id: level.product_id.to_string(),
            purchase_quantity: level.purchase_quantity,
            in_stock_quantity: level.in_stock_quantity,
            reorder_level: level.reorder_level,
            needs_reorder: level.needs_reorder(),
        }
    }
}

// -------------------------
// Purchases
// -------------------------

/// Body for purchase create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category_id: Uuid,
    #[serde(default)]
    pub sub_category_id: Uuid,
    #[serde(default)]
    pub product_id: Uuid,
    #[serde(default)]
    pub unit_cost: f64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub manufactured_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
}

impl From<PurchaseRequest> for PurchaseDraft {
    fn from(value: PurchaseRequest) -> Self {
        Self {
            id: value.id.map(PurchaseId::from_uuid),
            sku: value.sku,
            category_id: CategoryId::from_uuid(value.category_id),
            sub_category_id: SubCategoryId::from_uuid(value.sub_category_id),
            product_id: ProductId::from_uuid(value.product_id),
            unit_cost: value.unit_cost,
            quantity: value.quantity,
            total_amount: value.total_amount,
            created_by: value.created_by,
            created_at: value.created_at,
            manufactured_date: value.manufactured_date,
            expiry_date: value.expiry_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub id: String,
    pub sku: String,
    pub category_id: Uuid,
    pub sub_category_id: Uuid,
    pub product_id: String,
    pub unit_cost: f64,
    pub quantity: i32,
    pub total_amount: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub manufactured_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl From<&Purchase> for PurchaseResponse {
    fn from(p: &Purchase) -> Self {
        Self {
            id: p.id.to_string(),
            sku: p.sku.clone(),
            category_id: *p.category_id.as_uuid(),
            sub_category_id: *p.sub_category_id.as_uuid(),
            product_id: p.product_id.to_string(),
            unit_cost: p.unit_cost,
            quantity: p.quantity,
            total_amount: p.total_amount,
            created_by: p.created_by.clone(),
            created_at: p.created_at,
            manufactured_date: p.manufactured_date,
            expiry_date: p.expiry_date,
        }
    }
}

// -------------------------
// Catalog
// -------------------------

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<CategoryRequest> for CategoryDraft {
    fn from(value: CategoryRequest) -> Self {
        Self {
            id: value.id.map(CategoryId::from_uuid),
            name: value.name,
            slug: value.slug,
            is_active: value.is_active,
            image_url: value.image_url,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    /// Only filled in on the list endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<i64>,
}

impl From<&Category> for CategoryResponse {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            slug: c.slug.clone(),
            is_active: c.is_active,
            image_url: c.image_url.clone(),
            created_at: c.created_at,
            product_count: None,
        }
    }
}

impl From<&CategorySummary> for CategoryResponse {
    fn from(summary: &CategorySummary) -> Self {
        Self {
            product_count: Some(summary.product_count),
            ..Self::from(&summary.category)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category_id: Uuid,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<SubCategoryRequest> for SubCategoryDraft {
    fn from(value: SubCategoryRequest) -> Self {
        Self {
            id: value.id.map(SubCategoryId::from_uuid),
            name: value.name,
            slug: value.slug,
            category_id: CategoryId::from_uuid(value.category_id),
            description: value.description,
            code: value.code,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category_id: String,
    pub description: String,
    pub code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&SubCategory> for SubCategoryResponse {
    fn from(s: &SubCategory) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            slug: s.slug.clone(),
            category_id: s.category_id.to_string(),
            description: s.description.clone(),
            code: s.code.clone(),
            is_active: s.is_active,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub no_of_products: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<UnitRequest> for UnitDraft {
    fn from(value: UnitRequest) -> Self {
        Self {
            id: value.id.map(UnitId::from_uuid),
            name: value.name,
            short_name: value.short_name,
            is_active: value.is_active,
            no_of_products: value.no_of_products,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitResponse {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub is_active: bool,
    pub no_of_products: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Unit> for UnitResponse {
    fn from(u: &Unit) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            short_name: u.short_name.clone(),
            is_active: u.is_active,
            no_of_products: u.no_of_products,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category_id: Uuid,
    #[serde(default)]
    pub sub_category_id: Uuid,
    #[serde(default)]
    pub brand_id: Uuid,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub manufactured_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
}

impl From<ProductRequest> for ProductDraft {
    fn from(value: ProductRequest) -> Self {
        Self {
            id: value.id.map(ProductId::from_uuid),
            name: value.name,
            sku: value.sku,
            category_id: CategoryId::from_uuid(value.category_id),
            sub_category_id: SubCategoryId::from_uuid(value.sub_category_id),
            brand_id: value.brand_id,
            unit: value.unit,
            quantity: value.quantity,
            price: value.price,
            image_url: value.image_url,
            created_by: value.created_by,
            created_at: value.created_at,
            manufactured_date: value.manufactured_date,
            expiry_date: value.expiry_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category_id: String,
    pub sub_category_id: String,
    pub brand_id: Uuid,
    pub unit: String,
    pub quantity: i32,
    pub price: f64,
    pub image_url: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub manufactured_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            sku: p.sku.clone(),
            category_id: p.category_id.to_string(),
            sub_category_id: p.sub_category_id.to_string(),
            brand_id: p.brand_id,
            unit: p.unit.clone(),
            quantity: p.quantity,
            price: p.price,
            image_url: p.image_url.clone(),
            created_by: p.created_by.clone(),
            created_at: p.created_at,
            manufactured_date: p.manufactured_date,
            expiry_date: p.expiry_date,
        }
    }
}
