use std::sync::{Arc, Mutex};

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use shelfwise_api::app::{self, AppServices};
use shelfwise_auth::{AccessClaims, EmailError, EmailSender, TokenConfig};
use shelfwise_core::UserId;
use shelfwise_infra::{Stores, UnconfiguredEmailSender};
use shelfwise_inventory::StockPolicy;

const SECRET: &str = "black-box-test-secret-0123456789";

#[derive(Default)]
struct RecordingEmailSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingEmailSender {
    fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(addr, _)| addr == to)
            .map(|(_, code)| code.clone())
    }

    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_otp_email(&self, to: &str, otp_code: &str) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push((to.to_string(), otp_code.to_string()));
        Ok(())
    }
}

fn token_config() -> TokenConfig {
    TokenConfig {
        secret: SECRET.to_string(),
        ..TokenConfig::default()
    }
}

struct TestServer {
    base_url: String,
    email: Arc<RecordingEmailSender>,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let email = Arc::new(RecordingEmailSender::default());
        Self::start(email.clone(), email).await
    }

    /// Server whose OTP mail goes through `sender`; the recorder stays empty.
    async fn spawn_with_sender(sender: Arc<dyn EmailSender>) -> Self {
        Self::start(Arc::new(RecordingEmailSender::default()), sender).await
    }

    async fn start(email: Arc<RecordingEmailSender>, sender: Arc<dyn EmailSender>) -> Self {
        // Same router as prod, in-memory stores, bound to an ephemeral port.
        let services = AppServices::new(Stores::in_memory(), sender, token_config(), StockPolicy::default());
        let app = app::router(Arc::new(services));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            email,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn post_authed(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn get_authed(&self, path: &str, token: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).bearer_auth(token).send().await.unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn put_authed(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn delete_authed(&self, path: &str, token: &str) -> (StatusCode, Value) {
        let res = self.client.delete(self.url(path)).bearer_auth(token).send().await.unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/register",
            json!({ "name": name, "email": email, "password": password, "userType": 1 }),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post("/api/auth/login", json!({ "email": email, "password": password }))
            .await
    }

    /// Register and log in; returns the login `data` object.
    async fn session(&self, email: &str) -> Value {
        let (status, _) = self.register("Alice", email, "secret1").await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login(email, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        body["data"].clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(issued_at: chrono::DateTime<Utc>, lifetime_minutes: i64) -> String {
    let config = token_config();
    let iat = issued_at.timestamp();
    let claims = AccessClaims {
        sub: UserId::new(),
        email: "minted@x.com".into(),
        name: "Minted".into(),
        jti: Uuid::now_v7().to_string(),
        iat,
        exp: iat + lifetime_minutes * 60,
        iss: config.issuer,
        aud: config.audience,
        sliding_expiration: config.sliding_expiration_minutes,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn assert_envelope(body: &Value, success: bool, status: StatusCode) {
    assert_eq!(body["success"], json!(success), "body: {body}");
    assert_eq!(body["statusCode"], json!(status.as_u16()), "body: {body}");
    assert!(body["errors"].is_array(), "body: {body}");
    assert!(body.get("message").is_some(), "body: {body}");
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::spawn().await;
    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_then_login_returns_tokens_and_profile() {
    let server = TestServer::spawn().await;

    let (status, body) = server.register(" Alice ", " Alice@Example.COM ", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_envelope(&body, true, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration successful.");
    assert!(body["data"].is_null());

    let (status, body) = server.login("alice@example.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful.");

    let data = &body["data"];
    assert!(data["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(data["refreshToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(data["expiresIn"], 7200);
    assert_eq!(data["userName"], "Alice");
    assert_eq!(data["userType"], 1);
    assert_eq!(data["email"], "alice@example.com");
}

#[tokio::test]
async fn duplicate_email_is_conflict_regardless_of_case() {
    let server = TestServer::spawn().await;
    server.register("Alice", "a@x.com", "secret1").await;

    let (status, body) = server.register("Other", "A@X.COM ", "secret2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_envelope(&body, false, StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_validation_lists_field_errors() {
    let server = TestServer::spawn().await;
    let (status, body) = server.register("", "not-an-email", "123").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed.");
    assert!(body["errors"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
async fn login_failures_do_not_reveal_which_part_was_wrong() {
    let server = TestServer::spawn().await;
    server.register("Alice", "a@x.com", "secret1").await;

    let (s1, unknown) = server.login("nobody@x.com", "secret1").await;
    let (s2, wrong) = server.login("a@x.com", "wrong-password").await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], "Invalid email or password.");
    assert_eq!(unknown["message"], wrong["message"]);
}

#[tokio::test]
async fn malformed_body_uses_envelope() {
    let server = TestServer::spawn().await;
    let res = server
        .client
        .post(server.url("/api/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_envelope(&body, false, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let server = TestServer::spawn().await;

    let res = server.client.get(server.url("/api/productlevels")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_envelope(&body, false, StatusCode::UNAUTHORIZED);

    let (status, _) = server.get_authed("/api/purchases", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = mint_jwt(Utc::now() - ChronoDuration::minutes(200), 120);
    let (status, _) = server.get_authed("/api/purchases", &expired).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server
        .post("/api/auth/change-password", json!({ "oldPassword": "a", "newPassword": "b", "confirmPassword": "b" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sliding_headers_only_inside_the_window() {
    let server = TestServer::spawn().await;

    let fresh = mint_jwt(Utc::now(), 120);
    let res = server
        .client
        .get(server.url("/api/productlevels"))
        .bearer_auth(&fresh)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-token-expiring").is_none());

    // 120 minute token issued 100 minutes ago: 20 minutes left, inside the 60 minute window.
    let aging = mint_jwt(Utc::now() - ChronoDuration::minutes(100), 120);
    let res = server
        .client
        .get(server.url("/api/productlevels"))
        .bearer_auth(&aging)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-token-expiring"], "true");

    let remaining: i64 = res.headers()["x-token-remaining-minutes"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((19..=20).contains(&remaining), "remaining = {remaining}");
}

#[tokio::test]
async fn change_password_checks_old_then_confirmation() {
    let server = TestServer::spawn().await;
    let session = server.session("a@x.com").await;
    let token = session["accessToken"].as_str().unwrap();

    let (status, body) = server
        .post_authed(
            "/api/auth/change-password",
            token,
            json!({ "oldPassword": "nope", "newPassword": "secret2", "confirmPassword": "secret2" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Old password is incorrect.");

    let (status, body) = server
        .post_authed(
            "/api/auth/change-password",
            token,
            json!({ "oldPassword": "secret1", "newPassword": "secret2", "confirmPassword": "secret3" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "New password and confirm password do not match.");

    let (status, body) = server
        .post_authed(
            "/api/auth/change-password",
            token,
            json!({ "oldPassword": "secret1", "newPassword": "secret2", "confirmPassword": "secret2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password changed successfully.");

    assert_eq!(server.login("a@x.com", "secret1").await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(server.login("a@x.com", "secret2").await.0, StatusCode::OK);
}

#[tokio::test]
async fn password_recovery_flow() {
    let server = TestServer::spawn().await;
    server.register("Alice", "a@x.com", "secret1").await;

    // Unknown and known emails get the same answer; only the known one is mailed.
    let (status, unknown) = server
        .post("/api/auth/forgot-password", json!({ "email": "ghost@x.com" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.email.count(), 0);

    let (status, known) = server
        .post("/api/auth/forgot-password", json!({ "email": "A@x.com" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown["message"], known["message"]);
    assert_eq!(known["message"], "If the email exists, an OTP has been sent.");

    let code = server.email.last_code_for("a@x.com").expect("otp was sent");
    assert_eq!(code.len(), 4);

    let wrong = if code == "1000" { "1001" } else { "1000" };
    let (status, body) = server
        .post("/api/auth/verify-otp", json!({ "email": "a@x.com", "otpCode": wrong }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired OTP.");

    let (status, body) = server
        .post("/api/auth/verify-otp", json!({ "email": "a@x.com", "otpCode": code }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP verified successfully.");
    let reset_token = body["data"].as_str().unwrap().to_string();

    // A used code cannot be verified twice.
    let (status, _) = server
        .post("/api/auth/verify-otp", json!({ "email": "a@x.com", "otpCode": code }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .post(
            "/api/auth/reset-password",
            json!({ "email": "a@x.com", "resetToken": reset_token, "newPassword": "fresh-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset successfully.");

    // The reset token is single-use.
    let (status, body) = server
        .post(
            "/api/auth/reset-password",
            json!({ "email": "a@x.com", "resetToken": reset_token, "newPassword": "another-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token.");

    assert_eq!(server.login("a@x.com", "fresh-pass").await.0, StatusCode::OK);
}

#[tokio::test]
async fn forgot_password_without_smtp_reports_delivery_failure() {
    let server = TestServer::spawn_with_sender(Arc::new(UnconfiguredEmailSender)).await;
    server.register("Alice", "a@x.com", "secret1").await;

    let (status, body) = server
        .post("/api/auth/forgot-password", json!({ "email": "a@x.com" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope(&body, false, StatusCode::INTERNAL_SERVER_ERROR);
    assert_ne!(body["message"], "If the email exists, an OTP has been sent.");

    // Unknown emails still get the neutral answer; nothing is sent for them.
    let (status, body) = server
        .post("/api/auth/forgot-password", json!({ "email": "ghost@x.com" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "If the email exists, an OTP has been sent.");
}

#[tokio::test]
async fn refresh_rotates_the_refresh_token() {
    let server = TestServer::spawn().await;
    let session = server.session("a@x.com").await;

    let request = json!({
        "accessToken": session["accessToken"],
        "refreshToken": session["refreshToken"],
    });

    let (status, body) = server.post("/api/auth/refresh-token", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let renewed = &body["data"];
    assert_ne!(renewed["refreshToken"], session["refreshToken"]);
    assert_eq!(renewed["expiresIn"], 7200);

    let (status, _) = server
        .get_authed("/api/productlevels", renewed["accessToken"].as_str().unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);

    // The old refresh token was revoked by the rotation.
    let (status, body) = server.post("/api/auth/refresh-token", request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired refresh token.");
}

#[tokio::test]
async fn purchases_drive_product_levels() {
    let server = TestServer::spawn().await;
    let session = server.session("a@x.com").await;
    let token = session["accessToken"].as_str().unwrap();
    let product_id = Uuid::now_v7();

    let purchase = |quantity: i32| {
        json!({
            "sku": "SKU-1",
            "categoryId": Uuid::now_v7(),
            "subCategoryId": Uuid::now_v7(),
            "productId": product_id,
            "unitCost": 2.5,
            "quantity": quantity,
            "totalAmount": 2.5 * quantity as f64,
        })
    };

    let (status, first) = server.post_authed("/api/purchases", token, purchase(10)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["message"], "Created");
    assert_eq!(first["data"]["createdBy"], "a@x.com");

    let (status, second) = server.post_authed("/api/purchases", token, purchase(5)).await;
    assert_eq!(status, StatusCode::CREATED);

    let level_path = format!("/api/productlevels/{product_id}");
    let (status, level) = server.get_authed(&level_path, token).await;
    assert_eq!(status, StatusCode::OK);
    // The first purchase seeds in-stock; later purchases only add to the purchased total.
    assert_eq!(level["data"]["purchaseQuantity"], 15);
    assert_eq!(level["data"]["inStockQuantity"], 10);

    let second_id = second["data"]["id"].as_str().unwrap();
    let (status, body) = server.delete_authed(&format!("/api/purchases/{second_id}"), token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted");

    // Deleting takes the quantity back out of both totals.
    let (_, level) = server.get_authed(&level_path, token).await;
    assert_eq!(level["data"]["purchaseQuantity"], 10);
    assert_eq!(level["data"]["inStockQuantity"], 5);

    let (status, body) = server.get_authed(&format!("/api/purchases/{second_id}"), token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");

    let (status, list) = server.get_authed("/api/purchases", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_purchase_is_rejected_with_field_errors() {
    let server = TestServer::spawn().await;
    let session = server.session("a@x.com").await;
    let token = session["accessToken"].as_str().unwrap();

    let (status, body) = server
        .post_authed(
            "/api/purchases",
            token,
            json!({ "sku": "", "productId": Uuid::now_v7(), "unitCost": -1.0, "quantity": -2 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed.");
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn set_reorder_requires_an_existing_level_and_adjust_creates_one() {
    let server = TestServer::spawn().await;
    let session = server.session("a@x.com").await;
    let token = session["accessToken"].as_str().unwrap();
    let product_id = Uuid::now_v7();

    let (status, body) = server
        .post_authed(
            &format!("/api/productlevels/set-reorder/{product_id}"),
            token,
            json!({ "reOrderLevel": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");

    let (status, body) = server
        .post_authed(
            &format!("/api/productlevels/adjust/{product_id}"),
            token,
            json!({ "quantityDelta": 6 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inStockQuantity"], 6);
    assert_eq!(body["data"]["purchaseQuantity"], 0);

    let (status, body) = server
        .post_authed(
            &format!("/api/productlevels/set-reorder/{product_id}"),
            token,
            json!({ "reOrderLevel": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reOrderLevel"], 4);

    // Negative adjustments clamp at zero.
    let (_, body) = server
        .post_authed(
            &format!("/api/productlevels/adjust/{product_id}"),
            token,
            json!({ "quantityDelta": -100 }),
        )
        .await;
    assert_eq!(body["data"]["inStockQuantity"], 0);

    let (status, body) = server.get_authed("/api/productlevels/not-a-uuid", token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&body, false, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_routes_require_a_bearer_token() {
    let server = TestServer::spawn().await;
    for path in ["/api/categories", "/api/subcategories", "/api/units", "/api/products"] {
        let res = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn category_crud_and_product_counts() {
    let server = TestServer::spawn().await;
    let session = server.session("a@x.com").await;
    let token = session["accessToken"].as_str().unwrap();

    let (status, created) = server
        .post_authed("/api/categories", token, json!({ "name": "Drinks", "slug": "drinks" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["isActive"], true);
    let category_id = created["data"]["id"].as_str().unwrap().to_string();
    let category_path = format!("/api/categories/{category_id}");

    let (status, product) = server
        .post_authed(
            "/api/products",
            token,
            json!({ "name": "Cola", "categoryId": category_id, "unit": "can", "price": 1.25 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["data"]["createdBy"], "a@x.com");
    let product_id = product["data"]["id"].as_str().unwrap();

    let (status, fetched) = server.get_authed(&format!("/api/products/{product_id}"), token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["categoryId"], category_id.as_str());

    let (_, listed) = server.get_authed("/api/categories", token).await;
    assert_eq!(listed["data"][0]["productCount"], 1);

    let (status, updated) = server
        .put_authed(&category_path, token, json!({ "name": "Beverages", "isActive": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Beverages");
    assert_eq!(updated["data"]["isActive"], false);
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

    let (status, body) = server.delete_authed(&category_path, token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted");

    let (status, body) = server.get_authed(&category_path, token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");
    assert_eq!(server.delete_authed(&category_path, token).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_unit_lists_every_field_error() {
    let server = TestServer::spawn().await;
    let session = server.session("a@x.com").await;
    let token = session["accessToken"].as_str().unwrap();

    let (status, body) = server
        .post_authed("/api/units", token, json!({ "name": "", "shortName": "", "noOfProducts": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed.");
    assert_eq!(
        body["errors"],
        json!([
            "Name is required.",
            "Short name is required.",
            "NoOfProducts must be zero or a positive number."
        ])
    );
}

#[tokio::test]
async fn sub_category_update_keeps_identity_and_products_are_read_only() {
    let server = TestServer::spawn().await;
    let session = server.session("a@x.com").await;
    let token = session["accessToken"].as_str().unwrap();
    let category_id = Uuid::now_v7();

    let (status, created) = server
        .post_authed(
            "/api/subcategories",
            token,
            json!({ "name": "Juices", "categoryId": category_id, "code": "JU" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap();

    let (status, updated) = server
        .put_authed(
            &format!("/api/subcategories/{id}"),
            token,
            json!({ "id": Uuid::now_v7(), "name": "Fresh juices", "categoryId": category_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["id"], id);
    assert_eq!(updated["data"]["name"], "Fresh juices");

    let (status, _) = server
        .get_authed("/api/subcategories/not-a-uuid", token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let res = server
        .client
        .delete(server.url(&format!("/api/products/{}", Uuid::now_v7())))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}
