use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::envelope::ApiEnvelope;
use crate::guard::RefreshGuard;

const REFRESH_PATH: &str = "/api/auth/refresh-token";
const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request body could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Tokens held for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user_name: String,
    pub user_type: i32,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    access_token: &'a str,
    refresh_token: &'a str,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: RwLock<Option<Session>>,
    refresh_guard: RefreshGuard,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: RwLock::new(None),
            refresh_guard: RefreshGuard::new(),
        }
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    /// Sign in and keep the returned tokens for later requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiEnvelope<LoginData>, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let res = self.http.post(self.url(LOGIN_PATH)).json(&body).send().await?;
        let envelope: ApiEnvelope<LoginData> = read_envelope(res).await?;

        if let (true, Some(data)) = (envelope.success, envelope.data.as_ref()) {
            self.set_session(Session {
                access_token: data.access_token.clone(),
                refresh_token: data.refresh_token.clone(),
            })
            .await;
        }
        Ok(envelope)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>, ClientError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        self.send(Method::POST, path, Some(serde_json::to_value(body)?)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        self.send(Method::PUT, path, Some(serde_json::to_value(body)?)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        self.send(Method::PATCH, path, Some(serde_json::to_value(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>, ClientError> {
        self.send(Method::DELETE, path, None).await
    }

    /// Refresh the session tokens. Returns `false` if another refresh is in
    /// flight, no session is held, or the server rejects the tokens (the
    /// session is then cleared).
    pub async fn try_refresh(&self) -> bool {
        self.refresh_guard.run(|| self.refresh_session()).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "sending request");

        let mut res = self.request(method.clone(), &url, body.as_ref()).await?;

        if res.status() == StatusCode::UNAUTHORIZED && self.try_refresh().await {
            res = self.request(method, &url, body.as_ref()).await?;
            tracing::debug!(status = %res.status(), "retried after token refresh");
        }

        read_envelope(res).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut req = self.http.request(method, url);
        if let Some(session) = self.session.read().await.as_ref() {
            req = req.bearer_auth(&session.access_token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    async fn refresh_session(&self) -> bool {
        let Some(current) = self.session().await else {
            tracing::warn!("cannot refresh: no session tokens");
            return false;
        };

        let body = RefreshRequest {
            access_token: &current.access_token,
            refresh_token: &current.refresh_token,
        };

        let renewed = match self.http.post(self.url(REFRESH_PATH)).json(&body).send().await {
            Ok(res) if res.status().is_success() => read_envelope::<TokenData>(res)
                .await
                .ok()
                .filter(|env| env.success)
                .and_then(|env| env.data),
            Ok(res) => {
                tracing::debug!(status = %res.status(), "refresh rejected");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "refresh request failed");
                return false;
            }
        };

        match renewed {
            Some(tokens) => {
                self.set_session(Session {
                    access_token: tokens.access_token,
                    refresh_token: tokens.refresh_token,
                })
                .await;
                tracing::info!("session tokens refreshed");
                true
            }
            None => {
                tracing::warn!("token refresh failed, clearing session");
                self.clear_session().await;
                false
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Decode the envelope, turning empty or non-JSON bodies into envelope errors.
async fn read_envelope<T: DeserializeOwned>(res: reqwest::Response) -> Result<ApiEnvelope<T>, ClientError> {
    let status = res.status().as_u16();
    let is_json = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    let text = res.text().await?;

    if text.trim().is_empty() {
        return Ok(ApiEnvelope::error("Empty response from server", status));
    }
    if !is_json {
        tracing::error!(status, "non-JSON response from server");
        return Ok(ApiEnvelope::error(format!("Server returned an error: {status}"), status));
    }

    match serde_json::from_str(&text) {
        Ok(envelope) => Ok(envelope),
        Err(e) => {
            tracing::error!(error = %e, "could not parse response envelope");
            Ok(ApiEnvelope::error("Error parsing server response", status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_and_path() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/purchases"), "http://localhost:8080/api/purchases");
        assert_eq!(client.url("api/purchases"), "http://localhost:8080/api/purchases");
    }

    #[tokio::test]
    async fn refresh_without_session_is_refused() {
        let client = ApiClient::new("http://127.0.0.1:9");
        assert!(!client.try_refresh().await);
    }
}
