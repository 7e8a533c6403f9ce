//! Authenticated HTTP client for the Dayflow API
//!
//! Wraps reqwest::Client with bearer token injection and transparent
//! recovery from expired access tokens.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::error::ApiError;
use super::refresh::{RefreshCoordinator, RefreshLease, Ticket};
use super::request::ApiRequest;
use crate::auth::{MemoryTokenStore, TokenStore};

/// Where the user is sent when the session cannot be recovered.
pub const LOGIN_PATH: &str = "/login";

const REFRESH_PATH: &str = "/auth/token/refresh/";

/// Side effect fired when the session ends involuntarily.
pub trait SignInRedirect: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Default redirect: just log it.
pub struct LogRedirect;

impl SignInRedirect for LogRedirect {
    fn redirect(&self, path: &str) {
        tracing::warn!("Session ended, sign in again ({})", path);
    }
}

/// Successful (2xx) response with its body read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

struct Inner {
    http: Client,
    /// Used only for the refresh call, which must never recurse into recovery
    refresh_http: Client,
    base_url: String,
    refresh_timeout: Option<Duration>,
    tokens: Arc<dyn TokenStore>,
    redirect: Arc<dyn SignInRedirect>,
    coordinator: RefreshCoordinator,
}

/// Dayflow API client. Cheap to clone; clones share tokens and refresh state.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Create a new client with an in-memory token store
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Attach `Authorization: Bearer` if a token is available.
    fn authorize(
        &self,
        builder: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token.map(str::to_string).or_else(|| self.inner.tokens.access()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send `request`, refreshing the access token once if it is rejected.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        match self.send(&request, None).await {
            Err(err) if err.is_unauthorized() && !request.retried => {
                self.recover(request, err).await
            }
            other => other,
        }
    }

    /// Send and decode a JSON response body.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute(request).await?.json()
    }

    /// Send and ignore the response body.
    pub async fn send_ignoring_body(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let builder = request.build(&self.inner.http, &self.inner.base_url)?;
        let builder = self.authorize(builder, token);
        tracing::debug!(
            "{} {}{}{}",
            request.method,
            self.inner.base_url,
            request.path,
            if request.retried { " (retry)" } else { "" }
        );

        let resp = builder.send().await?;
        read_response(resp).await
    }

    async fn recover(
        &self,
        mut request: ApiRequest,
        unauthorized: ApiError,
    ) -> Result<ApiResponse, ApiError> {
        request.retried = true;

        let access = match self.inner.coordinator.acquire() {
            Ticket::Leader(lease) => self.lead_refresh(lease, unauthorized).await?,
            Ticket::Follower(rx) => {
                let outcome = rx
                    .await
                    .unwrap_or_else(|_| Err(Arc::new(ApiError::RefreshAbandoned)));
                outcome.map_err(|cause| ApiError::RefreshFailed {
                    unauthorized: Box::new(unauthorized),
                    cause,
                })?
            }
        };

        self.send(&request, Some(&access)).await
    }

    async fn lead_refresh(
        &self,
        lease: RefreshLease<'_>,
        unauthorized: ApiError,
    ) -> Result<String, ApiError> {
        let Some(refresh) = self.inner.tokens.refresh() else {
            tracing::warn!("Access token rejected and no refresh token stored");
            lease.fail(Arc::new(unauthorized.clone()));
            self.end_session();
            return Err(unauthorized);
        };

        tracing::info!("Access token rejected, refreshing...");
        match self.request_access_token(&refresh).await {
            Ok(access) => {
                self.inner.tokens.set_access(&access);
                tracing::info!("Token refreshed");
                lease.succeed(access.clone());
                Ok(access)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                let cause = Arc::new(e);
                lease.fail(cause.clone());
                self.end_session();
                Err(ApiError::RefreshFailed {
                    unauthorized: Box::new(unauthorized),
                    cause,
                })
            }
        }
    }

    /// Exchange the refresh token on the bare client.
    async fn request_access_token(&self, refresh: &str) -> Result<String, ApiError> {
        let url = format!("{}{}", self.inner.base_url, REFRESH_PATH);
        let mut builder = self
            .inner
            .refresh_http
            .post(&url)
            .json(&serde_json::json!({ "refresh": refresh }));
        if let Some(timeout) = self.inner.refresh_timeout {
            builder = builder.timeout(timeout);
        }

        let resp = read_response(builder.send().await?).await?;
        let parsed: RefreshResponse = resp.json()?;
        Ok(parsed.access)
    }

    fn end_session(&self) {
        self.inner.tokens.clear();
        self.inner.redirect.redirect(LOGIN_PATH);
    }
}

/// Read the body and map non-2xx statuses to [`ApiError::Status`].
async fn read_response(resp: reqwest::Response) -> Result<ApiResponse, ApiError> {
    let status = resp.status();
    let body = resp.bytes().await?.to_vec();
    if status.is_success() {
        return Ok(ApiResponse { status, body });
    }

    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(
            serde_json::from_slice::<Value>(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned())),
        )
    };
    Err(ApiError::Status {
        status: status.as_u16(),
        payload,
    })
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    tokens: Option<Arc<dyn TokenStore>>,
    redirect: Option<Arc<dyn SignInRedirect>>,
    timeout: Option<Duration>,
    refresh_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL, e.g. `http://localhost:8000/api`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn redirect(mut self, redirect: Arc<dyn SignInRedirect>) -> Self {
        self.redirect = Some(redirect);
        self
    }

    /// Timeout for ordinary requests
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound the refresh call. Without it a hung refresh holds every queued
    /// request indefinitely; with it the hang becomes a refresh failure.
    pub fn refresh_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Configuration("base_url is required".into()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("dayflow-cli/", env!("CARGO_PKG_VERSION")).to_string());

        let mut http = ClientBuilder::new().user_agent(user_agent.clone());
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build()?;
        let refresh_http = ClientBuilder::new().user_agent(user_agent).build()?;

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                refresh_http,
                base_url,
                refresh_timeout: self.refresh_timeout,
                tokens: self
                    .tokens
                    .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
                redirect: self.redirect.unwrap_or_else(|| Arc::new(LogRedirect)),
                coordinator: RefreshCoordinator::new(),
            }),
        })
    }
}
