use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Serialize;
use till_types::{
    AdminLoginRequest, AuthResponse, ForgotPasswordRequest, PinLoginRequest, ResetPasswordRequest,
    VerifyOtpRequest,
};

use super::AuthService;
use crate::config::AuthConfig;

/// Standard User-Agent header for till API requests.
pub const USER_AGENT: &str = concat!("till/", env!("CARGO_PKG_VERSION"));

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Resolves the auth base URL with precedence: env > config > default.
///
/// # Errors
/// Returns an error if the chosen URL does not parse.
pub fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    if let Ok(env_url) = std::env::var(AuthConfig::BASE_URL_ENV) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(AuthConfig::DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid auth base URL: {url}"))?;
    Ok(())
}

/// [`AuthService`] backed by the REST auth API.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthService {
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        validate_url(base_url)?;
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from config, honoring `TILL_AUTH_URL`.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let base_url = resolve_base_url(config.base_url.as_deref())?;
        Self::new(&base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<AuthResponse> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(%url, %request_id, "auth request");

        let response = self
            .client
            .post(&url)
            .header(REQUEST_ID_HEADER, &request_id)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("read response body from {url}"))?;

        // Rejections usually come back as 4xx with the standard envelope.
        match serde_json::from_str::<AuthResponse>(&text) {
            Ok(parsed) => {
                tracing::debug!(
                    %url,
                    %request_id,
                    %status,
                    success = parsed.success,
                    "auth response"
                );
                Ok(parsed)
            }
            Err(err) if status.is_success() => {
                Err(anyhow::Error::new(err).context(format!("invalid response body from {url}")))
            }
            Err(_) => anyhow::bail!("HTTP {status} from {url}"),
        }
    }
}

impl AuthService for HttpAuthService {
    fn admin_login(&self, request: AdminLoginRequest) -> BoxFuture<'_, Result<AuthResponse>> {
        async move { self.post("/auth/admin/login", &request).await }.boxed()
    }

    fn pin_login(&self, request: PinLoginRequest) -> BoxFuture<'_, Result<AuthResponse>> {
        async move { self.post("/auth/pin-login", &request).await }.boxed()
    }

    fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> BoxFuture<'_, Result<AuthResponse>> {
        async move { self.post("/auth/forgot-password", &request).await }.boxed()
    }

    fn verify_otp(&self, request: VerifyOtpRequest) -> BoxFuture<'_, Result<AuthResponse>> {
        async move { self.post("/auth/verify-otp", &request).await }.boxed()
    }

    fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> BoxFuture<'_, Result<AuthResponse>> {
        async move { self.post("/auth/reset-password", &request).await }.boxed()
    }
}
