use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{ClientBuilder, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::common::ApiErrorDetails;
use super::error::ApiError;

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// How requests authenticate against the Admin API
#[derive(Clone)]
pub enum Credentials {
    Basic { username: String, password: String },
    AccessToken(String),
}

/// Settings needed to build a [`Client`]
#[derive(Clone)]
pub struct ClientConfig {
    /// Host plus admin API path, e.g. `https://localhost:9999/pf-admin-api/v1`
    pub base_url: String,
    pub credentials: Credentials,
    pub insecure_trust_all_tls: bool,
    pub bypass_external_validation: bool,
    pub user_agent: String,
}

/// PingFederate Admin API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Xsrf-Header", HeaderValue::from_static("PingFederate"));
        headers.insert(
            "X-BypassExternalValidation",
            HeaderValue::from_static(if config.bypass_external_validation {
                "true"
            } else {
                "false"
            }),
        );
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ApiError::InvalidConfig(format!("invalid user agent: {}", e)))?;
        headers.insert(USER_AGENT, user_agent);

        let http_client = ClientBuilder::new()
            .danger_accept_invalid_certs(config.insecure_trust_all_tls)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                credentials: config.credentials,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Authentication policy and fragment operations
    pub fn authentication_policies(
        &self,
    ) -> crate::api::authentication_policies::AuthenticationPoliciesApi<'_> {
        crate::api::authentication_policies::AuthenticationPoliciesApi::new(self)
    }

    /// Local identity profile operations
    pub fn local_identity(&self) -> crate::api::local_identity::LocalIdentityApi<'_> {
        crate::api::local_identity::LocalIdentityApi::new(self)
    }

    /// Execute a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        self.handle_response(response).await
    }

    /// Execute a POST request
    pub async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Execute a PUT request
    pub async fn put<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Execute a DELETE request. The response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthError);
        }
        self.handle_error_response(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);

        tracing::debug!("{} request to: {}", method, url);

        let builder = self.inner.http_client.request(method, &url);
        match &self.inner.credentials {
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            Credentials::AccessToken(token) => builder.bearer_auth(token),
        }
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return self.parse_success_response(response).await;
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthError);
        }
        self.handle_error_response(response).await
    }

    /// Parse successful response
    async fn parse_success_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        serde_json::from_str::<T>(&text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })
    }

    /// Handle error response
    async fn handle_error_response<T>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let details = serde_json::from_str::<ApiErrorDetails>(&text)
            .ok()
            .map(Box::new);

        Err(ApiError::ApiError {
            status,
            message: text,
            details,
        })
    }
}
