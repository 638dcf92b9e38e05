use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::sync::RwLock;
use userdesk_model::ApiResponse;

/// Header Django expects on unsafe methods when session auth is in use.
pub const CSRF_HEADER: &str = "X-CSRFToken";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures surfaced by [`ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status for non-success responses.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Connection options that are fixed for the client's lifetime.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Path segment between the server root and the resource routes.
    pub api_prefix: String,
    pub timeout: Duration,
    pub csrf_token: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_prefix: "api".to_string(),
            timeout: DEFAULT_TIMEOUT,
            csrf_token: None,
        }
    }
}

/// HTTP client for the users backend with optional token authentication
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    api_prefix: String,
    csrf_token: Option<String>,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("has_csrf_token", &self.csrf_token.is_some())
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

/// Add `http://` when no scheme is given and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme =
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };
    if with_scheme != raw {
        warn!(
            "[ApiClient] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }
    with_scheme
}

impl ApiClient {
    /// Create a client with default options
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ApiError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    pub fn with_options(
        base_url: impl AsRef<str>,
        options: ClientOptions,
    ) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url.as_ref());
        if let Err(source) = url::Url::parse(&base_url) {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url,
                source,
            });
        }
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(ApiError::Client)?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self {
            client,
            base_url,
            api_prefix: options.api_prefix.trim_matches('/').to_string(),
            csrf_token: options.csrf_token,
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    /// Build the absolute URL for a route relative to the API root
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        let path = p.trim_start_matches('/');
        if self.api_prefix.is_empty() {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/{}/{}", self.base_url, self.api_prefix, path)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the authentication token
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    /// Get the current authentication token
    pub async fn get_token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    /// Attach authentication and CSRF headers
    async fn build_request(
        &self,
        method: &Method,
        builder: RequestBuilder,
    ) -> RequestBuilder {
        let builder = match self.token_store.read().await.as_ref() {
            Some(token) => {
                builder.header("Authorization", format!("Token {}", token))
            }
            None => builder,
        };
        match &self.csrf_token {
            Some(csrf) if !method.is_safe() => {
                builder.header(CSRF_HEADER, csrf)
            }
            _ => builder,
        }
    }

    /// Send a request and return the response when its status is a success
    async fn send(
        &self,
        method: Method,
        url: String,
        builder: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        debug!("[ApiClient] {} {}", method, url);
        let request = self.build_request(&method, builder).await;
        let response = request.send().await.map_err(|source| {
            ApiError::Transport {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("[ApiClient] {} {} failed with {}", method, url, status);
        Err(ApiError::Status {
            method,
            url,
            status,
            body,
        })
    }

    /// GET a JSON payload, bare or wrapped in a `data` envelope
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let response = self
            .send(Method::GET, url.clone(), self.client.get(&url))
            .await?;
        let text = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        serde_json::from_str::<ApiResponse<T>>(&text)
            .map(ApiResponse::into_data)
            .map_err(|source| ApiError::Decode { url, source })
    }

    /// POST a JSON body; the response body is discarded
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send_discarding(Method::POST, path, body).await
    }

    /// PATCH a JSON body; the response body is discarded
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send_discarding(Method::PATCH, path, body).await
    }

    async fn send_discarding<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let url = self.build_url(path);
        let builder = self.client.request(method.clone(), &url).json(body);
        self.send(method, url, builder).await.map(|_| ())
    }
}
