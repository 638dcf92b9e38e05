use std::sync::Arc;
use std::time::Duration;

use crate::infra::api_client::{ApiClient, ApiError, ClientOptions};

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_API_PREFIX: &str = "api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_url: Arc<str>,
    pub api_prefix: Arc<str>,
    pub api_token: Option<Arc<str>>,
    pub csrf_token: Option<Arc<str>>,
    pub timeout: Duration,
    pub use_test_stubs: bool,
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn parse_timeout(raw: Option<String>) -> Duration {
    match raw {
        None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                log::warn!(
                    "Ignoring invalid USERDESK_TIMEOUT_SECS '{}', using {}s",
                    value,
                    DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
    }
}

fn non_empty(value: Option<String>) -> Option<Arc<str>> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(Arc::from)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

impl AppConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: Arc::from(server_url.into()),
            api_prefix: Arc::from(DEFAULT_API_PREFIX),
            api_token: None,
            csrf_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_test_stubs: false,
        }
    }

    pub fn from_environment() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; used by
    /// [`Self::from_environment`] and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_url = lookup("USERDESK_SERVER_URL")
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let api_prefix = lookup("USERDESK_API_PREFIX")
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());

        Self {
            server_url: Arc::from(server_url),
            api_prefix: Arc::from(api_prefix),
            api_token: non_empty(lookup("USERDESK_API_TOKEN")),
            csrf_token: non_empty(lookup("USERDESK_CSRF_TOKEN")),
            timeout: parse_timeout(lookup("USERDESK_TIMEOUT_SECS")),
            use_test_stubs: lookup("USERDESK_USE_STUBS")
                .is_some_and(|v| parse_flag(&v)),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn use_test_stubs(&self) -> bool {
        self.use_test_stubs
    }

    pub fn with_test_stubs(mut self, enabled: bool) -> Self {
        self.use_test_stubs = enabled;
        self
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Arc::from(prefix.into());
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Arc::from(token.into()));
        self
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(Arc::from(token.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_prefix: self.api_prefix.to_string(),
            timeout: self.timeout,
            csrf_token: self.csrf_token.as_deref().map(str::to_string),
        }
    }

    /// Build the HTTP client, with the API token applied when configured.
    pub async fn build_client(&self) -> Result<ApiClient, ApiError> {
        let client =
            ApiClient::with_options(self.server_url(), self.client_options())?;
        if let Some(token) = &self.api_token {
            client.set_token(Some(token.to_string())).await;
        }
        Ok(client)
    }
}
