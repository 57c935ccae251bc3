//! Client configuration.

use log::debug;
use reqwest::{
    Client, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::error::PlanError;
use crate::http::HttpClient;
use crate::retry::BackoffPolicy;

pub const DEFAULT_API_URL: &str = "https://api.stripe.com";

/// Timeout of a single HTTP request. The overall call is bounded by the
/// call context instead.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(80);

const USER_AGENT: &str = concat!("planrelay/", env!("CARGO_PKG_VERSION"));

const MIN_KEY_LENGTH: usize = 20;

const KEY_PREFIXES: [&str; 4] = ["sk_test_", "sk_live_", "rk_test_", "rk_live_"];

/// Settings needed to talk to the provider.
pub struct ClientConfig {
    api_key: SecretString,
    pub api_url: String,
    pub request_timeout: Duration,
    pub backoff: BackoffPolicy,
}

impl ClientConfig {
    /// Creates a configuration for the default API URL.
    ///
    /// Fails if the key is not a secret (`sk_`) or restricted (`rk_`) key.
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self, PlanError> {
        let api_key: SecretString = api_key.into();
        validate_api_key(api_key.expose_secret())?;

        Ok(Self {
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            backoff: BackoffPolicy::default(),
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn is_test_mode(&self) -> bool {
        let key = self.api_key.expose_secret();
        key.starts_with("sk_test_") || key.starts_with("rk_test_")
    }

    /// Parses the API base URL.
    pub fn base_url(&self) -> Result<Url, PlanError> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| PlanError::Config(format!("invalid API URL {}: {}", self.api_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(PlanError::Config(format!(
                "API URL {} cannot be used as a base URL",
                self.api_url
            )));
        }
        Ok(url)
    }

    /// Builds an HTTP client that authenticates every request with the API key.
    pub fn build_http_client(&self) -> Result<HttpClient, PlanError> {
        let mut headers = HeaderMap::new();
        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose_secret()))
                .map_err(|_| PlanError::Config("API key is not a valid header value".into()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!(
            "HTTP client configured with {} key",
            if self.is_test_mode() { "test" } else { "live" }
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| PlanError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpClient::new(client))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .field("backoff", &self.backoff)
            .field("is_test_mode", &self.is_test_mode())
            .finish_non_exhaustive()
    }
}

fn validate_api_key(key: &str) -> Result<(), PlanError> {
    if key.is_empty() {
        return Err(PlanError::Config("API key cannot be empty".into()));
    }
    if key.len() < MIN_KEY_LENGTH {
        return Err(PlanError::Config(format!(
            "API key too short (minimum {} characters)",
            MIN_KEY_LENGTH
        )));
    }
    if !KEY_PREFIXES.iter().any(|prefix| key.starts_with(prefix)) {
        return Err(PlanError::Config(
            "API key must start with sk_test_, sk_live_, rk_test_, or rk_live_".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const TEST_KEY: &str = "sk_test_4eC39HqLyjWDarjtT1zdp7dc";

    #[test]
    fn test_valid_keys() {
        assert!(ClientConfig::new(TEST_KEY.to_string()).is_ok());
        assert!(ClientConfig::new("rk_live_aaaaaaaaaaaaaaaaaaaa".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_keys() {
        let err = ClientConfig::new(String::new()).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));

        let err = ClientConfig::new("sk_test_short".to_string()).unwrap_err();
        assert!(err.to_string().contains("too short"));

        let err = ClientConfig::new("pk_test_aaaaaaaaaaaaaaaaaaaa".to_string()).unwrap_err();
        assert!(err.to_string().contains("must start with"));
    }

    #[test]
    fn test_defaults_and_builders() {
        let config = ClientConfig::new(TEST_KEY.to_string())
            .unwrap()
            .with_api_url("http://localhost:12111")
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.api_url, "http://localhost:12111");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.backoff, BackoffPolicy::default());
        assert!(config.is_test_mode());
    }

    #[test]
    fn test_debug_hides_key() {
        let config = ClientConfig::new(TEST_KEY.to_string()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(TEST_KEY));
        assert!(debug.contains("is_test_mode: true"));
    }

    #[test]
    fn test_base_url_validation() {
        let config = ClientConfig::new(TEST_KEY.to_string()).unwrap();
        assert_eq!(config.base_url().unwrap().as_str(), "https://api.stripe.com/");

        let config = config.with_api_url("not a url");
        assert!(matches!(config.base_url(), Err(PlanError::Config(_))));

        let config = ClientConfig::new(TEST_KEY.to_string())
            .unwrap()
            .with_api_url("mailto:billing@example.com");
        assert!(matches!(config.base_url(), Err(PlanError::Config(_))));
    }

    #[tokio::test]
    async fn test_http_client_sends_bearer_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("Authorization", Matcher::Exact(format!("Bearer {}", TEST_KEY)))
            .match_header("User-Agent", Matcher::Regex("^planrelay/".into()))
            .create_async()
            .await;

        let config = ClientConfig::new(TEST_KEY.to_string()).unwrap();
        let client = config.build_http_client().unwrap();
        let _ = client.inner().get(server.url()).send().await;

        mock.assert_async().await;
    }
}
