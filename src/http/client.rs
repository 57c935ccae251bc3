//! HTTP client that turns provider responses into typed outcomes.

use anyhow::Context;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::classify::{classify_error_response, request_id};
use crate::provider::ProviderFailure;

/// Thin wrapper around reqwest that classifies every failure.
///
/// It does not retry: retries belong to the caller, which knows the deadline.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Sends a prepared request and deserializes the JSON success body.
    #[tracing::instrument(skip(self, request))]
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ProviderFailure> {
        let response = request
            .send()
            .await
            .context("Failed to send request to provider")?;

        let status = response.status();
        debug!("Provider responded with HTTP {}", status.as_u16());

        if status.is_success() {
            let result = response
                .json::<T>()
                .await
                .context("Failed to parse JSON response from provider")?;
            return Ok(result);
        }

        let request_id = request_id(response.headers());
        let body = response
            .text()
            .await
            .context("Failed to read error response from provider")?;

        Err(classify_error_response(status, request_id, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct TestResponse {
        name: String,
        value: i32,
    }

    #[tokio::test]
    async fn test_send_json_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let request = client.inner().get(format!("{}/test", url));
        let result: TestResponse = client.send_json(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_send_json_structured_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_header("request-id", "req_42")
            .with_body(r#"{"error": {"type": "invalid_request_error", "message": "No such plan: gold", "param": "id"}}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let request = client.inner().get(format!("{}/test", url));
        let result: Result<TestResponse, _> = client.send_json(request).await;

        mock.assert_async().await;
        match result {
            Err(ProviderFailure::Api(err)) => {
                assert_eq!(err.error_type, "invalid_request_error");
                assert_eq!(err.http_status, 404);
                assert_eq!(err.param.as_deref(), Some("id"));
                assert_eq!(err.request_id.as_deref(), Some("req_42"));
            }
            other => panic!("Expected Api failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_json_server_error_without_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(503)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let request = client.inner().get(format!("{}/test", url));
        let result: Result<TestResponse, _> = client.send_json(request).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ProviderFailure::Transport(_))));
    }

    #[tokio::test]
    async fn test_send_json_undecodable_success_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let request = client.inner().get(format!("{}/test", url));
        let result: Result<TestResponse, _> = client.send_json(request).await;

        mock.assert_async().await;
        match result {
            Err(ProviderFailure::Transport(e)) => {
                assert!(e.to_string().contains("Failed to parse JSON"));
            }
            other => panic!("Expected Transport failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_json_connection_refused() {
        let client = HttpClient::new(Client::new());
        let request = client.inner().get("http://127.0.0.1:1/test");
        let result: Result<TestResponse, _> = client.send_json(request).await;

        assert!(matches!(result, Err(ProviderFailure::Transport(_))));
    }
}
