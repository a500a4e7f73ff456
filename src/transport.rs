//! Outbound HTTP seam.
//!
//! Everything above this module talks to the network through [`HttpSend`],
//! so a test double can stand in for `reqwest::Client`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::error::{OpenProjectError, Result};
use crate::response::ApiResponse;

/// An outgoing request descriptor.
///
/// Authentication strategies take one of these by reference and return a
/// new one, so the caller's request is never mutated.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request with no headers and no body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Serialize `body` as JSON and set it as the request body.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| OpenProjectError::Request(format!("failed to serialize body: {e}")))?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(bytes);
        Ok(self)
    }
}

/// Execute a request and read the full response.
///
/// Implemented for `reqwest::Client`; any other client (or a test double)
/// can be plugged into [`crate::ClientBuilder::transport`].
#[async_trait]
pub trait HttpSend: Send + Sync {
    /// Send the request and wait for the complete response body.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Transport`] on network-level failures.
    /// Non-2xx statuses are not errors at this layer.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl HttpSend for reqwest::Client {
    #[tracing::instrument(
        skip(self, request),
        fields(method = %request.method, url = %request.url)
    )]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(OpenProjectError::Transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(OpenProjectError::Transport)?;

        tracing::debug!(%status, bytes = body.len(), "received response");
        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_json_sets_body_and_content_type() {
        let url = Url::parse("https://op.example.com/api/v3/projects").unwrap();
        let request = ApiRequest::new(Method::POST, url)
            .with_json(&serde_json::json!({"name": "Demo"}))
            .unwrap();

        assert_eq!(request.body.as_deref(), Some(br#"{"name":"Demo"}"#.as_slice()));
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_reqwest_transport_error_on_refused_connection() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/api/v3")).unwrap();
        let result = reqwest::Client::new()
            .send(ApiRequest::new(Method::GET, url))
            .await;

        assert!(matches!(result, Err(OpenProjectError::Transport(_))));
    }
}
