//! HTTP Basic authentication.

use std::fmt;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{HeaderValue, AUTHORIZATION};

use super::Authenticator;
use crate::error::{OpenProjectError, Result};
use crate::transport::ApiRequest;

/// Username that OpenProject expects when authenticating with an API key.
const API_KEY_USER: &str = "apikey";

/// Static username/password credentials sent with every request.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl BasicAuth {
    /// Authenticate with a username and password.
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Authenticate with an OpenProject API key.
    pub fn api_key(key: &str) -> Self {
        Self::new(API_KEY_USER, key)
    }

    /// The configured username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The complete `Basic ...` header value.
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64.encode(credentials.as_bytes()))
    }
}

#[async_trait]
impl Authenticator for BasicAuth {
    async fn attach(&self, request: &ApiRequest) -> Result<ApiRequest> {
        let mut value = HeaderValue::from_str(&self.header_value())
            .map_err(|e| OpenProjectError::Auth(format!("invalid basic credentials: {e}")))?;
        value.set_sensitive(true);

        let mut authed = request.clone();
        authed.headers.insert(AUTHORIZATION, value);
        Ok(authed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use url::Url;

    fn request() -> ApiRequest {
        ApiRequest::new(
            Method::GET,
            Url::parse("https://op.example.com/api/v3/users/1").unwrap(),
        )
    }

    #[test]
    fn test_header_value_encodes_credentials() {
        let auth = BasicAuth::new("admin", "secret");
        // base64("admin:secret")
        assert_eq!(auth.header_value(), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_api_key_uses_apikey_user() {
        let auth = BasicAuth::api_key("abc123");
        assert_eq!(auth.username(), "apikey");
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", BasicAuth::new("admin", "hunter2"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_attach_leaves_original_untouched() {
        let original = request();
        let auth = BasicAuth::new("admin", "secret");

        let authed = auth.attach(&original).await.unwrap();

        assert!(original.headers.get(AUTHORIZATION).is_none());
        assert!(original.headers.is_empty());
        assert_eq!(authed.headers[AUTHORIZATION], "Basic YWRtaW46c2VjcmV0");
        assert_eq!(authed.url, original.url);
        assert_eq!(authed.method, original.method);
    }
}
