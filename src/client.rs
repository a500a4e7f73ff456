//! OpenProject API client.
//!
//! Low-level HTTP client that resolves endpoints, attaches credentials and
//! checks statuses. Resource operations are implemented via traits on model
//! types and routed through [`crate::dispatch`].

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use url::Url;

use crate::auth::{Authenticator, BasicAuth, CookieSessionAuth, JwtAuth};
use crate::dispatch::{ResourceKind, ServiceHandle};
use crate::error::{OpenProjectError, Result};
use crate::response::ApiResponse;
use crate::transport::{ApiRequest, HttpSend};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const USER_AGENT: &str = concat!("openproject-client/", env!("CARGO_PKG_VERSION"));

pub(crate) struct ClientInner {
    http: Arc<dyn HttpSend>,
    base_url: Url,
    auth: Arc<dyn Authenticator>,
}

/// Low-level OpenProject API client.
///
/// Holds the base URL, the HTTP transport and exactly one authentication
/// strategy. Entity-specific operations are implemented via the `Get`,
/// `List`, `Create` and `Delete` traits on model types.
///
/// This struct is cheaply cloneable; clones share the same transport and
/// session state.
///
/// # Example
///
/// ```no_run
/// use openproject_client::{BasicAuth, OpenProjectClient};
///
/// # fn example() -> openproject_client::Result<()> {
/// // Create from environment variables
/// let client = OpenProjectClient::from_env()?;
///
/// // Or configure manually
/// let client = OpenProjectClient::new(
///     "https://community.openproject.org",
///     BasicAuth::api_key("your-api-key"),
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenProjectClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for OpenProjectClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenProjectClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}

impl OpenProjectClient {
    /// Create a client from environment variables.
    ///
    /// `OPENPROJECT_URL` is required. Credentials are chosen in this order:
    ///
    /// 1. `OPENPROJECT_JWT_SECRET` + `OPENPROJECT_JWT_ISSUER` (signed tokens)
    /// 2. `OPENPROJECT_API_KEY` (basic auth as user `apikey`)
    /// 3. `OPENPROJECT_USERNAME` + `OPENPROJECT_PASSWORD` (basic auth, or a
    ///    cookie session when `OPENPROJECT_AUTH_URL` is also set)
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Config`] if the URL or every credential
    /// set is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("OPENPROJECT_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                OpenProjectError::Config(
                    "OPENPROJECT_URL environment variable not set".to_string(),
                )
            })?;

        Self::builder(&base_url)
            .shared_auth(auth_from_vars(&lookup)?)
            .build()
    }

    /// Create a client for `base_url` authenticating with `auth`.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Config`] if the base URL is invalid.
    pub fn new<A: Authenticator + 'static>(base_url: &str, auth: A) -> Result<Self> {
        Self::builder(base_url).auth(auth).build()
    }

    /// Start building a client for `base_url`.
    pub fn builder(base_url: &str) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub(crate) fn from_inner(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the base URL. Always ends with `/`.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// A dispatch handle for `kind` that refers back to this client.
    pub fn handle(&self, kind: ResourceKind) -> ServiceHandle {
        ServiceHandle::new(kind, Arc::downgrade(&self.inner))
    }

    /// Resolve `endpoint` against the base URL and build a request.
    ///
    /// A leading `/` on the endpoint is ignored so paths always stay below
    /// the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Request`] if the endpoint cannot be joined
    /// or the body cannot be serialized.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<ApiRequest> {
        let relative = endpoint.trim_start_matches('/');
        let url = self.inner.base_url.join(relative).map_err(|e| {
            OpenProjectError::Request(format!("invalid endpoint '{endpoint}': {e}"))
        })?;

        let request = ApiRequest::new(method, url);
        match body {
            Some(body) => request.with_json(body),
            None => Ok(request),
        }
    }

    /// Attach credentials, send, and check the status.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Auth`] if credentials cannot be attached,
    /// [`OpenProjectError::Transport`] on network failures, and
    /// [`OpenProjectError::Status`] for any status outside 200-299.
    #[tracing::instrument(
        skip(self, request),
        fields(method = %request.method, url = %request.url)
    )]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let authed = self.inner.auth.attach(&request).await?;
        let response = self.inner.http.send(authed).await?;
        Self::check_response(response)
    }

    /// Make a GET request.
    pub async fn get(&self, endpoint: &str) -> Result<ApiResponse> {
        let request = self.build_request(Method::GET, endpoint, None::<&()>)?;
        self.execute(request).await
    }

    /// Make a POST request with JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiResponse> {
        let request = self.build_request(Method::POST, endpoint, Some(body))?;
        self.execute(request).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse> {
        let request = self.build_request(Method::DELETE, endpoint, None::<&()>)?;
        self.execute(request).await
    }

    fn check_response(response: ApiResponse) -> Result<ApiResponse> {
        if response.is_success() {
            return Ok(response);
        }

        tracing::debug!(status = %response.status, "request rejected");
        Err(OpenProjectError::Status {
            status: response.status,
            response: Box::new(response),
        })
    }
}

/// Builder for [`OpenProjectClient`].
///
/// Without an explicit [`transport`](Self::transport) a `reqwest::Client` is
/// built with the configured timeout and user agent.
pub struct ClientBuilder {
    base_url: String,
    auth: Option<Arc<dyn Authenticator>>,
    transport: Option<Arc<dyn HttpSend>>,
    timeout: Duration,
    user_agent: String,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            auth: None,
            transport: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Set the authentication strategy.
    #[must_use]
    pub fn auth<A: Authenticator + 'static>(self, auth: A) -> Self {
        self.shared_auth(Arc::new(auth))
    }

    /// Set an already shared authentication strategy.
    #[must_use]
    pub fn shared_auth(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Send requests through a custom transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpSend>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Request timeout for the default transport.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// User agent for the default transport.
    #[must_use]
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Config`] if no authentication strategy was
    /// set, the base URL is invalid, or the HTTP client cannot be built.
    pub fn build(self) -> Result<OpenProjectClient> {
        let auth = self.auth.ok_or_else(|| {
            OpenProjectError::Config("no authentication strategy configured".to_string())
        })?;
        let base_url = normalize_base_url(&self.base_url)?;

        let http: Arc<dyn HttpSend> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                Client::builder()
                    .user_agent(self.user_agent)
                    .brotli(true)
                    .gzip(true)
                    .deflate(true)
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| {
                        OpenProjectError::Config(format!("failed to build HTTP client: {e}"))
                    })?,
            ),
        };

        Ok(OpenProjectClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                auth,
            }),
        })
    }
}

/// Parse `base_url` and make sure it ends with `/`.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let with_slash = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };

    let url = Url::parse(&with_slash)
        .map_err(|e| OpenProjectError::Config(format!("invalid base URL '{base_url}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(OpenProjectError::Config(format!(
            "base URL '{base_url}' cannot be used as a base"
        )));
    }
    Ok(url)
}

/// Pick a strategy from `OPENPROJECT_*` variables. Empty values count as unset.
fn auth_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Arc<dyn Authenticator>> {
    let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(secret) = var("OPENPROJECT_JWT_SECRET") {
        let issuer = var("OPENPROJECT_JWT_ISSUER").ok_or_else(|| {
            OpenProjectError::Config(
                "OPENPROJECT_JWT_ISSUER must be set alongside OPENPROJECT_JWT_SECRET".to_string(),
            )
        })?;
        return Ok(Arc::new(JwtAuth::new(secret, &issuer)));
    }

    if let Some(key) = var("OPENPROJECT_API_KEY") {
        return Ok(Arc::new(BasicAuth::api_key(&key)));
    }

    match (var("OPENPROJECT_USERNAME"), var("OPENPROJECT_PASSWORD")) {
        (Some(user), Some(pass)) => match var("OPENPROJECT_AUTH_URL") {
            Some(auth_url) => Ok(Arc::new(CookieSessionAuth::new(&user, &pass, &auth_url)?)),
            None => Ok(Arc::new(BasicAuth::new(&user, &pass))),
        },
        _ => Err(OpenProjectError::Config(
            "no credentials found: set OPENPROJECT_API_KEY, OPENPROJECT_USERNAME and \
             OPENPROJECT_PASSWORD, or OPENPROJECT_JWT_SECRET and OPENPROJECT_JWT_ISSUER"
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    use super::*;
    use crate::transport::testing::ScriptedTransport;

    #[test]
    fn test_client_debug() {
        let client =
            OpenProjectClient::new("https://op.example.com", BasicAuth::new("admin", "hunter2"))
                .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("OpenProjectClient"));
        assert!(debug.contains("base_url"));
        // Password should not be in debug output
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 =
            OpenProjectClient::new("https://op.example.com/sub", BasicAuth::api_key("k")).unwrap();
        let client2 =
            OpenProjectClient::new("https://op.example.com/sub/", BasicAuth::api_key("k")).unwrap();
        assert_eq!(client1.base_url().as_str(), "https://op.example.com/sub/");
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_bad_base_url_is_config_error() {
        let result = OpenProjectClient::new("not a url", BasicAuth::api_key("k"));
        assert!(matches!(result, Err(OpenProjectError::Config(_))));

        let result = OpenProjectClient::new("mailto:ops@example.com", BasicAuth::api_key("k"));
        assert!(matches!(result, Err(OpenProjectError::Config(_))));
    }

    #[test]
    fn test_missing_auth_is_config_error() {
        let result = OpenProjectClient::builder("https://op.example.com").build();
        assert!(matches!(result, Err(OpenProjectError::Config(_))));
    }

    #[test]
    fn test_build_request_stays_below_base() {
        let client =
            OpenProjectClient::new("https://op.example.com/openproject", BasicAuth::api_key("k"))
                .unwrap();

        let request = client
            .build_request(Method::GET, "/api/v3/projects", None::<&()>)
            .unwrap();
        assert_eq!(request.url.as_str(), "https://op.example.com/openproject/api/v3/projects");
        assert!(request.body.is_none());
        assert!(request.headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_build_request_with_body() {
        let client =
            OpenProjectClient::new("https://op.example.com", BasicAuth::api_key("k")).unwrap();

        let request = client
            .build_request(Method::POST, "api/v3/projects", Some(&serde_json::json!({"name": "X"})))
            .unwrap();
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.body.as_deref(), Some(br#"{"name":"X"}"#.as_slice()));
    }

    #[tokio::test]
    async fn test_execute_attaches_credentials() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = OpenProjectClient::builder("https://op.example.com")
            .auth(BasicAuth::new("admin", "secret"))
            .transport(transport.clone())
            .build()
            .unwrap();

        client.get("api/v3/users/me").await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.headers[AUTHORIZATION], "Basic YWRtaW46c2VjcmV0");
    }

    #[tokio::test]
    async fn test_non_success_is_status_error() {
        let transport = Arc::new(ScriptedTransport::new().respond(403, r#"{"message":"nope"}"#));
        let client = OpenProjectClient::builder("https://op.example.com")
            .auth(BasicAuth::api_key("k"))
            .transport(transport)
            .build()
            .unwrap();

        let err = client.delete("api/v3/projects/1").await.unwrap_err();

        assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_handle_outlives_client_detached() {
        let client =
            OpenProjectClient::new("https://op.example.com", BasicAuth::api_key("k")).unwrap();
        let handle = client.handle(ResourceKind::Project);
        assert!(handle.client().is_ok());

        drop(client);
        assert!(matches!(handle.client(), Err(OpenProjectError::Dispatch(_))));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_auth_priority() {
        let auth = auth_from_vars(vars(&[
            ("OPENPROJECT_JWT_SECRET", "shh"),
            ("OPENPROJECT_JWT_ISSUER", "cli"),
            ("OPENPROJECT_API_KEY", "key"),
        ]))
        .unwrap();
        assert!(format!("{auth:?}").contains("JwtAuth"));

        let auth = auth_from_vars(vars(&[
            ("OPENPROJECT_API_KEY", "key"),
            ("OPENPROJECT_USERNAME", "admin"),
            ("OPENPROJECT_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert!(format!("{auth:?}").contains("apikey"));

        let auth = auth_from_vars(vars(&[
            ("OPENPROJECT_USERNAME", "admin"),
            ("OPENPROJECT_PASSWORD", "secret"),
            ("OPENPROJECT_AUTH_URL", "https://op.example.com/login"),
        ]))
        .unwrap();
        assert!(format!("{auth:?}").contains("CookieSessionAuth"));
    }

    #[test]
    fn test_env_auth_missing_or_partial() {
        let err = auth_from_vars(vars(&[("OPENPROJECT_API_KEY", "")])).unwrap_err();
        assert!(matches!(err, OpenProjectError::Config(_)));

        let err = auth_from_vars(vars(&[("OPENPROJECT_JWT_SECRET", "shh")])).unwrap_err();
        assert!(err.to_string().contains("OPENPROJECT_JWT_ISSUER"));
    }

    #[test]
    fn test_client_from_vars() {
        let client = OpenProjectClient::from_vars(vars(&[
            ("OPENPROJECT_URL", "https://op.example.com/openproject"),
            ("OPENPROJECT_USERNAME", "admin"),
            ("OPENPROJECT_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert_eq!(client.base_url().as_str(), "https://op.example.com/openproject/");

        let err =
            OpenProjectClient::from_vars(vars(&[("OPENPROJECT_API_KEY", "key")])).unwrap_err();
        assert!(err.to_string().contains("OPENPROJECT_URL"));

        let only_url = vars(&[("OPENPROJECT_URL", "https://op.example.com")]);
        let err = OpenProjectClient::from_vars(only_url).unwrap_err();
        assert!(matches!(err, OpenProjectError::Config(_)));
    }
}
