//! Cookie-session authentication.
//!
//! The first request performs a login exchange against the configured auth
//! URL and caches the cookies it sets. Later requests replay those cookies.
//! Expiry is not tracked: a stale session shows up as a 401 from the API
//! and is handed back to the caller, who may [`CookieSessionAuth::clear_session`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, COOKIE, SET_COOKIE};
use reqwest::Method;
use serde::Serialize;
use tokio::sync::Mutex;
use url::Url;

use super::Authenticator;
use crate::error::{OpenProjectError, Result};
use crate::response::ApiResponse;
use crate::transport::{ApiRequest, HttpSend};

/// Timeout for the login exchange.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(60);

/// A single cookie captured from the login response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

/// The cookies that make up an authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub cookies: Vec<SessionCookie>,
}

impl Session {
    /// Collect the cookies set by a login response.
    fn from_response(response: &ApiResponse) -> Self {
        let cookies = response
            .headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(parse_set_cookie)
            .collect();
        Self { cookies }
    }

    /// The `Cookie` header value, skipping cookies with empty values.
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|c| !c.value.is_empty())
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }
}

/// Take the `name=value` pair from a `Set-Cookie` header, dropping attributes.
fn parse_set_cookie(header: &str) -> Option<SessionCookie> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(SessionCookie {
        name: name.to_string(),
        value: value.trim().trim_matches('"').to_string(),
    })
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// Session-cookie credentials with a lazily acquired session.
pub struct CookieSessionAuth {
    username: String,
    password: String,
    auth_url: Url,
    transport: Arc<dyn HttpSend>,
    session: Mutex<Option<Session>>,
}

impl fmt::Debug for CookieSessionAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieSessionAuth")
            .field("username", &self.username)
            .field("auth_url", &self.auth_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CookieSessionAuth {
    /// Create session credentials that log in at `auth_url`.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Config`] if `auth_url` is not a valid URL
    /// or the login HTTP client cannot be built.
    pub fn new(username: &str, password: &str, auth_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(LOGIN_TIMEOUT)
            .build()
            .map_err(|e| OpenProjectError::Config(format!("failed to build login client: {e}")))?;
        Self::with_transport(username, password, auth_url, Arc::new(http))
    }

    /// Create session credentials that log in through a custom transport.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Config`] if `auth_url` is not a valid URL.
    pub fn with_transport(
        username: &str,
        password: &str,
        auth_url: &str,
        transport: Arc<dyn HttpSend>,
    ) -> Result<Self> {
        let auth_url = Url::parse(auth_url).map_err(|e| {
            OpenProjectError::Config(format!("invalid auth URL '{auth_url}': {e}"))
        })?;
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
            auth_url,
            transport,
            session: Mutex::new(None),
        })
    }

    /// The login endpoint.
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    /// Whether a session is currently cached.
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Drop the cached session so the next request logs in again.
    pub async fn clear_session(&self) {
        *self.session.lock().await = None;
    }

    /// Return the cached session, logging in first if there is none.
    ///
    /// The lock is held across the login so concurrent first callers share
    /// a single exchange.
    pub async fn ensure_session(&self) -> Result<Session> {
        let mut cached = self.session.lock().await;
        if let Some(session) = cached.as_ref() {
            return Ok(session.clone());
        }

        let session = self.login().await?;
        *cached = Some(session.clone());
        Ok(session)
    }

    #[tracing::instrument(skip(self), fields(username = %self.username, auth_url = %self.auth_url))]
    async fn login(&self) -> Result<Session> {
        let request = ApiRequest::new(Method::POST, self.auth_url.clone()).with_json(&LoginBody {
            username: &self.username,
            password: &self.password,
        })?;

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| OpenProjectError::Auth(format!("login request failed: {e}")))?;

        if !response.is_success() {
            return Err(OpenProjectError::Auth(format!(
                "login rejected with status {}",
                response.status
            )));
        }

        let session = Session::from_response(&response);
        if session.cookie_header().is_none() {
            return Err(OpenProjectError::Auth(
                "login response did not set any session cookies".to_string(),
            ));
        }

        tracing::debug!(cookies = session.cookies.len(), "session established");
        Ok(session)
    }
}

#[async_trait]
impl Authenticator for CookieSessionAuth {
    async fn attach(&self, request: &ApiRequest) -> Result<ApiRequest> {
        let session = self
            .ensure_session()
            .await
            .map_err(|e| match e {
                OpenProjectError::Auth(_) => e,
                other => {
                    OpenProjectError::Auth(format!("no session could be established: {other}"))
                }
            })?;

        let mut authed = request.clone();
        if let Some(cookies) = session.cookie_header() {
            let mut value = HeaderValue::from_str(&cookies)
                .map_err(|e| OpenProjectError::Auth(format!("invalid session cookie: {e}")))?;
            value.set_sensitive(true);
            authed.headers.insert(COOKIE, value);
        }
        Ok(authed)
    }
}
