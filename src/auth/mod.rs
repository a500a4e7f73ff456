//! Authentication strategies.
//!
//! OpenProject accepts three incompatible ways of proving identity. Each is a
//! type implementing [`Authenticator`]; a client holds exactly one of them.
//!
//! - [`BasicAuth`] - HTTP Basic with a username/password or API key
//! - [`CookieSessionAuth`] - logs in once and replays the session cookies
//! - [`JwtAuth`] - signs every request with a short-lived HS256 token

mod basic;
mod jwt;
mod session;

pub use basic::BasicAuth;
pub use jwt::{canonical_request, query_string_hash, JwtAuth, JwtClaims, TOKEN_LIFETIME_SECS};
pub use session::{CookieSessionAuth, Session, SessionCookie};

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::transport::ApiRequest;

/// Attach credentials to an outgoing request.
///
/// Implementations must not mutate `request`; they return an authenticated
/// copy.
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Produce an authenticated copy of `request`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OpenProjectError::Auth`] when credentials cannot be
    /// obtained or signed.
    async fn attach(&self, request: &ApiRequest) -> Result<ApiRequest>;
}
