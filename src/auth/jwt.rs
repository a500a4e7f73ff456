//! Signed-token (JWT) authentication.
//!
//! Every request carries a fresh HS256 token whose `qsh` claim is the SHA-256
//! of the request's canonical form, binding the token to one method, path and
//! query string for [`TOKEN_LIFETIME_SECS`].

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use super::Authenticator;
use crate::error::{OpenProjectError, Result};
use crate::transport::ApiRequest;

/// Seconds between `iat` and `exp`.
pub const TOKEN_LIFETIME_SECS: i64 = 59;

/// Query parameter that carries a token in the URL; never part of the hash.
const TOKEN_PARAM: &str = "jwt";

/// Claims carried by every signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub qsh: String,
}

/// Shared-secret credentials that sign each request.
#[derive(Clone)]
pub struct JwtAuth {
    secret: Vec<u8>,
    issuer: String,
}

impl fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuth")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtAuth {
    /// Sign requests as `issuer` with the shared `secret`.
    pub fn new(secret: impl Into<Vec<u8>>, issuer: &str) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.to_string(),
        }
    }

    /// The issuer identity placed in the `iss` claim.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The claims for `method` + `url` issued at `issued_at` (Unix seconds).
    pub fn claims_at(&self, method: &Method, url: &Url, issued_at: i64) -> JwtClaims {
        JwtClaims {
            iss: self.issuer.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
            qsh: query_string_hash(method, url),
        }
    }

    /// Sign a token for `method` + `url` issued at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`OpenProjectError::Auth`] if signing fails.
    pub fn token_at(&self, method: &Method, url: &Url, issued_at: i64) -> Result<String> {
        let claims = self.claims_at(method, url, issued_at);
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| OpenProjectError::Auth(format!("error signing JWT: {e}")))
    }
}

#[async_trait]
impl Authenticator for JwtAuth {
    async fn attach(&self, request: &ApiRequest) -> Result<ApiRequest> {
        let token = self.token_at(&request.method, &request.url, Utc::now().timestamp())?;
        let mut value = HeaderValue::from_str(&format!("JWT {token}"))
            .map_err(|e| OpenProjectError::Auth(format!("invalid JWT header: {e}")))?;
        value.set_sensitive(true);

        let mut authed = request.clone();
        authed.headers.insert(AUTHORIZATION, value);
        Ok(authed)
    }
}

/// SHA-256 (lowercase hex) of the canonical request.
pub fn query_string_hash(method: &Method, url: &Url) -> String {
    let digest = Sha256::digest(canonical_request(method, url).as_bytes());
    format!("{digest:x}")
}

/// Canonical form `METHOD&/path&k1=v1&k2=v2` used for the `qsh` claim.
///
/// Query pairs are percent-encoded and sorted, values repeated under one key
/// are concatenated, and the `jwt` parameter is left out.
pub fn canonical_request(method: &Method, url: &Url) -> String {
    let raw_path = url.path();
    let decoded = urlencoding::decode(raw_path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| raw_path.to_string());
    let path = format!("/{}", decoded.trim_matches('/').replace('&', "%26"));

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        if key == TOKEN_PARAM {
            continue;
        }
        grouped
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    let mut pairs: Vec<String> = grouped
        .iter()
        .map(|(key, values)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&values.concat())
            )
        })
        .collect();
    pairs.sort();

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        path,
        pairs.join("&")
    )
}
