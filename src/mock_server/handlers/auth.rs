//! Login endpoint and request authorization.

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use super::error_response;
use crate::mock_server::state::{MockState, SharedState, SESSION_COOKIE};

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

/// POST /login
pub async fn login(State(state): State<SharedState>, Json(params): Json<LoginParams>) -> Response {
    let mut state = state.write().await;
    if !state.accepts(&params.username, &params.password) {
        return unauthenticated();
    }

    let token = state.open_session();
    tracing::debug!(username = %params.username, "mock login");
    (
        StatusCode::OK,
        [(
            SET_COOKIE,
            format!("{SESSION_COOKIE}={token}; path=/; HttpOnly; SameSite=Lax"),
        )],
        Json(serde_json::json!({ "login": params.username })),
    )
        .into_response()
}

fn unauthenticated() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        "Unauthenticated",
        "You need to be authenticated to access this resource.",
    )
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// Accept basic credentials or a session cookie when credentials are required.
pub fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    if state.credentials.is_none() {
        return Ok(());
    }
    if let Some((user, pass)) = basic_credentials(headers) {
        if state.accepts(&user, &pass) {
            return Ok(());
        }
    }
    if let Some(token) = session_token(headers) {
        if state.sessions.contains(&token) {
            return Ok(());
        }
    }
    Err(unauthenticated())
}
