//! User endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{
    authorize, collection_response, error_response, invalid_query, matches, not_found, ListParams,
};
use crate::codec::Timestamp;
use crate::mock_server::state::SharedState;
use crate::User;

/// GET /api/v3/users/{id}
pub async fn get_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.users.get(&id) {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => not_found("user"),
    }
}

/// GET /api/v3/users
///
/// Supports `status` and `login` filters.
pub async fn list_users(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let conditions = match params.conditions() {
        Ok(c) => c,
        Err(bad) => return bad,
    };

    let mut selected = Vec::new();
    'users: for user in state.users.values() {
        for c in &conditions {
            let actual = match c.field.as_str() {
                "status" => &user.status,
                "login" => &user.login,
                other => return invalid_query(&format!("Filter '{other}' does not exist.")),
            };
            match matches(&c.operator, &c.values, actual) {
                Some(true) => {}
                Some(false) => continue 'users,
                None => {
                    return invalid_query(&format!("Operator '{}' is not supported.", c.operator))
                }
            }
        }
        selected.push(user);
    }

    collection_response(params.paginate(selected))
}

/// POST /api/v3/users
pub async fn create_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(mut draft): Json<User>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    if draft.login.is_empty() || draft.email.is_empty() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "PropertyConstraintViolation",
            "Login and email can't be blank.",
        );
    }

    let now = Timestamp::now();
    draft.id = state.next_id();
    draft.resource_type = "User".to_string();
    draft.name = format!("{} {}", draft.first_name, draft.last_name).trim().to_string();
    draft.password = None;
    if draft.status.is_empty() {
        draft.status = "active".to_string();
    }
    draft.created_at = Some(now);
    draft.updated_at = Some(now);
    state.users.insert(draft.id, draft.clone());
    (StatusCode::CREATED, Json(draft)).into_response()
}

/// DELETE /api/v3/users/{id}
pub async fn delete_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.users.remove(&id) {
        Some(_) => StatusCode::ACCEPTED.into_response(),
        None => not_found("user"),
    }
}
