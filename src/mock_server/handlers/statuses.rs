//! Status endpoint handlers. Statuses are read-only.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, collection_response, not_found, ListParams};
use crate::mock_server::state::SharedState;

/// GET /api/v3/statuses/{id}
pub async fn get_status(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.statuses.get(&id) {
        Some(status) => (StatusCode::OK, Json(status.clone())).into_response(),
        None => not_found("status"),
    }
}

/// GET /api/v3/statuses
pub async fn list_statuses(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    collection_response(params.paginate(state.statuses.values().collect()))
}
