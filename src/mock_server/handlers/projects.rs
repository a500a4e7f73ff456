//! Project endpoint handlers.

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
use crate::Project;

/// GET /api/v3/projects/{id}
///
/// Accepts the numeric ID or the identifier.
pub async fn get_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.find_project(&key) {
        Some(project) => (StatusCode::OK, Json(project.clone())).into_response(),
        None => not_found("project"),
    }
}

/// GET /api/v3/projects
///
/// Supports `name_and_identifier` and `active` filters.
pub async fn list_projects(
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
    'projects: for project in state.projects.values() {
        for c in &conditions {
            let hit = match c.field.as_str() {
                "name_and_identifier" => matches(&c.operator, &c.values, &project.name)
                    .zip(matches(&c.operator, &c.values, &project.identifier))
                    .map(|(a, b)| a || b),
                "active" => matches(&c.operator, &c.values, if project.active { "t" } else { "f" }),
                other => return invalid_query(&format!("Filter '{other}' does not exist.")),
            };
            match hit {
                Some(true) => {}
                Some(false) => continue 'projects,
                None => {
                    return invalid_query(&format!("Operator '{}' is not supported.", c.operator))
                }
            }
        }
        selected.push(project);
    }

    collection_response(params.paginate(selected))
}

/// POST /api/v3/projects
pub async fn create_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(mut draft): Json<Project>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    if draft.name.trim().is_empty() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "PropertyConstraintViolation",
            "Name can't be blank.",
        );
    }
    if draft.identifier.is_empty() {
        draft.identifier = draft.name.to_lowercase().replace(' ', "-");
    }
    if state.find_project(&draft.identifier).is_some() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "PropertyConstraintViolation",
            "Identifier has already been taken.",
        );
    }

    let now = Timestamp::now();
    draft.id = state.next_id();
    draft.resource_type = "Project".to_string();
    draft.created_at = Some(now);
    draft.updated_at = Some(now);
    state.projects.insert(draft.id, draft.clone());
    (StatusCode::CREATED, Json(draft)).into_response()
}

/// DELETE /api/v3/projects/{id}
pub async fn delete_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.remove_project(&key) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("project"),
    }
}
