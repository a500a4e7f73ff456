//! Work package endpoint handlers.

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
use crate::WorkPackage;

fn link_id(wp: &WorkPackage, name: &str) -> String {
    crate::link(&wp.links, name)
        .and_then(|l| l.id().map(str::to_string))
        .unwrap_or_default()
}

/// GET /api/v3/work_packages/{id}
pub async fn get_work_package(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.work_packages.get(&id) {
        Some(wp) => (StatusCode::OK, Json(wp.clone())).into_response(),
        None => not_found("work package"),
    }
}

/// GET /api/v3/work_packages
///
/// Supports `subject`, `status` and `project` filters.
pub async fn list_work_packages(
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
    for wp in state.work_packages.values() {
        let mut keep = true;
        for c in &conditions {
            let actual = match c.field.as_str() {
                "subject" => wp.subject.clone(),
                "status" => link_id(wp, "status"),
                "project" => link_id(wp, "project"),
                other => return invalid_query(&format!("Filter '{other}' does not exist.")),
            };
            match matches(&c.operator, &c.values, &actual) {
                Some(hit) => keep &= hit,
                None => {
                    return invalid_query(&format!("Operator '{}' is not supported.", c.operator))
                }
            }
        }
        if keep {
            selected.push(wp);
        }
    }

    collection_response(params.paginate(selected))
}

/// POST /api/v3/projects/{project}/work_packages
pub async fn create_work_package(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(project): Path<String>,
    Json(mut draft): Json<WorkPackage>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let Some(project) = state.find_project(&project).cloned() else {
        return not_found("project");
    };
    if draft.subject.trim().is_empty() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "PropertyConstraintViolation",
            "Subject can't be blank.",
        );
    }

    let now = Timestamp::now();
    draft.id = state.next_id();
    draft.resource_type = "WorkPackage".to_string();
    draft.lock_version = 0;
    draft.created_at = Some(now);
    draft.updated_at = Some(now);
    let self_href = format!("/api/v3/work_packages/{}", draft.id);
    let project_href = format!("/api/v3/projects/{}", project.id);
    draft.links.insert(
        "self".to_string(),
        serde_json::json!({ "href": self_href, "title": draft.subject }),
    );
    draft.links.insert(
        "project".to_string(),
        serde_json::json!({ "href": project_href, "title": project.name }),
    );
    draft
        .links
        .entry("status".to_string())
        .or_insert_with(|| serde_json::json!({ "href": "/api/v3/statuses/1", "title": "New" }));

    state.work_packages.insert(draft.id, draft.clone());
    (StatusCode::CREATED, Json(draft)).into_response()
}

/// DELETE /api/v3/work_packages/{id}
pub async fn delete_work_package(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.work_packages.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("work package"),
    }
}
