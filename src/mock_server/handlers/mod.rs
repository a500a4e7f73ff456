//! HTTP request handlers for the mock server.

pub mod auth;
pub mod projects;
pub mod statuses;
pub mod users;
pub mod work_packages;

pub use auth::*;
pub use projects::*;
pub use statuses::*;
pub use users::*;
pub use work_packages::*;

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::pagination::Collection;

/// Page size OpenProject uses when the request names none.
const DEFAULT_MOCK_PAGE_SIZE: u32 = 20;

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub offset: Option<u32>,
    pub page_size: Option<u32>,
    pub filters: Option<String>,
}

/// One decoded `filters` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub values: Vec<String>,
}

#[derive(Deserialize)]
struct WireCondition {
    operator: String,
    #[serde(default)]
    values: Vec<String>,
}

impl ListParams {
    /// Decode the `filters` parameter.
    pub fn conditions(&self) -> Result<Vec<Condition>, Response> {
        let Some(raw) = self.filters.as_deref() else {
            return Ok(Vec::new());
        };
        let parsed: Vec<BTreeMap<String, WireCondition>> = serde_json::from_str(raw)
            .map_err(|e| invalid_query(&format!("Filters are not valid JSON: {e}")))?;
        Ok(parsed
            .into_iter()
            .flatten()
            .map(|(field, c)| Condition {
                field,
                operator: c.operator,
                values: c.values,
            })
            .collect())
    }

    /// Slice `items` into the requested page.
    pub fn paginate<T: Clone + Serialize>(&self, items: Vec<&T>) -> Collection<T> {
        let offset = self.offset.unwrap_or(1).max(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_MOCK_PAGE_SIZE);
        let total = items.len() as u64;
        let start = (offset as usize - 1) * page_size as usize;
        let elements: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Collection::new(elements, total, page_size as u64, offset as u64)
    }
}

/// Match `actual` against one condition's operator and values.
pub fn matches(operator: &str, values: &[String], actual: &str) -> Option<bool> {
    let lowered = actual.to_lowercase();
    let result = match operator {
        "=" => values.iter().any(|v| v == actual),
        "!" | "<>" => values.iter().all(|v| v != actual),
        "**" | "~" => values.iter().any(|v| lowered.contains(&v.to_lowercase())),
        _ => return None,
    };
    Some(result)
}

/// An OpenProject error document.
pub fn error_response(status: StatusCode, identifier: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "_type": "Error",
            "errorIdentifier": format!("urn:openproject-org:api:v3:errors:{identifier}"),
            "message": message,
        })),
    )
        .into_response()
}

pub fn not_found(what: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "NotFound",
        &format!("The requested {what} could not be found."),
    )
}

pub fn invalid_query(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, "InvalidQuery", message)
}

/// Collection JSON with the `_type` marker OpenProject sends.
pub fn collection_response<T: Serialize>(collection: Collection<T>) -> Response {
    let mut body = match serde_json::to_value(&collection) {
        Ok(body) => body,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                &e.to_string(),
            )
        }
    };
    if let Some(object) = body.as_object_mut() {
        object.insert("_type".to_string(), "Collection".into());
    }
    (StatusCode::OK, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_decode() {
        let params = ListParams {
            filters: Some(r#"[{"status":{"operator":"=","values":["1"]}},{"subject":{"operator":"**","values":["api"]}}]"#.to_string()),
            ..Default::default()
        };

        let conditions = params.conditions().unwrap();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].field, "status");
        assert_eq!(conditions[1].operator, "**");
    }

    #[test]
    fn test_paginate_pages() {
        let items: Vec<u32> = (1..=25).collect();
        let params = ListParams {
            offset: Some(2),
            page_size: Some(10),
            filters: None,
        };

        let page = params.paginate(items.iter().collect());
        assert_eq!(page.elements(), &(11..=20).collect::<Vec<_>>()[..]);
        assert_eq!(page.total, 25);
        assert_eq!(page.count, 10);
        assert_eq!(page.offset, 2);
    }

    #[test]
    fn test_matches_operators() {
        let v = vec!["Api".to_string()];
        assert_eq!(matches("**", &v, "Develop API"), Some(true));
        assert_eq!(matches("=", &v, "Develop API"), Some(false));
        assert_eq!(matches("<>", &v, "Other"), Some(true));
        assert_eq!(matches(">=", &v, "x"), None);
    }
}
