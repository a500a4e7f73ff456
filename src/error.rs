//! Error types for OpenProject API operations.

use reqwest::StatusCode;
use thiserror::Error;

use crate::response::ApiResponse;

/// Errors that can occur during OpenProject API operations.
#[derive(Debug, Error)]
pub enum OpenProjectError {
    /// Configuration is missing or invalid (for example a bad base URL).
    #[error("OpenProject configuration error: {0}")]
    Config(String),

    /// The request could not be built before sending.
    #[error("Invalid request: {0}")]
    Request(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Credentials could not be attached (login exchange or token signing failed).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The server answered with a status outside 200-299.
    ///
    /// The raw response is kept so the caller can inspect the body.
    #[error("OpenProject API error ({status}){}", error_message(.response))]
    Status {
        status: StatusCode,
        response: Box<ApiResponse>,
    },

    /// A response body did not match the expected shape.
    #[error("Failed to parse response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        response: Option<Box<ApiResponse>>,
    },

    /// The resource handle could not be resolved to a client or result type.
    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

impl OpenProjectError {
    /// The raw response attached to this error, if the server was reached.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Status { response, .. } => Some(response.as_ref()),
            Self::Decode { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status code, if the server was reached.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status)
    }

    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl From<serde_json::Error> for OpenProjectError {
    fn from(source: serde_json::Error) -> Self {
        Self::Decode {
            source,
            response: None,
        }
    }
}

/// Pull the `message` out of an OpenProject error document, if there is one.
fn error_message(response: &ApiResponse) -> String {
    serde_json::from_slice::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .map(|msg| format!(": {msg}"))
        .unwrap_or_default()
}

/// Result type alias for OpenProject operations.
pub type Result<T> = core::result::Result<T, OpenProjectError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_status_error_includes_server_message() {
        let err = OpenProjectError::Status {
            status: StatusCode::NOT_FOUND,
            response: Box::new(response(
                404,
                r#"{"_type":"Error","errorIdentifier":"urn:openproject-org:api:v3:errors:NotFound","message":"The requested resource could not be found."}"#,
            )),
        };

        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("could not be found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_error_with_plain_body() {
        let err = OpenProjectError::Status {
            status: StatusCode::BAD_GATEWAY,
            response: Box::new(response(502, "upstream down")),
        };

        assert_eq!(err.to_string(), "OpenProject API error (502 Bad Gateway)");
        assert_eq!(err.response().unwrap().text(), "upstream down");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_dispatch_error_has_no_response() {
        let err = OpenProjectError::Dispatch("client not identified".to_string());
        assert!(err.response().is_none());
        assert!(err.status().is_none());
    }
}
