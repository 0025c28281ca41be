//! Response bodies and error-to-status mapping.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use keybridge_common::Error;
use keybridge_vault::Entry;

/// Matched entry for the client.
///
/// Absent fields serialize as empty strings so the body shape is stable
/// regardless of which fields an entry carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    pub username: String,
    pub title: String,
    pub password: String,
    pub url: String,
}

impl EntryResponse {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            username: entry.username().unwrap_or_default().to_string(),
            title: entry.title().unwrap_or_default().to_string(),
            password: entry.password().unwrap_or_default().to_string(),
            url: entry.url().unwrap_or_default().to_string(),
        }
    }
}

/// Body of a successful reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error as the transport reports it: a status code plus a message body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// An internal failure that is not a store error (e.g. a lost
    /// background task).
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidCriteria(_) => StatusCode::BAD_REQUEST,
            Error::EntryNotFound => StatusCode::NOT_FOUND,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Io(_) | Error::Format(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                Error::InvalidCriteria("empty".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (Error::EntryNotFound, StatusCode::NOT_FOUND),
            (
                Error::Auth("rejected".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                Error::Format("bad magic".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                Error::Io(std::io::Error::from(std::io::ErrorKind::NotFound)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_entry_response_fills_missing_fields() {
        let mut fields = HashMap::new();
        fields.insert("UserName".to_string(), "alice".to_string());
        let entry = Entry::new(fields);

        let body = EntryResponse::from_entry(&entry);
        assert_eq!(body.username, "alice");
        assert_eq!(body.title, "");
        assert_eq!(body.password, "");
        assert_eq!(body.url, "");
    }
}
