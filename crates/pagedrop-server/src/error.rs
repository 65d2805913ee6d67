use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use pagedrop_records::RecordError;
use pagedrop_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("no content stored for {0}")]
    ContentNotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("record error: {0}")]
    Records(#[from] RecordError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PageNotFound(_) | Self::ContentNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(e) => match e {
                StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
                StoreError::Type(_) => StatusCode::BAD_REQUEST,
                StoreError::BackendUnavailable(_) | StoreError::Io(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                StoreError::Rejected(_)
                | StoreError::PartialWrite { .. }
                | StoreError::Truncated { .. }
                | StoreError::Config(_)
                | StoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Records(e) => match e {
                RecordError::NotFound(_) => StatusCode::NOT_FOUND,
                RecordError::DuplicateIdentifier(_) => StatusCode::CONFLICT,
                RecordError::InvalidField { .. } => StatusCode::BAD_REQUEST,
                RecordError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pagedrop_types::Identifier;

    fn id() -> Identifier {
        Identifier::new("abc123").unwrap()
    }

    #[test]
    fn not_found_and_unavailable_map_differently() {
        assert_eq!(
            ServerError::ContentNotFound("abc123".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(StoreError::BackendUnavailable("down".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn write_failures_are_server_errors() {
        let partial = StoreError::PartialWrite {
            id: id(),
            reason: "reset".into(),
        };
        assert_eq!(
            ServerError::from(partial).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let corrupt = StoreError::Serialization("bad unit line".into());
        assert_eq!(
            ServerError::from(corrupt).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let rejected = StoreError::Rejected("unit too large".into());
        assert_eq!(
            ServerError::from(rejected).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn record_errors_map() {
        assert_eq!(
            ServerError::from(RecordError::DuplicateIdentifier(id())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn response_carries_json_error() {
        let response = ServerError::PageNotFound("p1".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }
}
