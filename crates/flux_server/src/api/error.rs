//! HTTP error responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use crate::ServiceError;

/// Error returned by a handler, rendered as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message carried in the response body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Database(_) | ServiceError::Engine(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match err {
            ServiceError::InvalidRequest(msg) | ServiceError::Conflict(msg) => msg,
            // Internal details stay in the logs.
            ServiceError::Database(ref db) => {
                error!(error = %db, "Database failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        Self::new(status, message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "Blocking task failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, message = %self.message, "Request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_board::PlayError;

    #[test]
    fn test_service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("User".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                ServiceError::Database(crate::DbError::new("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_play_errors_map_through_service_error() {
        let no_moves = ApiError::from(ServiceError::from(PlayError::NoMovesRemaining));
        assert_eq!(no_moves.status(), StatusCode::CONFLICT);

        let not_adjacent =
            ApiError::from(ServiceError::from(PlayError::NotAdjacent { from: 0, to: 2 }));
        assert_eq!(not_adjacent.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = ApiError::from(ServiceError::Database(crate::DbError::new("secret path")));
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_not_found_names_the_resource() {
        let err = ApiError::from(ServiceError::NotFound("Game state".into()));
        assert_eq!(err.message(), "Game state not found");
    }
}
