use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Generic message body, used for 500 and not-found responses
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Error type shared by the blog endpoints.
///
/// Validation problems become 400 with a plain text body, a missing record
/// becomes 204 with a JSON message, and store failures are logged and
/// collapsed into a generic 500.
#[derive(Debug)]
pub enum ApiError {
    /// Required field absent from the request body
    MissingField(&'static str),
    /// Path id and body id disagree, or body id is absent
    IdMismatch { path_id: String, body_id: Option<String> },
    /// No record with this id
    NotFound(String),
    /// The store holds no records at all
    Empty,
    /// Body was not JSON of the expected shape
    JsonError(serde_json::Error),
    /// Body could not be read as JSON at all (bad syntax, wrong content type)
    BodyRejected(JsonRejection),
    /// Document store failure
    DatabaseError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingField(field) => {
                let message = format!("Missing `{}` in request body", field);
                tracing::error!("{}", message);
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::IdMismatch { path_id, body_id } => {
                let message = format!(
                    "Request path id ({}) and request body id ({}) must match",
                    path_id,
                    body_id.as_deref().unwrap_or("missing")
                );
                tracing::error!("{}", message);
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::JsonError(err) => {
                let message = format!("Invalid request body: {}", err);
                tracing::error!("{}", message);
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::BodyRejected(rejection) => {
                let message = format!("Invalid request body: {}", rejection.body_text());
                tracing::error!("{}", message);
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::NotFound(id) => (
                StatusCode::NO_CONTENT,
                Json(MessageResponse {
                    message: format!("Record {} not found", id),
                }),
            )
                .into_response(),
            ApiError::Empty => (
                StatusCode::NO_CONTENT,
                Json(MessageResponse {
                    message: "No records found".to_string(),
                }),
            )
                .into_response(),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageResponse {
                        message: "Internal Server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BodyRejected(rejection)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonError(err)
    }
}
