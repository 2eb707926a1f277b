//! API error type and its JSON envelope.
//!
//! Every failure is answered with `{"success": false, "error": <code>, "message": <text>}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pagination::PageOutOfRange;
use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{resource} #{id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("the requested URL was not found on the server")]
    UnknownRoute,

    #[error("the method is not allowed for the requested URL")]
    MethodNotAllowed,

    #[error(transparent)]
    PageOutOfRange(#[from] PageOutOfRange),

    #[error("{0}")]
    Unprocessable(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::UnknownRoute | Self::PageOutOfRange(_) => {
                StatusCode::NOT_FOUND
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable(_) | Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Database(e) => {
                tracing::error!("Database error: {e}");
                "Internal server error".to_owned()
            }
            other => {
                tracing::info!("Request failed with {status}: {other}");
                other.to_string()
            }
        };
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Unprocessable(rejection.body_text())
    }
}

// `/questions/abc` is treated like any other unknown route
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::UnknownRoute
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = ApiError::not_found("Question", 666).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 404);
        assert_eq!(body["message"], "Question #666 not found");
    }

    #[tokio::test]
    async fn page_out_of_range_is_404() {
        let err = ApiError::from(PageOutOfRange {
            page: 300,
            per_page: 10,
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unprocessable_is_422() {
        let response = ApiError::unprocessable("Category 27642 does not exist").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body(response).await["success"], false);
    }

    #[tokio::test]
    async fn invalid_fields_are_422() {
        let response = ApiError::from(ValidationError::Empty { field: "answer" }).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body(response).await["message"], "answer can not be empty");
    }

    #[tokio::test]
    async fn method_not_allowed_is_405() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body = body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 405);
    }

    #[tokio::test]
    async fn database_errors_are_not_leaked() {
        let response = ApiError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body(response).await;
        assert_eq!(body["error"], 500);
        assert_eq!(body["message"], "Internal server error");
    }
}
