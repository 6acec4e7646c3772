use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// The errors that may surface from any API operation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input the caller can correct.
    #[error("{0}")]
    Validation(String),

    /// Uniqueness conflict, in practice always the email address.
    #[error("{0}")]
    Duplicate(String),

    /// No matching resource owned by the caller. Also returned for ids that
    /// exist under another owner, so existence is never disclosed.
    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid or expired credential or token.
    #[error("{0}")]
    Auth(String),

    /// Unexpected failure from a collaborator. The cause is logged server
    /// side and never sent to the caller.
    #[error("server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            // The only unique constraint in the schema is users.email.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::Duplicate("Email already registered".into())
            }
            error => {
                error!(error = %error, "unhandled database error");
                ApiError::Internal(error.into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(cause) => {
                error!(error = %cause, "internal error");
                "Server error".to_string()
            }
            error => error.to_string(),
        };
        (self.status(), Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_status_codes() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Duplicate("taken".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Auth("nope".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let response = ApiError::Internal(anyhow::anyhow!("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
