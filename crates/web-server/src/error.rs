use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use thiserror::Error;

use crate::response::Envelope;
use crate::services::ServiceError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Unparsable id, undecodable body, or a rejected business rule.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("request timeout")]
    RequestTimeout,
    #[error("request body too large")]
    PayloadTooLarge,
    /// The write would leave dangling references behind.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_id(resource: &str) -> Self {
        AppError::BadRequest(format!("invalid {resource} id"))
    }

    pub fn invalid_body() -> Self {
        AppError::BadRequest("invalid request body".to_string())
    }

    /// Classifies an error from a read (list or fetch by id).
    pub fn from_read(err: ServiceError, resource: &str) -> Self {
        match err {
            ServiceError::Database(DbError::NotFound) => {
                AppError::NotFound(format!("{resource} not found"))
            }
            other => internal(other, format!("failed to fetch {resource}")),
        }
    }

    /// Classifies an error from a create or a full update.
    pub fn from_write(err: ServiceError, resource: &str) -> Self {
        match err {
            ServiceError::Validation(e) => AppError::BadRequest(e.to_string()),
            ServiceError::Database(DbError::NotFound) => {
                AppError::NotFound(format!("{resource} not found"))
            }
            ServiceError::Database(DbError::ForeignKeyViolation(_)) => {
                AppError::BadRequest("category not found".to_string())
            }
            ServiceError::Database(DbError::ConstraintViolation(detail)) => {
                tracing::warn!(%detail, "Rejected {resource} write.");
                AppError::BadRequest(format!("invalid {resource}"))
            }
            other => internal(other, format!("failed to save {resource}")),
        }
    }

    /// Classifies an error from a delete.
    pub fn from_delete(err: ServiceError, resource: &str) -> Self {
        match err {
            ServiceError::Database(DbError::NotFound) => {
                AppError::NotFound(format!("{resource} not found"))
            }
            ServiceError::Database(DbError::ForeignKeyViolation(_)) => {
                AppError::Conflict(format!("{resource} is still referenced by other records"))
            }
            other => internal(other, format!("failed to delete {resource}")),
        }
    }

    /// Rebuilds an error from a bare status, e.g. one produced by middleware.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => AppError::NotFound("not found".to_string()),
            StatusCode::METHOD_NOT_ALLOWED => AppError::MethodNotAllowed,
            StatusCode::REQUEST_TIMEOUT => AppError::RequestTimeout,
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
            s if s.is_client_error() => AppError::BadRequest("bad request".to_string()),
            _ => AppError::Internal("internal server error".to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// The underlying error stays in the logs; clients only see `message`.
fn internal(err: ServiceError, message: String) -> AppError {
    tracing::error!(error = ?err, "{message}");
    AppError::Internal(message)
}

/// Converts our custom `AppError` into an enveloped HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Envelope::<()> { message: self.to_string(), data: None };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;
    use database::mock::unavailable_error;

    #[test]
    fn write_errors_are_classified() {
        let validation = AppError::from_write(CoreError::MissingField("category_id").into(), "product");
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.to_string(), "category_id is required");

        let dangling = AppError::from_write(
            DbError::ForeignKeyViolation("fk_products_category".into()).into(),
            "product",
        );
        assert_eq!(dangling.status(), StatusCode::BAD_REQUEST);

        let constraint = AppError::from_write(
            DbError::ConstraintViolation("new row violates check constraint \"products_price_check\"".into())
                .into(),
            "product",
        );
        assert_eq!(constraint.status(), StatusCode::BAD_REQUEST);
        assert_eq!(constraint.to_string(), "invalid product");

        let missing = AppError::from_write(DbError::NotFound.into(), "product");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "product not found");

        let broken = AppError::from_write(unavailable_error().into(), "product");
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn delete_errors_are_classified() {
        let missing = AppError::from_delete(DbError::NotFound.into(), "category");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let referenced =
            AppError::from_delete(DbError::ForeignKeyViolation("fk".into()).into(), "category");
        assert_eq!(referenced.status(), StatusCode::CONFLICT);

        let broken = AppError::from_delete(unavailable_error().into(), "category");
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(broken.to_string(), "failed to delete category");
    }

    #[test]
    fn bare_statuses_are_mapped() {
        let cases = [
            (StatusCode::NOT_FOUND, StatusCode::NOT_FOUND, "not found"),
            (StatusCode::METHOD_NOT_ALLOWED, StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
            (StatusCode::REQUEST_TIMEOUT, StatusCode::REQUEST_TIMEOUT, "request timeout"),
            (StatusCode::PAYLOAD_TOO_LARGE, StatusCode::PAYLOAD_TOO_LARGE, "request body too large"),
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, StatusCode::BAD_REQUEST, "bad request"),
            (StatusCode::SERVICE_UNAVAILABLE, StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        ];
        for (bare, status, message) in cases {
            let err = AppError::from_status(bare);
            assert_eq!(err.status(), status, "{bare}");
            assert_eq!(err.to_string(), message, "{bare}");
        }
    }
}
