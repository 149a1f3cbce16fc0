pub mod categories;
pub mod health;
pub mod products;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path,
    },
    http::{StatusCode, Uri},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Item routes, by resource. Anything under one of these prefixes that is
/// not a single integer segment is a bad id, not an unknown path.
const ITEM_PREFIXES: [(&str, &str); 2] = [
    ("/api/product/", products::RESOURCE),
    ("/api/category/", categories::RESOURCE),
];

/// Parses the `{id}` path segment of an item route.
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| AppError::invalid_id(resource))
}

/// Like [`parse_id`], but also reports segments that failed to percent-decode.
pub(crate) fn path_id(
    path: Result<Path<String>, PathRejection>,
    resource: &str,
) -> Result<i64, AppError> {
    match path {
        Ok(Path(raw)) => parse_id(&raw, resource),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected {resource} id.");
            Err(AppError::invalid_id(resource))
        }
    }
}

/// Decodes a JSON request body regardless of the `Content-Type` header.
///
/// A body over the size limit is 413; any other failure to read it (the
/// read timeout firing, the client going away) is 408.
pub(crate) fn decode_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, AppError> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(AppError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Failed to read request body.");
            return Err(AppError::RequestTimeout);
        }
    };
    serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body.");
        AppError::invalid_body()
    })
}

/// Fallback for any route that exists but not for the request's method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Fallback for paths no route matched.
///
/// `/api/product/` and `/api/product/1/extra` land here; they are answered
/// as an invalid id, the same as `/api/product/abc`.
pub async fn not_found(uri: Uri) -> AppError {
    let path = uri.path();
    ITEM_PREFIXES
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map(|(_, resource)| AppError::invalid_id(resource))
        .unwrap_or_else(|| AppError::NotFound("not found".to_string()))
}
