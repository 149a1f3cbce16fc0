use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::AppError;

/// The JSON wrapper around every API response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: Option<T>,
}

/// A successful response: a status code plus an [`Envelope`].
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self { status, envelope: Envelope { message: message.into(), data } }
    }

    /// 200 with `data`.
    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, "success", Some(data))
    }

    /// 201 with the newly created record.
    pub fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED, "success", Some(data))
    }
}

impl ApiResponse<()> {
    /// 200 with `data: null`.
    pub fn empty() -> Self {
        Self::new(StatusCode::OK, "success", None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

/// Wraps error responses that carry no JSON body (the 408 from the handler
/// timeout, for instance) in the envelope.
pub async fn envelope_bare_errors(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }
    AppError::from_status(status).into_response()
}
