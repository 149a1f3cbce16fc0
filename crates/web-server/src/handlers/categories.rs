use crate::{error::AppError, handlers, response::ApiResponse, AppState};
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
};
use core_types::Category;
use std::sync::Arc;

pub(crate) const RESOURCE: &str = "category";

/// # GET /api/category
pub async fn list(State(state): State<Arc<AppState>>) -> Result<ApiResponse<Vec<Category>>, AppError> {
    let categories = state
        .categories
        .get_all()
        .await
        .map_err(|e| AppError::from_read(e, RESOURCE))?;
    Ok(ApiResponse::ok(categories))
}

/// # POST /api/category
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse<Category>, AppError> {
    let mut category: Category = handlers::decode_body(body)?;
    state
        .categories
        .create(&mut category)
        .await
        .map_err(|e| AppError::from_write(e, RESOURCE))?;

    tracing::info!(category_id = category.id, "Category created.");
    Ok(ApiResponse::created(category))
}

/// # GET /api/category/:id
pub async fn get(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Category>, AppError> {
    let id = handlers::path_id(id, RESOURCE)?;
    let category = state
        .categories
        .get_by_id(id)
        .await
        .map_err(|e| AppError::from_read(e, RESOURCE))?;
    Ok(ApiResponse::ok(category))
}

/// # PUT /api/category/:id
pub async fn update(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse<Category>, AppError> {
    let id = handlers::path_id(id, RESOURCE)?;
    let mut category: Category = handlers::decode_body(body)?;
    category.id = id;

    state
        .categories
        .update(&category)
        .await
        .map_err(|e| AppError::from_write(e, RESOURCE))?;
    Ok(ApiResponse::ok(category))
}

/// # DELETE /api/category/:id
/// A category that products still point at cannot be removed (409).
pub async fn delete(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<()>, AppError> {
    let id = handlers::path_id(id, RESOURCE)?;
    state
        .categories
        .delete(id)
        .await
        .map_err(|e| AppError::from_delete(e, RESOURCE))?;

    tracing::info!(category_id = id, "Category deleted.");
    Ok(ApiResponse::empty())
}

pub async fn item_fallback(id: Result<Path<String>, PathRejection>) -> AppError {
    match handlers::path_id(id, RESOURCE) {
        Ok(_) => AppError::MethodNotAllowed,
        Err(e) => e,
    }
}
