use crate::{error::AppError, handlers, response::ApiResponse, AppState};
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
};
use core_types::Product;
use std::sync::Arc;

pub(crate) const RESOURCE: &str = "product";

/// # GET /api/product
pub async fn list(State(state): State<Arc<AppState>>) -> Result<ApiResponse<Vec<Product>>, AppError> {
    let products = state
        .products
        .get_all()
        .await
        .map_err(|e| AppError::from_read(e, RESOURCE))?;
    Ok(ApiResponse::ok(products))
}

/// # POST /api/product
/// Responds 201 with the stored record, including its new id.
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse<Product>, AppError> {
    let mut product: Product = handlers::decode_body(body)?;
    state
        .products
        .create(&mut product)
        .await
        .map_err(|e| AppError::from_write(e, RESOURCE))?;

    tracing::info!(product_id = product.id, "Product created.");
    Ok(ApiResponse::created(product))
}

/// # GET /api/product/:id
pub async fn get(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Product>, AppError> {
    let id = handlers::path_id(id, RESOURCE)?;
    let product = state
        .products
        .get_by_id(id)
        .await
        .map_err(|e| AppError::from_read(e, RESOURCE))?;
    Ok(ApiResponse::ok(product))
}

/// # PUT /api/product/:id
/// Full replacement. The id in the path wins over any id in the body.
pub async fn update(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse<Product>, AppError> {
    let id = handlers::path_id(id, RESOURCE)?;
    let mut product: Product = handlers::decode_body(body)?;
    product.id = id;

    state
        .products
        .update(&product)
        .await
        .map_err(|e| AppError::from_write(e, RESOURCE))?;
    Ok(ApiResponse::ok(product))
}

/// # DELETE /api/product/:id
pub async fn delete(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<()>, AppError> {
    let id = handlers::path_id(id, RESOURCE)?;
    state
        .products
        .delete(id)
        .await
        .map_err(|e| AppError::from_delete(e, RESOURCE))?;

    tracing::info!(product_id = id, "Product deleted.");
    Ok(ApiResponse::empty())
}

/// Method fallback for `/api/product/:id`: a bad id is reported before the method.
pub async fn item_fallback(id: Result<Path<String>, PathRejection>) -> AppError {
    match handlers::path_id(id, RESOURCE) {
        Ok(_) => AppError::MethodNotAllowed,
        Err(e) => e,
    }
}
