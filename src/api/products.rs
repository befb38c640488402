use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use super::{AdminUser, ApiError, ApiJson, AppState};
use crate::clients::ProductQuery;
use crate::domain::{ProductCreate, ProductPatch};

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    let products = state.products.list_products(query).await?;
    Ok(Json(json!({ "success": true, "count": products.len(), "data": products })))
}

pub async fn featured(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let query = ProductQuery { featured: Some(true), ..Default::default() };
    let products = state.products.list_products(query).await?;
    Ok(Json(json!({ "success": true, "count": products.len(), "data": products })))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let product = state.products.resolve(id).await?;
    Ok(Json(json!({ "success": true, "data": product })))
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ApiJson(body): ApiJson<ProductCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.products.create_product(body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": product }))))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Value>, ApiError> {
    let product = state.products.update_product(id, patch).await?;
    Ok(Json(json!({ "success": true, "data": product })))
}

pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.products.delete_product(id).await?;
    Ok(Json(json!({ "success": true, "message": "Product removed" })))
}
