use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use super::{ApiError, AppState, AuthUser};

pub async fn show(State(state): State<AppState>, AuthUser(user): AuthUser) -> Result<Json<Value>, ApiError> {
    let wishlist = state.wishlists.wishlist_for(user.id).await?;
    Ok(Json(json!({ "success": true, "data": wishlist })))
}

pub async fn add(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let wishlist = state.wishlists.add(user.id, product_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Product added to wishlist", "data": wishlist })),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let wishlist = state.wishlists.remove(user.id, product_id).await?;
    Ok(Json(json!({ "success": true, "message": "Product removed from wishlist", "data": wishlist })))
}

pub async fn clear(State(state): State<AppState>, AuthUser(user): AuthUser) -> Result<Json<Value>, ApiError> {
    let wishlist = state.wishlists.clear(user.id).await?;
    Ok(Json(json!({ "success": true, "message": "Wishlist cleared", "data": wishlist })))
}
