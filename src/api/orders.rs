use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{AdminUser, ApiError, ApiJson, AppState, AuthUser};
use crate::domain::{CheckoutRequest, OrderPatch, OrderStatus, PaymentStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    order_status: Option<OrderStatus>,
    payment_status: Option<PaymentStatus>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.orders.place_order(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": order }))))
}

pub async fn all(State(state): State<AppState>, AdminUser(_admin): AdminUser) -> Result<Json<Value>, ApiError> {
    let orders = state.orders.all_orders().await?;
    Ok(Json(json!({ "success": true, "count": orders.len(), "data": orders })))
}

pub async fn mine(State(state): State<AppState>, AuthUser(user): AuthUser) -> Result<Json<Value>, ApiError> {
    let orders = state.orders.my_orders(user.id).await?;
    Ok(Json(json!({ "success": true, "count": orders.len(), "data": orders })))
}

pub async fn show(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let order = state.orders.order_for(id, &auth.caller()).await?;
    Ok(Json(json!({ "success": true, "data": order })))
}

pub async fn set_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> Result<Json<Value>, ApiError> {
    let patch = OrderPatch { order_status: body.order_status, payment_status: body.payment_status };
    let order = state.orders.set_status(id, patch).await?;
    Ok(Json(json!({ "success": true, "data": order })))
}

pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let order = state.orders.cancel_order(id, &auth.caller()).await?;
    Ok(Json(json!({ "success": true, "data": order })))
}
