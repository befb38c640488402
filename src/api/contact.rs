use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{AdminUser, ApiError, ApiJson, AppState};
use crate::domain::{ContactCreate, ContactStatus};

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    status: ContactStatus,
}

pub async fn submit(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state.contacts.submit(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Message sent successfully", "data": message })),
    ))
}

pub async fn list(State(state): State<AppState>, AdminUser(_admin): AdminUser) -> Result<Json<Value>, ApiError> {
    let messages = state.contacts.list_messages().await?;
    Ok(Json(json!({ "success": true, "count": messages.len(), "data": messages })))
}

pub async fn set_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Value>, ApiError> {
    let message = state.contacts.set_status(id, body.status).await?;
    Ok(Json(json!({ "success": true, "data": message })))
}
