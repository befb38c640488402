use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{AdminUser, ApiError, ApiJson, AppState, AuthUser, ClientIp};
use crate::auth::AuthError;
use crate::domain::{ProfileUpdate, Registration};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn register(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ApiJson(body): ApiJson<Registration>,
) -> Result<impl IntoResponse, ApiError> {
    state.limiter.check(ip)?;
    let user = state.users.register(body).await?;
    let token = state.keys.issue(&user)?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "token": token, "user": user }))))
}

pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ApiJson(body): ApiJson<Credentials>,
) -> Result<Json<Value>, ApiError> {
    state.limiter.check(ip)?;
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation("Please provide email and password".into()));
    }
    let Some(user) = state.users.authenticate(&body.email, &body.password).await? else {
        warn!(ip = %ip, "Failed login");
        return Err(AuthError::InvalidCredentials.into());
    };
    let token = state.keys.issue(&user)?;
    info!(user_id = %user.id, "User logged in");
    Ok(Json(json!({ "success": true, "token": token, "user": user })))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({ "success": true, "user": user }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<ProfileUpdate>,
) -> Result<Json<Value>, ApiError> {
    let user = state.users.update_profile(user.id, body).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn promote(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = state.users.promote(id).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}
