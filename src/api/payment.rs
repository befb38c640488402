use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, ApiJson, AppState, AuthUser};
use crate::clients::VerifyPayment;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    order_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    order_id: Option<String>,
    /// Whatever the gateway widget reported; kept for the log only.
    error: Option<Value>,
}

fn required(order_id: Option<String>) -> Result<String, ApiError> {
    order_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Order ID is required".into()))
}

/// Any client-supplied amount is ignored; the intent is priced from the stored order.
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<IntentRequest>,
) -> Result<Json<Value>, ApiError> {
    let order_id = required(body.order_id)?;
    let intent = state.payments.create_intent(order_id, &auth.caller()).await?;
    Ok(Json(json!({
        "success": true,
        "orderId": intent.order_id,
        "amount": intent.amount,
        "currency": intent.currency,
        "keyId": intent.key_id,
    })))
}

pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<VerifyPayment>,
) -> Result<Json<Value>, ApiError> {
    let order = state.payments.verify(body, &auth.caller()).await?;
    Ok(Json(json!({ "success": true, "message": "Payment verified successfully", "order": order })))
}

pub async fn failure(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<FailureReport>,
) -> Result<Json<Value>, ApiError> {
    let order_id = required(body.order_id)?;
    let reason = body.error.map(|e| e.to_string());
    let order = state.payments.record_failure(order_id, &auth.caller(), reason).await?;
    Ok(Json(json!({ "success": true, "message": "Payment failure recorded", "order": order })))
}
