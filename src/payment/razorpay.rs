use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway};

/// Razorpay Orders API client.
pub struct RazorpayGateway {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
    amount: u64,
    currency: String,
}

impl RazorpayGateway {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self), fields(amount = request.amount, receipt = %request.receipt))]
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        debug!("Opening payment intent");
        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": request.amount,
                "currency": request.currency,
                "receipt": request.receipt,
                "payment_capture": 1,
            }))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected { status: status.as_u16(), body });
        }

        let order: RazorpayOrder =
            response.json().await.map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(GatewayOrder { id: order.id, amount: order.amount, currency: order.currency })
    }
}
