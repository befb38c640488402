use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::clients::{OrderClient, ProductClient};
use crate::domain::{Caller, Order, PaymentProof};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::payment::{to_minor_units, GatewayOrderRequest, PaymentGateway, SignatureVerifier};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("Payment verification failed")]
    VerificationFailed,
    #[error("Failed to create payment order: {0}")]
    InitiationFailed(String),
    #[error("{0}")]
    ValidationError(String),
}

/// What the browser needs to open the gateway's checkout widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    pub key_id: String,
}

/// Body of `POST /payment/verify`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayment {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub order_id: Option<String>,
}

impl VerifyPayment {
    fn into_parts(self) -> Option<(String, PaymentProof)> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some((
            present(self.order_id)?,
            PaymentProof {
                gateway_order_id: present(self.razorpay_order_id)?,
                gateway_payment_id: present(self.razorpay_payment_id)?,
                signature: present(self.razorpay_signature)?,
            },
        ))
    }
}

/// Payment reconciliation: opens gateway intents, verifies the gateway's
/// signed callback, and debits stock once a payment is confirmed.
#[derive(Clone)]
pub struct PaymentClient {
    orders: OrderClient,
    products: ProductClient,
    gateway: Arc<dyn PaymentGateway>,
    verifier: SignatureVerifier,
    key_id: String,
    currency: String,
}

impl PaymentClient {
    pub fn new(
        orders: OrderClient,
        products: ProductClient,
        gateway: Arc<dyn PaymentGateway>,
        verifier: SignatureVerifier,
        key_id: String,
        currency: String,
    ) -> Self {
        Self { orders, products, gateway, verifier, key_id, currency }
    }

    /// The amount always comes from the stored order total.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn create_intent(&self, order_id: String, caller: &Caller) -> Result<PaymentIntent, PaymentError> {
        let order = self.orders.order_for(order_id, caller).await?;
        order.ensure_payable()?;
        let amount = to_minor_units(order.total)
            .ok_or_else(|| PaymentError::ValidationError("Order total cannot be charged".into()))?;

        let request = GatewayOrderRequest {
            amount,
            currency: self.currency.clone(),
            receipt: order.id.clone(),
        };
        let gateway_order = self.gateway.create_order(request).await.map_err(|e| {
            error!(order_id = %order.id, error = %e, "Gateway order creation failed");
            PaymentError::InitiationFailed(e.to_string())
        })?;

        let action = OrderAction::AttachGatewayOrder { gateway_order_id: gateway_order.id.clone() };
        self.orders.act(order.id.clone(), action).await?;
        info!(order_id = %order.id, gateway_order_id = %gateway_order.id, amount, "Payment intent opened");

        Ok(PaymentIntent {
            order_id: gateway_order.id,
            amount: gateway_order.amount,
            currency: gateway_order.currency,
            key_id: self.key_id.clone(),
        })
    }

    /// Confirms a payment from the gateway's signed callback.
    ///
    /// Repeating a successful verification returns the paid order without
    /// debiting stock again.
    #[instrument(skip(self, body, caller), fields(caller = %caller.user_id))]
    pub async fn verify(&self, body: VerifyPayment, caller: &Caller) -> Result<Order, PaymentError> {
        let (order_id, proof) = body
            .into_parts()
            .ok_or_else(|| PaymentError::ValidationError("Missing payment verification details".into()))?;
        let order = self.orders.order_for(order_id, caller).await?;

        if !self.verifier.verify(&proof.gateway_order_id, &proof.gateway_payment_id, &proof.signature) {
            warn!(order_id = %order.id, "Payment signature mismatch");
            return Err(PaymentError::VerificationFailed);
        }

        let action = OrderAction::MarkPaid { proof, paid_at: Utc::now() };
        let (order, newly_paid) = match self.orders.act(order.id.clone(), action).await {
            Ok(OrderActionResult::MarkPaid { order, newly_paid }) => (order, newly_paid),
            Ok(_) => return Err(OrderError::ActorCommunicationError("Unexpected result".to_string()).into()),
            Err(OrderError::GatewayMismatch) => {
                warn!(order_id = %order.id, "Gateway order id does not match the intent");
                return Err(PaymentError::VerificationFailed);
            }
            Err(e) => return Err(e.into()),
        };
        if !newly_paid {
            info!(order_id = %order.id, "Payment already recorded");
            return Ok(order);
        }
        info!(order_id = %order.id, "Payment verified");

        let report = self.products.debit_items(&order.items).await;
        if !report.refused.is_empty() {
            warn!(order_id = %order.id, refused = ?report.refused, "Paid order has lines without stock");
        }
        let order = match self.orders.act(order.id.clone(), OrderAction::RecordReservations { lines: report.debited }).await? {
            OrderActionResult::RecordReservations(order) => order,
            _ => return Err(OrderError::ActorCommunicationError("Unexpected result".to_string()).into()),
        };

        self.orders.announce(order.clone());
        Ok(order)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn record_failure(
        &self,
        order_id: String,
        caller: &Caller,
        reason: Option<String>,
    ) -> Result<Order, PaymentError> {
        let order = self.orders.order_for(order_id, caller).await?;
        match self.orders.act(order.id.clone(), OrderAction::MarkPaymentFailed).await? {
            OrderActionResult::MarkPaymentFailed(order) => {
                warn!(order_id = %order.id, reason = reason.as_deref().unwrap_or("unspecified"), "Payment failed");
                Ok(order)
            }
            _ => Err(OrderError::ActorCommunicationError("Unexpected result".to_string()).into()),
        }
    }
}
