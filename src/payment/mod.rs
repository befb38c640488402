//! Payment gateway seam and signature verification.

mod razorpay;
mod signature;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

pub use razorpay::RazorpayGateway;
pub use signature::SignatureVerifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayOrderRequest {
    /// Amount in minor currency units (paise for INR).
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(String),
    #[error("gateway rejected order: {status} {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected gateway response: {0}")]
    Decode(String),
}

/// Opens payment intents with the external processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError>;
}

/// Converts a major-unit amount to minor units (x100), rounding half away from zero.
pub fn to_minor_units(amount: Decimal) -> Option<u64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Gateway double that records requests and answers with numbered order ids.
    #[derive(Default)]
    pub struct StubGateway {
        pub requests: Mutex<Vec<GatewayOrderRequest>>,
        pub fail: bool,
    }

    impl StubGateway {
        pub fn failing() -> Self {
            Self { requests: Mutex::new(Vec::new()), fail: true }
        }

        pub fn last_request(&self) -> Option<GatewayOrderRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
            if self.fail {
                return Err(GatewayError::Rejected { status: 401, body: "Authentication failed".into() });
            }
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            Ok(GatewayOrder {
                id: format!("order_gw_{}", requests.len()),
                amount: request.amount,
                currency: request.currency,
            })
        }
    }
}
