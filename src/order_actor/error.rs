use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::OrderStatus;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Product not found: {0}")]
    InvalidProduct(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("Insufficient stock for {product}. Only {available} left.")]
    InsufficientStock { product: String, available: u32 },
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Order cannot be cancelled at this stage ({0})")]
    NotCancellable(OrderStatus),
    #[error("{0}")]
    PaymentConflict(String),
    #[error("Gateway order id does not match this order")]
    GatewayMismatch,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Conflict(number) => {
                Self::ActorCommunicationError(format!("Duplicate order number {number}"))
            }
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
