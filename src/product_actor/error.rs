use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product already exists: {0}")]
    AlreadyExists(String),
    #[error("Insufficient stock for {product}. Only {available} left.")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ProductError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Conflict(slug) => Self::AlreadyExists(slug),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
