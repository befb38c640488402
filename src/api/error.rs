//! HTTP error mapping. Every store error becomes an [`ApiError`], which
//! renders as `{"success": false, "message": ...}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::clients::PaymentError;
use crate::contact_actor::ContactError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;
use crate::wishlist_actor::WishlistError;

#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InsufficientStock(String),
    #[error("Payment verification failed")]
    VerificationFailed,
    #[error("Failed to create payment order")]
    PaymentInitiation(String),
    #[error("Too many attempts. Please try again in 15 minutes.")]
    RateLimited,
    #[error("Server error")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::Conflict(_)
            | Self::InsufficientStock(_)
            | Self::VerificationFailed => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::PaymentInitiation(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // internal details stay in the log
        match &self {
            Self::Internal(detail) => error!(detail = %detail, "Request failed"),
            Self::PaymentInitiation(detail) => error!(detail = %detail, "Payment initiation failed"),
            _ => {}
        }
        let body = Json(json!({ "success": false, "message": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::NotFound("Product not found".into()),
            ProductError::AlreadyExists(_) => Self::Conflict(err.to_string()),
            ProductError::InsufficientStock { .. } => Self::InsufficientStock(err.to_string()),
            ProductError::InvalidQuantity(_) => Self::Validation(err.to_string()),
            ProductError::ValidationError(msg) => Self::Validation(msg),
            ProductError::ActorCommunicationError(msg) => Self::Internal(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => Self::NotFound("User not found".into()),
            UserError::AlreadyExists(_) => Self::Conflict("User already exists".into()),
            UserError::ValidationError(msg) => Self::Validation(msg),
            UserError::PasswordHash(msg) | UserError::ActorCommunicationError(msg) => Self::Internal(msg),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => Self::NotFound("Order not found".into()),
            OrderError::InvalidProduct(id) => Self::NotFound(format!("Product not found: {id}")),
            OrderError::InvalidUser(_) => Self::NotFound("User not found".into()),
            OrderError::InsufficientStock { .. } => Self::InsufficientStock(err.to_string()),
            OrderError::ValidationError(msg) => Self::Validation(msg),
            OrderError::Forbidden(msg) => Self::Forbidden(msg),
            OrderError::NotCancellable(_) => {
                Self::Conflict("Order cannot be cancelled at this stage".into())
            }
            OrderError::PaymentConflict(msg) => Self::Conflict(msg),
            OrderError::GatewayMismatch => Self::VerificationFailed,
            OrderError::ActorCommunicationError(msg) => Self::Internal(msg),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Order(inner) => inner.into(),
            PaymentError::VerificationFailed => Self::VerificationFailed,
            PaymentError::InitiationFailed(detail) => Self::PaymentInitiation(detail),
            PaymentError::ValidationError(msg) => Self::Validation(msg),
        }
    }
}

impl From<WishlistError> for ApiError {
    fn from(err: WishlistError) -> Self {
        match err {
            WishlistError::NotFound => Self::NotFound("Wishlist not found".into()),
            WishlistError::ProductNotFound(_) => Self::NotFound("Product not found".into()),
            WishlistError::AlreadyPresent => Self::Conflict(err.to_string()),
            WishlistError::ActorCommunicationError(msg) => Self::Internal(msg),
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::NotFound(_) => Self::NotFound("Message not found".into()),
            ContactError::ValidationError(msg) => Self::Validation(msg),
            ContactError::ActorCommunicationError(msg) => Self::Internal(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::RateLimitExceeded => Self::RateLimited,
            AuthError::Signing(detail) => Self::Internal(detail),
            AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken(_) => {
                Self::Unauthorized(err.to_string())
            }
        }
    }
}
