//! Authentication: password hashing, bearer tokens, and login throttling.

pub mod password;
pub mod rate_limit;
pub mod token;

use thiserror::Error;

pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use token::JwtKeys;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Not authorized, no token")]
    MissingToken,
    #[error("Not authorized, token failed")]
    InvalidToken(String),
    #[error("Too many attempts. Please try again in 15 minutes.")]
    RateLimitExceeded,
    #[error("token signing failed: {0}")]
    Signing(String),
}
