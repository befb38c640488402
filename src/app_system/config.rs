//! Runtime configuration read from environment variables.

use ::config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub port: u16,
    pub frontend_url: String,
    pub jwt_secret: String,
    pub jwt_expires_hours: i64,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_api_base: String,
    pub payment_currency: String,
    pub resend_api_key: Option<String>,
    pub from_email: String,
    pub admin_email: Option<String>,
    pub bootstrap_admin_email: Option<String>,
    pub seed_catalog: bool,
    pub store_buffer: usize,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    fn load(source: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("port", 5000)?
            .set_default("frontend_url", "http://localhost:5173")?
            .set_default("jwt_secret", "")?
            .set_default("jwt_expires_hours", 720)?
            .set_default("razorpay_key_id", "")?
            .set_default("razorpay_key_secret", "")?
            .set_default("razorpay_api_base", "https://api.razorpay.com")?
            .set_default("payment_currency", "INR")?
            .set_default("from_email", "orders@xilikha.com")?
            .set_default("seed_catalog", false)?
            .set_default("store_buffer", 64)?
            .add_source(source.try_parsing(true))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        if loaded.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if loaded.razorpay_key_secret.is_empty() {
            return Err(ConfigError::Missing("RAZORPAY_KEY_SECRET"));
        }
        Ok(loaded)
    }
}
