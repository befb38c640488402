mod domain;
mod clients;

mod app_system;
mod api;
mod auth;
mod notify;
mod payment;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod user_actor;
mod product_actor;
mod order_actor;
mod wishlist_actor;
mod contact_actor;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info, warn, Instrument};

use crate::app_system::seed::seed_catalog;
use crate::app_system::{setup_tracing, StoreConfig, StoreSystem};
use crate::auth::{JwtKeys, RateLimitConfig, RateLimiter};
use crate::notify::{LogNotifier, Notifier, ResendNotifier};
use crate::payment::{PaymentGateway, RazorpayGateway};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = StoreConfig::from_env().map_err(|e| e.to_string())?;
    info!(port = config.port, frontend = %config.frontend_url, "Starting storefront");

    let gateway: Arc<dyn PaymentGateway> = Arc::new(RazorpayGateway::new(
        config.razorpay_key_id.clone(),
        config.razorpay_key_secret.clone(),
        config.razorpay_api_base.clone(),
    ));
    let notifier: Arc<dyn Notifier> = match config.resend_api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => Arc::new(ResendNotifier::new(key, config.from_email.clone())),
        None => {
            warn!("RESEND_API_KEY not set, order emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    // Start every store
    let system = StoreSystem::new(&config, gateway, notifier)?;

    if config.seed_catalog {
        seed_catalog(&system.product_client)
            .instrument(tracing::info_span!("catalog_seed"))
            .await
            .map_err(|e| e.to_string())?;
    }

    let state = api::AppState::new(
        &system,
        JwtKeys::new(&config.jwt_secret, config.jwt_expires_hours),
        RateLimiter::new(RateLimitConfig::default()),
    );
    let app = api::router(state, api::cors_layer(&config.frontend_url)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Could not bind {addr}: {e}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;

    // Shutdown stores gracefully
    system.shutdown().await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
