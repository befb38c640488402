//! REST surface under `/api`.

mod auth;
mod contact;
mod error;
mod extract;
mod orders;
mod payment;
mod products;
mod wishlist;

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_system::StoreSystem;
use crate::auth::{JwtKeys, RateLimiter};
use crate::clients::{
    ContactClient, OrderClient, PaymentClient, ProductClient, UserClient, WishlistClient,
};

pub use error::ApiError;
pub use extract::{AdminUser, ApiJson, AuthUser, ClientIp};

/// Shared by every handler. Cloning is cheap: clients are channel senders.
#[derive(Clone)]
pub struct AppState {
    pub users: UserClient,
    pub products: ProductClient,
    pub orders: OrderClient,
    pub payments: PaymentClient,
    pub wishlists: WishlistClient,
    pub contacts: ContactClient,
    pub keys: Arc<JwtKeys>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(system: &StoreSystem, keys: JwtKeys, limiter: RateLimiter) -> Self {
        Self {
            users: system.user_client.clone(),
            products: system.product_client.clone(),
            orders: system.order_client.clone(),
            payments: system.payment_client.clone(),
            wishlists: system.wishlist_client.clone(),
            contacts: system.contact_client.clone(),
            keys: Arc::new(keys),
            limiter: Arc::new(limiter),
        }
    }
}

/// Allows the storefront origin to call the API with credentials.
pub fn cors_layer(frontend_url: &str) -> Result<CorsLayer, String> {
    let origin = HeaderValue::from_str(frontend_url)
        .map_err(|e| format!("Invalid FRONTEND_URL {frontend_url:?}: {e}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/profile", put(auth::update_profile))
        .route("/auth/users/{id}/promote", put(auth::promote))
        .route("/products", get(products::list).post(products::create))
        .route("/products/featured", get(products::featured))
        .route(
            "/products/{id}",
            get(products::show).put(products::update).delete(products::remove),
        )
        .route("/orders", post(orders::create).get(orders::all))
        .route("/orders/my-orders", get(orders::mine))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", put(orders::set_status))
        .route("/orders/{id}/cancel", put(orders::cancel))
        .route("/payment/create-order", post(payment::create_order))
        .route("/payment/verify", post(payment::verify))
        .route("/payment/failure", post(payment::failure))
        .route("/contact", post(contact::submit).get(contact::list))
        .route("/contact/{id}/status", put(contact::set_status))
        .route("/wishlist", get(wishlist::show).delete(wishlist::clear))
        .route("/wishlist/{product_id}", post(wishlist::add).delete(wishlist::remove));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "Server is running" }))
}
