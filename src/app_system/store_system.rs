use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use super::StoreConfig;
use crate::actor_framework::ResourceActor;
use crate::clients::{
    ContactClient, OrderClient, PaymentClient, ProductClient, UserClient, WishlistClient,
};
use crate::domain::{ContactMessage, Order, Product, User, Wishlist};
use crate::notify::{Notifier, OrderNotifications};
use crate::payment::{PaymentGateway, SignatureVerifier};

fn next_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The storefront's stores and the clients wired on top of them.
///
/// Responsible for starting up the store tasks, wiring the clients together,
/// and handling shutdown.
pub struct StoreSystem {
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub order_client: OrderClient,
    pub payment_client: PaymentClient,
    pub wishlist_client: WishlistClient,
    pub contact_client: ContactClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StoreSystem {
    pub fn new(
        config: &StoreConfig,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, String> {
        let buffer = config.store_buffer.max(1);
        let verifier = SignatureVerifier::new(&config.razorpay_key_secret)
            .map_err(|e| format!("Invalid payment secret: {e}"))?;

        // 1. Users
        let (user_actor, users) = ResourceActor::<User>::new("users", buffer, next_id);
        let user_client = UserClient::new(users, config.bootstrap_admin_email.clone());
        let user_handle = tokio::spawn(user_actor.run());

        // 2. Products
        let (product_actor, products) = ResourceActor::<Product>::new("products", buffer, next_id);
        let product_client = ProductClient::new(products);
        let product_handle = tokio::spawn(product_actor.run());

        // 3. Orders
        let (order_actor, orders) = ResourceActor::<Order>::new("orders", buffer, next_id);
        let notifications = OrderNotifications::new(notifier, config.admin_email.clone());
        let order_client =
            OrderClient::new(orders, user_client.clone(), product_client.clone(), notifications);
        let order_handle = tokio::spawn(order_actor.run());

        let payment_client = PaymentClient::new(
            order_client.clone(),
            product_client.clone(),
            gateway,
            verifier,
            config.razorpay_key_id.clone(),
            config.payment_currency.clone(),
        );

        // 4. Wishlists
        let (wishlist_actor, wishlists) = ResourceActor::<Wishlist>::new("wishlists", buffer, next_id);
        let wishlist_client = WishlistClient::new(wishlists, product_client.clone());
        let wishlist_handle = tokio::spawn(wishlist_actor.run());

        // 5. Contact messages
        let (contact_actor, messages) = ResourceActor::<ContactMessage>::new("contacts", buffer, next_id);
        let contact_client = ContactClient::new(messages);
        let contact_handle = tokio::spawn(contact_actor.run());

        info!(buffer, "Stores started");
        Ok(Self {
            user_client,
            product_client,
            order_client,
            payment_client,
            wishlist_client,
            contact_client,
            handles: vec![user_handle, product_handle, order_handle, wishlist_handle, contact_handle],
        })
    }

    /// Drops every client, which closes the store mailboxes, and waits for the
    /// store tasks to finish. Clones held elsewhere (the HTTP state, pending
    /// notification tasks) must be dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down stores...");
        let Self {
            user_client,
            product_client,
            order_client,
            payment_client,
            wishlist_client,
            contact_client,
            handles,
        } = self;
        drop((user_client, product_client, order_client, payment_client, wishlist_client, contact_client));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("Store shutdown complete.");
        Ok(())
    }
}
