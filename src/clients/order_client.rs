use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::{ProductClient, UserClient};
use crate::domain::{
    Caller, CheckoutRequest, LineItem, Order, OrderCreate, OrderPatch, PaymentMethod,
};
use crate::notify::OrderNotifications;
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::product_actor::ProductError;

/// Issues `XIL<unix-millis><sequence>` order numbers. The sequence is shared
/// by every clone of the order client.
#[derive(Debug, Default)]
pub struct OrderNumbers {
    sequence: AtomicU64,
}

impl OrderNumbers {
    pub fn next(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("XIL{}{}", Utc::now().timestamp_millis(), seq)
    }
}

/// Client for interacting with the Order actor.
///
/// This client handles the checkout orchestration, validating the customer
/// and the catalog and debiting stock before an order is created.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
    notifications: OrderNotifications,
    numbers: Arc<OrderNumbers>,
}

impl_client_methods!(OrderClient, Order, OrderError, order, OrderError::NotFound);

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        product_client: ProductClient,
        notifications: OrderNotifications,
    ) -> Self {
        Self {
            inner,
            user_client,
            product_client,
            notifications,
            numbers: Arc::new(OrderNumbers::default()),
        }
    }

    /// Checkout.
    ///
    /// Cash-on-delivery orders debit every line before the order is stored;
    /// online orders are stored without touching stock and are debited once
    /// their payment is verified.
    #[instrument(skip(self, request), fields(method = ?request.payment_method, lines = request.items.len()))]
    pub async fn place_order(&self, user_id: String, request: CheckoutRequest) -> Result<Order, OrderError> {
        info!("Processing checkout");
        request.validate().map_err(OrderError::ValidationError)?;

        // Step 1: Validate user
        match self.user_client.get_user(user_id.clone()).await {
            Ok(Some(user)) => debug!(user_name = %user.name, "User validation successful"),
            Ok(None) => {
                error!("User not found");
                return Err(OrderError::InvalidUser(user_id));
            }
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(OrderError::ActorCommunicationError(e.to_string()));
            }
        }

        // Step 2: Price every line from the catalog
        let cod = request.payment_method == PaymentMethod::CashOnDelivery;
        let mut items = Vec::with_capacity(request.items.len());
        for wanted in &request.items {
            let product = match self.product_client.get_product(wanted.product.clone()).await {
                Ok(Some(product)) => product,
                Ok(None) => return Err(OrderError::InvalidProduct(wanted.product.clone())),
                Err(e) => return Err(stock_error(e)),
            };
            if product.stock_quantity < wanted.quantity {
                return Err(OrderError::InsufficientStock {
                    product: product.name,
                    available: product.stock_quantity,
                });
            }
            items.push(LineItem {
                product: product.id,
                name: product.name,
                quantity: wanted.quantity,
                price: product.price,
                stock_reserved: cod,
            });
        }

        // Step 3: Server-side totals
        let too_large = || OrderError::ValidationError("Order total is too large".into());
        let subtotal = items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.line_total()?))
            .ok_or_else(too_large)?;
        let total = subtotal.checked_add(request.shipping).ok_or_else(too_large)?;
        if request.subtotal.is_some_and(|s| s != subtotal) || request.total.is_some_and(|t| t != total) {
            debug!(
                client_subtotal = ?request.subtotal,
                client_total = ?request.total,
                %subtotal,
                %total,
                "Ignoring client-supplied totals"
            );
        }

        // Step 4: Reserve stock for cash-on-delivery
        if cod {
            self.product_client.reserve_all(&items).await.map_err(stock_error)?;
            debug!("Stock reserved");
        }

        let payload = OrderCreate {
            order_number: self.numbers.next(),
            user: user_id,
            items,
            shipping_address: request.shipping_address,
            subtotal,
            shipping: request.shipping,
            payment_method: request.payment_method,
        };
        let reserved = if cod { payload.items.clone() } else { Vec::new() };
        let order = match self.inner.create(payload).await {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "Order creation failed");
                self.product_client.restore_items(&reserved).await;
                return Err(e);
            }
        };
        info!(order_id = %order.id, order_number = %order.order_number, "Order created");

        if cod {
            self.announce(order.clone());
        }
        Ok(order)
    }

    /// Fetches an order the caller owns, or any order for an admin.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn order_for(&self, id: String, caller: &Caller) -> Result<Order, OrderError> {
        let order = self.require_order(id).await?;
        if !caller.can_access(&order.user) {
            warn!(order_id = %order.id, "Order access denied");
            return Err(OrderError::Forbidden("Not authorized".into()));
        }
        Ok(order)
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn my_orders(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let mut orders = self.inner.list_where(move |o: &Order| o.user == user_id).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let mut orders = self.inner.list().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Administrative override of either status field. Stock is not touched.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: String, patch: OrderPatch) -> Result<Order, OrderError> {
        if patch.order_status.is_none() && patch.payment_status.is_none() {
            return Err(OrderError::ValidationError("Provide orderStatus or paymentStatus".into()));
        }
        let order = self.inner.update(id, patch).await?;
        info!(
            order_id = %order.id,
            order_status = %order.order_status,
            payment_status = ?order.payment_status,
            "Order status updated"
        );
        Ok(order)
    }

    /// Customer cancellation. Every line quantity goes back to stock.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn cancel_order(&self, id: String, caller: &Caller) -> Result<Order, OrderError> {
        let action = OrderAction::Cancel { requester: caller.user_id.clone() };
        match self.act(id, action).await? {
            OrderActionResult::Cancel { order, restore } => {
                self.product_client.restore_items(&restore).await;
                info!(order_id = %order.id, restored_lines = restore.len(), "Order cancelled");
                Ok(order)
            }
            _ => Err(OrderError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    pub(crate) async fn act(&self, id: String, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        debug!(?action, "Sending request");
        self.inner.perform_action(id, action).await
    }

    /// Sends the order emails on a background task.
    pub(crate) fn announce(&self, order: Order) {
        let users = self.user_client.clone();
        let notifications = self.notifications.clone();
        tokio::spawn(async move {
            match users.get_user(order.user.clone()).await {
                Ok(Some(customer)) => notifications.order_placed(&order, &customer).await,
                Ok(None) => warn!(order_id = %order.id, "Customer vanished before notification"),
                Err(e) => error!(order_id = %order.id, error = %e, "Could not load customer for notification"),
            }
        });
    }
}

fn stock_error(err: ProductError) -> OrderError {
    match err {
        ProductError::InsufficientStock { product, available, .. } => {
            OrderError::InsufficientStock { product, available }
        }
        ProductError::NotFound(id) => OrderError::InvalidProduct(id),
        other => OrderError::ActorCommunicationError(other.to_string()),
    }
}
