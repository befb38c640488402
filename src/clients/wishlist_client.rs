use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clients::ProductClient;
use crate::domain::{Wishlist, WishlistCreate, WishlistView};
use crate::product_actor::ProductError;
use crate::wishlist_actor::{WishlistAction, WishlistError};

/// Client for the wishlist store. Every method creates the caller's wishlist
/// on first use.
#[derive(Clone)]
pub struct WishlistClient {
    inner: ResourceClient<Wishlist>,
    product_client: ProductClient,
}

impl WishlistClient {
    pub fn new(inner: ResourceClient<Wishlist>, product_client: ProductClient) -> Self {
        Self { inner, product_client }
    }

    async fn ensure(&self, user: &str) -> Result<Wishlist, WishlistError> {
        self.inner.ensure(user, WishlistCreate { user: user.to_string() }).await
    }

    async fn apply(&self, user: &str, action: WishlistAction) -> Result<WishlistView, WishlistError> {
        let wishlist = self.ensure(user).await?;
        let updated = self.inner.perform_action(wishlist.id, action).await?;
        self.populate(updated).await
    }

    /// Replaces product ids with catalog entries. Products deleted since they
    /// were saved are left out.
    async fn populate(&self, wishlist: Wishlist) -> Result<WishlistView, WishlistError> {
        let mut products = Vec::with_capacity(wishlist.products.len());
        for id in &wishlist.products {
            match self.product_client.get_product(id.clone()).await {
                Ok(Some(product)) => products.push(product),
                Ok(None) => debug!(product_id = %id, "Skipping deleted product"),
                Err(e) => return Err(WishlistError::ActorCommunicationError(e.to_string())),
            }
        }
        Ok(WishlistView { id: wishlist.id, user: wishlist.user, products, updated_at: wishlist.updated_at })
    }

    #[instrument(skip(self))]
    pub async fn wishlist_for(&self, user: String) -> Result<WishlistView, WishlistError> {
        debug!("Sending request");
        let wishlist = self.ensure(&user).await?;
        self.populate(wishlist).await
    }

    #[instrument(skip(self))]
    pub async fn add(&self, user: String, product: String) -> Result<WishlistView, WishlistError> {
        debug!("Sending request");
        match self.product_client.get_product(product.clone()).await {
            Ok(Some(_)) => {}
            Ok(None) | Err(ProductError::NotFound(_)) => return Err(WishlistError::ProductNotFound(product)),
            Err(e) => return Err(WishlistError::ActorCommunicationError(e.to_string())),
        }
        let view = self.apply(&user, WishlistAction::Add(product)).await?;
        info!(wishlist_id = %view.id, "Product added to wishlist");
        Ok(view)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user: String, product: String) -> Result<WishlistView, WishlistError> {
        debug!("Sending request");
        self.apply(&user, WishlistAction::Remove(product)).await
    }

    #[instrument(skip(self))]
    pub async fn clear(&self, user: String) -> Result<WishlistView, WishlistError> {
        debug!("Sending request");
        self.apply(&user, WishlistAction::Clear).await
    }
}
