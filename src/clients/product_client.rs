use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Category, LineItem, Product, ProductCreate, ProductPatch};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError, StockDebit};

/// Catalog filters accepted by `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<Category>,
    pub featured: Option<bool>,
}

/// Outcome of a per-line debit: indexes into the batch that was passed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockReport {
    pub debited: Vec<usize>,
    pub refused: Vec<usize>,
}

/// Client for the product store and the inventory ledger built on it.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_client_new!(ProductClient, Product);
impl_client_methods!(ProductClient, Product, ProductError, product, ProductError::NotFound);

impl ProductClient {
    #[instrument(skip(self, payload), fields(slug = %payload.slug))]
    pub async fn create_product(&self, payload: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        let product = self.inner.create(payload).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Looks a product up by store id, falling back to its slug.
    #[instrument(skip(self))]
    pub async fn resolve(&self, key: String) -> Result<Product, ProductError> {
        debug!("Sending request");
        if let Some(product) = self.inner.get(key.clone()).await? {
            return Ok(product);
        }
        self.inner
            .find_by_key(key.clone())
            .await?
            .ok_or(ProductError::NotFound(key))
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        let mut products = self
            .inner
            .list_where(move |p: &Product| {
                query.category.map_or(true, |c| p.category == c)
                    && query.featured.map_or(true, |f| p.featured == f)
            })
            .await?;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, key: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        let product = self.resolve(key).await?;
        self.inner.update(product.id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, key: String) -> Result<(), ProductError> {
        debug!("Sending request");
        let product = self.resolve(key).await?;
        self.inner.delete(product.id.clone()).await?;
        info!(product_id = %product.id, "Product deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            _ => Err(ProductError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    /// Conditional decrement; a refusal leaves the product untouched.
    #[instrument(skip(self))]
    pub async fn debit_stock(&self, id: String, quantity: u32) -> Result<StockDebit, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::DebitStock(quantity)).await? {
            ProductActionResult::DebitStock(outcome) => Ok(outcome),
            _ => Err(ProductError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    #[instrument(skip(self))]
    pub async fn restore_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::RestoreStock(quantity)).await? {
            ProductActionResult::RestoreStock(level) => Ok(level),
            _ => Err(ProductError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    /// Debits every line or none of them.
    ///
    /// # Errors
    /// On the first refused line the lines already debited are restored and
    /// `InsufficientStock` names the refused product.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn reserve_all(&self, items: &[LineItem]) -> Result<(), ProductError> {
        let mut debited: Vec<&LineItem> = Vec::with_capacity(items.len());
        for item in items {
            let outcome = self.debit_stock(item.product.clone(), item.quantity).await;
            let failure = match outcome {
                Ok(StockDebit::Debited { .. }) => {
                    debited.push(item);
                    continue;
                }
                Ok(StockDebit::Refused { available }) => ProductError::InsufficientStock {
                    product: item.name.clone(),
                    requested: item.quantity,
                    available,
                },
                Err(e) => e,
            };
            warn!(product_id = %item.product, error = %failure, "Reservation failed, releasing debited lines");
            for line in debited {
                if let Err(e) = self.restore_stock(line.product.clone(), line.quantity).await {
                    warn!(product_id = %line.product, error = %e, "Could not release reserved stock");
                }
            }
            return Err(failure);
        }
        Ok(())
    }

    /// Debits each line independently and reports which ones went through.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn debit_items(&self, items: &[LineItem]) -> StockReport {
        let mut report = StockReport::default();
        for (index, item) in items.iter().enumerate() {
            match self.debit_stock(item.product.clone(), item.quantity).await {
                Ok(StockDebit::Debited { remaining }) => {
                    debug!(product_id = %item.product, remaining, "Line debited");
                    report.debited.push(index);
                }
                Ok(StockDebit::Refused { available }) => {
                    warn!(product_id = %item.product, requested = item.quantity, available, "Line refused");
                    report.refused.push(index);
                }
                Err(e) => {
                    warn!(product_id = %item.product, error = %e, "Line could not be debited");
                    report.refused.push(index);
                }
            }
        }
        report
    }

    /// Gives stock back line by line. Failures are logged and skipped.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn restore_items(&self, items: &[LineItem]) {
        for item in items {
            match self.restore_stock(item.product.clone(), item.quantity).await {
                Ok(stock) => debug!(product_id = %item.product, stock, "Line restored"),
                Err(e) => warn!(product_id = %item.product, error = %e, "Line could not be restored"),
            }
        }
    }
}
