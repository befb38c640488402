use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user's saved products. One per user, created on first access.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: String,
    pub user: String,
    pub products: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WishlistCreate {
    pub user: String,
}

impl Wishlist {
    pub fn contains(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p == product_id)
    }
}

/// A wishlist with its product ids replaced by the catalog entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub id: String,
    pub user: String,
    pub products: Vec<super::Product>,
    pub updated_at: DateTime<Utc>,
}
