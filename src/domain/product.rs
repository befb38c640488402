use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dried,
    Tea,
    Salted,
}

/// Represents a product in the catalog.
///
/// `in_stock` is a cached view of `stock_quantity > 0` and is refreshed after
/// every stock mutation or administrative edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub subtitle: String,
    pub price: Decimal,
    pub weight: String,
    pub category: Category,
    pub image: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub uses: Vec<String>,
    pub ingredients: Vec<String>,
    pub featured: bool,
    pub stock_quantity: u32,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[serde(alias = "id")]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    pub price: Decimal,
    #[serde(default)]
    pub weight: String,
    pub category: Category,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub uses: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub stock_quantity: u32,
}

/// Administrative edit of a product. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub price: Option<Decimal>,
    pub weight: Option<String>,
    pub category: Option<Category>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub benefits: Option<Vec<String>>,
    pub uses: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub stock_quantity: Option<u32>,
}

impl Product {
    pub fn refresh_stock_flag(&mut self) {
        self.in_stock = self.stock_quantity > 0;
    }
}
