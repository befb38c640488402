use chrono::Utc;
use rust_decimal::Decimal;

use super::actions::{ProductAction, ProductActionResult, StockDebit};
use super::error::ProductError;
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String {
        &self.id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.slug.clone())
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects a blank slug or name and a negative price.
    fn from_create(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        let slug = params.slug.trim().to_string();
        if slug.is_empty() {
            return Err(ProductError::ValidationError("Please add a product id".into()));
        }
        if params.name.trim().is_empty() {
            return Err(ProductError::ValidationError("Please add a product name".into()));
        }
        check_price(params.price)?;

        let now = Utc::now();
        let mut product = Self {
            id,
            slug,
            name: params.name.trim().to_string(),
            subtitle: params.subtitle,
            price: params.price,
            weight: params.weight,
            category: params.category,
            image: params.image,
            description: params.description,
            benefits: params.benefits,
            uses: params.uses,
            ingredients: params.ingredients,
            featured: params.featured,
            stock_quantity: params.stock_quantity,
            in_stock: false,
            created_at: now,
            updated_at: now,
        };
        product.refresh_stock_flag();
        Ok(product)
    }

    /// Applies an administrative edit. `in_stock` is recomputed afterwards,
    /// so an edit cannot leave the flag out of step with the quantity.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(price) = patch.price {
            check_price(price)?;
            self.price = price;
        }
        if let Some(slug) = patch.slug {
            let slug = slug.trim().to_string();
            if slug.is_empty() {
                return Err(ProductError::ValidationError("Product id cannot be blank".into()));
            }
            self.slug = slug;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(benefits) = patch.benefits {
            self.benefits = benefits;
        }
        if let Some(uses) = patch.uses {
            self.uses = uses;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(quantity) = patch.stock_quantity {
            self.stock_quantity = quantity;
        }
        self.refresh_stock_flag();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Handles the ledger actions.
    ///
    /// # Errors
    /// A zero-quantity debit or restore is rejected as invalid.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock_quantity)),
            ProductAction::DebitStock(0) | ProductAction::RestoreStock(0) => {
                Err(ProductError::InvalidQuantity(0))
            }
            ProductAction::DebitStock(amount) => {
                let outcome = match self.stock_quantity.checked_sub(amount) {
                    Some(remaining) => {
                        self.stock_quantity = remaining;
                        self.refresh_stock_flag();
                        self.updated_at = Utc::now();
                        StockDebit::Debited { remaining }
                    }
                    None => StockDebit::Refused { available: self.stock_quantity },
                };
                Ok(ProductActionResult::DebitStock(outcome))
            }
            ProductAction::RestoreStock(amount) => {
                self.stock_quantity = self.stock_quantity.saturating_add(amount);
                self.refresh_stock_flag();
                self.updated_at = Utc::now();
                Ok(ProductActionResult::RestoreStock(self.stock_quantity))
            }
        }
    }
}

fn check_price(price: Decimal) -> Result<(), ProductError> {
    if price < Decimal::ZERO {
        return Err(ProductError::ValidationError("Price cannot be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn sample(stock: u32) -> Product {
        Product::from_create(
            "p1".into(),
            ProductCreate {
                slug: "dried-xilikha-100g".into(),
                name: "Pure Dried Xilikha".into(),
                subtitle: String::new(),
                price: dec!(150),
                weight: "100g".into(),
                category: Category::Dried,
                image: String::new(),
                description: String::new(),
                benefits: vec![],
                uses: vec![],
                ingredients: vec![],
                featured: false,
                stock_quantity: stock,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_debit_to_zero_marks_out_of_stock() {
        let mut product = sample(5);
        let result = product.handle_action(ProductAction::DebitStock(5)).unwrap();
        assert_eq!(result, ProductActionResult::DebitStock(StockDebit::Debited { remaining: 0 }));
        assert_eq!(product.stock_quantity, 0);
        assert!(!product.in_stock);
    }

    #[test]
    fn test_refused_debit_leaves_stock_unchanged() {
        let mut product = sample(3);
        let result = product.handle_action(ProductAction::DebitStock(4)).unwrap();
        assert_eq!(result, ProductActionResult::DebitStock(StockDebit::Refused { available: 3 }));
        assert_eq!(product.stock_quantity, 3);
        assert!(product.in_stock);
    }

    #[test]
    fn test_restore_brings_product_back_in_stock() {
        let mut product = sample(0);
        assert!(!product.in_stock);
        product.handle_action(ProductAction::RestoreStock(2)).unwrap();
        assert_eq!(product.stock_quantity, 2);
        assert!(product.in_stock);
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let mut product = sample(1);
        assert_eq!(
            product.handle_action(ProductAction::DebitStock(0)),
            Err(ProductError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_admin_edit_recomputes_flag_and_rejects_negative_price() {
        let mut product = sample(4);
        product
            .on_update(ProductPatch { stock_quantity: Some(0), ..Default::default() })
            .unwrap();
        assert!(!product.in_stock);

        let err = product.on_update(ProductPatch { price: Some(dec!(-1)), ..Default::default() });
        assert!(matches!(err, Err(ProductError::ValidationError(_))));
        assert_eq!(product.price, dec!(150));
    }

    fn ledger_op() -> impl Strategy<Value = ProductAction> {
        prop_oneof![
            (1u32..20).prop_map(ProductAction::DebitStock),
            (1u32..20).prop_map(ProductAction::RestoreStock),
        ]
    }

    proptest! {
        #[test]
        fn prop_stock_flag_tracks_quantity(start in 0u32..30, ops in prop::collection::vec(ledger_op(), 0..40)) {
            let mut product = sample(start);
            let mut expected = i64::from(start);
            for op in ops {
                match (&op, product.handle_action(op.clone()).unwrap()) {
                    (ProductAction::DebitStock(q), ProductActionResult::DebitStock(StockDebit::Debited { .. })) => {
                        expected -= i64::from(*q);
                    }
                    (ProductAction::DebitStock(q), ProductActionResult::DebitStock(StockDebit::Refused { available })) => {
                        prop_assert!(i64::from(*q) > i64::from(available));
                    }
                    (ProductAction::RestoreStock(q), ProductActionResult::RestoreStock(_)) => {
                        expected += i64::from(*q);
                    }
                    (op, result) => prop_assert!(false, "unexpected {:?} -> {:?}", op, result),
                }
                prop_assert!(expected >= 0);
                prop_assert_eq!(i64::from(product.stock_quantity), expected);
                prop_assert_eq!(product.in_stock, product.stock_quantity > 0);
            }
        }
    }
}
