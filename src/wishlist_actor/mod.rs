//! Per-user wishlists, keyed by owner.

use chrono::Utc;
use thiserror::Error;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Wishlist, WishlistCreate};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WishlistError {
    #[error("Wishlist not found")]
    NotFound,
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Product already in wishlist")]
    AlreadyPresent,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for WishlistError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(_) => Self::NotFound,
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum WishlistAction {
    Add(String),
    Remove(String),
    Clear,
}

impl Entity for Wishlist {
    type Id = String;
    type CreatePayload = WishlistCreate;
    type Patch = ();
    type Action = WishlistAction;
    type ActionResult = Wishlist;
    type Error = WishlistError;

    fn id(&self) -> &String {
        &self.id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.user.clone())
    }

    fn from_create(id: String, params: WishlistCreate) -> Result<Self, WishlistError> {
        Ok(Self { id, user: params.user, products: Vec::new(), updated_at: Utc::now() })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), WishlistError> {
        Ok(())
    }

    fn handle_action(&mut self, action: WishlistAction) -> Result<Wishlist, WishlistError> {
        match action {
            WishlistAction::Add(product) => {
                if self.contains(&product) {
                    return Err(WishlistError::AlreadyPresent);
                }
                self.products.push(product);
            }
            WishlistAction::Remove(product) => self.products.retain(|p| p != &product),
            WishlistAction::Clear => self.products.clear(),
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_order_preserving_and_rejects_duplicates() {
        let mut list = Wishlist::from_create("w1".into(), WishlistCreate { user: "u1".into() }).unwrap();
        list.handle_action(WishlistAction::Add("b".into())).unwrap();
        list.handle_action(WishlistAction::Add("a".into())).unwrap();
        assert_eq!(list.products, vec!["b", "a"]);

        let dup = list.handle_action(WishlistAction::Add("b".into()));
        assert_eq!(dup, Err(WishlistError::AlreadyPresent));

        list.handle_action(WishlistAction::Remove("b".into())).unwrap();
        assert_eq!(list.products, vec!["a"]);
        assert!(list.handle_action(WishlistAction::Clear).unwrap().products.is_empty());
    }
}
