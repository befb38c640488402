//! Product-specific domain logic: the inventory ledger's per-product
//! conditional stock updates.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
