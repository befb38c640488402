//! Order lifecycle: status fields and their valid transitions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
