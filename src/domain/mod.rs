pub mod contact;
pub mod order;
pub mod product;
pub mod user;
pub mod wishlist;

pub use contact::*;
pub use order::*;
pub use product::*;
pub use user::*;
pub use wishlist::*;
