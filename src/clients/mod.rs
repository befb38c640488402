#[macro_use]
mod macros;

mod contact_client;
mod order_client;
mod payment_client;
mod product_client;
mod user_client;
mod wishlist_client;

pub use contact_client::ContactClient;
pub use order_client::OrderClient;
pub use payment_client::{PaymentClient, PaymentError, VerifyPayment};
pub use product_client::{ProductClient, ProductQuery};
pub use user_client::UserClient;
pub use wishlist_client::WishlistClient;
