//! System orchestration, startup, and shutdown logic.

pub mod config;
pub mod seed;
pub mod store_system;
pub mod telemetry;

pub use self::config::*;
pub use store_system::*;
pub use telemetry::*;
