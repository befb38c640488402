//! Order notifications.
//!
//! Delivery goes through the [`Notifier`] trait. Callers never wait on it:
//! [`OrderNotifications::order_placed`] is meant to run on a spawned task and
//! only logs failures.

mod email;
mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{Order, User};

pub use email::{LogNotifier, ResendNotifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email transport error: {0}")]
    Transport(String),
    #[error("email rejected by provider: {status} {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError>;
}

/// Customer confirmation and administrator alert for a newly placed or paid order.
#[derive(Clone)]
pub struct OrderNotifications {
    notifier: Arc<dyn Notifier>,
    admin_email: Option<String>,
}

impl OrderNotifications {
    pub fn new(notifier: Arc<dyn Notifier>, admin_email: Option<String>) -> Self {
        Self { notifier, admin_email }
    }

    pub async fn order_placed(&self, order: &Order, customer: &User) {
        let confirmation = templates::order_confirmation(order, customer);
        let to = confirmation.to.clone();
        match self.notifier.send(confirmation).await {
            Ok(()) => info!(order_number = %order.order_number, to = %to, "Order confirmation sent"),
            Err(e) => error!(order_number = %order.order_number, to = %to, error = %e, "Order confirmation failed"),
        }

        let Some(admin) = &self.admin_email else {
            return;
        };
        match self.notifier.send(templates::admin_order_alert(order, customer, admin)).await {
            Ok(()) => info!(order_number = %order.order_number, "Admin order alert sent"),
            Err(e) => error!(order_number = %order.order_number, error = %e, "Admin order alert failed"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Collects messages instead of sending them; optionally fails every send.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<EmailMessage>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self { sent: Mutex::new(Vec::new()), fail: true }
        }

        pub fn subjects(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|m| m.subject.clone()).collect()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(message);
            if self.fail {
                return Err(NotifyError::Transport("smtp unavailable".into()));
            }
            Ok(())
        }
    }
}
