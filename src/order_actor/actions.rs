use chrono::{DateTime, Utc};

use crate::domain::{LineItem, Order, PaymentProof};

/// Lifecycle transitions applied atomically by the order store.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Customer-initiated cancellation; only the owner, only before shipping.
    Cancel { requester: String },
    /// Records the gateway's order id when a payment intent is opened.
    AttachGatewayOrder { gateway_order_id: String },
    /// Applies a verified payment. Repeating it with the same payment id is a no-op.
    MarkPaid { proof: PaymentProof, paid_at: DateTime<Utc> },
    MarkPaymentFailed,
    /// Flags the lines (by index) whose stock was debited after payment.
    RecordReservations { lines: Vec<usize> },
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    /// `restore` holds every line; each quantity goes back to stock.
    Cancel { order: Order, restore: Vec<LineItem> },
    AttachGatewayOrder,
    MarkPaid { order: Order, newly_paid: bool },
    MarkPaymentFailed(Order),
    RecordReservations(Order),
}
