use chrono::Utc;
use rust_decimal::Decimal;
use tracing::warn;

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::actor_framework::Entity;
use crate::domain::{
    LineItem, Order, OrderCreate, OrderPatch, OrderStatus, PaymentMethod, PaymentProof,
    PaymentStatus,
};

impl Entity for Order {
    type Id = String;
    type CreatePayload = OrderCreate;
    type Patch = OrderPatch;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &String {
        &self.id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.order_number.clone())
    }

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// Cash-on-delivery orders start in `processing` because their stock is
    /// debited at checkout. Online orders wait in `pending` until payment is
    /// verified.
    fn from_create(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError("Order has no items".into()));
        }
        if params.items.iter().any(|item| item.quantity == 0) {
            return Err(OrderError::ValidationError("Item quantity must be at least 1".into()));
        }
        if params.shipping < Decimal::ZERO || params.subtotal < Decimal::ZERO {
            return Err(OrderError::ValidationError("Order amounts cannot be negative".into()));
        }

        let total = params
            .subtotal
            .checked_add(params.shipping)
            .ok_or_else(|| OrderError::ValidationError("Order total is too large".into()))?;

        let order_status = match params.payment_method {
            PaymentMethod::CashOnDelivery => OrderStatus::Processing,
            PaymentMethod::Online => OrderStatus::Pending,
        };
        let now = Utc::now();
        Ok(Self {
            id,
            order_number: params.order_number,
            user: params.user,
            items: params.items,
            shipping_address: params.shipping_address,
            subtotal: params.subtotal,
            shipping: params.shipping,
            total,
            payment_method: params.payment_method,
            payment_status: PaymentStatus::Pending,
            order_status,
            gateway_order_id: None,
            gateway_payment_id: None,
            gateway_signature: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Administrative override. Any status may be set from any status; stock
    /// is not touched.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        if let Some(status) = patch.order_status {
            if status < self.order_status || self.order_status == OrderStatus::Cancelled {
                warn!(
                    order_id = %self.id,
                    from = %self.order_status,
                    to = %status,
                    "Administrative status override outside the lifecycle"
                );
            }
            self.order_status = status;
        }
        if let Some(payment_status) = patch.payment_status {
            self.payment_status = payment_status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::Cancel { requester } => self.cancel(&requester),
            OrderAction::AttachGatewayOrder { gateway_order_id } => {
                self.ensure_payable()?;
                self.gateway_order_id = Some(gateway_order_id);
                self.updated_at = Utc::now();
                Ok(OrderActionResult::AttachGatewayOrder)
            }
            OrderAction::MarkPaid { proof, paid_at } => self.mark_paid(proof, paid_at),
            OrderAction::MarkPaymentFailed => {
                if self.is_paid() {
                    return Err(OrderError::PaymentConflict("Order is already paid".into()));
                }
                self.payment_status = PaymentStatus::Failed;
                self.updated_at = Utc::now();
                Ok(OrderActionResult::MarkPaymentFailed(self.clone()))
            }
            OrderAction::RecordReservations { lines } => {
                // a cancellation already gave every line back, so late debits
                // settle against that restore and are not flagged
                if self.order_status != OrderStatus::Cancelled {
                    for index in lines {
                        if let Some(item) = self.items.get_mut(index) {
                            item.stock_reserved = true;
                        }
                    }
                    self.updated_at = Utc::now();
                }
                Ok(OrderActionResult::RecordReservations(self.clone()))
            }
        }
    }
}

impl Order {
    fn cancel(&mut self, requester: &str) -> Result<OrderActionResult, OrderError> {
        if !self.is_owned_by(requester) {
            return Err(OrderError::Forbidden("Not authorized to cancel this order".into()));
        }
        if !self.order_status.is_cancellable() {
            return Err(OrderError::NotCancellable(self.order_status));
        }
        self.order_status = OrderStatus::Cancelled;
        for item in &mut self.items {
            item.stock_reserved = false;
        }
        let restore = self.items.clone();
        self.updated_at = Utc::now();
        Ok(OrderActionResult::Cancel { order: self.clone(), restore })
    }

    pub fn ensure_payable(&self) -> Result<(), OrderError> {
        if self.payment_method != PaymentMethod::Online {
            return Err(OrderError::PaymentConflict(
                "Order is not set up for online payment".into(),
            ));
        }
        if self.order_status == OrderStatus::Cancelled {
            return Err(OrderError::PaymentConflict("Order has been cancelled".into()));
        }
        if self.is_paid() {
            return Err(OrderError::PaymentConflict("Order is already paid".into()));
        }
        Ok(())
    }

    fn mark_paid(
        &mut self,
        proof: PaymentProof,
        paid_at: chrono::DateTime<Utc>,
    ) -> Result<OrderActionResult, OrderError> {
        if self.is_paid() {
            if self.gateway_payment_id.as_deref() == Some(proof.gateway_payment_id.as_str()) {
                return Ok(OrderActionResult::MarkPaid { order: self.clone(), newly_paid: false });
            }
            return Err(OrderError::PaymentConflict("Order is already paid".into()));
        }
        self.ensure_payable()?;
        // the proof must be for the intent opened on this order
        if self.gateway_order_id.as_deref() != Some(proof.gateway_order_id.as_str()) {
            return Err(OrderError::GatewayMismatch);
        }

        self.payment_status = PaymentStatus::Paid;
        if self.order_status == OrderStatus::Pending {
            self.order_status = OrderStatus::Processing;
        }
        self.gateway_order_id = Some(proof.gateway_order_id);
        self.gateway_payment_id = Some(proof.gateway_payment_id);
        self.gateway_signature = Some(proof.signature);
        self.paid_at = Some(paid_at);
        self.updated_at = Utc::now();
        Ok(OrderActionResult::MarkPaid { order: self.clone(), newly_paid: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShippingAddress;
    use rust_decimal_macros::dec;

    fn line(product: &str, quantity: u32, reserved: bool) -> LineItem {
        LineItem {
            product: product.into(),
            name: product.to_uppercase(),
            quantity,
            price: dec!(100),
            stock_reserved: reserved,
        }
    }

    fn order(method: PaymentMethod, items: Vec<LineItem>) -> Order {
        Order::from_create(
            "o1".into(),
            OrderCreate {
                order_number: "XIL1".into(),
                user: "u1".into(),
                items,
                shipping_address: ShippingAddress::default(),
                subtotal: dec!(200),
                shipping: dec!(50),
                payment_method: method,
            },
        )
        .unwrap()
    }

    fn proof(payment: &str) -> PaymentProof {
        PaymentProof {
            gateway_order_id: "order_gw".into(),
            gateway_payment_id: payment.into(),
            signature: "sig".into(),
        }
    }

    #[test]
    fn test_initial_status_depends_on_payment_method() {
        let cod = order(PaymentMethod::CashOnDelivery, vec![line("a", 1, true)]);
        assert_eq!(cod.order_status, OrderStatus::Processing);
        assert_eq!(cod.total, dec!(250));

        let online = order(PaymentMethod::Online, vec![line("a", 1, false)]);
        assert_eq!(online.order_status, OrderStatus::Pending);
        assert_eq!(online.payment_status, PaymentStatus::Pending);
    }

    fn with_intent(mut order: Order) -> Order {
        order
            .handle_action(OrderAction::AttachGatewayOrder { gateway_order_id: "order_gw".into() })
            .unwrap();
        order
    }

    #[test]
    fn test_cancel_restores_every_line() {
        let mut cod = order(PaymentMethod::CashOnDelivery, vec![line("a", 2, true), line("b", 1, false)]);
        let OrderActionResult::Cancel { order, restore } =
            cod.handle_action(OrderAction::Cancel { requester: "u1".into() }).unwrap()
        else {
            panic!("unexpected result");
        };
        assert_eq!(order.order_status, OrderStatus::Cancelled);
        assert_eq!(restore, vec![line("a", 2, false), line("b", 1, false)]);

        // a second cancel is a conflict and restores nothing
        let again = cod.handle_action(OrderAction::Cancel { requester: "u1".into() });
        assert_eq!(again.unwrap_err(), OrderError::NotCancellable(OrderStatus::Cancelled));
    }

    #[test]
    fn test_cancelling_unpaid_online_order_restores_its_lines() {
        let mut online = order(PaymentMethod::Online, vec![line("a", 3, false)]);
        let OrderActionResult::Cancel { restore, .. } =
            online.handle_action(OrderAction::Cancel { requester: "u1".into() }).unwrap()
        else {
            panic!("unexpected result");
        };
        assert_eq!(restore, vec![line("a", 3, false)]);
    }

    #[test]
    fn test_cancel_rules() {
        let mut shipped = order(PaymentMethod::CashOnDelivery, vec![line("a", 1, true)]);
        shipped.on_update(OrderPatch { order_status: Some(OrderStatus::Shipped), ..Default::default() }).unwrap();
        let err = shipped.handle_action(OrderAction::Cancel { requester: "u1".into() }).unwrap_err();
        assert_eq!(err, OrderError::NotCancellable(OrderStatus::Shipped));
        assert!(shipped.items[0].stock_reserved);

        let mut other = order(PaymentMethod::CashOnDelivery, vec![line("a", 1, true)]);
        let err = other.handle_action(OrderAction::Cancel { requester: "intruder".into() }).unwrap_err();
        assert!(matches!(err, OrderError::Forbidden(_)));
    }

    #[test]
    fn test_mark_paid_is_idempotent_for_same_payment() {
        let mut online = with_intent(order(PaymentMethod::Online, vec![line("a", 1, false)]));
        let paid_at = Utc::now();
        let first = online.handle_action(OrderAction::MarkPaid { proof: proof("pay_1"), paid_at }).unwrap();
        assert!(matches!(first, OrderActionResult::MarkPaid { newly_paid: true, .. }));
        assert_eq!(online.order_status, OrderStatus::Processing);
        assert_eq!(online.gateway_payment_id.as_deref(), Some("pay_1"));

        let second = online.handle_action(OrderAction::MarkPaid { proof: proof("pay_1"), paid_at }).unwrap();
        assert!(matches!(second, OrderActionResult::MarkPaid { newly_paid: false, .. }));

        let other = online.handle_action(OrderAction::MarkPaid { proof: proof("pay_2"), paid_at });
        assert!(matches!(other, Err(OrderError::PaymentConflict(_))));
    }

    #[test]
    fn test_mark_paid_checks_recorded_gateway_order() {
        let mut online = order(PaymentMethod::Online, vec![line("a", 1, false)]);
        online
            .handle_action(OrderAction::AttachGatewayOrder { gateway_order_id: "order_other".into() })
            .unwrap();
        let err = online
            .handle_action(OrderAction::MarkPaid { proof: proof("pay_1"), paid_at: Utc::now() })
            .unwrap_err();
        assert_eq!(err, OrderError::GatewayMismatch);
        assert_eq!(online.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_mark_paid_requires_an_open_intent() {
        let mut online = order(PaymentMethod::Online, vec![line("a", 1, false)]);
        let err = online
            .handle_action(OrderAction::MarkPaid { proof: proof("pay_1"), paid_at: Utc::now() })
            .unwrap_err();
        assert_eq!(err, OrderError::GatewayMismatch);
        assert_eq!(online.payment_status, PaymentStatus::Pending);
        assert_eq!(online.order_status, OrderStatus::Pending);
    }

    #[test]
    fn test_reservations_after_cancel_are_not_flagged() {
        let mut online = with_intent(order(PaymentMethod::Online, vec![line("a", 1, false), line("b", 3, false)]));
        online.handle_action(OrderAction::MarkPaid { proof: proof("pay_1"), paid_at: Utc::now() }).unwrap();
        online.handle_action(OrderAction::Cancel { requester: "u1".into() }).unwrap();

        let result = online.handle_action(OrderAction::RecordReservations { lines: vec![0, 1] }).unwrap();
        let OrderActionResult::RecordReservations(order) = result else {
            panic!("unexpected result");
        };
        assert_eq!(order.order_status, OrderStatus::Cancelled);
        assert!(order.items.iter().all(|item| !item.stock_reserved));
    }

    #[test]
    fn test_reservations_flag_debited_lines() {
        let mut online = with_intent(order(PaymentMethod::Online, vec![line("a", 1, false), line("b", 3, false)]));
        online.handle_action(OrderAction::MarkPaid { proof: proof("pay_1"), paid_at: Utc::now() }).unwrap();
        online.handle_action(OrderAction::RecordReservations { lines: vec![1, 7] }).unwrap();
        assert!(!online.items[0].stock_reserved);
        assert!(online.items[1].stock_reserved);
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        let err = Order::from_create(
            "o1".into(),
            OrderCreate {
                order_number: "XIL1".into(),
                user: "u1".into(),
                items: vec![line("a", 1, true)],
                shipping_address: ShippingAddress::default(),
                subtotal: Decimal::MAX,
                shipping: dec!(1),
                payment_method: PaymentMethod::CashOnDelivery,
            },
        )
        .unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));
    }

    #[test]
    fn test_payment_failure_cannot_downgrade_paid_order() {
        let mut online = with_intent(order(PaymentMethod::Online, vec![line("a", 1, false)]));
        online.handle_action(OrderAction::MarkPaymentFailed).unwrap();
        assert_eq!(online.payment_status, PaymentStatus::Failed);

        online.handle_action(OrderAction::MarkPaid { proof: proof("pay_1"), paid_at: Utc::now() }).unwrap();
        let err = online.handle_action(OrderAction::MarkPaymentFailed);
        assert!(matches!(err, Err(OrderError::PaymentConflict(_))));
    }
}
