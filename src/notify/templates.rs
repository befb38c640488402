use crate::domain::{Order, User};

use super::EmailMessage;

fn short_ref(order: &Order) -> &str {
    let start = order.id.len().saturating_sub(8);
    &order.id[start..]
}

fn item_lines(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| format!("  {} x{} @ {}", item.name, item.quantity, item.price))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sent to the shipping address email, falling back to the account email.
pub fn order_confirmation(order: &Order, customer: &User) -> EmailMessage {
    let to = if order.shipping_address.email.trim().is_empty() {
        customer.email.clone()
    } else {
        order.shipping_address.email.clone()
    };
    EmailMessage {
        to,
        subject: format!("Order Confirmed - #{}", short_ref(order)),
        text: format!(
            "Hi {},\n\nThank you for your order {}.\n\n{}\n\nSubtotal: {}\nShipping: {}\nTotal: {}\n",
            customer.name,
            order.order_number,
            item_lines(order),
            order.subtotal,
            order.shipping,
            order.total,
        ),
    }
}

pub fn admin_order_alert(order: &Order, customer: &User, admin: &str) -> EmailMessage {
    EmailMessage {
        to: admin.to_string(),
        subject: format!("New Order Received - #{}", short_ref(order)),
        text: format!(
            "Order {} from {} <{}>\nPayment: {:?} / {:?}\n\n{}\n\nTotal: {}\n",
            order.order_number,
            customer.name,
            customer.email,
            order.payment_method,
            order.payment_status,
            item_lines(order),
            order.total,
        ),
    }
}
