use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
    #[serde(rename = "ONLINE", alias = "RAZORPAY")]
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Customers may only cancel orders that have not left the warehouse.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order. `price` is the unit price captured from the catalog
/// when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: String,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    /// Whether `quantity` is currently debited from the product's stock.
    pub stock_reserved: bool,
}

impl LineItem {
    /// `None` when the amount does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

impl ShippingAddress {
    /// Names of the required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// The three opaque tokens returned by the payment gateway after a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub user: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new order. Totals are computed by the checkout
/// orchestrator before the order reaches the store.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub order_number: String,
    pub user: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub payment_method: PaymentMethod,
}

/// Administrative status override. Applied without consulting the lifecycle
/// graph.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub order_status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl Order {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user == user_id
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    pub product: String,
    pub quantity: u32,
}

/// Largest shipping charge accepted at checkout.
pub const MAX_SHIPPING: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Body of `POST /orders`. `subtotal` and `total` are advisory; the server
/// recomputes both from catalog prices.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl CheckoutRequest {
    /// Shape checks that need no store access.
    pub fn validate(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("No order items".into());
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(format!("Quantity for {} must be at least 1", item.product));
        }
        if self.shipping < Decimal::ZERO {
            return Err("Shipping cannot be negative".into());
        }
        if self.shipping > MAX_SHIPPING {
            return Err(format!("Shipping cannot exceed {MAX_SHIPPING}"));
        }
        let missing = self.shipping_address.missing_fields();
        if !missing.is_empty() {
            return Err(format!("Shipping address is missing: {}", missing.join(", ")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_request_accepts_legacy_method_name() {
        let request: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "items": [{ "product": "p1", "quantity": 2, "price": 999 }],
            "shippingAddress": {
                "name": "Asha", "email": "asha@example.com", "phone": "9999999999",
                "address": "1 Tea Garden Rd", "city": "Jorhat", "state": "Assam", "pincode": "785001"
            },
            "shipping": 50,
            "paymentMethod": "RAZORPAY",
            "total": 1
        }))
        .unwrap();
        assert_eq!(request.payment_method, PaymentMethod::Online);
        assert_eq!(request.total, Some(Decimal::ONE));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_checkout_validation_messages() {
        let mut request = CheckoutRequest {
            items: vec![],
            shipping_address: ShippingAddress::default(),
            shipping: Decimal::ZERO,
            payment_method: PaymentMethod::CashOnDelivery,
            subtotal: None,
            total: None,
        };
        assert_eq!(request.validate(), Err("No order items".to_string()));

        request.items.push(CheckoutItem { product: "p1".into(), quantity: 1 });
        let err = request.validate().unwrap_err();
        assert!(err.contains("name") && err.contains("pincode"));
    }

    #[test]
    fn test_payment_method_defaults_to_cash_on_delivery() {
        let request: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "items": [{ "product": "p1", "quantity": 1 }],
            "shippingAddress": { "name": "Asha" }
        }))
        .unwrap();
        assert_eq!(request.payment_method, PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_shipping_is_bounded() {
        let mut request: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "items": [{ "product": "p1", "quantity": 1 }],
            "shippingAddress": {
                "name": "Asha", "email": "asha@example.com", "phone": "9999999999",
                "address": "1 Tea Garden Rd", "city": "Jorhat", "state": "Assam", "pincode": "785001"
            },
            "shipping": 1e27
        }))
        .unwrap();
        assert_eq!(request.validate(), Err("Shipping cannot exceed 100000".to_string()));

        request.shipping = MAX_SHIPPING;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_line_total_overflow_is_none() {
        let line = LineItem {
            product: "p1".into(),
            name: "P1".into(),
            quantity: 2,
            price: Decimal::MAX,
            stock_reserved: false,
        };
        assert_eq!(line.line_total(), None);
    }
}
