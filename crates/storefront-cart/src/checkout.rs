//! Checkout: contact/address validation and order construction.
//!
//! There is no payment processing. An order is a priced snapshot of the
//! cart at the moment of checkout, with payment left `pending`.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::{Decimal, ProductId, VariantId};

use crate::cart::Cart;
use crate::pricing::PriceBreakdown;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Where to ship an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

/// Everything the customer supplies at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub email: String,
    pub address: ShippingAddress,
}

impl CheckoutDetails {
    /// Names of fields that are missing or malformed, in form order.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut invalid = Vec::new();
        if !EMAIL.is_match(&self.email) {
            invalid.push("email");
        }
        let a = &self.address;
        let required = [
            ("first_name", &a.first_name),
            ("last_name", &a.last_name),
            ("address_line1", &a.address_line1),
            ("city", &a.city),
            ("state", &a.state),
            ("postal_code", &a.postal_code),
            ("phone", &a.phone),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                invalid.push(name);
            }
        }
        invalid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// One purchased line, flattened for display and record keeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: String,
    pub product_image: String,
    pub size: String,
    pub color: String,
    pub price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    pub email: String,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
}

/// Human-facing order number derived from the order id.
pub fn order_number_for(id: &Uuid) -> String {
    let hex = id.simple().to_string();
    format!("ORD-{}", hex[..8].to_uppercase())
}

/// Builds an order from the cart's current lines and totals.
///
/// Does not check the cart; callers validate first.
pub fn build_order(cart: &Cart, details: &CheckoutDetails, created_at: DateTime<Utc>) -> Order {
    let id = Uuid::new_v4();
    let PriceBreakdown {
        subtotal,
        shipping,
        tax,
        total,
    } = cart.price_breakdown();
    let items = cart
        .lines()
        .iter()
        .map(|l| OrderItem {
            product_id: l.product.id.clone(),
            variant_id: l.variant.id.clone(),
            product_name: l.product.name.clone(),
            product_image: l.product.primary_image().unwrap_or_default().to_string(),
            size: l.variant.size.clone(),
            color: l.variant.color.clone(),
            price: l.variant.price,
            quantity: l.quantity,
            line_total: l.line_total(),
        })
        .collect();

    Order {
        id,
        order_number: order_number_for(&id),
        status: OrderStatus::Confirmed,
        payment_status: PaymentStatus::Pending,
        subtotal,
        shipping,
        tax,
        total,
        items,
        email: details.email.trim().to_string(),
        shipping_address: details.address.clone(),
        created_at,
    }
}
