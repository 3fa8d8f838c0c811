//! Shopping cart ledger for the storefront.
//!
//! The cart is a list of (product, variant, quantity) lines with snapshot
//! copies of the product and variant taken when the line was added. Prices,
//! shipping and tax are derived from those snapshots on demand.
//!
//! # Architecture
//!
//! - [`Cart`] and [`Wishlist`] are pure values. Every operation returns a
//!   tagged result and touches nothing outside itself.
//! - [`CartLedger`] binds them to a [`StateStore`](storefront_storage::StateStore),
//!   persists after each change, and offers the boolean facade the UI uses.
//!
//! # Modules
//!
//! - [`cart`]: lines, quantity rules, derived prices
//! - [`checkout`]: checkout details validation and order construction
//! - [`constants`]: quantity cap, shipping and tax figures
//! - [`error`]: CartError and CheckoutError
//! - [`ledger`]: CartLedger, persistence and rollback
//! - [`line`]: CartLine
//! - [`persist`]: persisted blob shape and version
//! - [`pricing`]: subtotal, shipping, tax, total
//! - [`quantity`]: requested-quantity normalization
//! - [`wishlist`]: saved products

pub mod cart;
pub mod checkout;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod line;
pub mod persist;
pub mod pricing;
pub mod quantity;
pub mod wishlist;

pub use cart::{Cart, CartOutcome};
pub use checkout::{
    build_order, order_number_for, CheckoutDetails, Order, OrderItem, OrderStatus, PaymentStatus,
    ShippingAddress,
};
pub use constants::{FREE_SHIPPING_THRESHOLD, MAX_QUANTITY_PER_ITEM, STANDARD_SHIPPING_COST, TAX_RATE};
pub use error::{CartError, CheckoutError};
pub use ledger::{CartLedger, LedgerConfig};
pub use line::CartLine;
pub use persist::{PersistedState, CART_STORAGE_KEY, CART_STORAGE_VERSION};
pub use pricing::PriceBreakdown;
pub use quantity::RequestedQuantity;
pub use wishlist::{Wishlist, WishlistEntry};
