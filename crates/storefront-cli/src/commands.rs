//! Subcommand implementations.
//!
//! Each `run_*` function prints its result as JSON and returns a
//! [`CliError`] on failure; `main` maps that to the exit code.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use storefront_cart::{
    CartError, CartLedger, CheckoutDetails, CheckoutError, ShippingAddress,
};
use storefront_core::{
    format_price, Catalog, CatalogData, CatalogSource, CoreError, LineId, Product, ProductId,
    VariantId,
};
use storefront_storage::{
    clear_catalog_overrides, load_catalog_overrides, save_catalog_overrides, SqliteStore,
    StorageError,
};

use crate::CheckoutArgs;

/// Why a command failed.
#[derive(Debug, Error)]
pub enum CliError {
    /// The operation was refused (bad input, stock, cap, ...).
    #[error("{0}")]
    Refused(String),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("catalog error: {0}")]
    Catalog(#[from] CoreError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CliError {
    /// Exit code: 1 = operation refused, 3 = storage or I/O error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Refused(_) | CliError::Catalog(_) => 1,
            CliError::Io { .. } | CliError::Storage(_) => 3,
        }
    }
}

impl From<CartError> for CliError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::Storage(e) => CliError::Storage(e),
            other => CliError::Refused(other.to_string()),
        }
    }
}

impl From<CheckoutError> for CliError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::Storage(e) => CliError::Storage(e),
            other => CliError::Refused(other.to_string()),
        }
    }
}

/// The catalog and ledger for one invocation.
pub struct Session {
    pub catalog: Catalog,
    pub ledger: CartLedger<SqliteStore>,
}

impl Session {
    /// Opens the database, builds the catalog and loads the ledger.
    ///
    /// The catalog is the static file (if any) with stored overrides merged
    /// on top. Overrides that no longer fit the static catalog are skipped
    /// with a warning.
    pub fn open(db_path: &str, catalog_path: Option<&Path>) -> Result<Self, CliError> {
        let store = SqliteStore::new(db_path)?;

        let mut catalog = match catalog_path {
            Some(path) => Catalog::from_json(&read_file(path)?)?,
            None => Catalog::new(),
        };
        let overrides = load_catalog_overrides(&store)?;
        if !overrides.is_empty() {
            if let Err(e) = catalog.merge_overrides(overrides) {
                tracing::warn!(error = %e, "ignoring stored catalog overrides");
            }
        }

        let ledger = CartLedger::init(store);
        Ok(Session { catalog, ledger })
    }

    fn product(&self, id: &str) -> Result<Product, CliError> {
        self.catalog
            .product(&ProductId::new(id))
            .ok_or_else(|| CliError::Refused(format!("unknown product '{}'", id)))
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}

// ---------------------------------------------------------------------------
// catalog
// ---------------------------------------------------------------------------

pub fn run_catalog_list(session: &Session) -> Result<(), CliError> {
    let products: Vec<_> = session
        .catalog
        .products()
        .map(|p| {
            json!({
                "id": p.id,
                "slug": p.slug,
                "name": p.name,
                "price": format_price(p.base_price),
                "active": p.is_active,
                "variants": session.catalog.variants_for(&p.id).len(),
            })
        })
        .collect();
    print_json(&products);
    Ok(())
}

pub fn run_catalog_show(session: &Session, slug: &str) -> Result<(), CliError> {
    let product = session
        .catalog
        .product_by_slug(slug)
        .ok_or_else(|| CliError::Refused(format!("no product with slug '{}'", slug)))?;
    print_json(&json!({
        "product": product,
        "variants": session.catalog.variants_for(&product.id),
        "sizes": session.catalog.sizes_for(&product.id),
        "colors": session.catalog.colors_for(&product.id),
    }));
    Ok(())
}

/// Validates the file against the current catalog, then folds its records
/// into the stored overrides.
pub fn run_catalog_import(session: &mut Session, file: &Path) -> Result<(), CliError> {
    let incoming: CatalogData =
        serde_json::from_str(&read_file(file)?).map_err(CoreError::from)?;

    let mut next = session.catalog.clone();
    let touched = next.merge_overrides(incoming.clone())?;

    let store = session.ledger.store_mut();
    let mut stored = load_catalog_overrides(&*store)?;
    upsert_overrides(&mut stored, incoming);
    save_catalog_overrides(store, &stored)?;
    session.catalog = next;

    print_json(&json!({
        "imported": touched,
        "stored_products": stored.products.len(),
        "stored_variants": stored.variants.len(),
    }));
    Ok(())
}

pub fn run_catalog_reset(session: &mut Session) -> Result<(), CliError> {
    clear_catalog_overrides(session.ledger.store_mut())?;
    print_json(&json!({ "reset": true }));
    Ok(())
}

fn upsert_overrides(stored: &mut CatalogData, incoming: CatalogData) {
    for product in incoming.products {
        match stored.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => *slot = product,
            None => stored.products.push(product),
        }
    }
    for variant in incoming.variants {
        match stored.variants.iter_mut().find(|v| v.id == variant.id) {
            Some(slot) => *slot = variant,
            None => stored.variants.push(variant),
        }
    }
}

// ---------------------------------------------------------------------------
// cart
// ---------------------------------------------------------------------------

pub fn run_cart_show(session: &Session) -> Result<(), CliError> {
    let ledger = &session.ledger;
    let lines: Vec<_> = ledger
        .items()
        .iter()
        .map(|l| {
            json!({
                "id": l.id,
                "product": l.product.name,
                "size": l.variant.size,
                "color": l.variant.color,
                "unit_price": format_price(l.variant.price),
                "quantity": l.quantity,
                "line_total": format_price(l.line_total()),
            })
        })
        .collect();
    print_json(&json!({
        "items": lines,
        "item_count": ledger.item_count(),
        "subtotal": format_price(ledger.subtotal()),
        "shipping": format_price(ledger.shipping()),
        "tax": format_price(ledger.tax()),
        "total": format_price(ledger.total_price()),
    }));
    Ok(())
}

pub fn run_cart_add(
    session: &mut Session,
    product_id: &str,
    variant_id: Option<&str>,
    size: Option<&str>,
    color: Option<&str>,
    qty: i64,
) -> Result<(), CliError> {
    let product = session.product(product_id)?;
    let variant = match variant_id {
        Some(id) => {
            let v = session
                .catalog
                .variant(&VariantId::new(id))
                .ok_or_else(|| CliError::Refused(format!("unknown variant '{}'", id)))?;
            if v.product_id != product.id {
                return Err(CliError::Refused(format!(
                    "variant '{}' belongs to product '{}'",
                    id, v.product_id
                )));
            }
            v
        }
        None => session
            .catalog
            .resolve_variant(&product.id, size, color)
            .ok_or_else(|| CliError::Refused(format!("unknown product '{}'", product_id)))?,
    };

    let outcome = session.ledger.try_add_item(&product, &variant, qty)?;
    print_json(&outcome);
    Ok(())
}

pub fn run_cart_update(session: &mut Session, line: &str, qty: f64) -> Result<(), CliError> {
    let outcome = session.ledger.try_update_quantity(&LineId::new(line), qty)?;
    print_json(&outcome);
    Ok(())
}

pub fn run_cart_remove(session: &mut Session, line: &str) -> Result<(), CliError> {
    let outcome = session.ledger.try_remove_item(&LineId::new(line))?;
    print_json(&outcome);
    Ok(())
}

pub fn run_cart_clear(session: &mut Session) -> Result<(), CliError> {
    let outcome = session.ledger.try_clear_cart()?;
    print_json(&outcome);
    Ok(())
}

/// Prints the lines the current catalog can no longer fulfil; fails if
/// there are any.
pub fn run_cart_validate(session: &Session) -> Result<(), CliError> {
    let invalid = session.ledger.invalid_lines(&session.catalog);
    print_json(&json!({
        "valid": invalid.is_empty(),
        "invalid_lines": invalid,
    }));
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(CliError::Refused(format!(
            "{} line(s) can no longer be fulfilled",
            invalid.len()
        )))
    }
}

// ---------------------------------------------------------------------------
// wishlist
// ---------------------------------------------------------------------------

pub fn run_wishlist_list(session: &Session) -> Result<(), CliError> {
    print_json(session.ledger.wishlist());
    Ok(())
}

pub fn run_wishlist_add(session: &mut Session, product_id: &str) -> Result<(), CliError> {
    let product = session.product(product_id)?;
    session.ledger.try_add_to_wishlist(&product)?;
    print_json(&json!({ "saved": product.id }));
    Ok(())
}

pub fn run_wishlist_remove(session: &mut Session, product_id: &str) -> Result<(), CliError> {
    let removed = session
        .ledger
        .try_remove_from_wishlist(&ProductId::new(product_id))?;
    print_json(&json!({ "removed": removed }));
    Ok(())
}

pub fn run_wishlist_toggle(session: &mut Session, product_id: &str) -> Result<(), CliError> {
    let product = session.product(product_id)?;
    let saved = if session.ledger.is_in_wishlist(&product.id) {
        session.ledger.try_remove_from_wishlist(&product.id)?;
        false
    } else {
        session.ledger.try_add_to_wishlist(&product)?;
        true
    };
    print_json(&json!({ "product": product.id, "saved": saved }));
    Ok(())
}

pub fn run_wishlist_clear(session: &mut Session) -> Result<(), CliError> {
    let cleared = session.ledger.try_clear_wishlist()?;
    print_json(&json!({ "cleared": cleared }));
    Ok(())
}

pub fn run_wishlist_move(session: &mut Session, product_id: &str) -> Result<(), CliError> {
    let outcome = session
        .ledger
        .try_move_wishlist_to_cart(&ProductId::new(product_id), &session.catalog)?;
    print_json(&outcome);
    Ok(())
}

// ---------------------------------------------------------------------------
// checkout
// ---------------------------------------------------------------------------

pub fn run_checkout(session: &mut Session, args: CheckoutArgs) -> Result<(), CliError> {
    let details = CheckoutDetails {
        email: args.email,
        address: ShippingAddress {
            first_name: args.first_name,
            last_name: args.last_name,
            address_line1: args.address_line1,
            address_line2: args.address_line2,
            city: args.city,
            state: args.state,
            postal_code: args.postal_code,
            country: args.country,
            phone: args.phone,
        },
    };
    let order = session.ledger.checkout(&details)?;
    print_json(&order);
    Ok(())
}
