//! End-to-end ledger scenarios against both store backends.
//!
//! SQLite tests use a fresh temp directory per test.

use storefront_cart::{
    CartError, CartLedger, CheckoutDetails, LedgerConfig, ShippingAddress, CART_STORAGE_KEY,
};
use storefront_core::{Catalog, CatalogSource, Decimal, LineId, ProductId, VariantId};
use storefront_storage::{InMemoryStore, SqliteStore, StateStore, StorageError};

const CATALOG: &str = r#"{
    "products": [
        {"id": "P1", "name": "Court Classic", "slug": "court-classic", "base_price": "159.99",
         "images": [{"id": "i2", "product_id": "P1", "url": "/img/side.jpg", "position": 2},
                    {"id": "i1", "product_id": "P1", "url": "/img/front.jpg", "position": 1}]},
        {"id": "P2", "name": "Crew Sock", "slug": "crew-sock", "base_price": "40.01"},
        {"id": "P3", "name": "Canvas Tote", "slug": "canvas-tote", "base_price": "25.00"}
    ],
    "variants": [
        {"id": "V1", "product_id": "P1", "size": "9", "color": "White", "price": "159.99", "inventory_count": 15},
        {"id": "V2", "product_id": "P2", "size": "M", "color": "Grey", "price": "40.01", "inventory_count": 20},
        {"id": "V5", "product_id": "P2", "size": "L", "color": "Grey", "price": "40.01", "inventory_count": 5}
    ]
}"#;

fn catalog() -> Catalog {
    Catalog::from_json(CATALOG).unwrap()
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn db_path(dir: &tempfile::TempDir) -> String {
    dir.path().join("storefront.db").to_string_lossy().to_string()
}

fn details() -> CheckoutDetails {
    CheckoutDetails {
        email: "sam@example.com".into(),
        address: ShippingAddress {
            first_name: "Sam".into(),
            last_name: "Rivera".into(),
            address_line1: "12 Dock St".into(),
            address_line2: Some("Unit 4".into()),
            city: "Portland".into(),
            state: "OR".into(),
            postal_code: "97201".into(),
            country: "United States".into(),
            phone: "555-0100".into(),
        },
    }
}

fn add(ledger: &mut CartLedger<impl StateStore>, c: &Catalog, p: &str, v: &str, q: i64) -> bool {
    let product = c.product(&ProductId::new(p)).unwrap();
    let variant = c.variant(&VariantId::new(v)).unwrap();
    ledger.add_item(&product, &variant, q)
}

#[test]
fn single_item_below_free_shipping() {
    let c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    assert!(add(&mut ledger, &c, "P2", "V2", 1));

    assert_eq!(ledger.subtotal(), d("40.01"));
    assert_eq!(ledger.shipping(), d("10.00"));
    assert_eq!(ledger.tax(), d("3.20"));
    assert_eq!(ledger.total_price(), d("53.21"));
}

#[test]
fn single_item_above_free_shipping() {
    let c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    assert!(add(&mut ledger, &c, "P1", "V1", 1));

    assert_eq!(ledger.subtotal(), d("159.99"));
    assert_eq!(ledger.shipping(), Decimal::ZERO);
    assert_eq!(ledger.tax(), d("12.80"));
    assert_eq!(ledger.total_price(), d("172.79"));
}

#[test]
fn reaching_threshold_drops_shipping() {
    let c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    assert!(add(&mut ledger, &c, "P1", "V1", 1));
    assert!(add(&mut ledger, &c, "P2", "V2", 1));

    assert_eq!(ledger.subtotal(), d("200.00"));
    assert_eq!(ledger.shipping(), Decimal::ZERO);
    assert_eq!(ledger.tax(), d("16.00"));
    assert_eq!(ledger.total_price(), d("216.00"));
}

#[test]
fn clamped_request_still_checked_against_stock() {
    let c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    // 11 clamps to 10, which is more than the 5 in stock.
    assert!(!add(&mut ledger, &c, "P2", "V5", 11));
    assert!(ledger.is_empty());
    assert!(add(&mut ledger, &c, "P2", "V5", 5));
    assert_eq!(ledger.item_count(), 5);
}

#[test]
fn same_pair_merges_into_one_line() {
    let c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    assert!(add(&mut ledger, &c, "P2", "V2", 3));
    assert!(add(&mut ledger, &c, "P2", "V2", 4));
    assert_eq!(ledger.items().len(), 1);
    assert_eq!(ledger.items()[0].quantity, 7);

    let product = c.product(&ProductId::new("P2")).unwrap();
    let variant = c.variant(&VariantId::new("V2")).unwrap();
    assert!(matches!(
        ledger.try_add_item(&product, &variant, 4),
        Err(CartError::QuantityCapExceeded { existing: 7, requested: 4, cap: 10, .. })
    ));
    assert_eq!(ledger.items()[0].quantity, 7);
}

#[test]
fn update_below_one_removes_line() {
    let c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    add(&mut ledger, &c, "P2", "V2", 3);
    assert!(ledger.update_quantity(&LineId::new("P2-V2"), 0));
    assert!(ledger.is_empty());
}

#[test]
fn fractional_and_non_finite_quantities() {
    let c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    add(&mut ledger, &c, "P2", "V2", 1);
    let line = LineId::new("P2-V2");

    assert!(ledger.update_quantity(&line, 3.7));
    assert_eq!(ledger.item_count(), 3);
    assert!(!ledger.update_quantity(&line, f64::NAN));
    assert!(ledger.update_quantity(&line, 0.4));
    assert!(ledger.is_empty());
}

#[test]
fn live_validation_sees_catalog_changes() {
    let mut c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    add(&mut ledger, &c, "P2", "V5", 4);
    let line = LineId::new("P2-V5");
    assert!(ledger.validate_item_live(&line, &c));

    let mut restocked = c.variant(&VariantId::new("V5")).unwrap();
    restocked.inventory_count = 2;
    c.merge_overrides(storefront_core::CatalogData {
        products: vec![],
        variants: vec![restocked],
    })
    .unwrap();

    assert!(ledger.validate_item(&line));
    assert!(!ledger.validate_item_live(&line, &c));
    assert_eq!(ledger.invalid_lines(&c), vec![line]);
}

#[test]
fn sqlite_round_trip_preserves_count_and_subtotal() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let c = catalog();

    let (count, subtotal) = {
        let mut ledger = CartLedger::init(SqliteStore::new(&path).unwrap());
        add(&mut ledger, &c, "P1", "V1", 2);
        add(&mut ledger, &c, "P2", "V5", 3);
        ledger.add_to_wishlist(&c.product(&ProductId::new("P3")).unwrap());
        (ledger.item_count(), ledger.subtotal())
    };

    let reloaded = CartLedger::init(SqliteStore::new(&path).unwrap());
    assert_eq!(reloaded.item_count(), count);
    assert_eq!(reloaded.subtotal(), subtotal);
    assert_eq!(reloaded.subtotal(), d("440.01"));
    assert!(reloaded.is_in_wishlist(&ProductId::new("P3")));
}

#[test]
fn version_zero_blob_is_migrated() {
    let mut store = InMemoryStore::new();
    // Pre-wishlist blob: no version field and no wishlist array.
    store
        .set(
            CART_STORAGE_KEY,
            r#"{"state":{"items":[{"id":"P2-V2",
                "product":{"id":"P2","name":"Crew Sock","base_price":40.01},
                "variant":{"id":"V2","product_id":"P2","price":40.01,"inventory_count":20},
                "quantity":2}]}}"#,
        )
        .unwrap();

    let ledger = CartLedger::load(store, LedgerConfig::default()).unwrap();
    assert_eq!(ledger.item_count(), 2);
    assert_eq!(ledger.subtotal(), d("80.02"));
    assert_eq!(ledger.wishlist_count(), 0);
}

#[test]
fn future_version_blob_is_rejected() {
    let mut store = InMemoryStore::new();
    store
        .set(CART_STORAGE_KEY, r#"{"state":{"items":[]},"version":2}"#)
        .unwrap();

    let err = CartLedger::load(store.clone(), LedgerConfig::default())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        StorageError::UnsupportedVersion {
            found: 2,
            supported: 1,
            ..
        }
    ));

    // The lenient loader starts empty and the next write replaces the blob.
    let c = catalog();
    let mut ledger = CartLedger::init(store);
    assert!(ledger.is_empty());
    add(&mut ledger, &c, "P2", "V2", 1);
    let raw = ledger.store().get(CART_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], 1);
}

#[test]
fn checkout_clears_persisted_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let c = catalog();

    let order = {
        let mut ledger = CartLedger::init(SqliteStore::new(&path).unwrap());
        add(&mut ledger, &c, "P1", "V1", 1);
        add(&mut ledger, &c, "P2", "V2", 1);
        ledger.checkout(&details()).unwrap()
    };

    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].product_image, "/img/front.jpg");
    assert_eq!(order.total, d("216.00"));
    assert_eq!(order.shipping_address.address_line2.as_deref(), Some("Unit 4"));

    let reloaded = CartLedger::init(SqliteStore::new(&path).unwrap());
    assert!(reloaded.is_empty());
}

#[test]
fn order_serializes_with_string_money() {
    let c = catalog();
    let mut ledger = CartLedger::init(InMemoryStore::new());
    add(&mut ledger, &c, "P1", "V1", 1);
    let order = ledger.place_order(&details()).unwrap();

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["status"], "confirmed");
    assert_eq!(json["payment_status"], "pending");
    assert_eq!(json["total"], "172.79");
    assert_eq!(json["items"][0]["quantity"], 1);
}
