//! The cart ledger: the session's cart and wishlist, persisted after every
//! change.
//!
//! [`CartLedger`] owns a [`Cart`], a [`Wishlist`] and the [`StateStore`]
//! they are saved to. It is created explicitly by the application root
//! (there is no global instance) and loads its state once in
//! [`CartLedger::init`].
//!
//! Two API layers:
//! - **`try_*` methods** return the tagged [`CartError`] so callers can
//!   tell why something was refused.
//! - **Boolean facade** (`add_item`, `update_quantity`, ...) collapses every
//!   failure to `false` / no-op and logs the reason, for callers that only
//!   branch on success.
//!
//! A mutation is written to the store before the call returns. If the write
//! fails, the in-memory state is restored to what it was before the call.

use chrono::Utc;

use storefront_core::{CatalogSource, Decimal, LineId, Product, ProductId, Variant};
use storefront_storage::{load_versioned, save_versioned, StateStore, StorageError};

use crate::cart::{Cart, CartOutcome};
use crate::checkout::{build_order, CheckoutDetails, Order};
use crate::error::{CartError, CheckoutError};
use crate::line::CartLine;
use crate::persist::{
    migrate_state, PersistedState, PersistedStateRef, CART_STORAGE_KEY, CART_STORAGE_VERSION,
};
use crate::pricing::PriceBreakdown;
use crate::quantity::RequestedQuantity;
use crate::wishlist::{Wishlist, WishlistEntry};

/// Ledger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Key the ledger blob is stored under.
    pub storage_key: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            storage_key: CART_STORAGE_KEY.to_string(),
        }
    }
}

/// The session's cart and wishlist, bound to a store.
pub struct CartLedger<S: StateStore> {
    store: S,
    config: LedgerConfig,
    cart: Cart,
    wishlist: Wishlist,
}

impl<S: StateStore> CartLedger<S> {
    /// Loads the ledger from `store` under the default key.
    ///
    /// Unreadable or too-new state is logged and replaced by an empty
    /// ledger; it is overwritten on the first mutation.
    pub fn init(store: S) -> Self {
        Self::init_with_config(store, LedgerConfig::default())
    }

    /// Like [`CartLedger::init`] with explicit settings.
    pub fn init_with_config(store: S, config: LedgerConfig) -> Self {
        let state = match read_state(&store, &config.storage_key) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    key = %config.storage_key,
                    error = %e,
                    "discarding unreadable cart state"
                );
                PersistedState::default()
            }
        };
        Self::from_state(store, config, state)
    }

    /// Loads the ledger, failing instead of discarding unreadable state.
    pub fn load(store: S, config: LedgerConfig) -> Result<Self, StorageError> {
        let state = read_state(&store, &config.storage_key)?;
        Ok(Self::from_state(store, config, state))
    }

    fn from_state(store: S, config: LedgerConfig, state: PersistedState) -> Self {
        let cart = Cart::from_lines(state.items);
        let wishlist = Wishlist::from_entries(state.wishlist);
        tracing::debug!(
            key = %config.storage_key,
            lines = cart.lines().len(),
            wishlist = wishlist.len(),
            "cart ledger loaded"
        );
        CartLedger {
            store,
            config,
            cart,
            wishlist,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    ///
    /// Anything written under the ledger's own key is overwritten by the
    /// next mutation.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Owned copy of the state as it would be persisted.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            items: self.cart.lines().to_vec(),
            wishlist: self.wishlist.entries().to_vec(),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    // -------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------

    fn persist(&mut self) -> Result<(), StorageError> {
        let state = PersistedStateRef {
            items: self.cart.lines(),
            wishlist: self.wishlist.entries(),
        };
        save_versioned(
            &mut self.store,
            &self.config.storage_key,
            CART_STORAGE_VERSION,
            &state,
        )
    }

    /// Persists the current state, restoring `before` if the write fails.
    fn persist_or_restore(
        &mut self,
        op: &'static str,
        before: (Cart, Wishlist),
    ) -> Result<(), StorageError> {
        match self.persist() {
            Ok(()) => {
                tracing::debug!(
                    op,
                    items = self.cart.item_count(),
                    wishlist = self.wishlist.len(),
                    "cart state persisted"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(op, error = %e, "failed to persist cart state, rolling back");
                (self.cart, self.wishlist) = before;
                Err(e)
            }
        }
    }

    /// Runs a mutation and persists it when it reports a change.
    ///
    /// `f` returns its value plus whether anything changed.
    fn commit<T, F>(&mut self, op: &'static str, f: F) -> Result<T, CartError>
    where
        F: FnOnce(&mut Cart, &mut Wishlist) -> Result<(T, bool), CartError>,
    {
        let before = (self.cart.clone(), self.wishlist.clone());
        let (value, changed) = match f(&mut self.cart, &mut self.wishlist) {
            Ok(done) => done,
            Err(e) => {
                (self.cart, self.wishlist) = before;
                return Err(e);
            }
        };
        if changed {
            self.persist_or_restore(op, before)?;
        }
        Ok(value)
    }

    // -------------------------------------------------------------------
    // Cart mutations (tagged)
    // -------------------------------------------------------------------

    pub fn try_add_item(
        &mut self,
        product: &Product,
        variant: &Variant,
        quantity: impl Into<RequestedQuantity>,
    ) -> Result<CartOutcome, CartError> {
        let quantity = quantity.into();
        self.commit("add_item", |cart, _| {
            let outcome = cart.add(product, variant, quantity)?;
            let changed = outcome.is_mutation();
            Ok((outcome, changed))
        })
    }

    pub fn try_remove_item(&mut self, line_id: &LineId) -> Result<CartOutcome, CartError> {
        self.commit("remove_item", |cart, _| {
            let outcome = cart.remove(line_id);
            let changed = outcome.is_mutation();
            Ok((outcome, changed))
        })
    }

    pub fn try_update_quantity(
        &mut self,
        line_id: &LineId,
        quantity: impl Into<RequestedQuantity>,
    ) -> Result<CartOutcome, CartError> {
        let quantity = quantity.into();
        self.commit("update_quantity", |cart, _| {
            let outcome = cart.update_quantity(line_id, quantity)?;
            let changed = outcome.is_mutation();
            Ok((outcome, changed))
        })
    }

    pub fn try_clear_cart(&mut self) -> Result<CartOutcome, CartError> {
        self.commit("clear_cart", |cart, _| Ok((cart.clear(), true)))
    }

    // -------------------------------------------------------------------
    // Cart mutations (boolean facade)
    // -------------------------------------------------------------------

    /// Adds `quantity` of a variant. Returns false if anything refused it.
    pub fn add_item(
        &mut self,
        product: &Product,
        variant: &Variant,
        quantity: impl Into<RequestedQuantity>,
    ) -> bool {
        let result = self.try_add_item(product, variant, quantity);
        succeeded("add_item", result)
    }

    /// Adds a single unit.
    pub fn add_one(&mut self, product: &Product, variant: &Variant) -> bool {
        self.add_item(product, variant, 1)
    }

    /// Removes a line if present.
    pub fn remove_item(&mut self, line_id: &LineId) {
        let result = self.try_remove_item(line_id);
        succeeded("remove_item", result);
    }

    /// Sets a line's quantity; below one removes the line.
    pub fn update_quantity(
        &mut self,
        line_id: &LineId,
        quantity: impl Into<RequestedQuantity>,
    ) -> bool {
        let result = self.try_update_quantity(line_id, quantity);
        succeeded("update_quantity", result)
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) {
        let result = self.try_clear_cart();
        succeeded("clear_cart", result);
    }

    // -------------------------------------------------------------------
    // Cart queries
    // -------------------------------------------------------------------

    pub fn items(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.cart.line(line_id)
    }

    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    pub fn shipping(&self) -> Decimal {
        self.cart.shipping()
    }

    pub fn tax(&self) -> Decimal {
        self.cart.tax()
    }

    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    pub fn price_breakdown(&self) -> PriceBreakdown {
        self.cart.price_breakdown()
    }

    /// Snapshot check: the line exists and its captured variant was in stock.
    pub fn validate_item(&self, line_id: &LineId) -> bool {
        self.cart.validate_item(line_id)
    }

    /// Live check against the catalog's current record.
    pub fn validate_item_live<C>(&self, line_id: &LineId, catalog: &C) -> bool
    where
        C: CatalogSource + ?Sized,
    {
        self.cart.validate_item_live(line_id, catalog)
    }

    pub fn invalid_lines<C>(&self, catalog: &C) -> Vec<LineId>
    where
        C: CatalogSource + ?Sized,
    {
        self.cart.invalid_lines(catalog)
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    // -------------------------------------------------------------------
    // Wishlist
    // -------------------------------------------------------------------

    pub fn try_add_to_wishlist(&mut self, product: &Product) -> Result<(), CartError> {
        let now = Utc::now();
        self.commit("add_to_wishlist", |_, wishlist| {
            wishlist.add(product, now)?;
            Ok(((), true))
        })
    }

    pub fn try_remove_from_wishlist(&mut self, product: &ProductId) -> Result<bool, CartError> {
        self.commit("remove_from_wishlist", |_, wishlist| {
            let removed = wishlist.remove(product);
            Ok((removed, removed))
        })
    }

    pub fn try_clear_wishlist(&mut self) -> Result<usize, CartError> {
        self.commit("clear_wishlist", |_, wishlist| Ok((wishlist.clear(), true)))
    }

    /// Moves a saved product into the cart as one unit of its first
    /// available variant, then drops it from the wishlist.
    ///
    /// The catalog's current product record is preferred over the saved
    /// snapshot. Either both changes happen or neither does.
    pub fn try_move_wishlist_to_cart<C>(
        &mut self,
        product: &ProductId,
        catalog: &C,
    ) -> Result<CartOutcome, CartError>
    where
        C: CatalogSource + ?Sized,
    {
        let Some(entry) = self.wishlist.get(product) else {
            return Err(CartError::NotInWishlist {
                product: product.clone(),
            });
        };
        let live = catalog
            .product(product)
            .unwrap_or_else(|| entry.product.clone());
        let variant = catalog
            .first_available_variant(product)
            .ok_or_else(|| CartError::NoAvailableVariant {
                product: product.clone(),
            })?;

        self.commit("move_wishlist_to_cart", |cart, wishlist| {
            let outcome = cart.add(&live, &variant, 1)?;
            wishlist.remove(product);
            Ok((outcome, true))
        })
    }

    /// Saves a product. False if it was already saved or the id is blank.
    pub fn add_to_wishlist(&mut self, product: &Product) -> bool {
        let result = self.try_add_to_wishlist(product);
        succeeded("add_to_wishlist", result)
    }

    /// Removes a saved product. Removing an unsaved product still succeeds.
    pub fn remove_from_wishlist(&mut self, product: &ProductId) -> bool {
        let result = self.try_remove_from_wishlist(product);
        succeeded("remove_from_wishlist", result)
    }

    /// Removes the product if saved, saves it otherwise.
    pub fn toggle_wishlist(&mut self, product: &Product) -> bool {
        if self.is_in_wishlist(&product.id) {
            self.remove_from_wishlist(&product.id)
        } else {
            self.add_to_wishlist(product)
        }
    }

    pub fn clear_wishlist(&mut self) -> bool {
        let result = self.try_clear_wishlist();
        succeeded("clear_wishlist", result)
    }

    pub fn move_wishlist_to_cart<C>(&mut self, product: &ProductId, catalog: &C) -> bool
    where
        C: CatalogSource + ?Sized,
    {
        let result = self.try_move_wishlist_to_cart(product, catalog);
        succeeded("move_wishlist_to_cart", result)
    }

    pub fn is_in_wishlist(&self, product: &ProductId) -> bool {
        self.wishlist.contains(product)
    }

    pub fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }

    pub fn wishlist(&self) -> &[WishlistEntry] {
        self.wishlist.entries()
    }

    // -------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------

    /// Places an order for the current cart and clears it.
    ///
    /// Refused when the cart is empty, the details are incomplete, or any
    /// line fails [`CartLedger::validate_item`]. The cart is only cleared
    /// once the order has been built, and the clear is persisted like any
    /// other mutation.
    pub fn checkout(&mut self, details: &CheckoutDetails) -> Result<Order, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let fields = details.validate();
        if !fields.is_empty() {
            return Err(CheckoutError::InvalidDetails { fields });
        }
        let unavailable: Vec<LineId> = self
            .cart
            .lines()
            .iter()
            .filter(|l| !self.cart.validate_item(&l.id))
            .map(|l| l.id.clone())
            .collect();
        if !unavailable.is_empty() {
            return Err(CheckoutError::UnavailableItems { lines: unavailable });
        }

        let order = build_order(&self.cart, details, Utc::now());
        let before = (self.cart.clone(), self.wishlist.clone());
        self.cart.clear();
        self.persist_or_restore("checkout", before)?;

        tracing::info!(
            order = %order.order_number,
            items = order.items.len(),
            total = %order.total,
            "order placed"
        );
        Ok(order)
    }

    /// Boolean-style checkout: the order, or `None` with the reason logged.
    pub fn place_order(&mut self, details: &CheckoutDetails) -> Option<Order> {
        match self.checkout(details) {
            Ok(order) => Some(order),
            Err(CheckoutError::Storage(_)) => None,
            Err(e) => {
                tracing::warn!(reason = %e, "checkout refused");
                None
            }
        }
    }
}

/// Reads the persisted state under `key`, or an empty state if absent.
fn read_state<S>(store: &S, key: &str) -> Result<PersistedState, StorageError>
where
    S: StateStore + ?Sized,
{
    Ok(load_versioned(store, key, CART_STORAGE_VERSION, migrate_state)?.unwrap_or_default())
}

/// Collapses a tagged result to the facade's boolean, logging refusals.
///
/// Storage failures were already logged where the rollback happened.
fn succeeded<T>(op: &'static str, result: Result<T, CartError>) -> bool {
    match result {
        Ok(_) => true,
        Err(CartError::Storage(_)) => false,
        Err(e) => {
            tracing::warn!(op, reason = %e, "cart operation refused");
            false
        }
    }
}
