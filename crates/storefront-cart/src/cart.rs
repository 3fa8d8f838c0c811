//! The pure cart: lines, quantity rules and derived prices.
//!
//! [`Cart`] never touches storage. Every operation either applies fully and
//! reports a [`CartOutcome`], or fails with a [`CartError`] and leaves the
//! lines exactly as they were. The ledger builds persistence on top of that
//! guarantee.

use serde::{Deserialize, Serialize};

use storefront_core::{CatalogSource, Decimal, LineId, Product, Variant};

use crate::constants::MAX_QUANTITY_PER_ITEM;
use crate::error::CartError;
use crate::line::CartLine;
use crate::pricing::{self, PriceBreakdown};
use crate::quantity::{clamp_quantity, RequestedQuantity};

/// What a successful operation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartOutcome {
    /// A new line was appended.
    Added { line: LineId, quantity: u32 },
    /// An existing line absorbed the request.
    Merged { line: LineId, quantity: u32 },
    /// A line's quantity was set.
    Updated { line: LineId, quantity: u32 },
    /// A line was removed.
    Removed { line: LineId },
    /// All lines were dropped.
    Cleared { lines: usize },
    /// Nothing changed.
    Unchanged,
}

impl CartOutcome {
    /// True when the lines were modified and need persisting.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, CartOutcome::Unchanged)
    }
}

/// Ordered cart lines. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from persisted lines.
    ///
    /// Persisted data is not trusted: quantities are clamped into range, a
    /// repeated (product, variant) pair or line id keeps only its first
    /// line, and lines whose prices would overflow are dropped.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for mut line in lines {
            let duplicate = cart.lines.iter().any(|l| {
                l.id == line.id
                    || (l.product.id == line.product.id && l.variant.id == line.variant.id)
            });
            if duplicate {
                tracing::warn!(line = %line.id, "dropping duplicate persisted cart line");
                continue;
            }
            line.quantity = clamp_quantity(i64::from(line.quantity));
            if cart.ensure_priceable(None, line.variant.price, line.quantity).is_err() {
                tracing::warn!(line = %line.id, "dropping persisted cart line with unpriceable total");
                continue;
            }
            cart.lines.push(line);
        }
        cart
    }

    // -------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------

    /// Adds `quantity` of a product variant.
    ///
    /// The request is clamped to `[1, MAX_QUANTITY_PER_ITEM]` first, then
    /// checked against the variant's availability and inventory. A repeat of
    /// an existing (product, variant) pair merges into that line; a merge
    /// that would pass the cap is rejected rather than truncated. A new pair
    /// whose line id is already taken by another pair is refused, as is any
    /// change that would push the subtotal out of the `Decimal` range.
    pub fn add(
        &mut self,
        product: &Product,
        variant: &Variant,
        quantity: impl Into<RequestedQuantity>,
    ) -> Result<CartOutcome, CartError> {
        if product.id.is_blank() || variant.id.is_blank() {
            return Err(CartError::invalid("missing product or variant id"));
        }
        let requested = quantity
            .into()
            .clamped()
            .ok_or_else(|| CartError::invalid("quantity is not a number"))?;

        if !variant.is_available {
            return Err(CartError::VariantUnavailable {
                variant: variant.id.clone(),
            });
        }
        if variant.inventory_count < requested {
            return Err(CartError::InsufficientInventory {
                variant: variant.id.clone(),
                requested,
                available: variant.inventory_count,
            });
        }

        if let Some(index) = self.lines.iter().position(|l| l.matches(product, variant)) {
            let existing = &self.lines[index];
            let merged = existing.quantity + requested;
            if merged > MAX_QUANTITY_PER_ITEM {
                return Err(CartError::QuantityCapExceeded {
                    line: existing.id.clone(),
                    existing: existing.quantity,
                    requested,
                    cap: MAX_QUANTITY_PER_ITEM,
                });
            }
            self.ensure_priceable(Some(index), existing.variant.price, merged)?;
            let existing = &mut self.lines[index];
            existing.quantity = merged;
            return Ok(CartOutcome::Merged {
                line: existing.id.clone(),
                quantity: merged,
            });
        }

        let line = CartLine::new(product.clone(), variant.clone(), requested);
        if self.lines.iter().any(|l| l.id == line.id) {
            return Err(CartError::LineIdConflict { line: line.id });
        }
        self.ensure_priceable(None, variant.price, requested)?;
        let id = line.id.clone();
        self.lines.push(line);
        Ok(CartOutcome::Added {
            line: id,
            quantity: requested,
        })
    }

    /// Removes a line. Removing an absent line is a no-op.
    pub fn remove(&mut self, line_id: &LineId) -> CartOutcome {
        let before = self.lines.len();
        self.lines.retain(|l| &l.id != line_id);
        if self.lines.len() == before {
            CartOutcome::Unchanged
        } else {
            CartOutcome::Removed {
                line: line_id.clone(),
            }
        }
    }

    /// Sets a line's quantity.
    ///
    /// A request below one removes the line. Otherwise the clamped value
    /// must fit the line's snapshotted inventory. An unknown line id is a
    /// no-op.
    pub fn update_quantity(
        &mut self,
        line_id: &LineId,
        quantity: impl Into<RequestedQuantity>,
    ) -> Result<CartOutcome, CartError> {
        let floored = quantity
            .into()
            .floored()
            .ok_or_else(|| CartError::invalid("quantity is not a number"))?;
        if floored < 1 {
            return Ok(self.remove(line_id));
        }
        let target = clamp_quantity(floored);

        let Some(index) = self.lines.iter().position(|l| &l.id == line_id) else {
            return Ok(CartOutcome::Unchanged);
        };
        let line = &self.lines[index];
        if line.variant.inventory_count < target {
            return Err(CartError::InsufficientInventory {
                variant: line.variant.id.clone(),
                requested: target,
                available: line.variant.inventory_count,
            });
        }
        if line.quantity == target {
            return Ok(CartOutcome::Unchanged);
        }
        self.ensure_priceable(Some(index), line.variant.price, target)?;
        self.lines[index].quantity = target;
        Ok(CartOutcome::Updated {
            line: line_id.clone(),
            quantity: target,
        })
    }

    /// Drops every line.
    pub fn clear(&mut self) -> CartOutcome {
        let lines = self.lines.len();
        self.lines.clear();
        CartOutcome::Cleared { lines }
    }

    /// Checks that the cart stays priceable with the line at `index` set
    /// to `price × quantity`, or with that line appended when `index` is
    /// `None`.
    fn ensure_priceable(
        &self,
        index: Option<usize>,
        price: Decimal,
        quantity: u32,
    ) -> Result<(), CartError> {
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != index)
            .map(|(_, l)| (l.variant.price, l.quantity));
        pricing::checked_subtotal(others.chain([(price, quantity)]))
            .and_then(PriceBreakdown::checked_for_subtotal)
            .map(|_| ())
            .ok_or_else(|| CartError::invalid("price out of range"))
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == line_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines (not the number of lines).
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        pricing::subtotal_of(&self.lines)
    }

    pub fn shipping(&self) -> Decimal {
        pricing::shipping_for(self.subtotal())
    }

    pub fn tax(&self) -> Decimal {
        pricing::tax_for(self.subtotal())
    }

    pub fn total_price(&self) -> Decimal {
        self.price_breakdown().total
    }

    pub fn price_breakdown(&self) -> PriceBreakdown {
        PriceBreakdown::for_lines(&self.lines)
    }

    /// Checks a line against the snapshot it was created with.
    ///
    /// Does not consult the catalog; see [`Cart::validate_item_live`].
    pub fn validate_item(&self, line_id: &LineId) -> bool {
        self.line(line_id).is_some_and(|l| l.variant.in_stock())
    }

    /// Checks a line against the catalog's current record of its variant.
    ///
    /// Passes when that record is available with at least the line's
    /// quantity in stock. A variant that has disappeared from the catalog
    /// fails.
    pub fn validate_item_live<C>(&self, line_id: &LineId, catalog: &C) -> bool
    where
        C: CatalogSource + ?Sized,
    {
        let Some(line) = self.line(line_id) else {
            return false;
        };
        catalog
            .variant(&line.variant.id)
            .is_some_and(|v| v.can_fulfil(line.quantity))
    }

    /// Ids of lines that fail [`Cart::validate_item_live`], in display order.
    pub fn invalid_lines<C>(&self, catalog: &C) -> Vec<LineId>
    where
        C: CatalogSource + ?Sized,
    {
        self.lines
            .iter()
            .filter(|l| !self.validate_item_live(&l.id, catalog))
            .map(|l| l.id.clone())
            .collect()
    }
}
