//! Cart state container.
//!
//! Holds an ordered collection of line items, one per product id. Every
//! mutation re-serializes the full collection to the snapshot store before
//! returning, so a reload always sees the last completed mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shophub_core::ProductId;

use crate::models::Product;
use crate::storage::SnapshotStore;

/// Storage key for the serialized cart snapshot.
pub const CART_KEY: &str = "cart";

/// Flat sales tax rate applied to the subtotal (8%).
fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// A product plus its purchase quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product being purchased.
    #[serde(flatten)]
    pub product: Product,
    /// Units of this product in the cart; always at least 1.
    pub quantity: u32,
}

/// Checkout order summary derived from the current cart contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    /// Sum of line prices before tax.
    pub subtotal: Decimal,
    /// Shipping cost (currently always free).
    pub shipping: Decimal,
    /// Sales tax on the subtotal.
    pub tax: Decimal,
    /// Grand total including tax and shipping.
    pub total: Decimal,
}

/// The shopping cart.
///
/// Quantities are clamped rather than rejected: adds below 1 become 1,
/// increments saturate, and setting a quantity to zero or below removes
/// the line. Non-integer quantities are unrepresentable by construction.
pub struct CartState<S> {
    lines: Vec<CartLine>,
    store: S,
}

impl<S: SnapshotStore> CartState<S> {
    /// Create a cart hydrated from the store's last snapshot.
    ///
    /// No snapshot (or a corrupt one) starts an empty cart.
    pub fn new(store: S) -> Self {
        let lines: Vec<CartLine> = store.load(CART_KEY).unwrap_or_default();
        debug!(lines = lines.len(), "cart hydrated");
        Self { lines, store }
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line for the same product id is incremented instead of
    /// duplicated. A `quantity` of 0 is treated as 1.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            debug!(product_id = %product.id, quantity = line.quantity, "cart line incremented");
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity,
            });
            debug!(product_id = %product.id, quantity, "cart line added");
        }
        self.persist();
    }

    /// Remove a product's line entirely. No-op if absent.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);
        if self.lines.len() != before {
            debug!(product_id = %product_id, "cart line removed");
            self.persist();
        }
    }

    /// Set a line's quantity exactly.
    ///
    /// A quantity of zero or below removes the line. No-op for an unknown
    /// product id.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            debug!(product_id = %product_id, quantity = line.quantity, "cart quantity set");
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all line items.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `price * quantity` over all line items.
    ///
    /// Recomputed fresh on each call using current per-item prices.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| l.product.price * Decimal::from(l.quantity))
            .sum()
    }

    /// Checkout summary: subtotal, free shipping, 8% tax, grand total.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        let subtotal = self.total_price();
        let tax = (subtotal * tax_rate()).round_dp(2);
        OrderSummary {
            subtotal,
            shipping: Decimal::ZERO,
            tax,
            total: subtotal + tax,
        }
    }

    fn persist(&self) {
        self.store.save(CART_KEY, &self.lines);
    }
}
