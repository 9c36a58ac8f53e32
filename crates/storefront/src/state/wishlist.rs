//! Wishlist state container.
//!
//! Membership is boolean: a product is saved or it is not, with no
//! quantity semantics. Persists the same way the cart does.

use tracing::debug;

use shophub_core::ProductId;

use crate::models::Product;
use crate::storage::SnapshotStore;

/// Storage key for the serialized wishlist snapshot.
pub const WISHLIST_KEY: &str = "wishlist";

/// Saved products, insertion-ordered, one entry per product id.
pub struct WishlistState<S> {
    items: Vec<Product>,
    store: S,
}

impl<S: SnapshotStore> WishlistState<S> {
    /// Create a wishlist hydrated from the store's last snapshot.
    pub fn new(store: S) -> Self {
        let items: Vec<Product> = store.load(WISHLIST_KEY).unwrap_or_default();
        debug!(items = items.len(), "wishlist hydrated");
        Self { items, store }
    }

    /// Save a product. No-op if it is already saved.
    pub fn add(&mut self, product: &Product) {
        if self.contains(product.id) {
            debug!(product_id = %product.id, "already in wishlist");
            return;
        }
        self.items.push(product.clone());
        debug!(product_id = %product.id, "wishlist entry added");
        self.persist();
    }

    /// Remove a saved product. No-op if absent.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        if self.items.len() != before {
            debug!(product_id = %product_id, "wishlist entry removed");
            self.persist();
        }
    }

    /// Empty the wishlist.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Saved products, oldest first.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    fn persist(&self) {
        self.store.save(WISHLIST_KEY, &self.items);
    }
}
