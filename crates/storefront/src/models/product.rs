//! Product domain type.
//!
//! Products are supplied by the catalog and are read-only to this core.
//! `price <= original_price` is assumed but not enforced here.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use shophub_core::ProductId;

/// A catalog product.
///
/// Serialized with camelCase keys to match the snapshot and catalog wire
/// format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current selling price.
    pub price: Decimal,
    /// Price before discount.
    pub original_price: Decimal,
    /// Short description shown in listings.
    pub description: String,
    /// Category name (e.g., "Electronics").
    pub category: String,
    /// Average review rating.
    pub rating: f64,
    /// Number of reviews behind the rating.
    pub reviews: u32,
    /// Image URLs, primary first.
    pub images: Vec<String>,
    /// Feature bullet points.
    pub features: Vec<String>,
    /// Whether the product can currently be purchased.
    pub in_stock: bool,
    /// Units remaining.
    pub stock_count: u32,
}

impl Product {
    /// Whether the product is currently discounted.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.original_price > self.price
    }

    /// Discount off the original price, as a whole percentage.
    ///
    /// Returns `None` when the product is not discounted.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        if !self.on_sale() || self.original_price <= Decimal::ZERO {
            return None;
        }
        let percent =
            ((self.original_price - self.price) * Decimal::from(100) / self.original_price).round();
        percent.to_u32()
    }
}
