//! Catalog derivations: filtering, sorting, and price display.
//!
//! The catalog itself is supplied externally; these helpers compute the
//! derived views the product listing renders.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::models::Product;

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Alphabetical by name (the default).
    #[default]
    Name,
    /// Cheapest first.
    PriceLowToHigh,
    /// Most expensive first.
    PriceHighToLow,
    /// Best rated first.
    Rating,
}

/// A listing query: optional category, optional search text, sort order.
///
/// `category: None` means all categories (the UI's "All" option).
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Exact category to keep, or `None` for all.
    pub category: Option<String>,
    /// Case-insensitive search over name and description.
    pub search: Option<String>,
    /// Sort order.
    pub sort: SortKey,
}

/// Filter and sort a product slice according to `query`.
pub fn filter_and_sort(products: &[Product], query: &CatalogQuery) -> Vec<Product> {
    let mut filtered: Vec<Product> = products
        .iter()
        .filter(|product| {
            query
                .category
                .as_ref()
                .is_none_or(|category| product.category == *category)
        })
        .filter(|product| {
            query.search.as_ref().is_none_or(|search| {
                let needle = search.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            })
        })
        .cloned()
        .collect();

    filtered.sort_by(|a, b| match query.sort {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::PriceLowToHigh => a.price.cmp(&b.price),
        SortKey::PriceHighToLow => b.price.cmp(&a.price),
        SortKey::Rating => b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal),
    });

    filtered
}

/// Distinct categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// Format a price for display, e.g. `$89.99`.
#[must_use]
pub fn format_price(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    format!("${rounded}")
}
