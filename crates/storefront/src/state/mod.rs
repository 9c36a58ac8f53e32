//! Client-side state containers.
//!
//! Containers are constructed once at process start (see [`crate::app`])
//! and mutated only from discrete user or timer events.

pub mod cart;
pub mod toast;
pub mod wishlist;

pub use cart::{CartLine, CartState, OrderSummary};
pub use toast::{Toast, ToastVariant, Toasts};
pub use wishlist::WishlistState;
