//! ShopHub Admin - API client for the admin CRUD endpoints.
//!
//! The endpoints themselves are hosted elsewhere; this crate only provides
//! a typed client. Every request carries a bearer token obtained from the
//! storefront's auth session, and any non-2xx response surfaces the
//! response body text as the error - there are no automatic retries.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
mod error;
mod types;

pub use client::AdminClient;
pub use error::AdminError;
pub use types::{AdminOrder, AdminProduct, AdminUser, ProductForm};
