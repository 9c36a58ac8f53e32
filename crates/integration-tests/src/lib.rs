//! Integration tests for ShopHub.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart/wishlist scenarios and snapshot round-trips
//! - `auth_flow` - Auth session against mocked identity/profile services
//! - `admin_flow` - Admin CRUD against a mocked endpoint, driven by a
//!   token from the auth session
//!
//! All remote services are mocked with wiremock; no external processes are
//! required to run these tests.
