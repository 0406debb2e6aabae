//! Cartwheel Core - Shared cart and catalog types.
//!
//! This crate provides the types used across all Cartwheel components:
//! - `storefront` - Session-backed cart service and JSON cart API
//! - `admin` - Dashboard composer (payment metrics)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no session handling. The in-memory [`Cart`] lives here; persisting it is the
//! storefront's job.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and statuses
//! - [`cart`] - Buyables, cart items, the cart itself and its session record schema

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::*;
pub use types::*;
