//! Business logic services for storefront.
//!
//! Services sit between route handlers and the database/session layers.

pub mod cart;

pub use cart::{BuyableCatalog, CartServiceError, SessionCart};
