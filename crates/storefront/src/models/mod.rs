//! Domain models for storefront.

pub mod catalog;
pub mod session;

pub use catalog::CatalogItem;
pub use session::keys as session_keys;
