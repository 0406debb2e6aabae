//! Session-related types.

/// Session keys used by the storefront.
pub mod keys {
    /// Key for the serialized cart (`cartwheel_core::StoredCart`).
    pub const CART: &str = "cart";
}
