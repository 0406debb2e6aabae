//! Cart errors.

use thiserror::Error;

/// Errors raised by cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// The operation needs at least one item in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Quantities must be at least 1; removal deletes the row instead.
    #[error("invalid quantity {0}: must be at least 1")]
    InvalidQuantity(u32),
}
