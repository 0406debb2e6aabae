//! Shopping cart domain.
//!
//! A [`Cart`] is a keyed collection of [`CartItem`]s, one row per distinct
//! buyable. Rows are keyed by a [`RowId`] derived from the buyable's
//! [`BuyableKind`] and [`BuyableId`](crate::BuyableId), so adding the same
//! buyable twice grows the existing row instead of creating a second one.
//!
//! Everything here is in-memory. The cart is serialized to a [`StoredCart`]
//! for the session and rebuilt from one with [`Cart::from_stored`].

pub mod buyable;
pub mod error;
pub mod item;
pub mod stored;

#[allow(clippy::module_inception)]
mod cart;

pub use buyable::{Buyable, BuyableKind, RowId};
pub use cart::Cart;
pub use error::CartError;
pub use item::CartItem;
pub use stored::{STORED_CART_VERSION, StoredCart, StoredCartItem};
