//! A single cart row.

use rust_decimal::Decimal;

use super::buyable::{Buyable, BuyableKind, RowId};
use super::stored::StoredCartItem;

/// One line in a cart: a buyable and how many of it.
///
/// The unit price is not stored on the item. [`CartItem::total`] asks the
/// buyable for its price every time it is called.
#[derive(Debug, Clone)]
pub struct CartItem<B> {
    row_id: RowId,
    buyable: B,
    quantity: u32,
}

impl<B: Buyable> CartItem<B> {
    /// Create an item for `buyable`.
    #[must_use]
    pub fn new(buyable: B, quantity: u32) -> Self {
        Self {
            row_id: buyable.row_id(),
            buyable,
            quantity,
        }
    }

    /// Line total: quantity times the buyable's current price.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.buyable.price() * Decimal::from(self.quantity)
    }

    /// Current unit price of the referenced buyable.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.buyable.price()
    }

    /// Kind of the referenced buyable.
    #[must_use]
    pub fn kind(&self) -> BuyableKind {
        self.buyable.kind()
    }

    /// Session record for this row.
    #[must_use]
    pub fn to_stored(&self) -> StoredCartItem {
        StoredCartItem {
            kind: self.buyable.kind(),
            id: self.buyable.id(),
            item_id: self.row_id.clone(),
            quantity: self.quantity,
        }
    }
}

impl<B> CartItem<B> {
    /// Row id (derived from the buyable's kind and id).
    #[must_use]
    pub const fn row_id(&self) -> &RowId {
        &self.row_id
    }

    /// The referenced buyable.
    #[must_use]
    pub const fn buyable(&self) -> &B {
        &self.buyable
    }

    /// Number of units on this row.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Overwrite the quantity. Not validated here; [`Cart`](super::Cart)
    /// rejects zero before calling this.
    pub const fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
