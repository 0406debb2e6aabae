//! Catalog entities that can be put in a cart.

use rust_decimal::Decimal;
use serde::Serialize;

use cartwheel_core::{Buyable, BuyableId, BuyableKind};

/// A buyable loaded from one of the catalog tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    /// Which catalog table the row came from.
    pub kind: BuyableKind,
    /// Row id within that table.
    pub id: BuyableId,
    /// Display name.
    pub name: String,
    /// Unit price at load time.
    pub price: Decimal,
}

impl Buyable for CatalogItem {
    fn kind(&self) -> BuyableKind {
        self.kind
    }

    fn id(&self) -> BuyableId {
        self.id
    }

    fn price(&self) -> Decimal {
        self.price
    }
}
