//! Buyable entities and their row identity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::BuyableId;

/// Discriminator for the kinds of entity that can be put in a cart.
///
/// Each kind lives in its own catalog table, so hydration batches lookups
/// per kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BuyableKind {
    Product,
    Service,
    Subscription,
}

impl BuyableKind {
    /// All kinds, in catalog order.
    pub const ALL: [Self; 3] = [Self::Product, Self::Service, Self::Subscription];

    /// Lowercase name used in row ids and the session record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Service => "service",
            Self::Subscription => "subscription",
        }
    }

    /// Uppercase type code reported for a cart (e.g. `PRODUCT`).
    #[must_use]
    pub const fn type_code(self) -> &'static str {
        match self {
            Self::Product => "PRODUCT",
            Self::Service => "SERVICE",
            Self::Subscription => "SUBSCRIPTION",
        }
    }
}

impl std::fmt::Display for BuyableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BuyableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            "service" => Ok(Self::Service),
            "subscription" => Ok(Self::Subscription),
            _ => Err(format!("invalid buyable kind: {s}")),
        }
    }
}

/// Anything that can be purchased.
///
/// `price` is read every time a line total is computed, so implementations
/// should return the entity's current price rather than a snapshot taken when
/// the item was added.
pub trait Buyable {
    /// Which catalog this entity belongs to.
    fn kind(&self) -> BuyableKind;

    /// Identifier within its kind.
    fn id(&self) -> BuyableId;

    /// Current unit price.
    fn price(&self) -> Decimal;

    /// Row id this entity occupies in a cart.
    fn row_id(&self) -> RowId {
        RowId::new(self.kind(), self.id())
    }
}

/// Deterministic cart row key built from a buyable's kind and id.
///
/// Formatted as `{kind}-{id}`, e.g. `product-42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Derive the row id for a `(kind, id)` pair.
    #[must_use]
    pub fn new(kind: BuyableKind, id: BuyableId) -> Self {
        Self(format!("{kind}-{id}"))
    }

    /// Borrow the row id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
