//! Session record schema for a cart.
//!
//! The whole cart is written as one [`StoredCart`] value on every mutation.
//! Records carry the buyable's kind and id only; prices and other entity data
//! are reloaded from the catalog when the cart is rebuilt.
//!
//! ```json
//! {
//!   "version": 1,
//!   "items": [
//!     { "type": "product", "id": 42, "itemId": "product-42", "quantity": 2 }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::buyable::{BuyableKind, RowId};
use crate::BuyableId;

/// Current schema version written by [`Cart::to_stored`](super::Cart::to_stored).
pub const STORED_CART_VERSION: u32 = 1;

/// Serialized cart as kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCart {
    /// Schema version. Values other than [`STORED_CART_VERSION`] are not read.
    pub version: u32,
    /// One record per cart row.
    pub items: Vec<StoredCartItem>,
}

/// One serialized cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCartItem {
    /// Kind of the referenced buyable.
    #[serde(rename = "type")]
    pub kind: BuyableKind,
    /// Id of the referenced buyable.
    pub id: BuyableId,
    /// Row id at the time of writing. Informational; rows are re-keyed from
    /// `type` and `id` on load.
    pub item_id: RowId,
    /// Units on the row.
    pub quantity: u32,
}

impl Default for StoredCart {
    fn default() -> Self {
        Self {
            version: STORED_CART_VERSION,
            items: Vec::new(),
        }
    }
}

impl StoredCart {
    /// Whether this record uses a schema version this build can read.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.version == STORED_CART_VERSION
    }

    /// Referenced ids grouped by kind, deduplicated and sorted.
    ///
    /// Used to issue one batch lookup per kind when rebuilding a cart.
    #[must_use]
    pub fn ids_by_kind(&self) -> BTreeMap<BuyableKind, Vec<BuyableId>> {
        let mut grouped: BTreeMap<BuyableKind, Vec<BuyableId>> = BTreeMap::new();
        for item in &self.items {
            grouped.entry(item.kind).or_default().push(item.id);
        }
        for ids in grouped.values_mut() {
            ids.sort_by_key(BuyableId::as_i32);
            ids.dedup();
        }
        grouped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn record(kind: BuyableKind, id: i32, quantity: u32) -> StoredCartItem {
        let id = BuyableId::new(id);
        StoredCartItem {
            kind,
            id,
            item_id: RowId::new(kind, id),
            quantity,
        }
    }

    #[test]
    fn test_wire_field_names() {
        let stored = StoredCart {
            version: STORED_CART_VERSION,
            items: vec![record(BuyableKind::Product, 42, 2)],
        };

        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["items"][0]["type"], "product");
        assert_eq!(value["items"][0]["id"], 42);
        assert_eq!(value["items"][0]["itemId"], "product-42");
        assert_eq!(value["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_default_is_current_version_and_empty() {
        let stored = StoredCart::default();
        assert!(stored.is_supported());
        assert!(stored.items.is_empty());
    }

    #[test]
    fn test_unknown_version_is_unsupported() {
        let stored: StoredCart = serde_json::from_str(r#"{"version":99,"items":[]}"#).unwrap();
        assert!(!stored.is_supported());
    }

    #[test]
    fn test_ids_by_kind_groups_and_dedups() {
        let stored = StoredCart {
            version: STORED_CART_VERSION,
            items: vec![
                record(BuyableKind::Product, 3, 1),
                record(BuyableKind::Service, 1, 1),
                record(BuyableKind::Product, 1, 2),
                record(BuyableKind::Product, 3, 4),
            ],
        };

        let grouped = stored.ids_by_kind();
        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped[&BuyableKind::Product],
            vec![BuyableId::new(1), BuyableId::new(3)]
        );
        assert_eq!(grouped[&BuyableKind::Service], vec![BuyableId::new(1)]);
    }
}
