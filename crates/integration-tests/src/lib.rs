//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no database needed)
//! cargo test -p cartwheel-integration-tests
//!
//! # Database-backed tests, after `cw-cli migrate all`
//! DATABASE_URL=postgres://localhost/cartwheel_test \
//!     cargo test -p cartwheel-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Session cart behavior over an in-memory session store
//! - `storefront_http` - Cart routes driven through the router
//! - `admin_dashboard` - Dashboard cards and payment counting
//!
//! This library holds the fixtures those tests share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tower_sessions::{MemoryStore, Session};

use cartwheel_core::{BuyableId, BuyableKind};
use cartwheel_storefront::db::RepositoryError;
use cartwheel_storefront::models::CatalogItem;
use cartwheel_storefront::services::BuyableCatalog;

/// Build a catalog item priced in cents.
#[must_use]
pub fn item(kind: BuyableKind, id: i32, cents: i64) -> CatalogItem {
    CatalogItem {
        kind,
        id: BuyableId::new(id),
        name: format!("{kind} {id}"),
        price: Decimal::new(cents, 2),
    }
}

/// A fresh session backed by an in-memory store.
#[must_use]
pub fn memory_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

/// Catalog held in memory, shared between clones.
///
/// Entities can be repriced or deleted between loads to simulate catalog
/// changes across requests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    items: Arc<Mutex<HashMap<(BuyableKind, BuyableId), CatalogItem>>>,
    lookups: Arc<Mutex<Vec<BuyableKind>>>,
}

impl MemoryCatalog {
    /// Catalog containing `items`.
    #[must_use]
    pub fn with(items: &[CatalogItem]) -> Self {
        let catalog = Self::default();
        for item in items {
            catalog.insert(item.clone());
        }
        catalog
    }

    /// Insert or replace an entity.
    pub fn insert(&self, item: CatalogItem) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((item.kind, item.id), item);
    }

    /// Change the price of an entity, if present.
    pub fn reprice(&self, kind: BuyableKind, id: i32, cents: i64) {
        if let Some(item) = self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&(kind, BuyableId::new(id)))
        {
            item.price = Decimal::new(cents, 2);
        }
    }

    /// Delete an entity.
    pub fn delete(&self, kind: BuyableKind, id: i32) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(kind, BuyableId::new(id)));
    }

    /// Kinds passed to `find_many`, in call order.
    #[must_use]
    pub fn lookups(&self) -> Vec<BuyableKind> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BuyableCatalog for MemoryCatalog {
    type Item = CatalogItem;

    async fn find_many(
        &self,
        kind: BuyableKind,
        ids: &[BuyableId],
    ) -> Result<HashMap<BuyableId, CatalogItem>, RepositoryError> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(kind);

        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(ids
            .iter()
            .filter_map(|id| items.get(&(kind, *id)).map(|item| (*id, item.clone())))
            .collect())
    }
}
