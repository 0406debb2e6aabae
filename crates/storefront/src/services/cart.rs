//! Session-backed cart.
//!
//! [`SessionCart`] wraps the in-memory [`Cart`] with write-through
//! persistence: every mutation serializes the whole cart into the session
//! under [`session_keys::CART`] before returning. No deltas are written.
//!
//! Loading a cart reads the [`StoredCart`] record from the session, groups its
//! rows by kind, loads each kind's entities with a single
//! [`BuyableCatalog::find_many`] call, and drops rows whose entity no longer
//! exists.
//!
//! Without a session the cart works in memory only and nothing is persisted.

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use cartwheel_core::{
    Buyable, BuyableId, BuyableKind, Cart, CartError, CartItem, RowId, StoredCart,
};

use crate::db::RepositoryError;
use crate::models::session_keys;

/// Batch lookup of buyables by kind.
pub trait BuyableCatalog: Sync {
    /// Entity type produced by this catalog.
    type Item: Buyable + Send;

    /// Load every entity of `kind` whose id is in `ids`.
    ///
    /// Missing ids are simply absent from the returned map.
    fn find_many(
        &self,
        kind: BuyableKind,
        ids: &[BuyableId],
    ) -> impl Future<Output = Result<HashMap<BuyableId, Self::Item>, RepositoryError>> + Send;

    /// Load a single entity.
    fn find(
        &self,
        kind: BuyableKind,
        id: BuyableId,
    ) -> impl Future<Output = Result<Option<Self::Item>, RepositoryError>> + Send {
        async move {
            let mut found = self.find_many(kind, &[id]).await?;
            Ok(found.remove(&id))
        }
    }
}

/// Errors from session-backed cart operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The cart rejected the operation.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Reading or writing the session failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Loading referenced entities failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] RepositoryError),
}

/// A cart bound to a user's session.
#[derive(Debug)]
pub struct SessionCart<B> {
    cart: Cart<B>,
    session: Option<Session>,
}

impl<B: Buyable + Send> SessionCart<B> {
    /// A cart with no session; mutations are never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            cart: Cart::new(),
            session: None,
        }
    }

    /// Load the cart stored in `session`, or an empty one.
    ///
    /// Unreadable or unsupported session records are treated as an empty
    /// cart. Rows referencing deleted entities are dropped.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Session` if the session store fails and
    /// `CartServiceError::Catalog` if an entity lookup fails.
    #[instrument(skip_all, fields(has_session = session.is_some()))]
    pub async fn load<C>(session: Option<Session>, catalog: &C) -> Result<Self, CartServiceError>
    where
        C: BuyableCatalog<Item = B>,
    {
        let Some(session) = session else {
            return Ok(Self::in_memory());
        };

        let stored = match session.get::<StoredCart>(session_keys::CART).await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                tracing::warn!("Discarding unreadable cart in session: {e}");
                StoredCart::default()
            }
            Err(e) => return Err(e.into()),
        };

        if !stored.is_supported() {
            tracing::warn!(
                version = stored.version,
                "Discarding cart with unsupported schema version"
            );
            return Ok(Self {
                cart: Cart::new(),
                session: Some(session),
            });
        }

        let mut loaded: HashMap<BuyableKind, HashMap<BuyableId, B>> = HashMap::new();
        for (kind, ids) in stored.ids_by_kind() {
            let entities = catalog.find_many(kind, &ids).await?;
            loaded.insert(kind, entities);
        }

        let (cart, missing) = restore(stored, loaded);
        if missing > 0 {
            tracing::debug!(missing, "Dropped cart rows for missing entities");
        }

        Ok(Self {
            cart,
            session: Some(session),
        })
    }

    /// Add `quantity` units of `buyable` and persist.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Cart` for a zero quantity (nothing is
    /// written) and `CartServiceError::Session` if persisting fails.
    pub async fn add(&mut self, buyable: B, quantity: u32) -> Result<(), CartServiceError> {
        self.cart.add(buyable, quantity)?;
        self.persist().await
    }

    /// Set the quantity of `buyable` to exactly `quantity` and persist.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Cart` for a zero quantity (nothing is
    /// written) and `CartServiceError::Session` if persisting fails.
    pub async fn set(&mut self, buyable: B, quantity: u32) -> Result<(), CartServiceError> {
        self.cart.set(buyable, quantity)?;
        self.persist().await
    }

    /// Remove `buyable` if present and persist. Removing a missing item is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Session` if persisting fails.
    pub async fn remove(&mut self, buyable: &impl Buyable) -> Result<(), CartServiceError> {
        self.remove_row(&buyable.row_id()).await
    }

    /// Remove a row by id and persist. Used when only the buyable's kind and
    /// id are known.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Session` if persisting fails.
    pub async fn remove_row(&mut self, row_id: &RowId) -> Result<(), CartServiceError> {
        self.cart.remove_row(row_id);
        self.persist().await
    }

    /// Empty the cart and persist the empty state.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Session` if persisting fails.
    pub async fn clear(&mut self) -> Result<(), CartServiceError> {
        self.cart.clear();
        self.persist().await
    }

    /// Look up the row for `buyable`.
    #[must_use]
    pub fn get(&self, buyable: &impl Buyable) -> Option<&CartItem<B>> {
        self.cart.get(buyable)
    }

    /// The underlying in-memory cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart<B> {
        &self.cart
    }

    /// Whether writes reach a session.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.session.is_some()
    }

    async fn persist(&self) -> Result<(), CartServiceError> {
        let Some(session) = &self.session else {
            return Ok(());
        };

        let stored = self.cart.to_stored();
        tracing::debug!(rows = stored.items.len(), "Persisting cart");
        session.insert(session_keys::CART, stored).await?;
        Ok(())
    }
}

/// Pair stored rows with their loaded entities.
///
/// Returns the cart and the number of rows whose entity was not loaded.
/// Zero-quantity and repeated rows are skipped by [`Cart::from_stored`]
/// before lookup and are not counted.
fn restore<B: Buyable>(
    stored: StoredCart,
    mut loaded: HashMap<BuyableKind, HashMap<BuyableId, B>>,
) -> (Cart<B>, usize) {
    let mut missing = 0;
    let cart = Cart::from_stored(stored, |kind, id| {
        let entity = loaded.get_mut(&kind).and_then(|entities| entities.remove(&id));
        if entity.is_none() {
            missing += 1;
        }
        entity
    });
    (cart, missing)
}
