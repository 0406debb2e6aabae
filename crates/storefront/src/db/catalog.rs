//! Catalog repository: batch lookups of buyables by kind.
//!
//! Each [`BuyableKind`] has its own table in the `storefront` schema. Lookups
//! are always per kind so that rebuilding a cart costs one query per kind,
//! however many rows it has.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use cartwheel_core::{BuyableId, BuyableKind};

use super::RepositoryError;
use crate::models::CatalogItem;
use crate::services::cart::BuyableCatalog;

/// Raw catalog row, shared by all catalog tables.
#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: i32,
    name: String,
    price: Decimal,
}

impl CatalogRow {
    fn into_item(self, kind: BuyableKind) -> Result<CatalogItem, RepositoryError> {
        if self.price.is_sign_negative() {
            return Err(RepositoryError::DataCorruption(format!(
                "{kind} {} has negative price {}",
                self.id, self.price
            )));
        }
        Ok(CatalogItem {
            kind,
            id: BuyableId::new(self.id),
            name: self.name,
            price: self.price,
        })
    }
}

/// Batch-select statement for a kind's table.
const fn select_many_sql(kind: BuyableKind) -> &'static str {
    match kind {
        BuyableKind::Product => {
            "SELECT id, name, price FROM storefront.product WHERE id = ANY($1)"
        }
        BuyableKind::Service => {
            "SELECT id, name, price FROM storefront.service WHERE id = ANY($1)"
        }
        BuyableKind::Subscription => {
            "SELECT id, name, price FROM storefront.subscription WHERE id = ANY($1)"
        }
    }
}

/// Insert statement for a kind's table.
const fn insert_sql(kind: BuyableKind) -> &'static str {
    match kind {
        BuyableKind::Product => {
            "INSERT INTO storefront.product (name, price) VALUES ($1, $2) RETURNING id, name, price"
        }
        BuyableKind::Service => {
            "INSERT INTO storefront.service (name, price) VALUES ($1, $2) RETURNING id, name, price"
        }
        BuyableKind::Subscription => {
            "INSERT INTO storefront.subscription (name, price) VALUES ($1, $2) RETURNING id, name, price"
        }
    }
}

/// Repository for catalog database operations.
#[derive(Clone, Copy)]
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        kind: BuyableKind,
        name: &str,
        price: Decimal,
    ) -> Result<CatalogItem, RepositoryError> {
        let row = sqlx::query_as::<_, CatalogRow>(insert_sql(kind))
            .bind(name)
            .bind(price)
            .fetch_one(self.pool)
            .await?;

        row.into_item(kind)
    }
}

impl BuyableCatalog for CatalogRepository<'_> {
    type Item = CatalogItem;

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn find_many(
        &self,
        kind: BuyableKind,
        ids: &[BuyableId],
    ) -> Result<HashMap<BuyableId, CatalogItem>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(BuyableId::as_i32).collect();
        let rows = sqlx::query_as::<_, CatalogRow>(select_many_sql(kind))
            .bind(raw_ids)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter()
            .map(|row| row.into_item(kind).map(|item| (item.id, item)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_sql_targets_kind_table() {
        for kind in BuyableKind::ALL {
            let sql = select_many_sql(kind);
            assert!(sql.contains(&format!("storefront.{kind} ")));
            assert!(sql.contains("ANY($1)"));
        }
    }

    #[test]
    fn test_insert_sql_targets_kind_table() {
        for kind in BuyableKind::ALL {
            assert!(insert_sql(kind).starts_with(&format!("INSERT INTO storefront.{kind} ")));
        }
    }

    #[test]
    fn test_negative_price_is_corruption() {
        let row = CatalogRow {
            id: 1,
            name: "Broken".to_string(),
            price: Decimal::new(-100, 2),
        };
        assert!(matches!(
            row.into_item(BuyableKind::Product),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_row_conversion() {
        let row = CatalogRow {
            id: 7,
            name: "Tote Bag".to_string(),
            price: Decimal::new(2400, 2),
        };
        let item = row.into_item(BuyableKind::Product).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(item.id, BuyableId::new(7));
        assert_eq!(item.kind, BuyableKind::Product);
    }
}
