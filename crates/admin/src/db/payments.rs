//! Payment queries.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use cartwheel_core::{PaymentId, PaymentStatus};

use super::RepositoryError;
use crate::services::dashboard::PaymentCounter;

/// Repository for payment database operations.
#[derive(Clone, Copy)]
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count payments in `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn count_by_status(&self, status: PaymentStatus) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM admin.payment
            WHERE status = $1
            ",
        )
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Record a payment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        amount: Decimal,
        status: PaymentStatus,
    ) -> Result<PaymentId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO admin.payment (amount, status)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(amount)
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok(PaymentId::new(id))
    }
}

impl PaymentCounter for PaymentRepository<'_> {
    async fn count_completed(&self) -> Result<i64, RepositoryError> {
        self.count_by_status(PaymentStatus::Completed).await
    }
}
