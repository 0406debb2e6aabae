//! Dashboard composer.
//!
//! Builds the cards shown on the admin dashboard. Each card is one metric
//! plus fixed presentation metadata; the only dynamic part is the query
//! behind the value.

use std::future::Future;

use serde::Serialize;
use tracing::instrument;

use crate::db::RepositoryError;

/// Source of the completed-payment count.
pub trait PaymentCounter: Sync {
    /// Number of payments in the `completed` state.
    fn count_completed(&self) -> impl Future<Output = Result<i64, RepositoryError>> + Send;
}

/// Accent color of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    Green,
}

impl CardColor {
    /// CSS class suffix used by the dashboard template.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
        }
    }
}

/// A single dashboard metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    /// Short caption under the value.
    pub label: &'static str,
    /// Formatted metric value.
    pub value: String,
    /// Icon name.
    pub icon: &'static str,
    /// Accent color.
    pub color: CardColor,
}

/// Completed payments card.
pub const PAYMENTS_LABEL: &str = "Payments";
const PAYMENTS_ICON: &str = "credit-card";
const PAYMENTS_COLOR: CardColor = CardColor::Green;

/// Assembles dashboard cards from their queries.
pub struct DashboardComposer<'a, C> {
    payments: &'a C,
}

impl<'a, C: PaymentCounter> DashboardComposer<'a, C> {
    /// Create a composer over a payment counter.
    #[must_use]
    pub const fn new(payments: &'a C) -> Self {
        Self { payments }
    }

    /// Build the dashboard cards.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the payment count query fails.
    #[instrument(skip(self))]
    pub async fn cards(&self) -> Result<Vec<DashboardCard>, RepositoryError> {
        let completed = self.payments.count_completed().await?;
        tracing::debug!(completed, "Composed payments card");

        Ok(vec![DashboardCard {
            label: PAYMENTS_LABEL,
            value: completed.to_string(),
            icon: PAYMENTS_ICON,
            color: PAYMENTS_COLOR,
        }])
    }
}
