//! Seed the databases with demo data.

use rust_decimal::Decimal;
use tracing::info;

use cartwheel_admin::db::PaymentRepository;
use cartwheel_core::{BuyableKind, PaymentStatus};
use cartwheel_storefront::db::CatalogRepository;

use super::migrate::database_url;

/// Demo catalog: kind, name, price in cents.
const CATALOG: &[(BuyableKind, &str, i64)] = &[
    (BuyableKind::Product, "Canvas Tote", 2_400),
    (BuyableKind::Product, "Enamel Mug", 1_800),
    (BuyableKind::Product, "Wool Beanie", 3_200),
    (BuyableKind::Service, "Gift Wrapping", 500),
    (BuyableKind::Service, "Engraving", 1_500),
    (BuyableKind::Subscription, "Coffee Club (monthly)", 2_900),
    (BuyableKind::Subscription, "Sock Drawer (quarterly)", 4_500),
];

/// Demo payments: amount in cents, status.
const PAYMENTS: &[(i64, PaymentStatus)] = &[
    (4_200, PaymentStatus::Completed),
    (1_800, PaymentStatus::Completed),
    (9_900, PaymentStatus::Completed),
    (2_900, PaymentStatus::Pending),
    (1_500, PaymentStatus::Failed),
    (3_200, PaymentStatus::Refunded),
];

/// Insert the demo catalog into the storefront database.
///
/// # Errors
///
/// Returns an error if the database URL is missing or an insert fails.
pub async fn catalog() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url("STOREFRONT_DATABASE_URL")?;
    let pool = cartwheel_storefront::db::create_pool(&database_url).await?;
    let repo = CatalogRepository::new(&pool);

    for &(kind, name, cents) in CATALOG {
        let item = repo.create(kind, name, Decimal::new(cents, 2)).await?;
        info!(kind = %item.kind, id = %item.id, name = %item.name, "Seeded buyable");
    }

    info!(count = CATALOG.len(), "Catalog seeded");
    Ok(())
}

/// Insert demo payments into the admin database.
///
/// # Errors
///
/// Returns an error if the database URL is missing or an insert fails.
pub async fn payments() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url("ADMIN_DATABASE_URL")?;
    let pool = cartwheel_admin::db::create_pool(&database_url).await?;
    let repo = PaymentRepository::new(&pool);

    for &(cents, status) in PAYMENTS {
        let id = repo.create(Decimal::new(cents, 2), status).await?;
        info!(%id, %status, "Seeded payment");
    }

    let completed = repo.count_by_status(PaymentStatus::Completed).await?;
    info!(count = PAYMENTS.len(), completed, "Payments seeded");
    Ok(())
}
