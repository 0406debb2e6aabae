//! Business logic services for admin.

pub mod dashboard;

pub use dashboard::{DashboardCard, DashboardComposer, PaymentCounter};
