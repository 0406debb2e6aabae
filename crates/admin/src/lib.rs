//! Cartwheel Admin library.
//!
//! This crate provides the admin dashboard as a library, allowing it to be
//! tested and reused.
//!
//! The dashboard is a list of [`DashboardCard`](services::dashboard::DashboardCard)s
//! assembled by the [`DashboardComposer`](services::dashboard::DashboardComposer).
//! Today that is a single card: the number of completed payments.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
