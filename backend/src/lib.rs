//! Activity ledger and engagement engine backend
//!
//! Exposes the backend modules for the binary and the integration tests.

pub mod ai;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
