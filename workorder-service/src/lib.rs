//! Work-Order Service - job tracking with estimate lifecycle and
//! estimated-vs-actual financial reconciliation.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
