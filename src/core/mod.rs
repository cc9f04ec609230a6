//! Core business logic - framework-agnostic supplier, product and stock ledger operations.
//!
//! Every function takes the connection or open transaction to run on. The HTTP API and
//! the CLI open one transaction per request, pass it down and commit on success.

/// Product lifecycle: create (with opening stock), get, partial update, delete
pub mod product;
/// Stock ledger: atomic stock adjustments and ledger queries
pub mod stock;
/// Supplier lifecycle: create, get, partial update, cascading delete
pub mod supplier;
