//! Shared test utilities for the inventory ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        product::{self, NewProduct},
        supplier::{self, NewSupplier},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test supplier with the given email.
///
/// # Defaults
/// * `name`: "Test Supplier"
/// * `phone_number`: "+1234567890"
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::supplier::Model> {
    supplier::create_supplier(
        db,
        NewSupplier {
            name: "Test Supplier".to_string(),
            email: email.to_string(),
            phone_number: "+1234567890".to_string(),
        },
    )
    .await
}

/// Creates a test product with a custom SKU and opening stock.
///
/// # Defaults
/// * `name`: "Test Product"
/// * `price`: 10.0
pub async fn create_custom_product(
    db: &DatabaseConnection,
    supplier_id: i64,
    sku: &str,
    stock: i32,
) -> Result<entities::product::Model> {
    let created = product::create_product(
        db,
        NewProduct {
            name: "Test Product".to_string(),
            description: None,
            sku: sku.to_string(),
            price: 10.0,
            stock: Some(stock),
            supplier_id,
        },
    )
    .await?;
    Ok(created.product)
}

/// Sets up a complete test environment with a supplier.
/// Returns (db, supplier) for common test scenarios.
pub async fn setup_with_supplier() -> Result<(DatabaseConnection, entities::supplier::Model)> {
    let db = setup_test_db().await?;
    let supplier = create_test_supplier(&db, "supplier@test.com").await?;
    Ok((db, supplier))
}

/// Sets up a complete test environment with supplier and product.
/// Returns (db, supplier, product) for stock ledger tests.
pub async fn setup_with_product(
    stock: i32,
) -> Result<(
    DatabaseConnection,
    entities::supplier::Model,
    entities::product::Model,
)> {
    let (db, supplier) = setup_with_supplier().await?;
    let product = create_custom_product(&db, supplier.id, "TEST-SKU", stock).await?;
    Ok((db, supplier, product))
}
