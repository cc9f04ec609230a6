//! Database configuration module for the inventory ledger.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated with `Schema::create_table_from_entity`, so the schema always
//! matches the entity definitions: foreign keys from `product` to `supplier` and from
//! `product_transaction` to `product`, and unique constraints on `supplier.email`
//! and `product.sku`.

use crate::entities::{Product, ProductTransaction, Supplier};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Default database location when neither the config file nor the environment sets one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://inventory.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url` and makes sure all
/// tables exist.
///
/// # Errors
/// Returns an error if the connection cannot be opened or table creation fails.
#[instrument]
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Opening database connection");
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Database connection ready");
    Ok(db)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Tables are created parent first so the foreign keys resolve. Existing tables are left alone.
///
/// # Errors
/// Returns an error if any `CREATE TABLE` statement fails.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut supplier_table = schema.create_table_from_entity(Supplier);
    let mut product_table = schema.create_table_from_entity(Product);
    let mut transaction_table = schema.create_table_from_entity(ProductTransaction);
    supplier_table.if_not_exists();
    product_table.if_not_exists();
    transaction_table.if_not_exists();

    db.execute(builder.build(&supplier_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    debug!("Database tables ensured");
    Ok(())
}
