//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod product;
pub mod product_transaction;
pub mod supplier;

// Re-export specific types to avoid conflicts
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_transaction::{
    Column as ProductTransactionColumn, Entity as ProductTransaction,
    Model as ProductTransactionModel, StockOperation,
};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
