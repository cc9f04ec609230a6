//! Product entity - An item held in stock.
//!
//! `stock` is only ever changed through the stock ledger, so that every unit in
//! stock is accounted for by a `product_transaction` row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Copper Wire 2mm")
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Stock-keeping unit, unique across all products
    #[sea_orm(unique)]
    pub sku: String,
    /// Unit price, never negative
    pub price: f64,
    /// Units currently in stock, never negative
    pub stock: i32,
    /// ID of the supplier this product belongs to
    pub supplier_id: i64,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    /// One product has many ledger entries
    #[sea_orm(has_many = "super::product_transaction::Entity")]
    Transactions,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::product_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
