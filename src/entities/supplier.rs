//! Supplier entity - A company that provides products.
//!
//! Suppliers are identified by a unique email address. Deleting a supplier removes
//! the products it owns; that cascade is carried out by `core::supplier`, not by
//! the schema.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier")]
pub struct Model {
    /// Unique identifier for the supplier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the supplier
    pub name: String,
    /// Contact email, unique across all suppliers
    #[sea_orm(unique)]
    pub email: String,
    /// Contact phone number
    pub phone_number: String,
}

/// Defines relationships between Supplier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One supplier has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
