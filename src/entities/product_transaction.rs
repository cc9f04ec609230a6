//! Product transaction entity - One entry of the stock ledger.
//!
//! Each row records a single applied stock adjustment: which product, which
//! `operation`, how many units and when. Rows are append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Kind of stock adjustment recorded in the ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockOperation {
    /// Units received into stock
    #[sea_orm(string_value = "ADD")]
    Add,
    /// Units removed from stock for any reason other than a sale
    #[sea_orm(string_value = "SUBTRACT")]
    Subtract,
    /// Units sold
    #[sea_orm(string_value = "SALE")]
    Sale,
}

impl StockOperation {
    /// Name as stored in the database and accepted on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Sale => "SALE",
        }
    }

    /// Whether the operation takes units out of stock.
    #[must_use]
    pub const fn is_outflow(self) -> bool {
        matches!(self, Self::Subtract | Self::Sale)
    }

    /// Applies the operation's sign to a quantity.
    #[must_use]
    pub fn signed(self, quantity: i32) -> i64 {
        if self.is_outflow() {
            -i64::from(quantity)
        } else {
            i64::from(quantity)
        }
    }
}

impl fmt::Display for StockOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADD" => Ok(Self::Add),
            "SUBTRACT" => Ok(Self::Subtract),
            "SALE" => Ok(Self::Sale),
            other => Err(format!(
                "unknown operation '{other}', expected one of: ADD, SUBTRACT, SALE"
            )),
        }
    }
}

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_transaction")]
pub struct Model {
    /// Unique identifier for the ledger entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product whose stock changed
    pub product_id: i64,
    /// What kind of adjustment was applied
    pub operation: StockOperation,
    /// Magnitude of the change; the sign comes from `operation`
    pub quantity: i32,
    /// When the adjustment was applied
    pub timestamp: DateTimeUtc,
}

impl Model {
    /// Quantity with the operation's sign applied (ADD positive, SUBTRACT/SALE negative).
    #[must_use]
    pub fn signed_quantity(&self) -> i64 {
        self.operation.signed(self.quantity)
    }
}

/// Defines relationships between ProductTransaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ledger entry belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
