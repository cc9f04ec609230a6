//! Product business logic - Handles all product-related operations.
//!
//! Products always belong to an existing supplier and carry a unique SKU. Stock is
//! never written here directly: the opening quantity given at creation goes through
//! [`adjust_stock`] as an `ADD`, so the ledger accounts for every unit from the start.

use crate::{
    core::stock::{StockAdjustment, adjust_stock},
    entities::{Product, ProductTransaction, StockOperation, product, product_transaction},
    errors::{ConstraintKind, Error, Result, constraint_violation},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields required to create a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Product name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Stock-keeping unit, must not be used by another product
    pub sku: String,
    /// Unit price
    pub price: f64,
    /// Opening stock, recorded as an `ADD` ledger entry (defaults to 0)
    #[serde(default)]
    pub stock: Option<i32>,
    /// Owning supplier
    pub supplier_id: i64,
}

/// Partial update of a product; `None` fields are left untouched.
///
/// Stock is deliberately absent: it only changes through the ledger.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductChanges {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New SKU
    pub sku: Option<String>,
    /// New unit price
    pub price: Option<f64>,
    /// Move the product to another supplier
    pub supplier_id: Option<i64>,
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("Product {field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidPrice { price });
    }
    Ok(price)
}

fn map_write_error(err: DbErr, sku: &str, supplier_id: i64) -> Error {
    match constraint_violation(&err) {
        Some(ConstraintKind::Unique) => Error::DuplicateSku {
            sku: sku.to_string(),
        },
        Some(ConstraintKind::ForeignKey) => Error::UnknownSupplier { supplier_id },
        None => err.into(),
    }
}

async fn ensure_supplier_exists<C>(db: &C, supplier_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    if crate::entities::Supplier::find_by_id(supplier_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(Error::UnknownSupplier { supplier_id });
    }
    Ok(())
}

/// Finds a product by SKU.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_sku<C>(db: &C, sku: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Sku.eq(sku))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a product and books its opening stock through the ledger.
///
/// The insert and the opening `ADD` entry share one transaction. The returned
/// adjustment holds the stored product and that opening entry.
///
/// # Errors
/// Returns an error if:
/// - Name or SKU is empty ([`Error::Validation`])
/// - The price is negative or not finite ([`Error::InvalidPrice`])
/// - The opening stock is negative ([`Error::InvalidQuantity`])
/// - The supplier does not exist ([`Error::UnknownSupplier`])
/// - Another product already has this SKU ([`Error::DuplicateSku`])
/// - A database operation fails
#[instrument(skip(db))]
pub async fn create_product<C>(db: &C, new: NewProduct) -> Result<StockAdjustment>
where
    C: ConnectionTrait + TransactionTrait,
{
    let name = required("name", &new.name)?;
    let sku = required("SKU", &new.sku)?;
    let price = validate_price(new.price)?;
    let opening_stock = new.stock.unwrap_or(0);
    if opening_stock < 0 {
        return Err(Error::InvalidQuantity {
            quantity: opening_stock,
        });
    }

    let txn = db.begin().await?;

    ensure_supplier_exists(&txn, new.supplier_id).await?;
    if get_product_by_sku(&txn, &sku).await?.is_some() {
        return Err(Error::DuplicateSku { sku });
    }

    let created = product::ActiveModel {
        name: Set(name),
        description: Set(new.description),
        sku: Set(sku.clone()),
        price: Set(price),
        stock: Set(0),
        supplier_id: Set(new.supplier_id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| map_write_error(e, &sku, new.supplier_id))?;

    let adjustment = adjust_stock(&txn, created.id, opening_stock, StockOperation::Add).await?;
    txn.commit().await?;

    info!(
        product_id = created.id,
        supplier_id = created.supplier_id,
        stock = adjustment.product.stock,
        "Created product"
    );
    Ok(adjustment)
}

/// Retrieves a specific product by its unique ID, returning None if it does not exist.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies the provided fields to an existing product.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist ([`Error::ProductNotFound`])
/// - A provided name or SKU is empty ([`Error::Validation`])
/// - A provided price is negative or not finite ([`Error::InvalidPrice`])
/// - The new SKU belongs to another product ([`Error::DuplicateSku`])
/// - The new supplier does not exist ([`Error::UnknownSupplier`])
/// - The database update fails
#[instrument(skip(db))]
pub async fn update_product<C>(
    db: &C,
    product_id: i64,
    changes: ProductChanges,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    // Validate inputs
    let name = changes.name.as_deref().map(|n| required("name", n)).transpose()?;
    let sku = changes.sku.as_deref().map(|s| required("SKU", s)).transpose()?;
    let price = changes.price.map(validate_price).transpose()?;

    let existing = get_product(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    let mut active: product::ActiveModel = existing.clone().into();

    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(description) = changes.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = price {
        active.price = Set(price);
    }
    if let Some(sku) = sku.as_ref().filter(|s| **s != existing.sku) {
        let taken = Product::find()
            .filter(product::Column::Sku.eq(sku.as_str()))
            .filter(product::Column::Id.ne(product_id))
            .one(db)
            .await?
            .is_some();
        if taken {
            return Err(Error::DuplicateSku { sku: sku.clone() });
        }
        active.sku = Set(sku.clone());
    }
    if let Some(supplier_id) = changes.supplier_id.filter(|id| *id != existing.supplier_id) {
        ensure_supplier_exists(db, supplier_id).await?;
        active.supplier_id = Set(supplier_id);
    }

    if !active.is_changed() {
        return Ok(existing);
    }

    let target_sku = sku.unwrap_or_else(|| existing.sku.clone());
    let target_supplier = changes.supplier_id.unwrap_or(existing.supplier_id);
    let updated = active
        .update(db)
        .await
        .map_err(|e| map_write_error(e, &target_sku, target_supplier))?;

    info!(product_id, "Updated product");
    Ok(updated)
}

/// Deletes a product and its ledger entries in one transaction.
///
/// Returns `false` if the product did not exist.
///
/// # Errors
/// Returns an error if any delete fails; nothing is removed in that case.
#[instrument(skip(db))]
pub async fn delete_product<C>(db: &C, product_id: i64) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    if get_product(&txn, product_id).await?.is_none() {
        return Ok(false);
    }

    let removed_entries = ProductTransaction::delete_many()
        .filter(product_transaction::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?
        .rows_affected;
    Product::delete_by_id(product_id).exec(&txn).await?;
    txn.commit().await?;

    info!(product_id, ledger_entries = removed_entries, "Deleted product");
    Ok(true)
}
