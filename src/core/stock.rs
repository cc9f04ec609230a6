//! Stock ledger - Applies stock adjustments and records them as ledger entries.
//!
//! Every change to `product.stock` goes through [`adjust_stock`], which updates the
//! counter and appends one `product_transaction` row inside the same database
//! transaction. Either both land or neither does, so the ledger always explains the
//! current stock: the signed sum of a product's entries equals its `stock`.

use crate::{
    entities::{Product, ProductTransaction, StockOperation, product, product_transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Outcome of a successful stock adjustment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAdjustment {
    /// Product as it is after the adjustment
    pub product: product::Model,
    /// Ledger entry recording the adjustment
    pub transaction: product_transaction::Model,
}

/// Adjusts a product's stock and appends the matching ledger entry.
///
/// `ADD` increases stock without an upper bound check. `SUBTRACT` and `SALE` require at
/// least `quantity` units in stock and are rejected outright otherwise; stock is never
/// clamped. A quantity of zero is accepted and recorded.
///
/// The work runs in its own transaction, or in a savepoint when `db` is already a
/// transaction. The stock change is a single conditional `UPDATE`, so two concurrent
/// adjustments of the same product cannot lose each other's update or push stock
/// below zero.
///
/// # Errors
/// - [`Error::InvalidQuantity`] if `quantity` is negative or the addition would overflow
/// - [`Error::ProductNotFound`] if no product has `product_id`
/// - [`Error::InsufficientStock`] if an outflow asks for more than is in stock
/// - [`Error::Database`] if any statement fails
#[instrument(skip(db))]
pub async fn adjust_stock<C>(
    db: &C,
    product_id: i64,
    quantity: i32,
    operation: StockOperation,
) -> Result<StockAdjustment>
where
    C: ConnectionTrait + TransactionTrait,
{
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    let current = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if operation.is_outflow() && current.stock < quantity {
        warn!(
            product_id,
            available = current.stock,
            requested = quantity,
            "Rejected stock adjustment: not enough stock"
        );
        return Err(Error::InsufficientStock {
            product_id,
            available: current.stock,
            requested: quantity,
        });
    }

    if !operation.is_outflow() && current.stock.checked_add(quantity).is_none() {
        return Err(Error::InvalidQuantity { quantity });
    }

    let mut update = Product::update_many().filter(product::Column::Id.eq(product_id));
    update = if operation.is_outflow() {
        update
            .col_expr(
                product::Column::Stock,
                Expr::col(product::Column::Stock).sub(quantity),
            )
            .filter(product::Column::Stock.gte(quantity))
    } else {
        update.col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).add(quantity),
        )
    };

    if update.exec(&txn).await?.rows_affected == 0 {
        // A concurrent writer changed the row between our read and the update.
        return Err(
            match Product::find_by_id(product_id).one(&txn).await? {
                Some(latest) => Error::InsufficientStock {
                    product_id,
                    available: latest.stock,
                    requested: quantity,
                },
                None => Error::ProductNotFound { id: product_id },
            },
        );
    }

    let entry = product_transaction::ActiveModel {
        product_id: Set(product_id),
        operation: Set(operation),
        quantity: Set(quantity),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let updated = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    txn.commit().await?;

    info!(
        product_id,
        %operation,
        quantity,
        stock = updated.stock,
        "Stock adjusted"
    );

    Ok(StockAdjustment {
        product: updated,
        transaction: entry,
    })
}

/// Retrieves a single ledger entry by ID, returning None if it does not exist.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_transaction<C>(
    db: &C,
    transaction_id: i64,
) -> Result<Option<product_transaction::Model>>
where
    C: ConnectionTrait,
{
    ProductTransaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the ledger of a product, oldest entry first.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist, or an error if the
/// database query fails.
pub async fn get_transactions_for_product<C>(
    db: &C,
    product_id: i64,
) -> Result<Vec<product_transaction::Model>>
where
    C: ConnectionTrait,
{
    if Product::find_by_id(product_id).one(db).await?.is_none() {
        return Err(Error::ProductNotFound { id: product_id });
    }

    ProductTransaction::find()
        .filter(product_transaction::Column::ProductId.eq(product_id))
        .order_by_asc(product_transaction::Column::Timestamp)
        .order_by_asc(product_transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sums a product's ledger, counting `ADD` as positive and `SUBTRACT`/`SALE` as negative.
///
/// Because opening stock is itself recorded as an `ADD`, the result always equals the
/// product's current `stock`.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist, or an error if the
/// database query fails.
pub async fn ledger_balance<C>(db: &C, product_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let entries = get_transactions_for_product(db, product_id).await?;
    Ok(entries
        .iter()
        .map(product_transaction::Model::signed_quantity)
        .sum())
}
