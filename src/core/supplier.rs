//! Supplier business logic - Creation, lookup, partial update and cascading delete.
//!
//! All functions take the connection (or an open transaction) they should run on, so
//! the caller decides the unit of work.

use crate::{
    entities::{Product, ProductTransaction, Supplier, product, product_transaction, supplier},
    errors::{ConstraintKind, Error, Result, constraint_violation},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields required to register a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSupplier {
    /// Display name
    pub name: String,
    /// Contact email, must not be used by another supplier
    pub email: String,
    /// Contact phone number
    pub phone_number: String,
}

/// Partial update of a supplier; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierChanges {
    /// New display name
    pub name: Option<String>,
    /// New contact email
    pub email: Option<String>,
    /// New contact phone number
    pub phone_number: Option<String>,
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("Supplier {field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

fn map_insert_error(err: DbErr, email: &str) -> Error {
    match constraint_violation(&err) {
        Some(ConstraintKind::Unique) => Error::DuplicateEmail {
            email: email.to_string(),
        },
        _ => err.into(),
    }
}

/// Finds a supplier by email.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_supplier_by_email<C>(db: &C, email: &str) -> Result<Option<supplier::Model>>
where
    C: ConnectionTrait,
{
    Supplier::find()
        .filter(supplier::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new supplier after checking that the email is not taken.
///
/// Name, email and phone number are trimmed and must not be empty.
///
/// # Errors
/// Returns an error if:
/// - A field is empty ([`Error::Validation`])
/// - Another supplier already has this email ([`Error::DuplicateEmail`])
/// - The database insert fails
#[instrument(skip(db))]
pub async fn create_supplier<C>(db: &C, new: NewSupplier) -> Result<supplier::Model>
where
    C: ConnectionTrait,
{
    let name = required("name", &new.name)?;
    let email = required("email", &new.email)?;
    let phone_number = required("phone number", &new.phone_number)?;

    if get_supplier_by_email(db, &email).await?.is_some() {
        return Err(Error::DuplicateEmail { email });
    }

    let created = supplier::ActiveModel {
        name: Set(name),
        email: Set(email.clone()),
        phone_number: Set(phone_number),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| map_insert_error(e, &email))?;

    info!(supplier_id = created.id, "Created supplier");
    Ok(created)
}

/// Retrieves a supplier by its unique ID, returning None if it does not exist.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_supplier<C>(db: &C, supplier_id: i64) -> Result<Option<supplier::Model>>
where
    C: ConnectionTrait,
{
    Supplier::find_by_id(supplier_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies the provided fields to an existing supplier.
///
/// A changed email is checked against every other supplier first.
///
/// # Errors
/// Returns an error if:
/// - The supplier does not exist ([`Error::SupplierNotFound`])
/// - A provided field is empty ([`Error::Validation`])
/// - The new email belongs to another supplier ([`Error::DuplicateEmail`])
/// - The database update fails
#[instrument(skip(db))]
pub async fn update_supplier<C>(
    db: &C,
    supplier_id: i64,
    changes: SupplierChanges,
) -> Result<supplier::Model>
where
    C: ConnectionTrait,
{
    let existing = get_supplier(db, supplier_id)
        .await?
        .ok_or(Error::SupplierNotFound { id: supplier_id })?;

    let mut active: supplier::ActiveModel = existing.clone().into();

    if let Some(name) = changes.name {
        active.name = Set(required("name", &name)?);
    }
    if let Some(phone_number) = changes.phone_number {
        active.phone_number = Set(required("phone number", &phone_number)?);
    }
    let mut new_email = None;
    if let Some(email) = changes.email {
        let email = required("email", &email)?;
        if email != existing.email {
            let taken = Supplier::find()
                .filter(supplier::Column::Email.eq(email.as_str()))
                .filter(supplier::Column::Id.ne(supplier_id))
                .one(db)
                .await?
                .is_some();
            if taken {
                return Err(Error::DuplicateEmail { email });
            }
            active.email = Set(email.clone());
            new_email = Some(email);
        }
    }

    if !active.is_changed() {
        return Ok(existing);
    }

    let updated = active.update(db).await.map_err(|e| {
        map_insert_error(e, new_email.as_deref().unwrap_or(&existing.email))
    })?;

    info!(supplier_id, "Updated supplier");
    Ok(updated)
}

/// Lists the products owned by a supplier, ordered by ID.
///
/// # Errors
/// Returns [`Error::SupplierNotFound`] if the supplier does not exist, or an error if the
/// database query fails.
pub async fn get_products_for_supplier<C>(db: &C, supplier_id: i64) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    if get_supplier(db, supplier_id).await?.is_none() {
        return Err(Error::SupplierNotFound { id: supplier_id });
    }

    Product::find()
        .filter(product::Column::SupplierId.eq(supplier_id))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a supplier together with its products and their ledger entries.
///
/// Dependents are removed child first (ledger entries, then products, then the
/// supplier) inside one transaction. Returns `false` if the supplier did not exist.
///
/// # Errors
/// Returns an error if any delete fails; nothing is removed in that case.
#[instrument(skip(db))]
pub async fn delete_supplier<C>(db: &C, supplier_id: i64) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    if get_supplier(&txn, supplier_id).await?.is_none() {
        return Ok(false);
    }

    let product_ids: Vec<i64> = Product::find()
        .filter(product::Column::SupplierId.eq(supplier_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    let mut removed_entries = 0;
    if !product_ids.is_empty() {
        removed_entries = ProductTransaction::delete_many()
            .filter(product_transaction::Column::ProductId.is_in(product_ids.iter().copied()))
            .exec(&txn)
            .await?
            .rows_affected;
        Product::delete_many()
            .filter(product::Column::SupplierId.eq(supplier_id))
            .exec(&txn)
            .await?;
    }

    Supplier::delete_by_id(supplier_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        supplier_id,
        products = product_ids.len(),
        ledger_entries = removed_entries,
        "Deleted supplier"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{product::get_product, stock::adjust_stock};
    use crate::entities::StockOperation;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_supplier_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_supplier(
            &db,
            NewSupplier {
                name: "   ".to_string(),
                email: "a@b.com".to_string(),
                phone_number: "+1".to_string(),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_supplier(
            &db,
            NewSupplier {
                name: "Acme".to_string(),
                email: String::new(),
                phone_number: "+1".to_string(),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        assert!(get_supplier_by_email(&db, "a@b.com").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_supplier_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let supplier = create_supplier(
            &db,
            NewSupplier {
                name: "  Acme Metals ".to_string(),
                email: "sales@acme.test".to_string(),
                phone_number: "+1234567890".to_string(),
            },
        )
        .await?;

        assert_eq!(supplier.name, "Acme Metals");
        assert_eq!(supplier.email, "sales@acme.test");

        let found = get_supplier(&db, supplier.id).await?;
        assert_eq!(found, Some(supplier));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_supplier(&db, "x@x.com").await?;

        let result = create_test_supplier(&db, "x@x.com").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateEmail { email } if email == "x@x.com"
        ));

        // First supplier untouched and still the only one
        assert_eq!(get_supplier(&db, first.id).await?, Some(first));
        assert_eq!(Supplier::find().all(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_supplier_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_supplier(&db, 999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_supplier_applies_only_provided_fields() -> Result<()> {
        let (db, supplier) = setup_with_supplier().await?;

        let updated = update_supplier(
            &db,
            supplier.id,
            SupplierChanges {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, supplier.email);
        assert_eq!(updated.phone_number, supplier.phone_number);

        let unchanged = update_supplier(&db, supplier.id, SupplierChanges::default()).await?;
        assert_eq!(unchanged, updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_supplier_email_uniqueness() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_supplier(&db, "first@test.com").await?;
        let second = create_test_supplier(&db, "second@test.com").await?;

        let result = update_supplier(
            &db,
            second.id,
            SupplierChanges {
                email: Some(first.email.clone()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::DuplicateEmail { .. }));

        // Re-submitting its own email is not a conflict
        let same = update_supplier(
            &db,
            second.id,
            SupplierChanges {
                email: Some(second.email.clone()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(same.email, "second@test.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_supplier_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_supplier(&db, 7, SupplierChanges::default()).await;
        assert!(matches!(result.unwrap_err(), Error::SupplierNotFound { id: 7 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_supplier_not_found_returns_false() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(!delete_supplier(&db, 999).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_supplier_cascades() -> Result<()> {
        let db = setup_test_db().await?;
        let doomed = create_test_supplier(&db, "doomed@test.com").await?;
        let survivor = create_test_supplier(&db, "survivor@test.com").await?;

        let p1 = create_custom_product(&db, doomed.id, "SKU-1", 10).await?;
        let p2 = create_custom_product(&db, doomed.id, "SKU-2", 5).await?;
        let kept = create_custom_product(&db, survivor.id, "SKU-3", 8).await?;
        adjust_stock(&db, p1.id, 3, StockOperation::Sale).await?;
        adjust_stock(&db, p2.id, 1, StockOperation::Subtract).await?;
        adjust_stock(&db, kept.id, 2, StockOperation::Add).await?;

        assert!(delete_supplier(&db, doomed.id).await?);

        assert!(get_supplier(&db, doomed.id).await?.is_none());
        assert!(get_product(&db, p1.id).await?.is_none());
        assert!(get_product(&db, p2.id).await?.is_none());

        // Only the survivor's product and its two ledger entries remain
        let products = Product::find().all(&db).await?;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, kept.id);
        let entries = ProductTransaction::find().all(&db).await?;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.product_id == kept.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_products_for_supplier() -> Result<()> {
        let (db, supplier) = setup_with_supplier().await?;
        let a = create_custom_product(&db, supplier.id, "A-1", 1).await?;
        let b = create_custom_product(&db, supplier.id, "B-1", 2).await?;

        let products = get_products_for_supplier(&db, supplier.id).await?;
        assert_eq!(products, vec![a, b]);

        let result = get_products_for_supplier(&db, 999).await;
        assert!(matches!(result, Err(Error::SupplierNotFound { id: 999 })));

        Ok(())
    }
}
