//! Unified error types for the inventory ledger.
//!
//! Every core operation returns [`Result`]. Domain rule violations get their own
//! variants so the HTTP and CLI layers can map them to status and exit codes;
//! storage failures are carried as [`sea_orm::DbErr`].

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error type shared by the core, the HTTP API and the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage failure not covered by a more specific variant
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Input failed a field-level check (empty name, empty SKU, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// No supplier with this id
    #[error("Supplier not found: {id}")]
    SupplierNotFound {
        /// Requested supplier id
        id: i64,
    },

    /// No product with this id
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// No ledger entry with this id
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Requested transaction id
        id: i64,
    },

    /// Another supplier already uses this email
    #[error("A supplier with email '{email}' already exists")]
    DuplicateEmail {
        /// Conflicting email
        email: String,
    },

    /// Another product already uses this SKU
    #[error("A product with SKU '{sku}' already exists")]
    DuplicateSku {
        /// Conflicting SKU
        sku: String,
    },

    /// A product referenced a supplier that does not exist
    #[error("Supplier {supplier_id} does not exist")]
    UnknownSupplier {
        /// Referenced supplier id
        supplier_id: i64,
    },

    /// A subtract or sale asked for more units than are in stock
    #[error(
        "Not enough stock for product {product_id}. Available: {available}, Requested: {requested}"
    )]
    InsufficientStock {
        /// Product being adjusted
        product_id: i64,
        /// Units currently in stock
        available: i32,
        /// Units requested
        requested: i32,
    },

    /// Negative quantity, or an addition that would overflow the stock counter
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// Rejected quantity
        quantity: i32,
    },

    /// Negative or non-finite price
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// Rejected price
        price: f64,
    },

    /// I/O failure (config file, socket bind)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for the "record does not exist" family of errors.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SupplierNotFound { .. }
                | Self::ProductNotFound { .. }
                | Self::TransactionNotFound { .. }
        )
    }

    /// Returns true for errors caused by the caller's input rather than by storage or I/O.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::DuplicateEmail { .. }
                | Self::DuplicateSku { .. }
                | Self::UnknownSupplier { .. }
                | Self::InsufficientStock { .. }
                | Self::InvalidQuantity { .. }
                | Self::InvalidPrice { .. }
        )
    }
}

/// Classifies a constraint violation reported by the database.
///
/// The lifecycle functions check uniqueness and supplier existence up front, but two
/// concurrent requests can both pass those checks; the loser ends up here.
pub(crate) fn constraint_violation(err: &DbErr) -> Option<ConstraintKind> {
    match err.sql_err()? {
        SqlErr::UniqueConstraintViolation(_) => Some(ConstraintKind::Unique),
        SqlErr::ForeignKeyConstraintViolation(_) => Some(ConstraintKind::ForeignKey),
        _ => None,
    }
}

/// Kind of database constraint that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintKind {
    Unique,
    ForeignKey,
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
