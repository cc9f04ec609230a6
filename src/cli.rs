//! Command-line interface.
//!
//! Each data command runs as one unit of work: a transaction is opened, the core
//! operation runs against it, and it is committed on success. Records are printed
//! to stdout as JSON; logs go to stderr.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    api,
    config::AppConfig,
    core::{
        product::{self, NewProduct, ProductChanges},
        stock,
        supplier::{self, NewSupplier, SupplierChanges},
    },
    entities::StockOperation,
    errors::{Error, Result},
};

/// Exit code used when the requested record does not exist.
pub const NOT_FOUND_EXIT_CODE: u8 = 2;

/// CLI for managing suppliers, products and stock.
#[derive(Debug, Parser)]
#[command(name = "inventory-ledger")]
#[command(about = "Manage suppliers, products and stock levels")]
#[command(version)]
pub struct Cli {
    /// Database connection URL (overrides the config file and `DATABASE_URL`)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Path to a TOML config file (default: ./inventory.toml if present)
    #[arg(long, global = true, env = "INVENTORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Address to listen on (overrides the config file and `BIND_ADDRESS`)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Create a new supplier
    CreateSupplier {
        /// Name of the supplier
        #[arg(long)]
        name: String,
        /// Email of the supplier
        #[arg(long)]
        email: String,
        /// Phone number of the supplier
        #[arg(long)]
        phone_number: String,
    },

    /// Get a supplier by ID
    GetSupplier {
        /// ID of the supplier to retrieve
        #[arg(long)]
        id: i64,
    },

    /// Update an existing supplier
    UpdateSupplier {
        /// ID of the supplier to update
        #[arg(long)]
        id: i64,
        /// New name of the supplier
        #[arg(long)]
        name: Option<String>,
        /// New email of the supplier
        #[arg(long)]
        email: Option<String>,
        /// New phone number of the supplier
        #[arg(long)]
        phone_number: Option<String>,
    },

    /// Delete a supplier with its products and their stock history
    DeleteSupplier {
        /// ID of the supplier to delete
        #[arg(long)]
        id: i64,
    },

    /// Create a new product
    CreateProduct {
        /// Name of the product
        #[arg(long)]
        name: String,
        /// Description of the product
        #[arg(long)]
        description: Option<String>,
        /// SKU of the product
        #[arg(long)]
        sku: String,
        /// Price of the product
        #[arg(long)]
        price: f64,
        /// ID of the supplier
        #[arg(long)]
        supplier_id: i64,
        /// Opening stock of the product
        #[arg(long, default_value_t = 0)]
        stock: i32,
    },

    /// Get a product by ID
    GetProduct {
        /// ID of the product to retrieve
        #[arg(long)]
        id: i64,
    },

    /// Update an existing product (stock is changed with update-stock)
    UpdateProduct {
        /// ID of the product to update
        #[arg(long)]
        id: i64,
        /// New name of the product
        #[arg(long)]
        name: Option<String>,
        /// New description of the product
        #[arg(long)]
        description: Option<String>,
        /// New SKU of the product
        #[arg(long)]
        sku: Option<String>,
        /// New price of the product
        #[arg(long)]
        price: Option<f64>,
        /// New supplier of the product
        #[arg(long)]
        supplier_id: Option<i64>,
    },

    /// Delete a product and its stock history
    DeleteProduct {
        /// ID of the product to delete
        #[arg(long)]
        id: i64,
    },

    /// Update stock for a product
    UpdateStock {
        /// ID of the product
        #[arg(long)]
        product_id: i64,
        /// Quantity to add or remove
        #[arg(long)]
        quantity: i32,
        /// ADD, SUBTRACT or SALE
        #[arg(long)]
        operation: StockOperation,
    },

    /// Show the stock history of a product
    GetTransactions {
        /// ID of the product
        #[arg(long)]
        product_id: i64,
    },
}

/// Result of a data command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The command succeeded; the value is printed as JSON
    Record(Value),
    /// The addressed record does not exist
    NotFound(String),
}

/// Runs a parsed command and returns the process exit code.
///
/// # Errors
/// Returns an error if the command fails for any reason other than a missing record.
pub async fn run(
    command: Command,
    db: DatabaseConnection,
    config: &AppConfig,
) -> Result<ExitCode> {
    if let Command::Serve { bind } = command {
        let address = bind.unwrap_or_else(|| config.bind_address.clone());
        api::serve(db, &address).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let txn = db.begin().await?;
    let outcome = match execute(&txn, command).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_not_found() => Outcome::NotFound(e.to_string()),
        Err(e) => return Err(e),
    };
    txn.commit().await?;

    Ok(match outcome {
        Outcome::Record(value) => {
            println!("{value:#}");
            ExitCode::SUCCESS
        }
        Outcome::NotFound(message) => {
            warn!("{}", message);
            ExitCode::from(NOT_FOUND_EXIT_CODE)
        }
    })
}

/// Executes a data command against `db`.
///
/// # Errors
/// Returns the core operation's error. `serve` is rejected because it is not a data command.
#[allow(clippy::too_many_lines)]
pub async fn execute<C>(db: &C, command: Command) -> Result<Outcome>
where
    C: ConnectionTrait + TransactionTrait,
{
    let outcome = match command {
        Command::Serve { .. } => {
            return Err(Error::Validation {
                message: "serve is not a data command".to_string(),
            });
        }

        Command::CreateSupplier {
            name,
            email,
            phone_number,
        } => {
            let created = supplier::create_supplier(
                db,
                NewSupplier {
                    name,
                    email,
                    phone_number,
                },
            )
            .await?;
            info!("Created new supplier {}", created.id);
            Outcome::Record(json!({ "supplier": created }))
        }

        Command::GetSupplier { id } => match supplier::get_supplier(db, id).await? {
            Some(found) => Outcome::Record(json!({ "supplier": found })),
            None => Outcome::NotFound(format!("Supplier with ID {id} not found")),
        },

        Command::UpdateSupplier {
            id,
            name,
            email,
            phone_number,
        } => {
            let updated = supplier::update_supplier(
                db,
                id,
                SupplierChanges {
                    name,
                    email,
                    phone_number,
                },
            )
            .await?;
            info!("Updated supplier {}", updated.id);
            Outcome::Record(json!({ "supplier": updated }))
        }

        Command::DeleteSupplier { id } => {
            if supplier::delete_supplier(db, id).await? {
                info!("Deleted supplier with ID {}", id);
                Outcome::Record(json!({ "deleted": id }))
            } else {
                Outcome::NotFound(format!("Supplier with ID {id} not found"))
            }
        }

        Command::CreateProduct {
            name,
            description,
            sku,
            price,
            supplier_id,
            stock,
        } => {
            let created = product::create_product(
                db,
                NewProduct {
                    name,
                    description,
                    sku,
                    price,
                    stock: Some(stock),
                    supplier_id,
                },
            )
            .await?;
            info!(
                "Created new product {} with stock {}",
                created.product.id, created.product.stock
            );
            Outcome::Record(json!({
                "product": created.product,
                "transaction": created.transaction,
            }))
        }

        Command::GetProduct { id } => match product::get_product(db, id).await? {
            Some(found) => Outcome::Record(json!({ "product": found })),
            None => Outcome::NotFound(format!("Product with ID {id} not found")),
        },

        Command::UpdateProduct {
            id,
            name,
            description,
            sku,
            price,
            supplier_id,
        } => {
            let updated = product::update_product(
                db,
                id,
                ProductChanges {
                    name,
                    description,
                    sku,
                    price,
                    supplier_id,
                },
            )
            .await?;
            info!("Updated product {}", updated.id);
            Outcome::Record(json!({ "product": updated }))
        }

        Command::DeleteProduct { id } => {
            if product::delete_product(db, id).await? {
                info!("Deleted product with ID {}", id);
                Outcome::Record(json!({ "deleted": id }))
            } else {
                Outcome::NotFound(format!("Product with ID {id} not found"))
            }
        }

        Command::UpdateStock {
            product_id,
            quantity,
            operation,
        } => {
            let adjustment = stock::adjust_stock(db, product_id, quantity, operation).await?;
            info!(
                "Updated stock for product {} to {}",
                product_id, adjustment.product.stock
            );
            Outcome::Record(json!({
                "product": adjustment.product,
                "transaction": adjustment.transaction,
            }))
        }

        Command::GetTransactions { product_id } => {
            let entries = stock::get_transactions_for_product(db, product_id).await?;
            Outcome::Record(json!({ "transactions": entries }))
        }
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::test_utils::*;

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["inventory-ledger"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_parse_update_stock() {
        let command = parse(&[
            "update-stock",
            "--product-id",
            "3",
            "--quantity",
            "5",
            "--operation",
            "sale",
        ]);
        assert!(matches!(
            command,
            Command::UpdateStock {
                product_id: 3,
                quantity: 5,
                operation: StockOperation::Sale,
            }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_operation() {
        let result = Cli::try_parse_from([
            "inventory-ledger",
            "update-stock",
            "--product-id",
            "3",
            "--quantity",
            "5",
            "--operation",
            "refund",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_product_stock_defaults_to_zero() {
        let command = parse(&[
            "create-product",
            "--name",
            "Widget",
            "--sku",
            "W-1",
            "--price",
            "2.5",
            "--supplier-id",
            "1",
        ]);
        assert!(matches!(command, Command::CreateProduct { stock: 0, .. }));
    }

    #[tokio::test]
    async fn test_execute_supplier_and_stock_commands() -> Result<()> {
        let db = setup_test_db().await?;

        let outcome = execute(
            &db,
            parse(&[
                "create-supplier",
                "--name",
                "Acme",
                "--email",
                "acme@test.com",
                "--phone-number",
                "+1",
            ]),
        )
        .await?;
        let Outcome::Record(value) = outcome else {
            panic!("expected a record");
        };
        let supplier_id = value["supplier"]["id"].as_i64().unwrap();

        let outcome = execute(
            &db,
            Command::CreateProduct {
                name: "Widget".to_string(),
                description: None,
                sku: "W-1".to_string(),
                price: 2.5,
                supplier_id,
                stock: 10,
            },
        )
        .await?;
        let Outcome::Record(value) = outcome else {
            panic!("expected a record");
        };
        let product_id = value["product"]["id"].as_i64().unwrap();

        let result = execute(
            &db,
            Command::UpdateStock {
                product_id,
                quantity: 20,
                operation: StockOperation::Subtract,
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InsufficientStock { .. })));

        let outcome = execute(&db, Command::GetTransactions { product_id }).await?;
        let Outcome::Record(value) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(value["transactions"].as_array().unwrap().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_execute_reports_missing_records() -> Result<()> {
        let db = setup_test_db().await?;

        let outcome = execute(&db, Command::GetSupplier { id: 9 }).await?;
        assert_eq!(
            outcome,
            Outcome::NotFound("Supplier with ID 9 not found".to_string())
        );

        let outcome = execute(&db, Command::DeleteProduct { id: 9 }).await?;
        assert!(matches!(outcome, Outcome::NotFound(_)));

        let result = execute(&db, Command::Serve { bind: None }).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }
}
