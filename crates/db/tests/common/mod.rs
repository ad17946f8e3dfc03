//! Shared setup for repository integration tests.

#![allow(dead_code)]

use punto_db::entities::{clients, products};
use punto_db::repositories::{
    ClientRepository, CreateClientInput, CreateProductInput, InventoryRepository, ProductRepository,
};
use punto_core::inventory::{RecordStockMovementInput, StockMovementKind};
use punto_shared::types::{ClientId, ProductId};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory file.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    punto_db::run_migrations(&db)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_client(
    db: &DatabaseConnection,
    name: &str,
    credit_limit: Option<Decimal>,
) -> clients::Model {
    ClientRepository::new(db.clone())
        .create_client(CreateClientInput {
            name: name.to_string(),
            credit_limit,
            ..Default::default()
        })
        .await
        .expect("Failed to create client")
}

pub async fn create_product(
    db: &DatabaseConnection,
    sku: &str,
    name: &str,
    unit_price: Decimal,
) -> products::Model {
    ProductRepository::new(db.clone())
        .create_product(CreateProductInput {
            sku: sku.to_string(),
            name: name.to_string(),
            unit_price,
        })
        .await
        .expect("Failed to create product")
}

pub async fn receive_stock(
    db: &DatabaseConnection,
    product_id: ProductId,
    quantity: Decimal,
    unit_cost: Decimal,
) {
    InventoryRepository::new(db.clone())
        .record_movement(RecordStockMovementInput {
            product_id,
            kind: StockMovementKind::PurchaseReceipt,
            quantity,
            unit_cost: Some(unit_cost),
            reference: Some("PO-TEST".to_string()),
        })
        .await
        .expect("Failed to receive stock");
}

pub fn client_id(model: &clients::Model) -> ClientId {
    ClientId::new(model.id)
}

pub fn product_id(model: &products::Model) -> ProductId {
    ProductId::new(model.id)
}
