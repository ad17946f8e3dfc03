//! Database seeder for Punto Pastelero development and testing.
//!
//! Seeds a small catalog with opening stock and a few customers, one of them
//! with an outstanding balance. Running it twice is a no-op.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use punto_core::accounts::{MovementType, RecordMovementInput};
use punto_core::inventory::{RecordStockMovementInput, StockMovementKind};
use punto_db::entities::products;
use punto_db::repositories::{
    AccountMovementRepository, ClientRepository, CreateClientInput, CreateProductInput,
    InventoryRepository, ProductRepository,
};
use punto_shared::types::{ClientId, ProductId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

/// `(sku, name, unit_price, opening_quantity, unit_cost)`
const PRODUCTS: [(&str, &str, Decimal, Decimal, Decimal); 5] = [
    ("TRT-001", "Chocolate cake", dec!(250), dec!(12), dec!(110)),
    ("TRT-002", "Tres leches cake", dec!(280), dec!(8), dec!(125)),
    ("PAY-001", "Apple pie", dec!(180), dec!(10), dec!(70)),
    ("PAN-001", "Baguette", dec!(12.5), dec!(60), dec!(4)),
    ("GAL-001", "Butter cookies (kg)", dec!(160), dec!(15.5), dec!(62)),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = punto_db::connect(&database_url).await?;

    if products::Entity::find().count(&db).await? > 0 {
        println!("Catalog already seeded, skipping...");
        return Ok(());
    }

    println!("Seeding products and opening stock...");
    seed_products(&db).await?;

    println!("Seeding clients...");
    seed_clients(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_products(db: &DatabaseConnection) -> anyhow::Result<()> {
    let catalog = ProductRepository::new(db.clone());
    let inventory = InventoryRepository::new(db.clone());

    for (sku, name, unit_price, quantity, unit_cost) in PRODUCTS {
        let product = catalog
            .create_product(CreateProductInput {
                sku: sku.to_string(),
                name: name.to_string(),
                unit_price,
            })
            .await?;

        inventory
            .record_movement(RecordStockMovementInput {
                product_id: ProductId::new(product.id),
                kind: StockMovementKind::PurchaseReceipt,
                quantity,
                unit_cost: Some(unit_cost),
                reference: Some("Opening stock".to_string()),
            })
            .await?;
        println!("  {sku} {name}: {quantity} units");
    }
    Ok(())
}

async fn seed_clients(db: &DatabaseConnection) -> anyhow::Result<()> {
    let clients = ClientRepository::new(db.clone());
    let accounts = AccountMovementRepository::new(db.clone());

    let hotel = clients
        .create_client(CreateClientInput {
            name: "Hotel Mar Azul".to_string(),
            tax_id: Some("HMA010101AB1".to_string()),
            phone: Some("555-0101".to_string()),
            email: Some("compras@hotelmarazul.example".to_string()),
            credit_limit: Some(dec!(15000)),
        })
        .await?;

    clients
        .create_client(CreateClientInput {
            name: "Cafe Luna".to_string(),
            phone: Some("555-0202".to_string()),
            credit_limit: Some(dec!(3000)),
            ..Default::default()
        })
        .await?;

    clients
        .create_client(CreateClientInput {
            name: "Maria Lopez".to_string(),
            ..Default::default()
        })
        .await?;

    let hotel_id = ClientId::new(hotel.id);
    for (movement_type, amount, description) in [
        (MovementType::Charge, dec!(4200), "Banquet desserts"),
        (MovementType::Payment, dec!(2000), "Transfer"),
    ] {
        accounts
            .record_movement(RecordMovementInput {
                client_id: hotel_id,
                movement_type,
                amount,
                description: description.to_string(),
            })
            .await?;
    }
    println!("  3 clients, Hotel Mar Azul owes 2200");
    Ok(())
}
