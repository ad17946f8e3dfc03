//! Integration tests for stock movements and the kardex report.

mod common;

use chrono::Utc;
use common::{create_product, product_id, receive_stock, setup_db};
use punto_core::inventory::{InventoryError, RecordStockMovementInput, StockMovementKind};
use punto_db::repositories::{InventoryRepoError, InventoryRepository, ReportRepository};
use punto_shared::types::{DateRange, PageRequest, ProductId};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_receipts_average_cost() {
    let db = setup_db().await;
    let flour = create_product(&db, "HAR-001", "Flour 25kg", dec!(400)).await;
    let pid = product_id(&flour);

    receive_stock(&db, pid, dec!(10), dec!(100)).await;
    receive_stock(&db, pid, dec!(10), dec!(150)).await;

    let position = InventoryRepository::new(db).position(pid).await.unwrap();
    assert_eq!(position.quantity, dec!(20));
    assert_eq!(position.average_cost, dec!(125));
    assert_eq!(position.value, dec!(2500));
}

#[tokio::test]
async fn test_sale_return_comes_back_at_average_cost() {
    let db = setup_db().await;
    let flour = create_product(&db, "HAR-001", "Flour 25kg", dec!(400)).await;
    let pid = product_id(&flour);
    receive_stock(&db, pid, dec!(10), dec!(2)).await;
    let repo = InventoryRepository::new(db);

    let (stored, position) = repo
        .record_movement(RecordStockMovementInput {
            product_id: pid,
            kind: StockMovementKind::SaleReturn,
            quantity: dec!(10),
            unit_cost: Some(dec!(8)),
            reference: Some("Returned tray".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(stored.unit_cost, None);
    assert_eq!(position.average_cost, dec!(2));
    assert_eq!(position.value, dec!(40));
    assert_eq!(repo.position(pid).await.unwrap().value, dec!(40));
}

#[tokio::test]
async fn test_adjustment_out_cannot_exceed_stock() {
    let db = setup_db().await;
    let flour = create_product(&db, "HAR-001", "Flour 25kg", dec!(400)).await;
    let pid = product_id(&flour);
    receive_stock(&db, pid, dec!(2), dec!(100)).await;

    let result = InventoryRepository::new(db)
        .record_movement(RecordStockMovementInput {
            product_id: pid,
            kind: StockMovementKind::AdjustmentOut,
            quantity: dec!(3),
            unit_cost: None,
            reference: Some("Spoiled".to_string()),
        })
        .await;

    assert!(matches!(
        result,
        Err(InventoryRepoError::Inventory(InventoryError::InsufficientStock { .. }))
    ));
}

#[tokio::test]
async fn test_movement_for_unknown_product_is_not_found() {
    let db = setup_db().await;

    let result = InventoryRepository::new(db)
        .record_movement(RecordStockMovementInput {
            product_id: ProductId::new(77),
            kind: StockMovementKind::AdjustmentIn,
            quantity: dec!(1),
            unit_cost: None,
            reference: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(InventoryRepoError::Inventory(InventoryError::ProductNotFound(_)))
    ));
}

#[tokio::test]
async fn test_kardex_report_lists_movements_with_balances() {
    let db = setup_db().await;
    let flour = create_product(&db, "HAR-001", "Flour 25kg", dec!(400)).await;
    let pid = product_id(&flour);
    let repo = InventoryRepository::new(db.clone());

    receive_stock(&db, pid, dec!(4), dec!(100)).await;
    repo.record_movement(RecordStockMovementInput {
        product_id: pid,
        kind: StockMovementKind::AdjustmentOut,
        quantity: dec!(1),
        unit_cost: None,
        reference: Some("Count".to_string()),
    })
    .await
    .unwrap();

    let today = Utc::now().date_naive();
    let range = DateRange::new(today, today).unwrap();
    let report = ReportRepository::new(db.clone()).kardex(pid, range).await.unwrap();

    assert_eq!(report.sku, "HAR-001");
    assert_eq!(report.kardex.lines.len(), 2);
    assert_eq!(report.kardex.lines[1].quantity_out, dec!(1));
    assert_eq!(report.kardex.closing.quantity, dec!(3));
    assert_eq!(report.kardex.closing.value, dec!(300));

    let listed = repo.list_movements(Some(pid), PageRequest::default()).await.unwrap();
    assert_eq!(listed.meta.total, 2);
    assert_eq!(listed.data[0].kind, StockMovementKind::AdjustmentOut);
}
