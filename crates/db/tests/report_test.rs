//! Integration tests for report queries.

mod common;

use chrono::{Duration, Utc};
use common::{client_id, create_client, create_product, product_id, receive_stock, setup_db};
use punto_core::accounts::{MovementType, RecordMovementInput};
use punto_core::cash::{CloseSessionInput, DenominationCount, PaymentMethod};
use punto_core::documents::{DocumentKind, LineInput, NewDocumentInput};
use punto_core::reports::PeriodGranularity;
use punto_db::repositories::{
    AccountMovementRepository, CashSessionRepository, ReportRepository, SaleRepository,
};
use punto_shared::types::{CashSessionId, ClientId, DateRange, ProductId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn today_range() -> DateRange {
    let today = Utc::now().date_naive();
    DateRange::new(today, today).unwrap()
}

fn document(
    kind: DocumentKind,
    client: Option<ClientId>,
    method: Option<PaymentMethod>,
    product: ProductId,
    quantity: Decimal,
) -> NewDocumentInput {
    NewDocumentInput {
        kind,
        client_id: client,
        cash_session_id: None,
        payment_method: method,
        notes: None,
        lines: vec![LineInput {
            product_id: product,
            quantity,
            unit_price: dec!(100),
            discount: Decimal::ZERO,
        }],
    }
}

#[tokio::test]
async fn test_sales_reports_only_count_completed_sales() {
    let db = setup_db().await;
    let client = create_client(&db, "Hotel Mar", None).await;
    let cake = create_product(&db, "TRT-001", "Chocolate cake", dec!(100)).await;
    let pie = create_product(&db, "PAY-001", "Apple pie", dec!(100)).await;
    receive_stock(&db, product_id(&cake), dec!(10), dec!(40)).await;
    receive_stock(&db, product_id(&pie), dec!(10), dec!(30)).await;

    let sales = SaleRepository::new(db.clone());
    let cid = Some(client_id(&client));
    sales
        .create_document(document(
            DocumentKind::Sale,
            cid,
            Some(PaymentMethod::Account),
            product_id(&cake),
            dec!(3),
        ))
        .await
        .unwrap();
    sales
        .create_document(document(
            DocumentKind::Sale,
            None,
            Some(PaymentMethod::Cash),
            product_id(&pie),
            dec!(1),
        ))
        .await
        .unwrap();
    // Orders never count as revenue.
    sales
        .create_document(document(DocumentKind::Order, cid, None, product_id(&cake), dec!(5)))
        .await
        .unwrap();

    let reports = ReportRepository::new(db);
    let range = today_range();

    let by_client = reports.sales_by_client(range).await.unwrap();
    assert_eq!(by_client.grand_total, dec!(400));
    assert_eq!(by_client.row_count, 2);
    assert_eq!(by_client.groups[0].label, "Hotel Mar");
    assert_eq!(by_client.groups[0].total, dec!(300));
    assert_eq!(by_client.groups[1].key, "walk-in");

    let by_product = reports.sales_by_product(range).await.unwrap();
    assert_eq!(by_product.groups[0].label, "Chocolate cake");
    assert_eq!(by_product.grand_total, dec!(400));

    let by_method = reports.sales_by_payment_method(range).await.unwrap();
    assert_eq!(by_method.groups.len(), 2);
    let groups_total: Decimal = by_method.groups.iter().map(|g| g.total).sum();
    assert_eq!(groups_total, by_method.grand_total);

    let by_day = reports
        .sales_by_period(range, PeriodGranularity::Day)
        .await
        .unwrap();
    assert_eq!(by_day.groups.len(), 1);
    assert_eq!(by_day.groups[0].count, 2);
}

#[tokio::test]
async fn test_sales_outside_range_are_excluded() {
    let db = setup_db().await;
    let cake = create_product(&db, "TRT-001", "Chocolate cake", dec!(100)).await;
    receive_stock(&db, product_id(&cake), dec!(10), dec!(40)).await;
    SaleRepository::new(db.clone())
        .create_document(document(
            DocumentKind::Sale,
            None,
            Some(PaymentMethod::Card),
            product_id(&cake),
            dec!(1),
        ))
        .await
        .unwrap();

    let last_week = Utc::now().date_naive() - Duration::days(7);
    let range = DateRange::new(last_week, last_week).unwrap();
    let report = ReportRepository::new(db).sales_by_client(range).await.unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.grand_total, Decimal::ZERO);
}

#[tokio::test]
async fn test_receivables_aging_lists_only_debtors() {
    let db = setup_db().await;
    let debtor = create_client(&db, "Hotel Mar", None).await;
    let settled = create_client(&db, "Cafe Luna", None).await;
    let accounts = AccountMovementRepository::new(db.clone());

    for (client, movement_type, amount) in [
        (client_id(&debtor), MovementType::Charge, dec!(800)),
        (client_id(&debtor), MovementType::Payment, dec!(300)),
        (client_id(&settled), MovementType::Charge, dec!(200)),
        (client_id(&settled), MovementType::Payment, dec!(200)),
    ] {
        accounts
            .record_movement(RecordMovementInput {
                client_id: client,
                movement_type,
                amount,
                description: "Test".to_string(),
            })
            .await
            .unwrap();
    }

    let report = ReportRepository::new(db)
        .receivables_aging(Utc::now().date_naive())
        .await
        .unwrap();

    assert_eq!(report.clients.len(), 1);
    assert_eq!(report.clients[0].client_name, "Hotel Mar");
    assert_eq!(report.clients[0].total, dec!(500));
    assert_eq!(report.grand_total, dec!(500));
}

#[tokio::test]
async fn test_cash_sessions_report_shows_closed_sessions() {
    let db = setup_db().await;
    let cash = CashSessionRepository::new(db.clone());

    let first = cash.open_session(dec!(100), "ana").await.unwrap();
    cash.close_session(
        CashSessionId::new(first.id),
        CloseSessionInput {
            counts: vec![DenominationCount {
                denomination: dec!(50),
                quantity: 1,
            }],
            counted_by: "ana".to_string(),
            notes: None,
        },
    )
    .await
    .unwrap();
    // Still open, so not part of the report.
    cash.open_session(dec!(100), "luis").await.unwrap();

    let report = ReportRepository::new(db).cash_sessions(today_range()).await.unwrap();

    assert_eq!(report.sessions.len(), 1);
    assert_eq!(report.sessions[0].difference, dec!(-50));
    assert_eq!(report.total_shortage, dec!(-50));
}
