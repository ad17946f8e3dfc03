//! Integration tests for cash register sessions.

mod common;

use common::setup_db;
use punto_core::cash::{
    AddCashMovementInput, CashError, CashMovementType, CloseSessionInput, DenominationCount,
    PaymentMethod,
};
use punto_db::entities::sea_orm_active_enums::CashSessionStatus;
use punto_db::repositories::{CashSessionError, CashSessionRepository};
use punto_shared::types::CashSessionId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn income(method: PaymentMethod, amount: Decimal) -> AddCashMovementInput {
    AddCashMovementInput {
        movement_type: CashMovementType::Income,
        payment_method: method,
        amount,
        concept: "Counter sale".to_string(),
    }
}

fn expense(amount: Decimal) -> AddCashMovementInput {
    AddCashMovementInput {
        movement_type: CashMovementType::Expense,
        payment_method: PaymentMethod::Cash,
        amount,
        concept: "Flour delivery".to_string(),
    }
}

fn count(denomination: Decimal, quantity: u32) -> DenominationCount {
    DenominationCount {
        denomination,
        quantity,
    }
}

#[tokio::test]
async fn test_full_session_reconciles_to_zero() {
    let db = setup_db().await;
    let repo = CashSessionRepository::new(db);

    let session = repo.open_session(dec!(1000), "ana").await.unwrap();
    let id = CashSessionId::new(session.id);
    repo.add_movement(id, income(PaymentMethod::Cash, dec!(500))).await.unwrap();
    repo.add_movement(id, income(PaymentMethod::Card, dec!(320))).await.unwrap();
    repo.add_movement(id, expense(dec!(100))).await.unwrap();

    let summary = repo.summary(id).await.unwrap();
    assert_eq!(summary.expected_cash, dec!(1400));

    let closed = repo
        .close_session(
            id,
            CloseSessionInput {
                counts: vec![count(dec!(1000), 1), count(dec!(200), 2)],
                counted_by: "ana".to_string(),
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(closed.result.counted_cash, dec!(1400));
    assert_eq!(closed.result.difference, Decimal::ZERO);
    assert_eq!(closed.session.status, CashSessionStatus::Closed);
    assert_eq!(closed.session.expected_cash, Some(dec!(1400)));
    assert!(closed.session.closed_at.is_some());

    let detail = repo.find_session(id).await.unwrap();
    assert_eq!(detail.counts.len(), 2);
}

#[tokio::test]
async fn test_shortage_is_negative_difference() {
    let db = setup_db().await;
    let repo = CashSessionRepository::new(db);

    let session = repo.open_session(dec!(200), "luis").await.unwrap();
    let id = CashSessionId::new(session.id);
    repo.add_movement(id, income(PaymentMethod::Cash, dec!(50))).await.unwrap();

    let closed = repo
        .close_session(
            id,
            CloseSessionInput {
                counts: vec![count(dec!(100), 2), count(dec!(20), 2)],
                counted_by: "luis".to_string(),
                notes: Some("short".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(closed.result.difference, dec!(-10));
    assert_eq!(closed.session.difference, Some(dec!(-10)));
}

#[tokio::test]
async fn test_second_open_is_rejected() {
    let db = setup_db().await;
    let repo = CashSessionRepository::new(db);

    let first = repo.open_session(dec!(100), "ana").await.unwrap();
    let second = repo.open_session(dec!(100), "luis").await;

    assert!(matches!(
        second,
        Err(CashSessionError::Cash(CashError::SessionAlreadyOpen(id)))
            if id.into_inner() == first.id
    ));
    assert_eq!(repo.current_session().await.unwrap().map(|s| s.id), Some(first.id));
}

#[tokio::test]
async fn test_closed_session_rejects_movements_and_second_close() {
    let db = setup_db().await;
    let repo = CashSessionRepository::new(db);

    let session = repo.open_session(dec!(100), "ana").await.unwrap();
    let id = CashSessionId::new(session.id);
    let close = || CloseSessionInput {
        counts: vec![count(dec!(100), 1)],
        counted_by: "ana".to_string(),
        notes: None,
    };
    repo.close_session(id, close()).await.unwrap();

    let movement = repo.add_movement(id, income(PaymentMethod::Cash, dec!(5))).await;
    assert!(matches!(
        movement,
        Err(CashSessionError::Cash(CashError::SessionNotOpen(_)))
    ));

    let again = repo.close_session(id, close()).await;
    assert!(matches!(
        again,
        Err(CashSessionError::Cash(CashError::SessionAlreadyClosed(_)))
    ));

    // A new session can be opened once the previous one is closed.
    assert!(repo.open_session(dec!(100), "luis").await.is_ok());
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let db = setup_db().await;
    let repo = CashSessionRepository::new(db);

    let result = repo.summary(CashSessionId::new(42)).await;

    assert!(matches!(
        result,
        Err(CashSessionError::Cash(CashError::SessionNotFound(_)))
    ));
}

#[tokio::test]
async fn test_negative_opening_amount_is_rejected() {
    let db = setup_db().await;
    let repo = CashSessionRepository::new(db);

    let result = repo.open_session(dec!(-1), "ana").await;

    assert!(matches!(
        result,
        Err(CashSessionError::Cash(CashError::NegativeOpeningAmount))
    ));
}
