//! Integration tests for customer accounts and clients.

mod common;

use common::{client_id, create_client, setup_db};
use punto_core::accounts::{AccountError, MovementType, RecordMovementInput};
use punto_db::repositories::{
    AccountMovementError, AccountMovementRepository, ClientError, ClientFilter, ClientRepository,
    CreateClientInput, UpdateClientInput,
};
use punto_shared::types::{ClientId, PageRequest};
use rust_decimal_macros::dec;

fn movement(
    client: ClientId,
    movement_type: MovementType,
    amount: rust_decimal::Decimal,
) -> RecordMovementInput {
    RecordMovementInput {
        client_id: client,
        movement_type,
        amount,
        description: format!("{movement_type} test"),
    }
}

// ============================================================================
// Clients
// ============================================================================

#[tokio::test]
async fn test_create_and_find_client() {
    let db = setup_db().await;
    let repo = ClientRepository::new(db);

    let created = repo
        .create_client(CreateClientInput {
            name: "  Panadería Sol  ".to_string(),
            phone: Some(" ".to_string()),
            credit_limit: Some(dec!(5000)),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.name, "Panadería Sol");
    assert_eq!(created.phone, None);
    assert!(created.is_active);

    let found = repo.find_client(ClientId::new(created.id)).await.unwrap().unwrap();
    assert_eq!(found.credit_limit, Some(dec!(5000)));
}

#[tokio::test]
async fn test_create_client_rejects_blank_name() {
    let db = setup_db().await;
    let repo = ClientRepository::new(db);

    let result = repo
        .create_client(CreateClientInput {
            name: "   ".to_string(),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(ClientError::EmptyName)));
}

#[tokio::test]
async fn test_list_clients_filters_by_search_and_status() {
    let db = setup_db().await;
    let repo = ClientRepository::new(db.clone());
    create_client(&db, "Cafe Luna", None).await;
    create_client(&db, "Hotel Mar", None).await;
    let inactive = create_client(&db, "Cafe Viejo", None).await;
    repo.update_client(
        client_id(&inactive),
        UpdateClientInput {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let page = repo
        .list_clients(
            ClientFilter {
                search: Some("Cafe".to_string()),
                is_active: Some(true),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].name, "Cafe Luna");
}

// ============================================================================
// Balances
// ============================================================================

#[tokio::test]
async fn test_balance_is_charges_minus_payments() {
    let db = setup_db().await;
    let client = create_client(&db, "Cafe Luna", None).await;
    let id = client_id(&client);
    let repo = AccountMovementRepository::new(db);

    repo.record_movement(movement(id, MovementType::Charge, dec!(1500))).await.unwrap();
    repo.record_movement(movement(id, MovementType::Charge, dec!(250.5))).await.unwrap();
    let paid = repo
        .record_movement(movement(id, MovementType::Payment, dec!(1000)))
        .await
        .unwrap();

    assert_eq!(paid.balance_after, dec!(750.5));

    let balance = repo.get_balance(id).await.unwrap();
    assert_eq!(balance.total_charges, dec!(1750.5));
    assert_eq!(balance.total_payments, dec!(1000));
    assert_eq!(balance.balance, dec!(750.5));
}

#[tokio::test]
async fn test_credit_limit_blocks_charge_but_not_payment() {
    let db = setup_db().await;
    let client = create_client(&db, "Hotel Mar", Some(dec!(1000))).await;
    let id = client_id(&client);
    let repo = AccountMovementRepository::new(db);

    repo.record_movement(movement(id, MovementType::Charge, dec!(800))).await.unwrap();

    let over = repo.record_movement(movement(id, MovementType::Charge, dec!(300))).await;
    assert!(matches!(
        over,
        Err(AccountMovementError::Account(AccountError::CreditLimitExceeded { .. }))
    ));

    // Overpaying is allowed and leaves a credit balance.
    let paid = repo
        .record_movement(movement(id, MovementType::Payment, dec!(900)))
        .await
        .unwrap();
    assert_eq!(paid.balance_after, dec!(-100));
}

#[tokio::test]
async fn test_inactive_client_rejects_charges() {
    let db = setup_db().await;
    let client = create_client(&db, "Cafe Viejo", None).await;
    let id = client_id(&client);
    ClientRepository::new(db.clone())
        .update_client(
            id,
            UpdateClientInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let result = AccountMovementRepository::new(db)
        .record_movement(movement(id, MovementType::Charge, dec!(10)))
        .await;

    assert!(matches!(
        result,
        Err(AccountMovementError::Account(AccountError::ClientInactive(_)))
    ));
}

#[tokio::test]
async fn test_unknown_client_is_not_found() {
    let db = setup_db().await;
    let repo = AccountMovementRepository::new(db);

    let result = repo.get_balance(ClientId::new(999)).await;

    assert!(matches!(
        result,
        Err(AccountMovementError::Account(AccountError::ClientNotFound(id)))
            if id == ClientId::new(999)
    ));
}

#[tokio::test]
async fn test_statement_running_balance_and_newest_first_listing() {
    let db = setup_db().await;
    let client = create_client(&db, "Cafe Luna", None).await;
    let id = client_id(&client);
    let repo = AccountMovementRepository::new(db);

    repo.record_movement(movement(id, MovementType::Charge, dec!(100))).await.unwrap();
    repo.record_movement(movement(id, MovementType::Payment, dec!(40))).await.unwrap();
    repo.record_movement(movement(id, MovementType::Charge, dec!(15))).await.unwrap();

    let statement = repo.statement(id, None).await.unwrap();
    let running: Vec<_> = statement.lines.iter().map(|l| l.running.current_balance).collect();
    assert_eq!(running, vec![dec!(100), dec!(60), dec!(75)]);
    assert_eq!(statement.closing_balance, dec!(75));

    let page = repo.list_movements(id, PageRequest::default()).await.unwrap();
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.data[0].amount, dec!(15));
}
