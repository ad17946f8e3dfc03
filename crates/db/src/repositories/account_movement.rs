//! Account movement repository.
//!
//! Movements are append-only. The balance is folded from the rows on every
//! read; there is no balance column to keep in sync.

use chrono::Utc;
use punto_core::accounts::{
    AccountBalance, AccountError, AccountMovement, AccountService, ClientStanding,
    RecordMovementInput, Statement,
};
use punto_shared::types::{
    AccountMovementId, ClientId, DateRange, PageRequest, PageResponse, SaleId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{account_movements, clients};

/// Error types for account movement operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountMovementError {
    /// Business rule violation.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<account_movements::Model> for AccountMovement {
    fn from(model: account_movements::Model) -> Self {
        Self {
            id: AccountMovementId::new(model.id),
            client_id: ClientId::new(model.client_id),
            movement_type: model.movement_type.into(),
            amount: model.amount,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// A stored movement with the balance it produced.
#[derive(Debug, Clone)]
pub struct RecordedMovement {
    /// The inserted row.
    pub movement: AccountMovement,
    /// Balance after the movement.
    pub balance_after: rust_decimal::Decimal,
}

/// Loads every movement of a client in creation order.
pub(crate) async fn load_movements<C: ConnectionTrait>(
    conn: &C,
    client_id: ClientId,
) -> Result<Vec<AccountMovement>, DbErr> {
    let rows = account_movements::Entity::find()
        .filter(account_movements::Column::ClientId.eq(client_id.into_inner()))
        .order_by_asc(account_movements::Column::CreatedAt)
        .order_by_asc(account_movements::Column::Id)
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(AccountMovement::from).collect())
}

/// Validates and inserts a movement on an existing connection or transaction.
///
/// Used directly by sale registration so the charge commits with the sale.
pub(crate) async fn record_movement_in<C, E>(
    conn: &C,
    input: RecordMovementInput,
    sale_id: Option<SaleId>,
) -> Result<RecordedMovement, E>
where
    C: ConnectionTrait,
    E: From<AccountError> + From<DbErr>,
{
    let client = clients::Entity::find_by_id(input.client_id.into_inner())
        .one(conn)
        .await?
        .ok_or(AccountError::ClientNotFound(input.client_id))?;

    let movements = load_movements(conn, input.client_id).await?;
    let balance = AccountBalance::from_movements(input.client_id, &movements);
    let standing = ClientStanding {
        is_active: client.is_active,
        credit_limit: client.credit_limit,
        current_balance: balance.balance,
    };

    let validated = AccountService::validate_movement(&input, standing)?;

    let model = account_movements::ActiveModel {
        client_id: Set(validated.client_id.into_inner()),
        movement_type: Set(validated.movement_type.into()),
        amount: Set(validated.amount),
        description: Set(validated.description),
        sale_id: Set(sale_id.map(SaleId::into_inner)),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::info!(
        client_id = %validated.client_id,
        movement_id = model.id,
        movement_type = %validated.movement_type,
        amount = %validated.amount,
        balance_after = %validated.balance_after,
        "Account movement recorded"
    );

    Ok(RecordedMovement {
        movement: model.into(),
        balance_after: validated.balance_after,
    })
}

/// Account movement repository.
#[derive(Debug, Clone)]
pub struct AccountMovementRepository {
    db: DatabaseConnection,
}

impl AccountMovementRepository {
    /// Creates a new account movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a charge or payment.
    ///
    /// The balance check and insert run in one transaction. There is no
    /// idempotency key: a retried request records a second movement.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ClientNotFound`, `ClientInactive`,
    /// `CreditLimitExceeded`, or a database error.
    pub async fn record_movement(
        &self,
        input: RecordMovementInput,
    ) -> Result<RecordedMovement, AccountMovementError> {
        let txn = self.db.begin().await?;
        let recorded = record_movement_in::<_, AccountMovementError>(&txn, input, None).await?;
        txn.commit().await?;
        Ok(recorded)
    }

    /// Folds all movements of a client into its current balance.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` if the client does not exist.
    pub async fn get_balance(
        &self,
        client_id: ClientId,
    ) -> Result<AccountBalance, AccountMovementError> {
        self.ensure_client(client_id).await?;
        let movements = load_movements(&self.db, client_id).await?;
        Ok(AccountBalance::from_movements(client_id, &movements))
    }

    /// Builds a statement with running balances.
    ///
    /// With a range, movements before it form the opening balance and
    /// movements after it are left out.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` if the client does not exist.
    pub async fn statement(
        &self,
        client_id: ClientId,
        range: Option<DateRange>,
    ) -> Result<Statement, AccountMovementError> {
        self.ensure_client(client_id).await?;
        let mut movements = load_movements(&self.db, client_id).await?;
        if let Some(range) = range {
            let end = range.end_utc_exclusive();
            movements.retain(|m| m.created_at < end);
        }
        Ok(Statement::build(
            client_id,
            movements,
            range.map(|r| r.start_utc()),
        ))
    }

    /// Lists a client's movements, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` if the client does not exist.
    pub async fn list_movements(
        &self,
        client_id: ClientId,
        page: PageRequest,
    ) -> Result<PageResponse<AccountMovement>, AccountMovementError> {
        self.ensure_client(client_id).await?;
        let page = page.normalized();
        let query = account_movements::Entity::find()
            .filter(account_movements::Column::ClientId.eq(client_id.into_inner()));

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(account_movements::Column::CreatedAt)
            .order_by_desc(account_movements::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(
            rows.into_iter().map(AccountMovement::from).collect(),
            page.page,
            page.per_page,
            total,
        ))
    }

    async fn ensure_client(&self, client_id: ClientId) -> Result<(), AccountMovementError> {
        let exists = clients::Entity::find_by_id(client_id.into_inner())
            .count(&self.db)
            .await?
            > 0;
        if exists {
            Ok(())
        } else {
            Err(AccountError::ClientNotFound(client_id).into())
        }
    }
}
