//! Cash session repository.
//!
//! Only one session may be open at a time. Closing is terminal and guarded
//! by a conditional update on the status column, so a second close racing
//! the first updates zero rows and is rejected.

use chrono::Utc;
use punto_core::cash::{
    AddCashMovementInput, CashError, CashMovementRecord, CashService, CloseSessionInput,
    ClosingResult, SessionSummary,
};
use punto_shared::types::{CashSessionId, SaleId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{
    cash_closing_counts, cash_movements, cash_sessions,
    sea_orm_active_enums::CashSessionStatus,
};

/// Error types for cash session operations.
#[derive(Debug, thiserror::Error)]
pub enum CashSessionError {
    /// Business rule violation.
    #[error(transparent)]
    Cash(#[from] CashError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A session with its closing count lines.
#[derive(Debug, Clone)]
pub struct SessionDetail {
    /// The session row.
    pub session: cash_sessions::Model,
    /// Count lines, empty while the session is open.
    pub counts: Vec<cash_closing_counts::Model>,
}

/// Result of a close.
#[derive(Debug, Clone)]
pub struct ClosedSession {
    /// The session after the update.
    pub session: cash_sessions::Model,
    /// The reconciliation.
    pub result: ClosingResult,
}

impl From<&cash_movements::Model> for CashMovementRecord {
    fn from(model: &cash_movements::Model) -> Self {
        Self {
            movement_type: model.movement_type.into(),
            payment_method: model.payment_method.into(),
            amount: model.amount,
        }
    }
}

pub(crate) async fn find_session_in<C, E>(
    conn: &C,
    id: CashSessionId,
) -> Result<cash_sessions::Model, E>
where
    C: ConnectionTrait,
    E: From<CashError> + From<DbErr>,
{
    Ok(cash_sessions::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(CashError::SessionNotFound(id))?)
}

async fn load_movements<C: ConnectionTrait>(
    conn: &C,
    id: CashSessionId,
) -> Result<Vec<cash_movements::Model>, DbErr> {
    cash_movements::Entity::find()
        .filter(cash_movements::Column::CashSessionId.eq(id.into_inner()))
        .order_by_asc(cash_movements::Column::CreatedAt)
        .order_by_asc(cash_movements::Column::Id)
        .all(conn)
        .await
}

/// Validates and inserts a cash movement on an existing connection or transaction.
pub(crate) async fn add_movement_in<C, E>(
    conn: &C,
    session_id: CashSessionId,
    input: &AddCashMovementInput,
    sale_id: Option<SaleId>,
) -> Result<cash_movements::Model, E>
where
    C: ConnectionTrait,
    E: From<CashError> + From<DbErr>,
{
    let session = find_session_in::<_, E>(conn, session_id).await?;
    let validated = CashService::validate_movement(session_id, session.status.into(), input)?;

    let model = cash_movements::ActiveModel {
        cash_session_id: Set(session_id.into_inner()),
        movement_type: Set(validated.movement_type.into()),
        payment_method: Set(validated.payment_method.into()),
        amount: Set(validated.amount),
        concept: Set(validated.concept),
        sale_id: Set(sale_id.map(SaleId::into_inner)),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::debug!(
        session_id = %session_id,
        movement_id = model.id,
        amount = %model.amount,
        "Cash movement added"
    );
    Ok(model)
}

/// Cash session repository.
#[derive(Debug, Clone)]
pub struct CashSessionRepository {
    db: DatabaseConnection,
}

impl CashSessionRepository {
    /// Creates a new cash session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a session with the given float.
    ///
    /// # Errors
    ///
    /// Returns `SessionAlreadyOpen` if another session is open, or a
    /// validation error.
    pub async fn open_session(
        &self,
        opening_amount: Decimal,
        opened_by: &str,
    ) -> Result<cash_sessions::Model, CashSessionError> {
        let (opening_amount, opened_by) = CashService::validate_opening(opening_amount, opened_by)?;

        let txn = self.db.begin().await?;
        if let Some(open) = Self::current_in(&txn).await? {
            return Err(CashError::SessionAlreadyOpen(CashSessionId::new(open.id)).into());
        }

        let session = cash_sessions::ActiveModel {
            status: Set(CashSessionStatus::Open),
            opening_amount: Set(opening_amount),
            opened_by: Set(opened_by),
            opened_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(
            session_id = session.id,
            opening_amount = %session.opening_amount,
            opened_by = %session.opened_by,
            "Cash session opened"
        );
        Ok(session)
    }

    async fn current_in<C: ConnectionTrait>(
        conn: &C,
    ) -> Result<Option<cash_sessions::Model>, DbErr> {
        cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .order_by_desc(cash_sessions::Column::OpenedAt)
            .one(conn)
            .await
    }

    /// Returns the open session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn current_session(&self) -> Result<Option<cash_sessions::Model>, CashSessionError> {
        Ok(Self::current_in(&self.db).await?)
    }

    /// Loads a session with its closing counts.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the session does not exist.
    pub async fn find_session(&self, id: CashSessionId) -> Result<SessionDetail, CashSessionError> {
        let session = find_session_in::<_, CashSessionError>(&self.db, id).await?;
        let counts = cash_closing_counts::Entity::find()
            .filter(cash_closing_counts::Column::CashSessionId.eq(id.into_inner()))
            .order_by_desc(cash_closing_counts::Column::Denomination)
            .all(&self.db)
            .await?;
        Ok(SessionDetail { session, counts })
    }

    /// Adds an income or expense to an open session.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound`, `SessionNotOpen`, or a validation error.
    pub async fn add_movement(
        &self,
        session_id: CashSessionId,
        input: AddCashMovementInput,
    ) -> Result<cash_movements::Model, CashSessionError> {
        let txn = self.db.begin().await?;
        let model = add_movement_in::<_, CashSessionError>(&txn, session_id, &input, None).await?;
        txn.commit().await?;
        Ok(model)
    }

    /// Lists a session's movements in the order they were recorded.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the session does not exist.
    pub async fn list_movements(
        &self,
        session_id: CashSessionId,
    ) -> Result<Vec<cash_movements::Model>, CashSessionError> {
        find_session_in::<_, CashSessionError>(&self.db, session_id).await?;
        Ok(load_movements(&self.db, session_id).await?)
    }

    /// Per-payment-method breakdown and expected cash.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the session does not exist.
    pub async fn summary(
        &self,
        session_id: CashSessionId,
    ) -> Result<SessionSummary, CashSessionError> {
        let session = find_session_in::<_, CashSessionError>(&self.db, session_id).await?;
        let movements = load_movements(&self.db, session_id).await?;
        let records: Vec<CashMovementRecord> =
            movements.iter().map(CashMovementRecord::from).collect();
        Ok(CashService::summarize(session.opening_amount, &records))
    }

    /// Closes a session against its physical count.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound`, `SessionAlreadyClosed`, or a validation
    /// error for the count.
    pub async fn close_session(
        &self,
        session_id: CashSessionId,
        input: CloseSessionInput,
    ) -> Result<ClosedSession, CashSessionError> {
        let txn = self.db.begin().await?;

        let session = find_session_in::<_, CashSessionError>(&txn, session_id).await?;
        let movements = load_movements(&txn, session_id).await?;
        let records: Vec<CashMovementRecord> =
            movements.iter().map(CashMovementRecord::from).collect();
        let result = CashService::close(
            session_id,
            session.status.into(),
            session.opening_amount,
            &records,
            &input,
        )?;

        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let updated = cash_sessions::Entity::update_many()
            .col_expr(cash_sessions::Column::Status, Expr::value(CashSessionStatus::Closed))
            .col_expr(cash_sessions::Column::ClosedAt, Expr::value(now))
            .col_expr(cash_sessions::Column::CountedBy, Expr::value(result.counted_by.clone()))
            .col_expr(cash_sessions::Column::Notes, Expr::value(result.notes.clone()))
            .col_expr(
                cash_sessions::Column::SystemSalesTotal,
                Expr::value(result.summary.system_sales_total),
            )
            .col_expr(
                cash_sessions::Column::SystemExpensesTotal,
                Expr::value(result.summary.system_expenses_total),
            )
            .col_expr(
                cash_sessions::Column::ExpectedCash,
                Expr::value(result.summary.expected_cash),
            )
            .col_expr(cash_sessions::Column::CountedCash, Expr::value(result.counted_cash))
            .col_expr(cash_sessions::Column::Difference, Expr::value(result.difference))
            .filter(cash_sessions::Column::Id.eq(session_id.into_inner()))
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            return Err(CashError::SessionAlreadyClosed(session_id).into());
        }

        for count in &result.counts {
            cash_closing_counts::ActiveModel {
                cash_session_id: Set(session_id.into_inner()),
                denomination: Set(count.denomination),
                quantity: Set(i64::from(count.quantity)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let session = find_session_in::<_, CashSessionError>(&txn, session_id).await?;
        txn.commit().await?;

        if result.difference.is_zero() {
            tracing::info!(session_id = %session_id, "Cash session closed, drawer balanced");
        } else {
            tracing::warn!(
                session_id = %session_id,
                expected = %result.summary.expected_cash,
                counted = %result.counted_cash,
                difference = %result.difference,
                "Cash session closed with difference"
            );
        }

        Ok(ClosedSession { session, result })
    }
}
