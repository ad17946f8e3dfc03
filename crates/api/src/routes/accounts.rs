//! Customer account routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use punto_core::accounts::{AccountMovement, MovementType, RecordMovementInput};
use punto_db::repositories::AccountMovementRepository;
use punto_shared::types::{ClientId, DateRange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::page_request;
use crate::{ApiResult, AppState};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/{client_id}/movements",
            get(list_movements).post(record_movement),
        )
        .route("/accounts/{client_id}/balance", get(get_balance))
        .route("/accounts/{client_id}/statement", get(get_statement))
}

/// Request body for recording a movement.
#[derive(Debug, Deserialize)]
pub struct RecordMovementRequest {
    /// `CHARGE` or `PAYMENT`.
    pub movement_type: MovementType,
    /// Positive amount.
    pub amount: Decimal,
    /// What the movement is for.
    pub description: String,
}

/// Response for a recorded movement.
#[derive(Debug, Serialize)]
pub struct RecordedMovementResponse {
    /// The stored movement.
    #[serde(flatten)]
    pub movement: AccountMovement,
    /// Balance after the movement.
    pub balance_after: Decimal,
}

/// Query parameters for listing movements.
#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Query parameters for a statement.
#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    /// First day (inclusive).
    pub from: Option<NaiveDate>,
    /// Last day (inclusive).
    pub to: Option<NaiveDate>,
}

/// POST `/accounts/{client_id}/movements` - Record a charge or payment.
async fn record_movement(
    State(state): State<AppState>,
    Path(client_id): Path<ClientId>,
    Json(payload): Json<RecordMovementRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountMovementRepository::new((*state.db).clone());
    let recorded = repo
        .record_movement(RecordMovementInput {
            client_id,
            movement_type: payload.movement_type,
            amount: payload.amount,
            description: payload.description,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordedMovementResponse {
            movement: recorded.movement,
            balance_after: recorded.balance_after,
        }),
    ))
}

/// GET `/accounts/{client_id}/movements` - List movements, newest first.
async fn list_movements(
    State(state): State<AppState>,
    Path(client_id): Path<ClientId>,
    Query(query): Query<ListMovementsQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountMovementRepository::new((*state.db).clone());
    let page = repo
        .list_movements(client_id, page_request(query.page, query.per_page))
        .await?;
    Ok(Json(page))
}

/// GET `/accounts/{client_id}/balance` - Current balance.
async fn get_balance(
    State(state): State<AppState>,
    Path(client_id): Path<ClientId>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountMovementRepository::new((*state.db).clone());
    Ok(Json(repo.get_balance(client_id).await?))
}

/// GET `/accounts/{client_id}/statement` - Statement with running balances.
///
/// Without bounds the statement covers the whole history.
async fn get_statement(
    State(state): State<AppState>,
    Path(client_id): Path<ClientId>,
    Query(query): Query<StatementQuery>,
) -> ApiResult<impl IntoResponse> {
    let range = match (query.from, query.to) {
        (None, None) => None,
        (from, to) => Some(DateRange::from_query(
            from,
            to,
            chrono::Utc::now().date_naive(),
        )?),
    };

    let repo = AccountMovementRepository::new((*state.db).clone());
    Ok(Json(repo.statement(client_id, range).await?))
}
