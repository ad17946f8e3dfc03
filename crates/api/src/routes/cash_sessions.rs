//! Cash register session routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use punto_core::cash::{
    AddCashMovementInput, CashMovementType, ClosingResult, CloseSessionInput, DenominationCount,
    PaymentMethod,
};
use punto_db::entities::{cash_closing_counts, cash_sessions};
use punto_db::repositories::CashSessionRepository;
use punto_shared::types::CashSessionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

/// Creates the cash session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash-sessions", post(open_session))
        .route("/cash-sessions/current", get(current_session))
        .route("/cash-sessions/{id}", get(get_session))
        .route(
            "/cash-sessions/{id}/movements",
            get(list_movements).post(add_movement),
        )
        .route("/cash-sessions/{id}/summary", get(get_summary))
        .route("/cash-sessions/{id}/close", post(close_session))
}

/// Request body for opening a session.
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    /// Float placed in the drawer.
    pub opening_amount: Decimal,
    /// Operator opening the register.
    pub opened_by: String,
}

/// Request body for adding a movement.
#[derive(Debug, Deserialize)]
pub struct AddMovementRequest {
    /// `INCOME` or `EXPENSE`.
    pub movement_type: CashMovementType,
    /// Defaults to `CASH`.
    pub payment_method: Option<PaymentMethod>,
    /// Positive amount.
    pub amount: Decimal,
    /// What the movement is for.
    pub concept: String,
}

/// Request body for closing a session.
#[derive(Debug, Deserialize)]
pub struct CloseSessionRequest {
    /// Physical count by denomination.
    #[serde(default)]
    pub counts: Vec<DenominationCount>,
    /// Operator who counted the drawer.
    pub counted_by: String,
    /// Free text.
    pub notes: Option<String>,
}

/// A session with its closing count lines.
#[derive(Debug, Serialize)]
pub struct SessionDetailResponse {
    /// Session row.
    #[serde(flatten)]
    pub session: cash_sessions::Model,
    /// Count lines, empty while open.
    pub counts: Vec<cash_closing_counts::Model>,
}

/// Response for a close.
#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    /// Session after the close.
    pub session: cash_sessions::Model,
    /// Reconciliation.
    pub closing: ClosingResult,
}

/// POST `/cash-sessions` - Open a session.
async fn open_session(
    State(state): State<AppState>,
    Json(payload): Json<OpenSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CashSessionRepository::new((*state.db).clone());
    let session = repo
        .open_session(payload.opening_amount, &payload.opened_by)
        .await?;

    info!(
        session_id = session.id,
        opening_amount = %session.opening_amount,
        opened_by = %session.opened_by,
        "Cash session opened"
    );
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET `/cash-sessions/current` - The open session, if any.
async fn current_session(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = CashSessionRepository::new((*state.db).clone());
    let session = repo
        .current_session()
        .await?
        .ok_or_else(|| ApiError::not_found("No cash session is open"))?;
    Ok(Json(session))
}

/// GET `/cash-sessions/{id}` - Session detail.
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<CashSessionId>,
) -> ApiResult<impl IntoResponse> {
    let repo = CashSessionRepository::new((*state.db).clone());
    let detail = repo.find_session(id).await?;
    Ok(Json(SessionDetailResponse {
        session: detail.session,
        counts: detail.counts,
    }))
}

/// POST `/cash-sessions/{id}/movements` - Add an income or expense.
async fn add_movement(
    State(state): State<AppState>,
    Path(id): Path<CashSessionId>,
    Json(payload): Json<AddMovementRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CashSessionRepository::new((*state.db).clone());
    let movement = repo
        .add_movement(
            id,
            AddCashMovementInput {
                movement_type: payload.movement_type,
                payment_method: payload.payment_method.unwrap_or(PaymentMethod::Cash),
                amount: payload.amount,
                concept: payload.concept,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// GET `/cash-sessions/{id}/movements` - Movements in recording order.
async fn list_movements(
    State(state): State<AppState>,
    Path(id): Path<CashSessionId>,
) -> ApiResult<impl IntoResponse> {
    let repo = CashSessionRepository::new((*state.db).clone());
    Ok(Json(repo.list_movements(id).await?))
}

/// GET `/cash-sessions/{id}/summary` - Per-payment-method breakdown.
async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<CashSessionId>,
) -> ApiResult<impl IntoResponse> {
    let repo = CashSessionRepository::new((*state.db).clone());
    Ok(Json(repo.summary(id).await?))
}

/// POST `/cash-sessions/{id}/close` - Close against the physical count.
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<CashSessionId>,
    Json(payload): Json<CloseSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CashSessionRepository::new((*state.db).clone());
    let closed = repo
        .close_session(
            id,
            CloseSessionInput {
                counts: payload.counts,
                counted_by: payload.counted_by,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(CloseSessionResponse {
        session: closed.session,
        closing: closed.result,
    }))
}
