//! Stock movement routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use punto_core::inventory::{RecordStockMovementInput, StockMovementKind, StockPosition};
use punto_db::entities::stock_movements;
use punto_db::repositories::InventoryRepository;
use punto_shared::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::page_request;
use crate::{ApiResult, AppState};

/// Creates the inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/inventory/movements",
        get(list_movements).post(record_movement),
    )
}

/// Request body for a stock movement.
#[derive(Debug, Deserialize)]
pub struct RecordStockMovementRequest {
    /// Product moved.
    pub product_id: ProductId,
    /// Reason for the movement.
    pub kind: StockMovementKind,
    /// Positive quantity.
    pub quantity: Decimal,
    /// Cost per unit; required for purchase receipts.
    pub unit_cost: Option<Decimal>,
    /// Document number or note.
    pub reference: Option<String>,
}

/// Query parameters for listing movements.
#[derive(Debug, Deserialize)]
pub struct ListStockMovementsQuery {
    /// Only this product.
    pub product_id: Option<ProductId>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Response for a recorded movement.
#[derive(Debug, Serialize)]
pub struct StockMovementResponse {
    /// The stored movement.
    pub movement: stock_movements::Model,
    /// Position after the movement.
    pub position: StockPosition,
}

/// POST `/inventory/movements` - Record a stock movement.
async fn record_movement(
    State(state): State<AppState>,
    Json(payload): Json<RecordStockMovementRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = InventoryRepository::new((*state.db).clone());
    let (movement, position) = repo
        .record_movement(RecordStockMovementInput {
            product_id: payload.product_id,
            kind: payload.kind,
            quantity: payload.quantity,
            unit_cost: payload.unit_cost,
            reference: payload.reference,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(StockMovementResponse { movement, position }),
    ))
}

/// GET `/inventory/movements` - List stock movements, newest first.
async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<ListStockMovementsQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = InventoryRepository::new((*state.db).clone());
    let page = repo
        .list_movements(query.product_id, page_request(query.page, query.per_page))
        .await?;
    Ok(Json(page))
}
