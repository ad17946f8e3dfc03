//! Order and quotation routes.
//!
//! Orders and quotations share the document table with sales but never move
//! stock or money. Sales are not reachable through these routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use punto_core::documents::{DocumentKind, DocumentStatus, LineInput, NewDocumentInput};
use punto_db::entities::{sale_items, sales};
use punto_db::repositories::{DocumentFilter, DocumentWithItems, SaleRepository};
use punto_shared::types::{ClientId, SaleId};
use serde::{Deserialize, Serialize};

use super::page_request;
use crate::{ApiError, ApiResult, AppState};

const ORDER_KINDS: [DocumentKind; 2] = [DocumentKind::Order, DocumentKind::Quotation];

/// Creates the order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", post(update_status))
}

/// Request body for creating an order or quotation.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// `ORDER` (default) or `QUOTATION`.
    pub kind: Option<DocumentKind>,
    /// Customer.
    pub client_id: Option<ClientId>,
    /// Free text.
    pub notes: Option<String>,
    /// Requested lines.
    pub lines: Vec<LineInput>,
}

/// Query parameters for listing orders.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Only this kind.
    pub kind: Option<DocumentKind>,
    /// Only this status.
    pub status: Option<DocumentStatus>,
    /// Only this customer.
    pub client_id: Option<ClientId>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: DocumentStatus,
}

/// A document header with its lines.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// Header row.
    #[serde(flatten)]
    pub document: sales::Model,
    /// Line rows.
    pub items: Vec<sale_items::Model>,
}

impl From<DocumentWithItems> for DocumentResponse {
    fn from(value: DocumentWithItems) -> Self {
        Self {
            document: value.document,
            items: value.items,
        }
    }
}

/// POST `/orders` - Create an order or quotation.
async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind = payload.kind.unwrap_or(DocumentKind::Order);
    if kind == DocumentKind::Sale {
        return Err(ApiError::validation("Sales are registered through /sales"));
    }

    let repo = SaleRepository::new((*state.db).clone());
    let created = repo
        .create_document(NewDocumentInput {
            kind,
            client_id: payload.client_id,
            cash_session_id: None,
            payment_method: None,
            notes: payload.notes,
            lines: payload.lines,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(created))))
}

/// GET `/orders` - List orders and quotations.
async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<impl IntoResponse> {
    let kinds = match query.kind {
        Some(DocumentKind::Sale) => return Err(ApiError::validation("Use /sales to list sales")),
        Some(kind) => vec![kind],
        None => ORDER_KINDS.to_vec(),
    };

    let repo = SaleRepository::new((*state.db).clone());
    let page = repo
        .list_documents(
            DocumentFilter {
                kinds,
                status: query.status,
                client_id: query.client_id,
            },
            page_request(query.page, query.per_page),
        )
        .await?;
    Ok(Json(page))
}

/// GET `/orders/{id}` - Get an order or quotation.
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<SaleId>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let document = repo.find_document(id, &ORDER_KINDS).await?;
    Ok(Json(DocumentResponse::from(document)))
}

/// POST `/orders/{id}/status` - Move to a new status.
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<SaleId>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let updated = repo.update_order_status(id, payload.status).await?;
    Ok(Json(updated))
}
