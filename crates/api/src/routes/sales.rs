//! Sale registration routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use punto_core::cash::PaymentMethod;
use punto_core::documents::{DocumentKind, DocumentStatus, LineInput, NewDocumentInput};
use punto_db::repositories::{DocumentFilter, SaleRepository};
use punto_shared::types::{CashSessionId, ClientId, SaleId};
use serde::Deserialize;

use super::orders::DocumentResponse;
use super::page_request;
use crate::{ApiResult, AppState};

/// Creates the sale routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route("/sales/{id}", get(get_sale))
}

/// Request body for registering a sale.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    /// Customer; required for `ACCOUNT` sales.
    pub client_id: Option<ClientId>,
    /// Register session the sale is rung up on.
    pub cash_session_id: Option<CashSessionId>,
    /// How the customer pays.
    pub payment_method: Option<PaymentMethod>,
    /// Free text.
    pub notes: Option<String>,
    /// Lines sold.
    pub lines: Vec<LineInput>,
}

/// Query parameters for listing sales.
#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    /// Only this status.
    pub status: Option<DocumentStatus>,
    /// Only this customer.
    pub client_id: Option<ClientId>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// POST `/sales` - Register a sale.
///
/// Stock, the register session and the customer account are updated in the
/// same transaction as the sale itself.
async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let created = repo
        .create_document(NewDocumentInput {
            kind: DocumentKind::Sale,
            client_id: payload.client_id,
            cash_session_id: payload.cash_session_id,
            payment_method: payload.payment_method,
            notes: payload.notes,
            lines: payload.lines,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(created))))
}

/// GET `/sales` - List sales, newest first.
async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<ListSalesQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let page = repo
        .list_documents(
            DocumentFilter {
                kinds: vec![DocumentKind::Sale],
                status: query.status,
                client_id: query.client_id,
            },
            page_request(query.page, query.per_page),
        )
        .await?;
    Ok(Json(page))
}

/// GET `/sales/{id}` - Get a sale with its lines.
async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<SaleId>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let sale = repo.find_document(id, &[DocumentKind::Sale]).await?;
    Ok(Json(DocumentResponse::from(sale)))
}
