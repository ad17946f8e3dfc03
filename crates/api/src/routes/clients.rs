//! Customer routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use punto_db::repositories::{
    ClientError, ClientFilter, ClientRepository, CreateClientInput, UpdateClientInput,
};
use punto_shared::types::ClientId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::info;

use super::page_request;
use crate::{ApiResult, AppState};

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/{id}", get(get_client).patch(update_client))
}

/// Query parameters for listing clients.
#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    /// Substring of the name.
    pub search: Option<String>,
    /// Filter by active status.
    pub active: Option<bool>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating a client.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    /// Display name.
    pub name: String,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Credit limit; absent for unlimited.
    pub credit_limit: Option<Decimal>,
}

/// Request body for updating a client.
#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    /// New name.
    pub name: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New credit limit; explicit `null` removes the limit.
    #[serde(default, deserialize_with = "explicit_null")]
    pub credit_limit: Option<Option<Decimal>>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(Some)
}

/// GET `/clients` - List clients.
async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = ClientRepository::new((*state.db).clone());
    let filter = ClientFilter {
        search: query.search,
        is_active: query.active,
    };
    let page = repo
        .list_clients(filter, page_request(query.page, query.per_page))
        .await?;
    Ok(Json(page))
}

/// POST `/clients` - Create a client.
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo
        .create_client(CreateClientInput {
            name: payload.name,
            tax_id: payload.tax_id,
            phone: payload.phone,
            email: payload.email,
            credit_limit: payload.credit_limit,
        })
        .await?;

    info!(client_id = client.id, name = %client.name, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET `/clients/{id}` - Get a client.
async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> ApiResult<impl IntoResponse> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo.find_client(id).await?.ok_or(ClientError::NotFound(id))?;
    Ok(Json(client))
}

/// PATCH `/clients/{id}` - Update a client.
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    Json(payload): Json<UpdateClientRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo
        .update_client(
            id,
            UpdateClientInput {
                name: payload.name,
                phone: payload.phone,
                email: payload.email,
                credit_limit: payload.credit_limit,
                is_active: payload.is_active,
            },
        )
        .await?;

    info!(client_id = client.id, "Client updated");
    Ok(Json(client))
}
