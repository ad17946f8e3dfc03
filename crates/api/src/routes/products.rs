//! Product catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use punto_core::inventory::StockPosition;
use punto_db::entities::products;
use punto_db::repositories::{
    CreateProductInput, InventoryRepository, ProductError, ProductRepository,
};
use punto_shared::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::page_request;
use crate::{ApiResult, AppState};

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product))
}

/// Query parameters for listing products.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Substring of the name or SKU.
    pub search: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Stock keeping unit.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// List price.
    pub unit_price: Decimal,
}

/// A product with its current stock.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    /// Catalog row.
    #[serde(flatten)]
    pub product: products::Model,
    /// Stock on hand.
    pub stock: StockPosition,
}

/// GET `/products` - List products.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    let page = repo
        .list_products(query.search, page_request(query.page, query.per_page))
        .await?;
    Ok(Json(page))
}

/// POST `/products` - Create a product.
async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    let product = repo
        .create_product(CreateProductInput {
            sku: payload.sku,
            name: payload.name,
            unit_price: payload.unit_price,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET `/products/{id}` - Get a product with its stock position.
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    let product = repo.find_product(id).await?.ok_or(ProductError::NotFound(id))?;
    let stock = InventoryRepository::new((*state.db).clone()).position(id).await?;
    Ok(Json(ProductDetailResponse { product, stock }))
}
