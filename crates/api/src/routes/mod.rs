//! API route definitions.

use axum::Router;
use punto_shared::types::PageRequest;

use crate::AppState;

pub mod accounts;
pub mod cash_sessions;
pub mod clients;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod reports;
pub mod sales;
pub mod tickets;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(clients::routes())
        .merge(products::routes())
        .merge(accounts::routes())
        .merge(cash_sessions::routes())
        .merge(orders::routes())
        .merge(sales::routes())
        .merge(inventory::routes())
        .merge(reports::routes())
        .merge(tickets::routes())
}

/// Builds a page request from optional query parameters.
pub(crate) fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
    }
    .normalized()
}
