//! Printable ticket routes.

use axum::{
    Router,
    extract::{Path, State},
    response::{Html, IntoResponse},
    routing::get,
};
use punto_core::ticket::{TicketHeader, render_ticket};
use punto_db::repositories::SaleRepository;
use punto_shared::types::SaleId;

use crate::{ApiResult, AppState};

/// Creates the ticket routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/tickets/{sale_id}", get(get_ticket))
}

/// GET `/tickets/{sale_id}` - HTML ticket for a document.
async fn get_ticket(
    State(state): State<AppState>,
    Path(sale_id): Path<SaleId>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let data = repo.ticket_data(sale_id).await?;

    let header = TicketHeader {
        business_name: state.business.name.clone(),
        address: state.business.address.clone(),
        tax_id: state.business.tax_id.clone(),
        footer: state.business.ticket_footer.clone(),
    };
    Ok(Html(render_ticket(&header, &data)))
}
