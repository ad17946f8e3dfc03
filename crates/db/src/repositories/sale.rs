//! Sale, order and quotation repository.
//!
//! Registering a sale writes the header, its lines, one stock movement per
//! line, the cash movement on the register session and, for account sales,
//! the charge on the customer's account. All of it commits or rolls back
//! together.

use std::collections::HashMap;

use chrono::Utc;
use punto_core::accounts::{AccountError, MovementType, RecordMovementInput};
use punto_core::cash::{
    AddCashMovementInput, CashError, CashMovementType, CashSessionStatus, PaymentMethod,
};
use punto_core::documents::{
    DocumentError, DocumentKind, DocumentService, DocumentStatus, DocumentTotals, NewDocumentInput,
};
use punto_core::inventory::{
    InventoryError, RecordStockMovementInput, StockMovementKind, StockPosition,
};
use punto_core::ticket::{TicketData, TicketLine};
use punto_shared::types::{CashSessionId, ClientId, PageRequest, PageResponse, ProductId, SaleId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::account_movement::record_movement_in;
use super::cash_session::{add_movement_in, find_session_in};
use super::inventory::{insert_movement_in, position_in};
use crate::entities::sea_orm_active_enums::{
    DocumentKind as DbDocumentKind, DocumentStatus as DbDocumentStatus,
};
use crate::entities::{clients, products, sale_items, sales};

/// Error types for document operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Document rule violation.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Customer account rule violation.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Cash session rule violation.
    #[error(transparent)]
    Cash(#[from] CashError),

    /// Stock rule violation.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Product is discontinued.
    #[error("Product {0} is inactive")]
    ProductInactive(ProductId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A document header with its lines.
#[derive(Debug, Clone)]
pub struct DocumentWithItems {
    /// Header row.
    pub document: sales::Model,
    /// Line rows in insertion order.
    pub items: Vec<sale_items::Model>,
}

/// Filter options for listing documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Kinds to include; empty means all.
    pub kinds: Vec<DocumentKind>,
    /// Only this status.
    pub status: Option<DocumentStatus>,
    /// Only this customer.
    pub client_id: Option<ClientId>,
}

/// Sale repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a sale, order or quotation.
    ///
    /// # Errors
    ///
    /// Returns a document validation error, a missing or inactive client or
    /// product, a closed session, insufficient stock, or an exceeded credit
    /// limit. Nothing is written when any check fails.
    pub async fn create_document(
        &self,
        input: NewDocumentInput,
    ) -> Result<DocumentWithItems, SaleError> {
        let doc = DocumentService::validate(input)?;
        let txn = self.db.begin().await?;

        if let Some(client_id) = doc.client_id {
            let client = clients::Entity::find_by_id(client_id.into_inner())
                .one(&txn)
                .await?
                .ok_or(AccountError::ClientNotFound(client_id))?;
            if !client.is_active {
                return Err(AccountError::ClientInactive(client_id).into());
            }
        }

        if let Some(session_id) = doc.cash_session_id {
            let session = find_session_in::<_, SaleError>(&txn, session_id).await?;
            if CashSessionStatus::from(session.status) != CashSessionStatus::Open {
                return Err(CashError::SessionNotOpen(session_id).into());
            }
        }

        let mut names: HashMap<ProductId, String> = HashMap::new();
        for line in &doc.lines {
            if names.contains_key(&line.product_id) {
                continue;
            }
            let product = products::Entity::find_by_id(line.product_id.into_inner())
                .one(&txn)
                .await?
                .ok_or(InventoryError::ProductNotFound(line.product_id))?;
            if !product.is_active {
                return Err(SaleError::ProductInactive(line.product_id));
            }
            names.insert(line.product_id, product.name);
        }

        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let header = sales::ActiveModel {
            kind: Set(doc.kind.into()),
            status: Set(doc.status.into()),
            client_id: Set(doc.client_id.map(ClientId::into_inner)),
            cash_session_id: Set(doc.cash_session_id.map(CashSessionId::into_inner)),
            payment_method: Set(doc.payment_method.map(Into::into)),
            subtotal: Set(doc.totals.subtotal),
            discount_total: Set(doc.totals.discount_total),
            total: Set(doc.totals.total),
            notes: Set(doc.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let sale_id = SaleId::new(header.id);

        let mut items = Vec::with_capacity(doc.lines.len());
        for line in &doc.lines {
            let item = sale_items::ActiveModel {
                sale_id: Set(header.id),
                product_id: Set(line.product_id.into_inner()),
                description: Set(names.get(&line.product_id).cloned().unwrap_or_default()),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                discount: Set(line.discount),
                line_total: Set(line.line_total),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        if doc.kind == DocumentKind::Sale {
            let mut positions: HashMap<ProductId, StockPosition> = HashMap::new();
            for line in &doc.lines {
                let current = match positions.get(&line.product_id) {
                    Some(position) => *position,
                    None => position_in::<_, SaleError>(&txn, line.product_id).await?,
                };
                let (_, next) = insert_movement_in::<_, SaleError>(
                    &txn,
                    RecordStockMovementInput {
                        product_id: line.product_id,
                        kind: StockMovementKind::Sale,
                        quantity: line.quantity,
                        unit_cost: None,
                        reference: Some(format!("SALE-{sale_id}")),
                    },
                    current,
                    Some(sale_id),
                )
                .await?;
                positions.insert(line.product_id, next);
            }

            let total = doc.totals.total;
            if total > Decimal::ZERO {
                if let (Some(session_id), Some(method)) =
                    (doc.cash_session_id, doc.payment_method)
                {
                    add_movement_in::<_, SaleError>(
                        &txn,
                        session_id,
                        &AddCashMovementInput {
                            movement_type: CashMovementType::Income,
                            payment_method: method,
                            amount: total,
                            concept: format!("Sale #{sale_id}"),
                        },
                        Some(sale_id),
                    )
                    .await?;
                }

                if let (Some(PaymentMethod::Account), Some(client_id)) =
                    (doc.payment_method, doc.client_id)
                {
                    record_movement_in::<_, SaleError>(
                        &txn,
                        RecordMovementInput {
                            client_id,
                            movement_type: MovementType::Charge,
                            amount: total,
                            description: format!("Sale #{sale_id}"),
                        },
                        Some(sale_id),
                    )
                    .await?;
                }
            }
        }

        txn.commit().await?;
        tracing::info!(
            sale_id = %sale_id,
            kind = %doc.kind,
            total = %doc.totals.total,
            lines = items.len(),
            "Document created"
        );

        Ok(DocumentWithItems {
            document: header,
            items,
        })
    }

    /// Loads a document with its lines, restricted to the given kinds.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no document of those kinds has the ID.
    pub async fn find_document(
        &self,
        id: SaleId,
        kinds: &[DocumentKind],
    ) -> Result<DocumentWithItems, SaleError> {
        let document = sales::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .filter(|d| kinds.is_empty() || kinds.contains(&DocumentKind::from(d.kind)))
            .ok_or(DocumentError::NotFound(id))?;

        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(id.into_inner()))
            .order_by_asc(sale_items::Column::Id)
            .all(&self.db)
            .await?;

        Ok(DocumentWithItems { document, items })
    }

    /// Lists document headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_documents(
        &self,
        filter: DocumentFilter,
        page: PageRequest,
    ) -> Result<PageResponse<sales::Model>, SaleError> {
        let page = page.normalized();
        let mut query = sales::Entity::find();
        if !filter.kinds.is_empty() {
            let kinds: Vec<DbDocumentKind> = filter.kinds.into_iter().map(Into::into).collect();
            query = query.filter(sales::Column::Kind.is_in(kinds));
        }
        if let Some(status) = filter.status {
            query = query.filter(sales::Column::Status.eq(DbDocumentStatus::from(status)));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(sales::Column::ClientId.eq(client_id.into_inner()));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(sales::Column::CreatedAt)
            .order_by_desc(sales::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Moves an order or quotation to a new status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs and sales, or `InvalidTransition`.
    pub async fn update_order_status(
        &self,
        id: SaleId,
        to: DocumentStatus,
    ) -> Result<sales::Model, SaleError> {
        let document = sales::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .filter(|d| DocumentKind::from(d.kind) != DocumentKind::Sale)
            .ok_or(DocumentError::NotFound(id))?;

        let from: DocumentStatus = document.status.into();
        let next = DocumentService::transition(document.kind.into(), from, to)?;

        let mut active: sales::ActiveModel = document.into();
        active.status = Set(next.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await?;

        tracing::info!(sale_id = %id, from = %from, to = %next, "Document status changed");
        Ok(updated)
    }

    /// Gathers what a printed ticket shows.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the document does not exist.
    pub async fn ticket_data(&self, id: SaleId) -> Result<TicketData, SaleError> {
        let DocumentWithItems { document, items } = self.find_document(id, &[]).await?;

        let client_name = match document.client_id {
            Some(client_id) => clients::Entity::find_by_id(client_id)
                .one(&self.db)
                .await?
                .map(|c| c.name),
            None => None,
        };

        Ok(TicketData {
            sale_id: id,
            kind: document.kind.into(),
            created_at: document.created_at.with_timezone(&Utc),
            client_name,
            payment_method: document.payment_method.map(Into::into),
            lines: items
                .into_iter()
                .map(|i| TicketLine {
                    description: i.description,
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    discount: i.discount,
                    line_total: i.line_total,
                })
                .collect(),
            totals: DocumentTotals {
                subtotal: document.subtotal,
                discount_total: document.discount_total,
                total: document.total,
            },
        })
    }
}
