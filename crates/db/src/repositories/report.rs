//! Read-side queries feeding the report builders.
//!
//! Each method loads the rows a report needs and hands them to
//! [`ReportService`]; the grouping and arithmetic live in the core crate.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use punto_core::accounts::AccountMovement;
use punto_core::reports::{
    CashSessionRow, CashSessionsReport, KardexReport, PeriodGranularity, ReceivablesAgingReport,
    ReportError, ReportService, SaleFact, SaleLineFact, SalesReport,
};
use punto_shared::types::{CashSessionId, ClientId, DateRange, ProductId, SaleId};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use super::inventory::load_stock_movements;
use crate::entities::sea_orm_active_enums::{CashSessionStatus, DocumentKind, DocumentStatus};
use crate::entities::{account_movements, cash_sessions, clients, products, sale_items, sales};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportRepoError {
    /// Report rule violation.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Range bounds in the stored timestamp type.
fn bounds(range: DateRange) -> (DateTimeWithTimeZone, DateTimeWithTimeZone) {
    (range.start_utc().into(), range.end_utc_exclusive().into())
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Completed sales made inside the range. Orders, quotations and voided
    /// sales never count.
    async fn completed_sales(&self, range: DateRange) -> Result<Vec<sales::Model>, DbErr> {
        let (start, end) = bounds(range);
        sales::Entity::find()
            .filter(sales::Column::Kind.eq(DocumentKind::Sale))
            .filter(sales::Column::Status.eq(DocumentStatus::Completed))
            .filter(sales::Column::CreatedAt.gte(start))
            .filter(sales::Column::CreatedAt.lt(end))
            .order_by_asc(sales::Column::CreatedAt)
            .order_by_asc(sales::Column::Id)
            .all(&self.db)
            .await
    }

    async fn sale_facts(&self, range: DateRange) -> Result<Vec<SaleFact>, DbErr> {
        let rows = self.completed_sales(range).await?;

        let client_ids: HashSet<i32> = rows.iter().filter_map(|s| s.client_id).collect();
        let names: HashMap<i32, String> = if client_ids.is_empty() {
            HashMap::new()
        } else {
            clients::Entity::find()
                .filter(clients::Column::Id.is_in(client_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .filter_map(|s| {
                let payment_method = s.payment_method?.into();
                Some(SaleFact {
                    sale_id: SaleId::new(s.id),
                    date: s.created_at.with_timezone(&Utc).date_naive(),
                    client_id: s.client_id.map(ClientId::new),
                    client_name: s.client_id.and_then(|id| names.get(&id).cloned()),
                    payment_method,
                    total: s.total,
                })
            })
            .collect())
    }

    async fn sale_line_facts(&self, range: DateRange) -> Result<Vec<SaleLineFact>, DbErr> {
        let rows = self.completed_sales(range).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let dates: HashMap<i32, NaiveDate> = rows
            .iter()
            .map(|s| (s.id, s.created_at.with_timezone(&Utc).date_naive()))
            .collect();

        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.is_in(dates.keys().copied()))
            .order_by_asc(sale_items::Column::Id)
            .all(&self.db)
            .await?;

        let product_ids: HashSet<i32> = items.iter().map(|i| i.product_id).collect();
        let names: HashMap<i32, String> = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let date = *dates.get(&item.sale_id)?;
                Some(SaleLineFact {
                    sale_id: SaleId::new(item.sale_id),
                    date,
                    product_id: ProductId::new(item.product_id),
                    product_name: names
                        .get(&item.product_id)
                        .cloned()
                        .unwrap_or(item.description),
                    quantity: item.quantity,
                    line_total: item.line_total,
                })
            })
            .collect())
    }

    /// Sales totals per customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sales_by_client(&self, range: DateRange) -> Result<SalesReport, ReportRepoError> {
        let facts = self.sale_facts(range).await?;
        Ok(ReportService::sales_by_client(range, &facts))
    }

    /// Sales totals per product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sales_by_product(&self, range: DateRange) -> Result<SalesReport, ReportRepoError> {
        let facts = self.sale_line_facts(range).await?;
        Ok(ReportService::sales_by_product(range, &facts))
    }

    /// Sales totals per payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sales_by_payment_method(
        &self,
        range: DateRange,
    ) -> Result<SalesReport, ReportRepoError> {
        let facts = self.sale_facts(range).await?;
        Ok(ReportService::sales_by_payment_method(range, &facts))
    }

    /// Sales totals per day, week or month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sales_by_period(
        &self,
        range: DateRange,
        granularity: PeriodGranularity,
    ) -> Result<SalesReport, ReportRepoError> {
        let facts = self.sale_facts(range).await?;
        Ok(ReportService::sales_by_period(range, granularity, &facts))
    }

    /// Outstanding balances per customer, split by age.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn receivables_aging(
        &self,
        as_of: NaiveDate,
    ) -> Result<ReceivablesAgingReport, ReportRepoError> {
        let client_rows = clients::Entity::find()
            .order_by_asc(clients::Column::Id)
            .all(&self.db)
            .await?;
        let movement_rows = account_movements::Entity::find()
            .order_by_asc(account_movements::Column::CreatedAt)
            .order_by_asc(account_movements::Column::Id)
            .all(&self.db)
            .await?;

        let mut by_client: HashMap<i32, Vec<AccountMovement>> = HashMap::new();
        for row in movement_rows {
            by_client.entry(row.client_id).or_default().push(row.into());
        }

        let input = client_rows
            .into_iter()
            .map(|c| {
                let movements = by_client.remove(&c.id).unwrap_or_default();
                (ClientId::new(c.id), c.name, movements)
            })
            .collect();

        Ok(ReportService::receivables_aging(as_of, input))
    }

    /// Kardex of one product over a range.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` for unknown products.
    pub async fn kardex(
        &self,
        product_id: ProductId,
        range: DateRange,
    ) -> Result<KardexReport, ReportRepoError> {
        let product = products::Entity::find_by_id(product_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ReportError::ProductNotFound(product_id))?;
        let movements = load_stock_movements(&self.db, product_id).await?;

        Ok(ReportService::kardex(
            range,
            product_id,
            product.sku,
            product.name,
            movements,
        )?)
    }

    /// Closed sessions opened inside the range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn cash_sessions(
        &self,
        range: DateRange,
    ) -> Result<CashSessionsReport, ReportRepoError> {
        let (start, end) = bounds(range);
        let rows = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Closed))
            .filter(cash_sessions::Column::OpenedAt.gte(start))
            .filter(cash_sessions::Column::OpenedAt.lt(end))
            .all(&self.db)
            .await?;

        let sessions = rows
            .into_iter()
            .map(|s| CashSessionRow {
                session_id: CashSessionId::new(s.id),
                opened_at: s.opened_at.with_timezone(&Utc),
                closed_at: s.closed_at.map(|t| t.with_timezone(&Utc)),
                opened_by: s.opened_by,
                counted_by: s.counted_by,
                opening_amount: s.opening_amount,
                system_sales_total: s.system_sales_total.unwrap_or(Decimal::ZERO),
                system_expenses_total: s.system_expenses_total.unwrap_or(Decimal::ZERO),
                expected_cash: s.expected_cash.unwrap_or(Decimal::ZERO),
                counted_cash: s.counted_cash.unwrap_or(Decimal::ZERO),
                difference: s.difference.unwrap_or(Decimal::ZERO),
            })
            .collect();

        Ok(ReportService::cash_sessions(range, sessions))
    }
}
