//! Stock movement repository.

use chrono::Utc;
use punto_core::inventory::{
    InventoryError, InventoryService, Kardex, RecordStockMovementInput, StockMovement,
    StockPosition,
};
use punto_shared::types::{PageRequest, PageResponse, ProductId, SaleId, StockMovementId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{products, stock_movements};

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryRepoError {
    /// Business rule violation.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<stock_movements::Model> for StockMovement {
    fn from(model: stock_movements::Model) -> Self {
        Self {
            id: StockMovementId::new(model.id),
            product_id: ProductId::new(model.product_id),
            kind: model.kind.into(),
            quantity: model.quantity,
            unit_cost: model.unit_cost,
            reference: model.reference,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Loads a product's stock movements in chronological order.
pub(crate) async fn load_stock_movements<C: ConnectionTrait>(
    conn: &C,
    product_id: ProductId,
) -> Result<Vec<StockMovement>, DbErr> {
    let rows = stock_movements::Entity::find()
        .filter(stock_movements::Column::ProductId.eq(product_id.into_inner()))
        .order_by_asc(stock_movements::Column::CreatedAt)
        .order_by_asc(stock_movements::Column::Id)
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(StockMovement::from).collect())
}

/// Replays a product's history into its current position.
pub(crate) async fn position_in<C, E>(conn: &C, product_id: ProductId) -> Result<StockPosition, E>
where
    C: ConnectionTrait,
    E: From<InventoryError> + From<DbErr>,
{
    let movements = load_stock_movements(conn, product_id).await?;
    Ok(Kardex::build(product_id, movements, None)?.closing)
}

/// Validates and inserts a stock movement against a known position.
pub(crate) async fn insert_movement_in<C, E>(
    conn: &C,
    input: RecordStockMovementInput,
    current: StockPosition,
    sale_id: Option<SaleId>,
) -> Result<(stock_movements::Model, StockPosition), E>
where
    C: ConnectionTrait,
    E: From<InventoryError> + From<DbErr>,
{
    let product_id = input.product_id;
    let validated = InventoryService::validate_movement(input, current)?;

    let mut position = current;
    position.apply(
        product_id,
        validated.kind,
        validated.quantity,
        validated.unit_cost,
    )?;

    let model = stock_movements::ActiveModel {
        product_id: Set(product_id.into_inner()),
        kind: Set(validated.kind.into()),
        quantity: Set(validated.quantity),
        unit_cost: Set(validated.unit_cost),
        reference: Set(validated.reference),
        sale_id: Set(sale_id.map(SaleId::into_inner)),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::debug!(
        product_id = %product_id,
        kind = %validated.kind,
        quantity = %validated.quantity,
        balance_after = %validated.balance_after,
        "Stock movement recorded"
    );
    Ok((model, position))
}

/// Inventory repository.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a stock movement after checking it against current stock.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, `InsufficientStock`, or a validation error.
    pub async fn record_movement(
        &self,
        input: RecordStockMovementInput,
    ) -> Result<(stock_movements::Model, StockPosition), InventoryRepoError> {
        let txn = self.db.begin().await?;

        let product_id = input.product_id;
        let exists = products::Entity::find_by_id(product_id.into_inner())
            .count(&txn)
            .await?
            > 0;
        if !exists {
            return Err(InventoryError::ProductNotFound(product_id).into());
        }

        let current = position_in::<_, InventoryRepoError>(&txn, product_id).await?;
        let recorded =
            insert_movement_in::<_, InventoryRepoError>(&txn, input, current, None).await?;
        txn.commit().await?;
        Ok(recorded)
    }

    /// Current stock position of a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product does not exist.
    pub async fn position(
        &self,
        product_id: ProductId,
    ) -> Result<StockPosition, InventoryRepoError> {
        let exists = products::Entity::find_by_id(product_id.into_inner())
            .count(&self.db)
            .await?
            > 0;
        if !exists {
            return Err(InventoryError::ProductNotFound(product_id).into());
        }
        position_in::<_, InventoryRepoError>(&self.db, product_id).await
    }

    /// Lists stock movements, newest first, optionally for one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_movements(
        &self,
        product_id: Option<ProductId>,
        page: PageRequest,
    ) -> Result<PageResponse<StockMovement>, InventoryRepoError> {
        let page = page.normalized();
        let mut query = stock_movements::Entity::find();
        if let Some(product_id) = product_id {
            query = query.filter(stock_movements::Column::ProductId.eq(product_id.into_inner()));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(stock_movements::Column::CreatedAt)
            .order_by_desc(stock_movements::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(
            rows.into_iter().map(StockMovement::from).collect(),
            page.page,
            page.per_page,
            total,
        ))
    }
}
