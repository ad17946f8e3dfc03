//! Product catalog repository.

use punto_shared::types::{MAX_AMOUNT, PageRequest, PageResponse, ProductId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::products;

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// SKU already in use.
    #[error("SKU '{0}' already exists")]
    DuplicateSku(String),

    /// SKU or name missing.
    #[error("Product {0} is required")]
    MissingField(&'static str),

    /// Price cannot be negative.
    #[error("Unit price cannot be negative")]
    NegativePrice,

    /// Price beyond the storable maximum.
    #[error("Unit price exceeds the supported maximum")]
    PriceTooLarge,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Stock keeping unit, unique.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// List price.
    pub unit_price: Decimal,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSku` if the SKU is taken, or a validation error.
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<products::Model, ProductError> {
        let sku = input.sku.trim().to_uppercase();
        let name = input.name.trim().to_string();
        if sku.is_empty() {
            return Err(ProductError::MissingField("sku"));
        }
        if name.is_empty() {
            return Err(ProductError::MissingField("name"));
        }
        if input.unit_price < Decimal::ZERO {
            return Err(ProductError::NegativePrice);
        }
        if input.unit_price > MAX_AMOUNT {
            return Err(ProductError::PriceTooLarge);
        }

        let existing = products::Entity::find()
            .filter(products::Column::Sku.eq(&sku))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ProductError::DuplicateSku(sku));
        }

        let now = chrono::Utc::now().into();
        let product = products::ActiveModel {
            sku: Set(sku),
            name: Set(name),
            unit_price: Set(input.unit_price),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let product = product.insert(&self.db).await?;
        tracing::info!(product_id = product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_product(
        &self,
        id: ProductId,
    ) -> Result<Option<products::Model>, ProductError> {
        Ok(products::Entity::find_by_id(id.into_inner()).one(&self.db).await?)
    }

    /// Lists products ordered by SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<PageResponse<products::Model>, ProductError> {
        let page = page.normalized();
        let mut query = products::Entity::find();
        if let Some(search) = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            query = query.filter(
                products::Column::Name
                    .contains(&search)
                    .or(products::Column::Sku.contains(search.to_uppercase())),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(products::Column::Sku)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}
