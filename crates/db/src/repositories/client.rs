//! Client repository.

use punto_shared::types::{ClientId, MAX_AMOUNT, PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::clients;

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(ClientId),

    /// Name is required.
    #[error("Client name is required")]
    EmptyName,

    /// Credit limit cannot be negative.
    #[error("Credit limit cannot be negative")]
    NegativeCreditLimit,

    /// Credit limit beyond the storable maximum.
    #[error("Credit limit exceeds the supported maximum")]
    CreditLimitTooLarge,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a client.
#[derive(Debug, Clone, Default)]
pub struct CreateClientInput {
    /// Display name.
    pub name: String,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Maximum balance allowed on the account, `None` for unlimited.
    pub credit_limit: Option<Decimal>,
}

/// Input for updating a client. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    /// New name.
    pub name: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New credit limit; `Some(None)` removes the limit.
    pub credit_limit: Option<Option<Decimal>>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Filter options for listing clients.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Case-sensitive substring of the name.
    pub search: Option<String>,
    /// Only active or inactive clients.
    pub is_active: Option<bool>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_credit_limit(limit: Option<Decimal>) -> Result<(), ClientError> {
    match limit {
        Some(l) if l < Decimal::ZERO => Err(ClientError::NegativeCreditLimit),
        Some(l) if l > MAX_AMOUNT => Err(ClientError::CreditLimitTooLarge),
        _ => Ok(()),
    }
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the credit limit is out of range,
    /// or the insert fails.
    pub async fn create_client(
        &self,
        input: CreateClientInput,
    ) -> Result<clients::Model, ClientError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ClientError::EmptyName);
        }
        check_credit_limit(input.credit_limit)?;

        let now = chrono::Utc::now().into();
        let client = clients::ActiveModel {
            name: Set(name),
            tax_id: Set(blank_to_none(input.tax_id)),
            phone: Set(blank_to_none(input.phone)),
            email: Set(blank_to_none(input.email)),
            credit_limit: Set(input.credit_limit),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let client = client.insert(&self.db).await?;
        tracing::info!(client_id = client.id, "Client created");
        Ok(client)
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_client(&self, id: ClientId) -> Result<Option<clients::Model>, ClientError> {
        Ok(clients::Entity::find_by_id(id.into_inner()).one(&self.db).await?)
    }

    /// Lists clients ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_clients(
        &self,
        filter: ClientFilter,
        page: PageRequest,
    ) -> Result<PageResponse<clients::Model>, ClientError> {
        let page = page.normalized();
        let mut query = clients::Entity::find();

        if let Some(search) = blank_to_none(filter.search) {
            query = query.filter(clients::Column::Name.contains(&search));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(clients::Column::IsActive.eq(is_active));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(clients::Column::Name)
            .order_by_asc(clients::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Updates a client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the client does not exist, or a validation error.
    pub async fn update_client(
        &self,
        id: ClientId,
        input: UpdateClientInput,
    ) -> Result<clients::Model, ClientError> {
        let existing = self.find_client(id).await?.ok_or(ClientError::NotFound(id))?;
        let mut active: clients::ActiveModel = existing.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ClientError::EmptyName);
            }
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(blank_to_none(Some(phone)));
        }
        if let Some(email) = input.email {
            active.email = Set(blank_to_none(Some(email)));
        }
        if let Some(limit) = input.credit_limit {
            check_credit_limit(limit)?;
            active.credit_limit = Set(limit);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}
