//! HTTP error responses.
//!
//! Every failure leaves the API as `{"error": "<CODE>", "message": "<text>"}`.
//! Domain errors keep their own codes and statuses; everything else goes
//! through the shared [`AppError`] taxonomy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use punto_core::{
    accounts::AccountError, cash::CashError, documents::DocumentError,
    inventory::InventoryError, reports::ReportError,
};
use punto_db::repositories::{
    AccountMovementError, CashSessionError, ClientError, InventoryRepoError, ProductError,
    ReportRepoError, SaleError,
};
use punto_shared::AppError;
use sea_orm::DbErr;
use serde::Serialize;

/// Error returned by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Generic application error.
    #[error(transparent)]
    App(#[from] AppError),

    /// Domain rule violation with its own code.
    #[error("{message}")]
    Domain {
        /// HTTP status.
        status: u16,
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl ApiError {
    /// Shortcut for a 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::App(AppError::NotFound(message.into()))
    }

    /// Shortcut for a 400.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::App(AppError::Validation(message.into()))
    }

    /// HTTP status of the response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::App(e) => e.status_code(),
            Self::Domain { status, .. } => *status,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Domain { code, .. } => code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::App(e) if status.is_server_error() => {
                tracing::error!(error = %e, "Request failed");
                "An error occurred"
            }
            Self::App(e) => e.message(),
            Self::Domain { message, .. } => message.as_str(),
        };
        let body = Json(ErrorBody {
            error: self.code(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::App(AppError::Database(err.to_string()))
    }
}

macro_rules! domain_error {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for ApiError {
                fn from(err: $err) -> Self {
                    Self::Domain {
                        status: err.http_status_code(),
                        code: err.error_code(),
                        message: err.to_string(),
                    }
                }
            }
        )+
    };
}

domain_error!(AccountError, CashError, DocumentError, InventoryError, ReportError);

impl From<AccountMovementError> for ApiError {
    fn from(err: AccountMovementError) -> Self {
        match err {
            AccountMovementError::Account(e) => e.into(),
            AccountMovementError::Database(e) => e.into(),
        }
    }
}

impl From<CashSessionError> for ApiError {
    fn from(err: CashSessionError) -> Self {
        match err {
            CashSessionError::Cash(e) => e.into(),
            CashSessionError::Database(e) => e.into(),
        }
    }
}

impl From<InventoryRepoError> for ApiError {
    fn from(err: InventoryRepoError) -> Self {
        match err {
            InventoryRepoError::Inventory(e) => e.into(),
            InventoryRepoError::Database(e) => e.into(),
        }
    }
}

impl From<ReportRepoError> for ApiError {
    fn from(err: ReportRepoError) -> Self {
        match err {
            ReportRepoError::Report(e) => e.into(),
            ReportRepoError::Database(e) => e.into(),
        }
    }
}

impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Document(e) => e.into(),
            SaleError::Account(e) => e.into(),
            SaleError::Cash(e) => e.into(),
            SaleError::Inventory(e) => e.into(),
            e @ SaleError::ProductInactive(_) => Self::Domain {
                status: 422,
                code: "PRODUCT_INACTIVE",
                message: e.to_string(),
            },
            SaleError::Database(e) => e.into(),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(_) => Self::not_found(err.to_string()),
            ClientError::EmptyName
            | ClientError::NegativeCreditLimit
            | ClientError::CreditLimitTooLarge => Self::validation(err.to_string()),
            ClientError::Database(e) => e.into(),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::not_found(err.to_string()),
            ProductError::DuplicateSku(_) => Self::App(AppError::Conflict(err.to_string())),
            ProductError::MissingField(_)
            | ProductError::NegativePrice
            | ProductError::PriceTooLarge => Self::validation(err.to_string()),
            ProductError::Database(e) => e.into(),
        }
    }
}
