//! Report error types.

use chrono::NaiveDate;
use punto_shared::types::ProductId;
use thiserror::Error;

use crate::inventory::InventoryError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Unknown or unsupported output format.
    #[error("{0} output is not supported")]
    UnsupportedFormat(String),

    /// Unknown period granularity.
    #[error("Invalid period: {0} (expected day, week or month)")]
    InvalidPeriod(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Stock history could not be replayed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::InvalidPeriod(_) => "INVALID_PERIOD",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::Inventory(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } | Self::UnsupportedFormat(_) | Self::InvalidPeriod(_) => {
                400
            }
            Self::ProductNotFound(_) => 404,
            Self::Inventory(e) => e.http_status_code(),
        }
    }
}
