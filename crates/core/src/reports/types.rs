//! Report data types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use punto_shared::types::{CashSessionId, ClientId, ProductId, SaleId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::accounts::AgingBuckets;
use crate::cash::PaymentMethod;
use crate::inventory::Kardex;

/// Output format requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// JSON body.
    #[default]
    Json,
    /// Comma-separated values.
    Csv,
    /// XLSX workbook.
    Excel,
    /// Printable document.
    Pdf,
}

impl ReportFormat {
    /// Rejects formats this server cannot render.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for PDF.
    pub fn ensure_supported(self) -> Result<Self, ReportError> {
        match self {
            Self::Pdf => Err(ReportError::UnsupportedFormat("pdf".to_string())),
            other => Ok(other),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Date bucket size for the sales-by-period report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGranularity {
    /// One bucket per calendar day.
    #[default]
    Day,
    /// ISO weeks, starting Monday.
    Week,
    /// Calendar months.
    Month,
}

impl PeriodGranularity {
    /// First day of the bucket that contains `date`.
    #[must_use]
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date.week(chrono::Weekday::Mon).first_day(),
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Human label of the bucket that contains `date`.
    #[must_use]
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Month => date.format("%Y-%m").to_string(),
        }
    }
}

impl std::str::FromStr for PeriodGranularity {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(ReportError::InvalidPeriod(s.to_string())),
        }
    }
}

/// Header-level fact of one completed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleFact {
    /// Sale.
    pub sale_id: SaleId,
    /// Day the sale was made.
    pub date: NaiveDate,
    /// Customer, `None` for walk-in sales.
    pub client_id: Option<ClientId>,
    /// Customer name at report time.
    pub client_name: Option<String>,
    /// How it was paid.
    pub payment_method: PaymentMethod,
    /// Sale total.
    pub total: Decimal,
}

/// Line-level fact of one completed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLineFact {
    /// Sale the line belongs to.
    pub sale_id: SaleId,
    /// Day the sale was made.
    pub date: NaiveDate,
    /// Product sold.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Units sold.
    pub quantity: Decimal,
    /// Line total after discount.
    pub line_total: Decimal,
}

/// One row of a grouped sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportGroup {
    /// Stable grouping key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Number of sales (or lines, for products) in the group.
    pub count: u64,
    /// Sum of amounts.
    pub total: Decimal,
    /// Share of the grand total, 2 dp.
    pub percentage: Decimal,
}

/// A grouped sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Report type identifier.
    pub report_type: String,
    /// First day (inclusive).
    pub from: NaiveDate,
    /// Last day (inclusive).
    pub to: NaiveDate,
    /// Groups, ordered per report.
    pub groups: Vec<ReportGroup>,
    /// Sum of all groups.
    pub grand_total: Decimal,
    /// Number of rows aggregated.
    pub row_count: u64,
}

/// Aging of one client, with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingRow {
    /// The client.
    pub client_id: ClientId,
    /// Client name.
    pub client_name: String,
    /// Outstanding amounts by age.
    pub buckets: AgingBuckets,
    /// Total outstanding.
    pub total: Decimal,
    /// Date of the oldest unpaid charge.
    pub oldest_unpaid: Option<NaiveDate>,
}

/// Receivables aging report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivablesAgingReport {
    /// Report type identifier.
    pub report_type: String,
    /// Aging date.
    pub as_of: NaiveDate,
    /// Clients with something outstanding, largest first.
    pub clients: Vec<AgingRow>,
    /// Column totals.
    pub totals: AgingBuckets,
    /// Sum of all outstanding.
    pub grand_total: Decimal,
}

/// Kardex report for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KardexReport {
    /// Report type identifier.
    pub report_type: String,
    /// Product.
    pub product_id: ProductId,
    /// Product SKU.
    pub sku: String,
    /// Product name.
    pub product_name: String,
    /// First day (inclusive).
    pub from: NaiveDate,
    /// Last day (inclusive).
    pub to: NaiveDate,
    /// Opening position, rows and closing position.
    pub kardex: Kardex,
}

/// One closed cash session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashSessionRow {
    /// Session.
    pub session_id: CashSessionId,
    /// When it was opened.
    pub opened_at: DateTime<Utc>,
    /// When it was closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Who opened it.
    pub opened_by: String,
    /// Who counted it.
    pub counted_by: Option<String>,
    /// Float.
    pub opening_amount: Decimal,
    /// Cash income.
    pub system_sales_total: Decimal,
    /// Cash expenses.
    pub system_expenses_total: Decimal,
    /// What the drawer should have held.
    pub expected_cash: Decimal,
    /// What it held.
    pub counted_cash: Decimal,
    /// `counted − expected`.
    pub difference: Decimal,
}

/// Closed cash sessions in a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashSessionsReport {
    /// Report type identifier.
    pub report_type: String,
    /// First day (inclusive).
    pub from: NaiveDate,
    /// Last day (inclusive).
    pub to: NaiveDate,
    /// Sessions, oldest first.
    pub sessions: Vec<CashSessionRow>,
    /// Sum of differences (net surplus or shortage).
    pub total_difference: Decimal,
    /// Sum of shortages only (as a negative number).
    pub total_shortage: Decimal,
}
