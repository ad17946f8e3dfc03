//! Report routes.
//!
//! Every report accepts `format=json|csv|excel|pdf`. JSON is the default;
//! excel (or xlsx) returns a workbook attachment; pdf is rejected.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use punto_core::reports::{PeriodGranularity, ReportFormat, Tabular};
use punto_db::repositories::ReportRepository;
use punto_shared::types::{DateRange, ProductId};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, AppState, export};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/sales-by-client", get(sales_by_client))
        .route("/reports/sales-by-product", get(sales_by_product))
        .route("/reports/sales-by-payment-method", get(sales_by_payment_method))
        .route("/reports/sales-by-period", get(sales_by_period))
        .route("/reports/receivables-aging", get(receivables_aging))
        .route("/reports/kardex/{product_id}", get(kardex))
        .route("/reports/cash-sessions", get(cash_sessions))
}

/// Common query parameters for ranged reports.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// First day (inclusive). Defaults to the first of the month of `to`.
    pub from: Option<NaiveDate>,
    /// Last day (inclusive). Defaults to today.
    pub to: Option<NaiveDate>,
    /// `json`, `csv`, `excel` or `pdf`.
    pub format: Option<String>,
    /// `day`, `week` or `month`; only read by the period report.
    pub granularity: Option<String>,
}

impl RangeQuery {
    fn range(&self) -> ApiResult<DateRange> {
        Ok(DateRange::from_query(
            self.from,
            self.to,
            chrono::Utc::now().date_naive(),
        )?)
    }

    fn format(&self) -> ApiResult<ReportFormat> {
        parse_format(self.format.as_deref())
    }
}

/// Query parameters for the aging report.
#[derive(Debug, Deserialize)]
pub struct AgingQuery {
    /// Cut-off date. Defaults to today.
    pub as_of: Option<NaiveDate>,
    /// `json`, `csv`, `excel` or `pdf`.
    pub format: Option<String>,
}

fn parse_format(raw: Option<&str>) -> ApiResult<ReportFormat> {
    let format = match raw {
        Some(raw) => raw.parse::<ReportFormat>()?,
        None => ReportFormat::default(),
    };
    Ok(format.ensure_supported()?)
}

/// Renders a report in the requested format.
fn render<R>(report: &R, format: ReportFormat) -> ApiResult<Response>
where
    R: Serialize + Tabular,
{
    match format {
        ReportFormat::Json => Ok(Json(report).into_response()),
        ReportFormat::Csv => Ok(export::attachment(
            export::to_csv(report)?,
            export::CSV_CONTENT_TYPE,
            &format!("{}.csv", report.file_stem()),
        )),
        ReportFormat::Excel => Ok(export::attachment(
            export::to_xlsx(report)?,
            export::XLSX_CONTENT_TYPE,
            &format!("{}.xlsx", report.file_stem()),
        )),
        ReportFormat::Pdf => Err(ApiError::validation("pdf output is not supported")),
    }
}

/// GET `/reports/sales-by-client`
async fn sales_by_client(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Response> {
    let format = query.format()?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.sales_by_client(query.range()?).await?;
    render(&report, format)
}

/// GET `/reports/sales-by-product`
async fn sales_by_product(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Response> {
    let format = query.format()?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.sales_by_product(query.range()?).await?;
    render(&report, format)
}

/// GET `/reports/sales-by-payment-method`
async fn sales_by_payment_method(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Response> {
    let format = query.format()?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.sales_by_payment_method(query.range()?).await?;
    render(&report, format)
}

/// GET `/reports/sales-by-period`
async fn sales_by_period(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Response> {
    let format = query.format()?;
    let granularity = match query.granularity.as_deref() {
        Some(raw) => raw.parse::<PeriodGranularity>()?,
        None => PeriodGranularity::default(),
    };
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.sales_by_period(query.range()?, granularity).await?;
    render(&report, format)
}

/// GET `/reports/receivables-aging`
async fn receivables_aging(
    State(state): State<AppState>,
    Query(query): Query<AgingQuery>,
) -> ApiResult<Response> {
    let format = parse_format(query.format.as_deref())?;
    let as_of = query.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.receivables_aging(as_of).await?;
    render(&report, format)
}

/// GET `/reports/kardex/{product_id}`
async fn kardex(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Response> {
    let format = query.format()?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.kardex(product_id, query.range()?).await?;
    render(&report, format)
}

/// GET `/reports/cash-sessions`
async fn cash_sessions(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Response> {
    let format = query.format()?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.cash_sessions(query.range()?).await?;
    render(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, ReportFormat::Json)]
    #[case(Some("json"), ReportFormat::Json)]
    #[case(Some("excel"), ReportFormat::Excel)]
    #[case(Some("XLSX"), ReportFormat::Excel)]
    #[case(Some("csv"), ReportFormat::Csv)]
    fn test_parse_supported_formats(#[case] raw: Option<&str>, #[case] expected: ReportFormat) {
        assert_eq!(parse_format(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("pdf")]
    #[case("docx")]
    fn test_parse_rejected_formats(#[case] raw: &str) {
        let err = parse_format(Some(raw)).unwrap_err();
        assert_eq!(err.status().as_u16(), 400);
    }
}
