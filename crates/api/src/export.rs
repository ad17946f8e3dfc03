//! File exports of tabular reports.
//!
//! CSV goes through the `csv` crate and XLSX through `rust_xlsxwriter`.
//! Both write the header row first, then one row per report line.

use axum::{
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use punto_core::reports::{Cell, Tabular};
use punto_shared::AppError;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::ApiError;

/// Content type of an XLSX workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Content type of a CSV export.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn internal(context: &str, e: impl std::fmt::Display) -> ApiError {
    ApiError::App(AppError::Internal(format!("{context}: {e}")))
}

/// Writes the header row and data rows of a report as CSV.
pub fn to_csv<R: Tabular>(report: &R) -> Result<Vec<u8>, ApiError> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    csv.write_record(report.headers())
        .map_err(|e| internal("CSV write error", e))?;
    for row in report.rows() {
        csv.write_record(row.iter().map(ToString::to_string))
            .map_err(|e| internal("CSV write error", e))?;
    }
    csv.into_inner().map_err(|e| internal("CSV flush error", e))
}

/// Writes a report into a single-sheet XLSX workbook.
///
/// Headers are bold. Numeric cells are written as numbers.
pub fn to_xlsx<R: Tabular>(report: &R) -> Result<Vec<u8>, ApiError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    fill_sheet(sheet, report).map_err(|e| internal("XLSX write error", e))?;
    workbook
        .save_to_buffer()
        .map_err(|e| internal("XLSX save error", e))
}

fn fill_sheet<R: Tabular>(sheet: &mut Worksheet, report: &R) -> Result<(), XlsxError> {
    sheet.set_name("Report")?;
    let bold = Format::new().set_bold();

    for (col, title) in (0u16..).zip(report.headers()) {
        sheet.write_string_with_format(0, col, title, &bold)?;
    }
    for (row, cells) in (1u32..).zip(report.rows()) {
        for (col, cell) in (0u16..).zip(&cells) {
            match cell {
                Cell::Number(n) => match n.to_f64() {
                    Some(value) => sheet.write_number(row, col, value)?,
                    None => sheet.write_string(row, col, n.to_string())?,
                },
                Cell::Text(text) => sheet.write_string(row, col, text)?,
            };
        }
    }
    Ok(())
}

/// Wraps an export body as a download.
pub fn attachment(body: Vec<u8>, content_type: &'static str, file_name: &str) -> Response {
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    let disposition = format!("attachment; filename=\"{file_name}\"");
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct Sample;

    impl Tabular for Sample {
        fn headers(&self) -> Vec<&'static str> {
            vec!["key", "label", "total"]
        }

        fn rows(&self) -> Vec<Vec<Cell>> {
            vec![vec![
                "CASH".to_string().into(),
                "Efectivo, caja 1".to_string().into(),
                dec!(1250.50).into(),
            ]]
        }

        fn file_stem(&self) -> String {
            "sample".to_string()
        }
    }

    #[test]
    fn test_csv_quotes_text_and_keeps_numbers() {
        let csv = String::from_utf8(to_csv(&Sample).unwrap()).unwrap();
        assert_eq!(csv, "key,label,total\nCASH,\"Efectivo, caja 1\",1250.50\n");
    }

    #[test]
    fn test_xlsx_is_a_zip_container() {
        let bytes = to_xlsx(&Sample).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_attachment_headers() {
        let response = attachment(b"x".to_vec(), XLSX_CONTENT_TYPE, "sales.xlsx");
        assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_CONTENT_TYPE);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sales.xlsx\""
        );
    }
}
