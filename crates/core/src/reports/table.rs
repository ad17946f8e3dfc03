//! Flat row views of reports for spreadsheet export.

use std::fmt;

use rust_decimal::Decimal;

use super::types::{CashSessionsReport, KardexReport, ReceivablesAgingReport, SalesReport};

/// One exported value. Numbers stay numeric in spreadsheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Free text.
    Text(String),
    /// Amount, quantity or count.
    Number(Decimal),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

/// A report that can be flattened into header + rows.
pub trait Tabular {
    /// Column names.
    fn headers(&self) -> Vec<&'static str>;

    /// Data rows, one cell per column.
    fn rows(&self) -> Vec<Vec<Cell>>;

    /// Suggested file stem for downloads.
    fn file_stem(&self) -> String;
}

impl Tabular for SalesReport {
    fn headers(&self) -> Vec<&'static str> {
        vec!["key", "label", "count", "total", "percentage"]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.groups
            .iter()
            .map(|g| {
                vec![
                    g.key.clone().into(),
                    g.label.clone().into(),
                    g.count.into(),
                    g.total.into(),
                    g.percentage.into(),
                ]
            })
            .collect()
    }

    fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.report_type, self.from, self.to)
    }
}

impl Tabular for ReceivablesAgingReport {
    fn headers(&self) -> Vec<&'static str> {
        vec![
            "client_id",
            "client_name",
            "0-30",
            "31-60",
            "61-90",
            "90+",
            "total",
            "oldest_unpaid",
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.clients
            .iter()
            .map(|c| {
                vec![
                    c.client_id.into_inner().into(),
                    c.client_name.clone().into(),
                    c.buckets.current.into(),
                    c.buckets.days_31_60.into(),
                    c.buckets.days_61_90.into(),
                    c.buckets.over_90.into(),
                    c.total.into(),
                    c.oldest_unpaid.map(|d| d.to_string()).unwrap_or_default().into(),
                ]
            })
            .collect()
    }

    fn file_stem(&self) -> String {
        format!("{}_{}", self.report_type, self.as_of)
    }
}

impl Tabular for KardexReport {
    fn headers(&self) -> Vec<&'static str> {
        vec![
            "date",
            "kind",
            "quantity_in",
            "quantity_out",
            "unit_cost",
            "balance_quantity",
            "average_cost",
            "balance_value",
            "reference",
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.kardex
            .lines
            .iter()
            .map(|l| {
                vec![
                    l.date.to_rfc3339().into(),
                    l.kind.to_string().into(),
                    l.quantity_in.into(),
                    l.quantity_out.into(),
                    l.unit_cost.into(),
                    l.balance_quantity.into(),
                    l.average_cost.into(),
                    l.balance_value.into(),
                    l.reference.clone().unwrap_or_default().into(),
                ]
            })
            .collect()
    }

    fn file_stem(&self) -> String {
        format!("kardex_{}_{}_{}", self.sku, self.from, self.to)
    }
}

impl Tabular for CashSessionsReport {
    fn headers(&self) -> Vec<&'static str> {
        vec![
            "session_id",
            "opened_at",
            "closed_at",
            "opened_by",
            "counted_by",
            "opening_amount",
            "expected_cash",
            "counted_cash",
            "difference",
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.sessions
            .iter()
            .map(|s| {
                vec![
                    s.session_id.into_inner().into(),
                    s.opened_at.to_rfc3339().into(),
                    s.closed_at.map(|d| d.to_rfc3339()).unwrap_or_default().into(),
                    s.opened_by.clone().into(),
                    s.counted_by.clone().unwrap_or_default().into(),
                    s.opening_amount.into(),
                    s.expected_cash.into(),
                    s.counted_cash.into(),
                    s.difference.into(),
                ]
            })
            .collect()
    }

    fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.report_type, self.from, self.to)
    }
}
