//! Report generation service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use punto_shared::types::{ClientId, DateRange, ProductId, percentage_of};
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AgingRow, CashSessionRow, CashSessionsReport, KardexReport, PeriodGranularity,
    ReceivablesAgingReport, ReportGroup, SaleFact, SaleLineFact, SalesReport,
};
use crate::accounts::{AccountMovement, AgingBuckets, age_receivables};
use crate::cash::PaymentMethod;
use crate::inventory::{Kardex, StockMovement};

const WALK_IN_KEY: &str = "walk-in";

/// Service for generating reports.
pub struct ReportService;

impl ReportService {
    /// Groups `(key, label, amount)` rows and computes shares of the total.
    ///
    /// Groups come back sorted by total descending, ties by key, so the
    /// result does not depend on input order.
    pub fn group_rows<I>(rows: I) -> (Vec<ReportGroup>, Decimal, u64)
    where
        I: IntoIterator<Item = (String, String, Decimal)>,
    {
        let mut acc: BTreeMap<String, (String, u64, Decimal)> = BTreeMap::new();
        let mut row_count = 0u64;
        for (key, label, amount) in rows {
            let entry = acc.entry(key).or_insert((label, 0, Decimal::ZERO));
            entry.1 += 1;
            entry.2 += amount;
            row_count += 1;
        }

        let grand_total: Decimal = acc.values().map(|(_, _, total)| *total).sum();
        let mut groups: Vec<ReportGroup> = acc
            .into_iter()
            .map(|(key, (label, count, total))| ReportGroup {
                key,
                label,
                count,
                total,
                percentage: percentage_of(total, grand_total),
            })
            .collect();
        groups.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));

        (groups, grand_total, row_count)
    }

    fn sales_report(
        report_type: &str,
        range: DateRange,
        groups: Vec<ReportGroup>,
        grand_total: Decimal,
        row_count: u64,
    ) -> SalesReport {
        SalesReport {
            report_type: report_type.to_string(),
            from: range.from,
            to: range.to,
            groups,
            grand_total,
            row_count,
        }
    }

    /// Sales grouped by customer. Walk-in sales form their own group.
    #[must_use]
    pub fn sales_by_client(range: DateRange, sales: &[SaleFact]) -> SalesReport {
        let rows = sales
            .iter()
            .filter(|s| range.contains(s.date))
            .map(|s| match s.client_id {
                Some(id) => (
                    id.to_string(),
                    s.client_name.clone().unwrap_or_else(|| format!("Client {id}")),
                    s.total,
                ),
                None => (WALK_IN_KEY.to_string(), "Walk-in customer".to_string(), s.total),
            });
        let (groups, total, count) = Self::group_rows(rows);
        Self::sales_report("sales_by_client", range, groups, total, count)
    }

    /// Sales grouped by product, from line totals.
    #[must_use]
    pub fn sales_by_product(range: DateRange, lines: &[SaleLineFact]) -> SalesReport {
        let rows = lines
            .iter()
            .filter(|l| range.contains(l.date))
            .map(|l| (l.product_id.to_string(), l.product_name.clone(), l.line_total));
        let (groups, total, count) = Self::group_rows(rows);
        Self::sales_report("sales_by_product", range, groups, total, count)
    }

    /// Sales grouped by payment method.
    #[must_use]
    pub fn sales_by_payment_method(range: DateRange, sales: &[SaleFact]) -> SalesReport {
        let rows = sales.iter().filter(|s| range.contains(s.date)).map(|s| {
            (
                s.payment_method.to_string(),
                payment_method_label(s.payment_method).to_string(),
                s.total,
            )
        });
        let (groups, total, count) = Self::group_rows(rows);
        Self::sales_report("sales_by_payment_method", range, groups, total, count)
    }

    /// Sales grouped by day, ISO week or month.
    ///
    /// Unlike the other groupings the buckets are returned in chronological
    /// order.
    #[must_use]
    pub fn sales_by_period(
        range: DateRange,
        granularity: PeriodGranularity,
        sales: &[SaleFact],
    ) -> SalesReport {
        let rows = sales.iter().filter(|s| range.contains(s.date)).map(|s| {
            let start = granularity.bucket_start(s.date);
            (start.to_string(), granularity.label(s.date), s.total)
        });
        let (mut groups, total, count) = Self::group_rows(rows);
        // ISO date keys sort chronologically.
        groups.sort_by(|a, b| a.key.cmp(&b.key));
        Self::sales_report("sales_by_period", range, groups, total, count)
    }

    /// Ages the receivables of every client at `as_of`.
    ///
    /// Clients with nothing outstanding are left out. Rows are sorted by
    /// total descending, ties by client id.
    #[must_use]
    pub fn receivables_aging(
        as_of: NaiveDate,
        clients: Vec<(ClientId, String, Vec<AccountMovement>)>,
    ) -> ReceivablesAgingReport {
        let mut rows: Vec<AgingRow> = clients
            .into_iter()
            .map(|(client_id, client_name, movements)| {
                let aging = age_receivables(client_id, &movements, as_of);
                AgingRow {
                    client_id,
                    client_name,
                    buckets: aging.buckets,
                    total: aging.total,
                    oldest_unpaid: aging.oldest_unpaid,
                }
            })
            .filter(|row| row.total > Decimal::ZERO)
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total).then(a.client_id.cmp(&b.client_id)));

        let totals = rows.iter().fold(AgingBuckets::default(), |mut acc, row| {
            acc.merge(&row.buckets);
            acc
        });

        ReceivablesAgingReport {
            report_type: "receivables_aging".to_string(),
            as_of,
            grand_total: totals.total(),
            totals,
            clients: rows,
        }
    }

    /// Kardex of one product over a range.
    ///
    /// Movements after the range are ignored; movements before it fold into
    /// the opening position.
    ///
    /// # Errors
    ///
    /// Returns `Inventory` if the stock history goes negative.
    pub fn kardex(
        range: DateRange,
        product_id: ProductId,
        sku: String,
        product_name: String,
        movements: Vec<StockMovement>,
    ) -> Result<KardexReport, ReportError> {
        let end = range.end_utc_exclusive();
        let movements = movements.into_iter().filter(|m| m.created_at < end).collect();
        let kardex = Kardex::build(product_id, movements, Some(range.start_utc()))?;

        Ok(KardexReport {
            report_type: "kardex".to_string(),
            product_id,
            sku,
            product_name,
            from: range.from,
            to: range.to,
            kardex,
        })
    }

    /// Closed sessions with their reconciliation differences, oldest first.
    #[must_use]
    pub fn cash_sessions(
        range: DateRange,
        mut sessions: Vec<CashSessionRow>,
    ) -> CashSessionsReport {
        sessions.sort_by(|a, b| {
            a.opened_at
                .cmp(&b.opened_at)
                .then(a.session_id.cmp(&b.session_id))
        });

        let (total_difference, total_shortage) = sessions.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(net, short), s| {
                let shortage = if s.difference < Decimal::ZERO {
                    s.difference
                } else {
                    Decimal::ZERO
                };
                (net + s.difference, short + shortage)
            },
        );

        CashSessionsReport {
            report_type: "cash_sessions".to_string(),
            from: range.from,
            to: range.to,
            sessions,
            total_difference,
            total_shortage,
        }
    }
}

fn payment_method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "Cash",
        PaymentMethod::Card => "Card",
        PaymentMethod::Transfer => "Bank transfer",
        PaymentMethod::Account => "Customer account",
    }
}
