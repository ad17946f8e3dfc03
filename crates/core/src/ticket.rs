//! Printable HTML sale tickets.
//!
//! The ticket is a standalone HTML page sized for an 80mm thermal printer.
//! All user-supplied text is escaped.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use punto_shared::types::SaleId;
use rust_decimal::Decimal;

use crate::cash::PaymentMethod;
use crate::documents::{DocumentKind, DocumentTotals};

/// Store details printed on the header and footer.
#[derive(Debug, Clone)]
pub struct TicketHeader {
    /// Business name.
    pub business_name: String,
    /// Street address.
    pub address: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Closing line.
    pub footer: String,
}

/// One printed line.
#[derive(Debug, Clone)]
pub struct TicketLine {
    /// Product name.
    pub description: String,
    /// Units.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Line discount.
    pub discount: Decimal,
    /// Line total.
    pub line_total: Decimal,
}

/// Everything printed about a document.
#[derive(Debug, Clone)]
pub struct TicketData {
    /// Document number.
    pub sale_id: SaleId,
    /// Sale, order or quotation.
    pub kind: DocumentKind,
    /// When it was created.
    pub created_at: DateTime<Utc>,
    /// Customer name, if any.
    pub client_name: Option<String>,
    /// Payment method, for sales.
    pub payment_method: Option<PaymentMethod>,
    /// Lines.
    pub lines: Vec<TicketLine>,
    /// Totals.
    pub totals: DocumentTotals,
}

/// Escapes text for inclusion in HTML.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn title(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Sale => "SALE TICKET",
        DocumentKind::Order => "ORDER",
        DocumentKind::Quotation => "QUOTATION",
    }
}

/// Renders a ticket as a standalone HTML page.
#[must_use]
pub fn render_ticket(header: &TicketHeader, data: &TicketData) -> String {
    let business_name = escape_html(&header.business_name);
    let mut head_lines = String::new();
    if let Some(address) = header.address.as_deref().filter(|a| !a.is_empty()) {
        let _ = write!(head_lines, "{}<br/>", escape_html(address));
    }
    if let Some(tax_id) = header.tax_id.as_deref().filter(|t| !t.is_empty()) {
        let _ = write!(head_lines, "Tax ID: {}<br/>", escape_html(tax_id));
    }

    let mut meta = format!(
        "No. {id}<br/>Date: {date}<br/>",
        id = data.sale_id,
        date = data.created_at.format("%Y-%m-%d %H:%M"),
    );
    if let Some(client) = data.client_name.as_deref() {
        let _ = write!(meta, "Customer: {}<br/>", escape_html(client));
    }
    if let Some(method) = data.payment_method {
        let _ = write!(meta, "Payment: {method}<br/>");
    }

    let mut rows = String::new();
    for line in &data.lines {
        let _ = write!(
            rows,
            r#"<tr><td colspan="2">{desc}</td></tr>
<tr><td>{qty} x {price}</td><td style="text-align:right;">{total}</td></tr>
"#,
            desc = escape_html(&line.description),
            qty = line.quantity.normalize(),
            price = line.unit_price,
            total = line.line_total,
        );
        if !line.discount.is_zero() {
            let _ = write!(
                rows,
                r#"<tr><td>Discount</td><td style="text-align:right;">-{}</td></tr>
"#,
                line.discount
            );
        }
    }

    let footer = escape_html(&header.footer);
    let kind_title = title(data.kind);
    let subtotal = data.totals.subtotal;
    let discount_total = data.totals.discount_total;
    let total = data.totals.total;
    let sale_id = data.sale_id;

    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"/><title>{kind_title} {sale_id}</title>
<style>
body {{ margin: 8px; padding: 0; width: 72mm; }}
@media print {{ body {{ margin: 0; }} }}
</style></head><body>
<div style="font-family:monospace;font-size:11px;line-height:1.4;width:100%;">
<div style="text-align:center;margin-bottom:8px;">
<strong style="font-size:14px;">{business_name}</strong><br/>
{head_lines}</div>
<hr style="border:none;border-top:2px solid #000;"/>
<div style="text-align:center;font-weight:bold;margin:4px 0;">{kind_title}</div>
<div style="margin:4px 0;">{meta}</div>
<hr style="border:none;border-top:1px dashed #000;"/>
<table style="width:100%;font-family:monospace;font-size:11px;">
{rows}</table>
<hr style="border:none;border-top:1px dashed #000;"/>
<table style="width:100%;font-family:monospace;font-size:11px;">
<tr><td>Subtotal</td><td style="text-align:right;">{subtotal}</td></tr>
<tr><td>Discounts</td><td style="text-align:right;">-{discount_total}</td></tr>
<tr><td><strong>TOTAL</strong></td><td style="text-align:right;"><strong>{total}</strong></td></tr>
</table>
<hr style="border:none;border-top:2px solid #000;"/>
<div style="text-align:center;margin-top:8px;">{footer}</div>
</div></body></html>"#,
    )
}
