use serde::Serialize;

use super::order::{LinkedInvoice, PurchaseOrder};
use super::summary::{status_phrase, OrderSummary, StatusPolicy};
use crate::config::{Company, Supplier};

/// A single row in the invoice detail table
#[derive(Debug, Serialize)]
pub struct ReportInvoiceRow {
    pub number: String,
    pub date: Option<String>,
    pub total: f64,
    pub residual: f64,
    /// Empty when the invoice has no status phrase
    pub status: String,
}

/// A derived field with its display label
#[derive(Debug, Serialize)]
pub struct ReportField {
    pub label: &'static str,
    pub value: String,
}

/// Complete data for rendering the purchase order report PDF
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub company: Company,
    pub supplier: Supplier,
    pub supplier_terms: String,
    pub order: String,
    pub order_date: Option<String>,
    pub rows: Vec<ReportInvoiceRow>,
    pub fields: Vec<ReportField>,
    pub summary: OrderSummary,
    pub total: f64,
    pub residual: f64,
    pub currency_symbol: String,
    pub generated_date: String,
}

pub const STATUS_LABEL: &str = "Estado Factura";
pub const PAYMENT_LABEL: &str = "Información de Pago";
pub const COUNT_LABEL: &str = "Número de Facturas";

const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn build_report(
    company: &Company,
    supplier: &Supplier,
    currency_symbol: &str,
    order_ref: &str,
    order: &PurchaseOrder,
    linked: &[LinkedInvoice<'_>],
    policy: &StatusPolicy,
) -> ReportData {
    let rows: Vec<ReportInvoiceRow> = linked
        .iter()
        .map(|l| ReportInvoiceRow {
            number: l.number.to_string(),
            date: l.invoice.date.map(|d| d.format(DATE_FORMAT).to_string()),
            total: l.invoice.total,
            residual: l.invoice.residual_amount,
            status: status_phrase(l.invoice, policy).unwrap_or_default(),
        })
        .collect();

    let summary = OrderSummary::compute(linked.iter().map(|l| l.invoice), policy);

    let fields = vec![
        ReportField {
            label: STATUS_LABEL,
            value: summary.status_summary.clone(),
        },
        ReportField {
            label: PAYMENT_LABEL,
            value: summary.payment_note.clone(),
        },
        ReportField {
            label: COUNT_LABEL,
            value: summary.invoice_count.to_string(),
        },
    ];

    ReportData {
        company: company.clone(),
        supplier: supplier.clone(),
        supplier_terms: supplier.payment_terms_label(),
        order: order_ref.to_string(),
        order_date: order.date.map(|d| d.format(DATE_FORMAT).to_string()),
        total: rows.iter().map(|r| r.total).sum(),
        residual: rows.iter().map(|r| r.residual).sum(),
        rows,
        fields,
        summary,
        currency_symbol: currency_symbol.to_string(),
        generated_date: chrono::Local::now().format(DATE_FORMAT).to_string(),
    }
}
