use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::invoice::Invoice;
use crate::error::{ReportError, Result};

/// A purchase order as stored in orders.toml (keyed by its reference)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub supplier: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Invoice numbers linked to this order, in link order
    #[serde(default)]
    pub invoices: Vec<String>,
}

/// An invoice reference resolved against the catalog
#[derive(Debug, Clone, Copy)]
pub struct LinkedInvoice<'a> {
    pub number: &'a str,
    pub invoice: &'a Invoice,
}

impl PurchaseOrder {
    /// Resolve this order's invoice numbers, keeping their order.
    pub fn linked_invoices<'a>(
        &'a self,
        order_ref: &str,
        catalog: &'a BTreeMap<String, Invoice>,
    ) -> Result<Vec<LinkedInvoice<'a>>> {
        self.invoices
            .iter()
            .map(|number| {
                catalog
                    .get(number)
                    .map(|invoice| LinkedInvoice {
                        number: number.as_str(),
                        invoice,
                    })
                    .ok_or_else(|| ReportError::UnknownInvoiceReference {
                        order: order_ref.to_string(),
                        invoice: number.clone(),
                    })
            })
            .collect()
    }

    pub fn link(&mut self, order_ref: &str, invoice: &str) -> Result<()> {
        if self.invoices.iter().any(|n| n == invoice) {
            return Err(ReportError::AlreadyLinked {
                order: order_ref.to_string(),
                invoice: invoice.to_string(),
            });
        }
        self.invoices.push(invoice.to_string());
        Ok(())
    }

    pub fn unlink(&mut self, order_ref: &str, invoice: &str) -> Result<()> {
        let idx = self
            .invoices
            .iter()
            .position(|n| n == invoice)
            .ok_or_else(|| ReportError::NotLinked {
                order: order_ref.to_string(),
                invoice: invoice.to_string(),
            })?;
        self.invoices.remove(idx);
        Ok(())
    }
}
