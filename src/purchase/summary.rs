//! Derived invoice fields shown on a purchase order.
//!
//! Everything here is a pure function of an order's linked invoices. Callers
//! re-run them whenever the order's invoice links change; nothing is cached.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::invoice::{Invoice, LifecycleState, PaymentState};
use crate::format::{format_money, format_plain};

pub const NOT_GENERATED: &str = "La factura todavía no se ha generado";
pub const SEE_DETAILS: &str = "Ver detalles en tabla";
pub const NOT_APPLICABLE: &str = "No aplica";
pub const SEPARATOR: &str = "; ";

pub const CANCELLED: &str = "Cancelada";
pub const PAID: &str = "Pagado Totalmente";
pub const NOT_PAID: &str = "Factura generada - Sin pagar";
pub const DRAFT: &str = "Borrador";

/// How the residual amount is rendered inside the partial-payment phrase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResidualFormat {
    /// Natural float rendering, e.g. `150.0`
    #[default]
    Plain,
    /// Currency symbol, grouping and two decimals, e.g. `$1,234.50`
    Currency { symbol: String },
}

/// Knobs for the per-invoice classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPolicy {
    pub residual: ResidualFormat,
    /// Phrase for posted invoices whose payment state is not recognized.
    /// `{state}` is replaced by the raw value. `None` leaves them out.
    pub unknown_payment: Option<String>,
}

impl StatusPolicy {
    fn format_residual(&self, amount: f64) -> String {
        match &self.residual {
            ResidualFormat::Plain => format_plain(amount),
            ResidualFormat::Currency { symbol } => format_money(amount, symbol),
        }
    }
}

/// Status phrase for a single invoice, if it has one.
pub fn status_phrase(invoice: &Invoice, policy: &StatusPolicy) -> Option<String> {
    match (&invoice.lifecycle_state, &invoice.payment_state) {
        (LifecycleState::Cancelled, _) => Some(CANCELLED.to_string()),
        (LifecycleState::Posted, PaymentState::Paid) => Some(PAID.to_string()),
        (LifecycleState::Posted, PaymentState::Partial) => Some(format!(
            "Pagado en cuotas (Resta: {})",
            policy.format_residual(invoice.residual_amount)
        )),
        (LifecycleState::Posted, PaymentState::NotPaid) => Some(NOT_PAID.to_string()),
        (LifecycleState::Posted, PaymentState::Other(raw)) => policy
            .unknown_payment
            .as_ref()
            .map(|template| template.replace("{state}", raw)),
        (LifecycleState::Draft, _) => Some(DRAFT.to_string()),
        (LifecycleState::Other(_), _) => None,
    }
}

/// Distinct status phrases joined by `"; "`, in first-seen order.
pub fn summarize_status<'a, I>(invoices: I, policy: &StatusPolicy) -> String
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut seen = HashSet::new();
    let mut phrases = Vec::new();

    for phrase in invoices
        .into_iter()
        .filter_map(|invoice| status_phrase(invoice, policy))
    {
        if seen.insert(phrase.clone()) {
            phrases.push(phrase);
        }
    }

    if phrases.is_empty() {
        NOT_GENERATED.to_string()
    } else {
        phrases.join(SEPARATOR)
    }
}

pub fn payment_note<'a, I>(invoices: I) -> &'static str
where
    I: IntoIterator<Item = &'a Invoice>,
{
    if invoices.into_iter().next().is_some() {
        SEE_DETAILS
    } else {
        NOT_APPLICABLE
    }
}

pub fn invoice_count<'a, I>(invoices: I) -> usize
where
    I: IntoIterator<Item = &'a Invoice>,
{
    invoices.into_iter().count()
}

/// The three derived fields of one purchase order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub status_summary: String,
    pub payment_note: String,
    pub invoice_count: usize,
}

impl OrderSummary {
    pub fn compute<'a, I>(invoices: I, policy: &StatusPolicy) -> Self
    where
        I: IntoIterator<Item = &'a Invoice>,
        I::IntoIter: Clone,
    {
        let invoices = invoices.into_iter();
        Self {
            status_summary: summarize_status(invoices.clone(), policy),
            payment_note: payment_note(invoices.clone()).to_string(),
            invoice_count: invoice_count(invoices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn posted(payment: PaymentState) -> Invoice {
        Invoice::new(LifecycleState::Posted, payment)
    }

    fn phrase_set(summary: &str) -> BTreeSet<&str> {
        summary.split(SEPARATOR).collect()
    }

    #[test]
    fn empty_order_yields_sentinels() {
        let none: Vec<Invoice> = Vec::new();
        let policy = StatusPolicy::default();

        assert_eq!(summarize_status(&none, &policy), NOT_GENERATED);
        assert_eq!(payment_note(&none), NOT_APPLICABLE);
        assert_eq!(invoice_count(&none), 0);
    }

    #[test]
    fn fully_paid() {
        let invoices = vec![posted(PaymentState::Paid)];
        assert_eq!(
            summarize_status(&invoices, &StatusPolicy::default()),
            "Pagado Totalmente"
        );
    }

    #[test]
    fn partial_payment_shows_residual() {
        let invoices = vec![posted(PaymentState::Partial).with_residual(150.0)];
        let summary = summarize_status(&invoices, &StatusPolicy::default());
        assert!(summary.contains("Pagado en cuotas (Resta: 150.0)"));
    }

    #[test]
    fn partial_payment_with_currency_format() {
        let policy = StatusPolicy {
            residual: ResidualFormat::Currency {
                symbol: "$".to_string(),
            },
            unknown_payment: None,
        };
        let invoices = vec![posted(PaymentState::Partial).with_residual(1234.5)];
        assert_eq!(
            summarize_status(&invoices, &policy),
            "Pagado en cuotas (Resta: $1,234.50)"
        );
    }

    #[test]
    fn cancelled_and_draft() {
        let invoices = vec![
            Invoice::new(LifecycleState::Cancelled, PaymentState::NotPaid),
            Invoice::new(LifecycleState::Draft, PaymentState::NotPaid),
        ];
        let summary = summarize_status(&invoices, &StatusPolicy::default());
        assert_eq!(phrase_set(&summary), BTreeSet::from(["Cancelada", "Borrador"]));
    }

    #[test]
    fn cancelled_wins_over_payment_state() {
        let invoice = Invoice::new(LifecycleState::Cancelled, PaymentState::Paid);
        assert_eq!(
            status_phrase(&invoice, &StatusPolicy::default()).as_deref(),
            Some(CANCELLED)
        );
    }

    #[test]
    fn duplicates_collapse() {
        let invoices = vec![posted(PaymentState::Paid), posted(PaymentState::Paid)];
        assert_eq!(
            summarize_status(&invoices, &StatusPolicy::default()),
            "Pagado Totalmente"
        );
    }

    #[test]
    fn first_seen_order_is_kept() {
        let invoices = vec![
            posted(PaymentState::NotPaid),
            Invoice::new(LifecycleState::Draft, PaymentState::NotPaid),
            posted(PaymentState::NotPaid),
            posted(PaymentState::Paid),
        ];
        assert_eq!(
            summarize_status(&invoices, &StatusPolicy::default()),
            "Factura generada - Sin pagar; Borrador; Pagado Totalmente"
        );
    }

    #[test]
    fn partial_payments_with_different_residuals_stay_distinct() {
        let invoices = vec![
            posted(PaymentState::Partial).with_residual(10.0),
            posted(PaymentState::Partial).with_residual(20.5),
        ];
        assert_eq!(
            summarize_status(&invoices, &StatusPolicy::default()),
            "Pagado en cuotas (Resta: 10.0); Pagado en cuotas (Resta: 20.5)"
        );
    }

    #[test]
    fn unknown_payment_state_is_omitted_by_default() {
        let invoices = vec![posted(PaymentState::Other("in_payment".to_string()))];
        let summary = summarize_status(&invoices, &StatusPolicy::default());
        assert_eq!(summary, NOT_GENERATED);
        assert_eq!(payment_note(&invoices), SEE_DETAILS);
        assert_eq!(invoice_count(&invoices), 1);
    }

    #[test]
    fn unknown_payment_state_uses_policy_phrase() {
        let policy = StatusPolicy {
            residual: ResidualFormat::Plain,
            unknown_payment: Some("Estado de pago desconocido ({state})".to_string()),
        };
        let invoices = vec![
            posted(PaymentState::Other("reversed".to_string())),
            posted(PaymentState::Paid),
        ];
        assert_eq!(
            summarize_status(&invoices, &policy),
            "Estado de pago desconocido (reversed); Pagado Totalmente"
        );
    }

    #[test]
    fn unknown_lifecycle_state_contributes_nothing() {
        let policy = StatusPolicy {
            residual: ResidualFormat::Plain,
            unknown_payment: Some("?".to_string()),
        };
        let invoice = Invoice::new(
            LifecycleState::Other("archived".to_string()),
            PaymentState::Other("weird".to_string()),
        );
        assert_eq!(status_phrase(&invoice, &policy), None);
    }

    #[test]
    fn order_summary_bundles_all_fields() {
        let invoices = vec![posted(PaymentState::Paid), posted(PaymentState::NotPaid)];
        let summary = OrderSummary::compute(&invoices, &StatusPolicy::default());
        assert_eq!(
            summary,
            OrderSummary {
                status_summary: "Pagado Totalmente; Factura generada - Sin pagar".to_string(),
                payment_note: SEE_DETAILS.to_string(),
                invoice_count: 2,
            }
        );
    }

    fn arb_invoice() -> impl Strategy<Value = Invoice> {
        let lifecycle = prop_oneof![
            Just(LifecycleState::Draft),
            Just(LifecycleState::Posted),
            Just(LifecycleState::Cancelled),
            Just(LifecycleState::Other("archived".to_string())),
        ];
        let payment = prop_oneof![
            Just(PaymentState::Paid),
            Just(PaymentState::Partial),
            Just(PaymentState::NotPaid),
            Just(PaymentState::Other("in_payment".to_string())),
        ];
        let residual = prop_oneof![Just(0.0), Just(150.0), 0.0f64..10_000.0];
        (lifecycle, payment, residual)
            .prop_map(|(l, p, r)| Invoice::new(l, p).with_residual(r))
    }

    proptest! {
        #[test]
        fn note_and_count_follow_length(invoices in prop::collection::vec(arb_invoice(), 0..12)) {
            let summary = OrderSummary::compute(&invoices, &StatusPolicy::default());
            prop_assert_eq!(summary.invoice_count, invoices.len());
            if invoices.is_empty() {
                prop_assert_eq!(summary.payment_note.as_str(), NOT_APPLICABLE);
                prop_assert_eq!(summary.status_summary.as_str(), NOT_GENERATED);
            } else {
                prop_assert_eq!(summary.payment_note.as_str(), SEE_DETAILS);
            }
        }

        #[test]
        fn summary_is_stable_and_has_no_duplicates(invoices in prop::collection::vec(arb_invoice(), 0..12)) {
            let policy = StatusPolicy::default();
            let first = summarize_status(&invoices, &policy);
            let second = summarize_status(&invoices, &policy);
            prop_assert_eq!(&first, &second);

            let phrases: Vec<&str> = first.split(SEPARATOR).collect();
            let distinct: BTreeSet<&str> = phrases.iter().copied().collect();
            prop_assert_eq!(phrases.len(), distinct.len());
        }

        #[test]
        fn every_phrase_comes_from_some_invoice(invoices in prop::collection::vec(arb_invoice(), 1..12)) {
            let policy = StatusPolicy::default();
            let produced: BTreeSet<String> = invoices
                .iter()
                .filter_map(|invoice| status_phrase(invoice, &policy))
                .collect();
            let summary = summarize_status(&invoices, &policy);

            if produced.is_empty() {
                prop_assert_eq!(summary.as_str(), NOT_GENERATED);
            } else {
                let listed: BTreeSet<String> =
                    summary.split(SEPARATOR).map(str::to_string).collect();
                prop_assert_eq!(listed, produced);
            }
        }
    }
}
