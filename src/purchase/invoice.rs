use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document lifecycle of a vendor bill.
///
/// Values the tool does not recognize are kept verbatim in `Other` so they
/// round-trip through `invoices.toml` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleState {
    Draft,
    Posted,
    Cancelled,
    Other(String),
}

impl From<String> for LifecycleState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "draft" => Self::Draft,
            "posted" => Self::Posted,
            "cancel" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<LifecycleState> for String {
    fn from(state: LifecycleState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Posted => write!(f, "posted"),
            Self::Cancelled => write!(f, "cancel"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// Settlement status of a posted bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentState {
    Paid,
    Partial,
    #[default]
    NotPaid,
    Other(String),
}

impl From<String> for PaymentState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "paid" => Self::Paid,
            "partial" => Self::Partial,
            "not_paid" => Self::NotPaid,
            _ => Self::Other(value),
        }
    }
}

impl From<PaymentState> for String {
    fn from(state: PaymentState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "paid"),
            Self::Partial => write!(f, "partial"),
            Self::NotPaid => write!(f, "not_paid"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// A vendor bill as stored in invoices.toml (keyed by its number)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Invoice {
    #[serde(rename = "state")]
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub payment_state: PaymentState,
    /// Amount still owed; only meaningful for partially paid bills
    #[serde(rename = "residual", default)]
    pub residual_amount: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Invoice {
    pub fn new(lifecycle_state: LifecycleState, payment_state: PaymentState) -> Self {
        Self {
            lifecycle_state,
            payment_state,
            residual_amount: 0.0,
            total: 0.0,
            date: None,
        }
    }

    pub fn with_residual(mut self, residual_amount: f64) -> Self {
        self.residual_amount = residual_amount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_unknown_states() {
        let invoice: Invoice = toml::from_str(
            r#"
state = "posted"
payment_state = "in_payment"
residual = 12.5
"#,
        )
        .unwrap();

        assert_eq!(invoice.lifecycle_state, LifecycleState::Posted);
        assert_eq!(
            invoice.payment_state,
            PaymentState::Other("in_payment".to_string())
        );
        assert_eq!(invoice.residual_amount, 12.5);
        assert_eq!(invoice.total, 0.0);
        assert!(invoice.date.is_none());
    }

    #[test]
    fn payment_state_defaults_to_not_paid() {
        let invoice: Invoice = toml::from_str(r#"state = "draft""#).unwrap();
        assert_eq!(invoice.lifecycle_state, LifecycleState::Draft);
        assert_eq!(invoice.payment_state, PaymentState::NotPaid);
    }

    #[test]
    fn unknown_values_survive_serialization() {
        let invoice = Invoice::new(
            LifecycleState::Other("archived".to_string()),
            PaymentState::Other("reversed".to_string()),
        );
        let text = toml::to_string(&invoice).unwrap();
        assert!(text.contains(r#"state = "archived""#));
        assert!(text.contains(r#"payment_state = "reversed""#));

        let back: Invoice = toml::from_str(&text).unwrap();
        assert_eq!(back, invoice);
    }
}
