pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod pdf;
pub mod purchase;

pub use config::{Company, Config, State, Supplier};
pub use error::{ReportError, Result};
pub use purchase::{
    invoice_count, payment_note, summarize_status, Invoice, LifecycleState, OrderSummary,
    PaymentState, PurchaseOrder, StatusPolicy,
};
