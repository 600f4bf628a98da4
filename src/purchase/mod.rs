mod invoice;
mod order;
mod report;
pub mod summary;

pub use invoice::{Invoice, LifecycleState, PaymentState};
pub use order::{LinkedInvoice, PurchaseOrder};
pub use report::{
    build_report, ReportData, ReportField, ReportInvoiceRow, COUNT_LABEL, PAYMENT_LABEL,
    STATUS_LABEL,
};
pub use summary::{
    invoice_count, payment_note, status_phrase, summarize_status, OrderSummary, ResidualFormat,
    StatusPolicy,
};
