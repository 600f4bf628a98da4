use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Config directory not found at {0}. Run 'purchase-report init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Supplier '{0}' not found in suppliers.toml")]
    SupplierNotFound(String),

    #[error("Order '{0}' not found in orders.toml")]
    OrderNotFound(String),

    #[error("Invoice '{0}' not found in invoices.toml")]
    InvoiceNotFound(String),

    #[error("Order '{order}' references invoice '{invoice}' which is missing from invoices.toml")]
    UnknownInvoiceReference { order: String, invoice: String },

    #[error("Invalid order index '{0}'. Use 'purchase-report orders' to see available orders.")]
    InvalidOrderIndex(String),

    #[error("Invoice '{invoice}' is already linked to {order}")]
    AlreadyLinked { order: String, invoice: String },

    #[error("Invoice '{invoice}' is not linked to {order}")]
    NotLinked { order: String, invoice: String },

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, ReportError>;
