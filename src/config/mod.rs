mod company;
mod state;
mod supplier;

pub use company::{Company, Config, PdfSettings, ReportSettings, ResidualStyle, SummarySettings};
pub use state::State;
pub use supplier::Supplier;

use crate::error::{ReportError, Result};
use crate::purchase::{Invoice, PurchaseOrder};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.purchase-report/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "purchase-report") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.purchase-report/
    let home = dirs_home().ok_or_else(|| {
        ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".purchase-report"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the PDF output directory; relative paths are taken from the config dir
pub fn resolve_output_dir(output_dir: &str, cfg_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        cfg_dir.join(path)
    }
}

fn load_toml<T: DeserializeOwned>(path: PathBuf) -> Result<T> {
    if !path.exists() {
        return Err(ReportError::ConfigFileNotFound(path));
    }
    tracing::debug!(path = %path.display(), "loading");
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ReportError::ConfigParse { path, source: e })
}

fn save_toml<T: Serialize>(path: PathBuf, value: &T) -> Result<()> {
    let content = toml::to_string_pretty(value)
        .map_err(|e| ReportError::ConfigWrite { path: path.clone(), source: e })?;
    fs::write(&path, content)?;
    tracing::debug!(path = %path.display(), "saved");
    Ok(())
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    load_toml(config_dir.join("config.toml"))
}

/// Load suppliers.toml as a HashMap
pub fn load_suppliers(config_dir: &Path) -> Result<HashMap<String, Supplier>> {
    load_toml(config_dir.join("suppliers.toml"))
}

/// Load orders.toml, keyed by order reference
pub fn load_orders(config_dir: &Path) -> Result<BTreeMap<String, PurchaseOrder>> {
    load_toml(config_dir.join("orders.toml"))
}

/// Save orders.toml
pub fn save_orders(config_dir: &Path, orders: &BTreeMap<String, PurchaseOrder>) -> Result<()> {
    save_toml(config_dir.join("orders.toml"), orders)
}

/// Load invoices.toml, keyed by invoice number
pub fn load_invoices(config_dir: &Path) -> Result<BTreeMap<String, Invoice>> {
    load_toml(config_dir.join("invoices.toml"))
}

/// Load state.toml (creates default if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    load_toml(path)
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    save_toml(config_dir.join("state.toml"), state)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "Your Company Name"
address = "123 Business Street"
city = "San Francisco"
state = "CA"
zip = "94102"
country = "USA"
email = "purchasing@yourcompany.com"
# phone = "+1-555-123-4567"    # optional
# tax_id = "12-3456789"        # optional

[report]
currency_symbol = "$"

[summary]
# "plain" prints the residual as-is (150.0), "currency" as $150.00
residual_format = "plain"
# Phrase for posted bills with an unrecognized payment state (e.g. in_payment).
# {state} is replaced by the raw value. Leave unset to omit such bills.
# unknown_payment_phrase = "Estado de pago: {state}"

[pdf]
output_dir = "output"
"#;

/// Template content for suppliers.toml
pub const SUPPLIERS_TEMPLATE: &str = r#"# Define your suppliers here. The table name (e.g., [acme]) is the
# supplier identifier referenced from orders.toml.

[example-supplier]
name = "Example Supplier Inc."
contact = "Jane Smith"          # optional
email = "sales@example.com"
address = "456 Supplier Avenue"
city = "Los Angeles"
state = "CA"
zip = "90001"
# country = "USA"               # optional
tax_id = "98-7654321"           # optional, printed on reports
payment_days = 30               # optional, supplier credit terms
"#;

/// Template content for orders.toml
pub const ORDERS_TEMPLATE: &str = r#"# Purchase orders. The table name is the order reference.
# `invoices` lists invoice numbers from invoices.toml. Prefer
# 'purchase-report link/unlink' over editing it by hand so the stored
# invoice counts stay in sync.

[PO00001]
supplier = "example-supplier"
date = "2026-01-10"
invoices = ["BILL/2026/0001", "BILL/2026/0002"]

[PO00002]
supplier = "example-supplier"
date = "2026-01-15"
invoices = []
"#;

/// Template content for invoices.toml
pub const INVOICES_TEMPLATE: &str = r#"# Vendor bills. The table name is the invoice number.
#   state:         draft | posted | cancel
#   payment_state: paid | partial | not_paid (only meaningful when posted)
#   residual:      amount still owed

["BILL/2026/0001"]
date = "2026-01-12"
total = 1200.0
state = "posted"
payment_state = "partial"
residual = 150.0

["BILL/2026/0002"]
date = "2026-01-20"
total = 300.0
state = "draft"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_parse() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.report.currency_symbol, "$");
        assert_eq!(config.summary.residual_format, ResidualStyle::Plain);
        assert!(config.summary.unknown_payment_phrase.is_none());

        let suppliers: HashMap<String, Supplier> = toml::from_str(SUPPLIERS_TEMPLATE).unwrap();
        let supplier = &suppliers["example-supplier"];
        assert_eq!(supplier.tax_id.as_deref(), Some("98-7654321"));
        assert_eq!(supplier.payment_terms_label(), "Net 30 days");

        let orders: BTreeMap<String, PurchaseOrder> = toml::from_str(ORDERS_TEMPLATE).unwrap();
        let invoices: BTreeMap<String, Invoice> = toml::from_str(INVOICES_TEMPLATE).unwrap();
        for (reference, order) in &orders {
            assert!(suppliers.contains_key(&order.supplier));
            order.linked_invoices(reference, &invoices).unwrap();
        }
    }

    #[test]
    fn summary_section_is_optional() {
        let config: Config = toml::from_str(
            r#"
[company]
name = "C"
address = "A"
city = "X"
state = "Y"
zip = "1"
country = "Z"
email = "e@x"

[report]
currency_symbol = "S/"

[pdf]
output_dir = "out"
"#,
        )
        .unwrap();
        assert_eq!(config.status_policy(), crate::purchase::StatusPolicy::default());
    }

    #[test]
    fn currency_style_uses_report_symbol() {
        let mut config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        config.summary.residual_format = ResidualStyle::Currency;
        config.summary.unknown_payment_phrase = Some("? {state}".to_string());

        let policy = config.status_policy();
        assert_eq!(
            policy.residual,
            crate::purchase::ResidualFormat::Currency {
                symbol: "$".to_string()
            }
        );
        assert_eq!(policy.unknown_payment.as_deref(), Some("? {state}"));
    }

    #[test]
    fn relative_output_dir_resolves_against_config_dir() {
        let cfg = Path::new("/tmp/cfg");
        assert_eq!(resolve_output_dir("output", cfg), cfg.join("output"));
        assert_eq!(
            resolve_output_dir("/var/reports", cfg),
            PathBuf::from("/var/reports")
        );
    }
}
