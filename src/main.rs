use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use purchase_report::config::{
    config_dir, load_config, load_invoices, load_orders, load_state, load_suppliers,
    resolve_output_dir, save_orders, save_state, CONFIG_TEMPLATE, INVOICES_TEMPLATE,
    ORDERS_TEMPLATE, SUPPLIERS_TEMPLATE,
};
use purchase_report::error::{ReportError, Result};
use purchase_report::format::format_money;
use purchase_report::logging;
use purchase_report::pdf::generate_report_pdf;
use purchase_report::purchase::{
    build_report, invoice_count, status_phrase, Invoice, OrderSummary, PurchaseOrder,
    COUNT_LABEL, PAYMENT_LABEL, STATUS_LABEL,
};

#[derive(Parser)]
#[command(name = "purchase-report")]
#[command(version, about = "Purchase order invoice status reports", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.purchase-report or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Emit diagnostic logs as JSON (filter with RUST_LOG)
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show configuration summary
    Status,

    /// List configured suppliers
    Suppliers,

    /// List vendor bills with their status
    Invoices,

    /// List purchase orders with their invoice status
    Orders {
        /// Number of orders to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one purchase order and its invoices
    Show {
        /// Order reference or index from 'orders' (e.g., 1 or PO00001)
        order: String,
    },

    /// Link an invoice to a purchase order
    Link {
        /// Order reference or index from 'orders'
        order: String,

        /// Invoice number from invoices.toml
        invoice: String,
    },

    /// Remove an invoice from a purchase order
    Unlink {
        /// Order reference or index from 'orders'
        order: String,

        /// Invoice number linked to the order
        invoice: String,
    },

    /// Refresh the stored invoice count of every order
    Recompute,

    /// Generate a PDF report for a purchase order
    Report {
        /// Order reference or index from 'orders'
        order: String,

        /// Custom output file path (default: output_dir/REPORT-<order>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    if !matches!(cli.command, Commands::Init) && !cfg_dir.exists() {
        return Err(ReportError::ConfigNotFound(cfg_dir));
    }

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Suppliers => cmd_suppliers(&cfg_dir),
        Commands::Invoices => cmd_invoices(&cfg_dir),
        Commands::Orders { limit } => cmd_orders(&cfg_dir, limit),
        Commands::Show { order } => cmd_show(&cfg_dir, &order),
        Commands::Link { order, invoice } => cmd_link(&cfg_dir, &order, &invoice),
        Commands::Unlink { order, invoice } => cmd_unlink(&cfg_dir, &order, &invoice),
        Commands::Recompute => cmd_recompute(&cfg_dir),
        Commands::Report {
            order,
            output,
            open,
        } => cmd_report(&cfg_dir, &order, output, open),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(ReportError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("suppliers.toml"), SUPPLIERS_TEMPLATE)?;
    fs::write(cfg_dir.join("orders.toml"), ORDERS_TEMPLATE)?;
    fs::write(cfg_dir.join("invoices.toml"), INVOICES_TEMPLATE)?;

    println!("Initialized purchase-report config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Add your suppliers:         $EDITOR {}/suppliers.toml",
        cfg_dir.display()
    );
    println!(
        "  3. Record vendor bills:        $EDITOR {}/invoices.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then review your orders:");
    println!("  purchase-report orders");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct SupplierRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "TAX ID")]
    tax_id: String,
    #[tabled(rename = "TERMS")]
    terms: String,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "PAYMENT")]
    payment: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "RESIDUAL")]
    residual: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ORDER")]
    reference: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "SUPPLIER")]
    supplier: String,
    #[tabled(rename = "FACTURAS")]
    count: usize,
    #[tabled(rename = "ESTADO FACTURA")]
    status: String,
    #[tabled(rename = "INFORMACIÓN DE PAGO")]
    payment: String,
}

fn invoice_row(
    number: &str,
    invoice: &Invoice,
    status: Option<String>,
    symbol: &str,
) -> InvoiceRow {
    InvoiceRow {
        number: number.to_string(),
        date: invoice.date.map(|d| d.to_string()).unwrap_or_default(),
        state: invoice.lifecycle_state.to_string(),
        payment: invoice.payment_state.to_string(),
        total: format_money(invoice.total, symbol),
        residual: format_money(invoice.residual_amount, symbol),
        status: status.unwrap_or_else(|| "-".to_string()),
    }
}

/// Resolve an order reference to the actual order reference.
/// Accepts either an index (1-based) from 'orders' or the full reference.
fn resolve_order_ref(
    orders: &BTreeMap<String, PurchaseOrder>,
    reference: &str,
) -> Result<String> {
    if orders.contains_key(reference) {
        return Ok(reference.to_string());
    }

    if let Ok(idx) = reference.parse::<usize>() {
        // Orders are displayed sorted by reference, 1-indexed
        return idx
            .checked_sub(1)
            .and_then(|i| orders.keys().nth(i))
            .cloned()
            .ok_or_else(|| ReportError::InvalidOrderIndex(reference.to_string()));
    }

    Err(ReportError::OrderNotFound(reference.to_string()))
}

/// Show configuration summary
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let orders = load_orders(cfg_dir)?;
    let invoices = load_invoices(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let stale = orders
        .iter()
        .filter(|(reference, order)| state.is_stale(reference, order.invoices.len()))
        .count();

    println!("Purchase Report Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Company:          {}", config.company.name);
    println!("Suppliers:        {}", suppliers.len());
    println!("Orders:           {}", orders.len());
    println!("Invoices:         {}", invoices.len());
    println!("Stale counts:     {}", stale);

    if stale > 0 {
        println!();
        println!("Run 'purchase-report recompute' to refresh stored invoice counts.");
    }

    Ok(())
}

/// List configured suppliers
fn cmd_suppliers(cfg_dir: &Path) -> Result<()> {
    let suppliers = load_suppliers(cfg_dir)?;

    if suppliers.is_empty() {
        println!("No suppliers configured.");
        println!("Add suppliers to: {}/suppliers.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = suppliers.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let rows: Vec<SupplierRow> = sorted
        .iter()
        .map(|(id, supplier)| SupplierRow {
            id: id.to_string(),
            name: supplier.name.clone(),
            email: supplier.email.clone(),
            tax_id: supplier.tax_id.clone().unwrap_or_default(),
            terms: supplier.payment_terms_label(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List vendor bills with their status phrase
fn cmd_invoices(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let invoices = load_invoices(cfg_dir)?;

    if invoices.is_empty() {
        println!("No invoices recorded.");
        println!("Add invoices to: {}/invoices.toml", cfg_dir.display());
        return Ok(());
    }

    let policy = config.status_policy();
    let symbol = &config.report.currency_symbol;
    let rows: Vec<InvoiceRow> = invoices
        .iter()
        .map(|(number, invoice)| {
            invoice_row(number, invoice, status_phrase(invoice, &policy), symbol)
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List purchase orders with the derived invoice fields
fn cmd_orders(cfg_dir: &Path, limit: Option<usize>) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let orders = load_orders(cfg_dir)?;
    let invoices = load_invoices(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    if orders.is_empty() {
        println!("No purchase orders recorded.");
        return Ok(());
    }

    let policy = config.status_policy();
    let shown = limit.unwrap_or(orders.len());

    let mut rows = Vec::new();
    for (idx, (reference, order)) in orders.iter().enumerate().take(shown) {
        let linked = order.linked_invoices(reference, &invoices)?;
        let summary = OrderSummary::compute(linked.iter().map(|l| l.invoice), &policy);

        if state.is_stale(reference, summary.invoice_count) {
            tracing::warn!(
                order = %reference,
                live = summary.invoice_count,
                stored = ?state.invoice_counts.get(reference),
                "stored invoice count is stale"
            );
        }

        let supplier = match suppliers.get(&order.supplier) {
            Some(s) => s.name.clone(),
            None => {
                tracing::warn!(
                    order = %reference,
                    supplier = %order.supplier,
                    "unknown supplier, showing its id"
                );
                order.supplier.clone()
            }
        };

        rows.push(OrderRow {
            index: idx + 1,
            reference: reference.clone(),
            date: order.date.map(|d| d.to_string()).unwrap_or_default(),
            supplier,
            count: summary.invoice_count,
            status: summary.status_summary,
            payment: summary.payment_note,
        });
    }

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    println!();
    println!("Total: {} orders", orders.len());
    println!("Use index number with show/link/unlink/report (e.g., 'purchase-report show 1')");

    Ok(())
}

/// Show one purchase order and its invoice detail table
fn cmd_show(cfg_dir: &Path, order_ref: &str) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let orders = load_orders(cfg_dir)?;
    let invoices = load_invoices(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let reference = resolve_order_ref(&orders, order_ref)?;
    let order = &orders[&reference];
    let linked = order.linked_invoices(&reference, &invoices)?;
    let policy = config.status_policy();
    let summary = OrderSummary::compute(linked.iter().map(|l| l.invoice), &policy);

    if state.is_stale(&reference, summary.invoice_count) {
        tracing::warn!(order = %reference, "stored invoice count is stale");
    }

    let supplier = suppliers
        .get(&order.supplier)
        .ok_or_else(|| ReportError::SupplierNotFound(order.supplier.clone()))?;

    println!("Order {}", reference);
    println!("  Supplier:             {}", supplier.name);
    if let Some(date) = order.date {
        println!("  Date:                 {}", date);
    }
    println!("  {:<21} {}", format!("{STATUS_LABEL}:"), summary.status_summary);
    println!("  {:<21} {}", format!("{PAYMENT_LABEL}:"), summary.payment_note);
    println!("  {:<21} {}", format!("{COUNT_LABEL}:"), summary.invoice_count);

    if !linked.is_empty() {
        let symbol = &config.report.currency_symbol;
        let rows: Vec<InvoiceRow> = linked
            .iter()
            .map(|l| invoice_row(l.number, l.invoice, status_phrase(l.invoice, &policy), symbol))
            .collect();

        println!();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    Ok(())
}

/// Save a mutated order together with its recomputed stored count.
/// Nothing is written unless every link of the order resolves.
fn commit_links(
    cfg_dir: &Path,
    orders: &BTreeMap<String, PurchaseOrder>,
    reference: &str,
    invoices: &BTreeMap<String, Invoice>,
) -> Result<usize> {
    let order = orders
        .get(reference)
        .ok_or_else(|| ReportError::OrderNotFound(reference.to_string()))?;
    let linked = order.linked_invoices(reference, invoices)?;
    let count = invoice_count(linked.iter().map(|l| l.invoice));

    let mut state = load_state(cfg_dir)?;
    save_orders(cfg_dir, orders)?;
    if state.sync_count(reference, count) {
        tracing::info!(order = %reference, count, "stored invoice count updated");
        save_state(cfg_dir, &state)?;
    }
    Ok(count)
}

/// Link an invoice to a purchase order
fn cmd_link(cfg_dir: &Path, order_ref: &str, invoice: &str) -> Result<()> {
    let mut orders = load_orders(cfg_dir)?;
    let invoices = load_invoices(cfg_dir)?;

    let reference = resolve_order_ref(&orders, order_ref)?;
    if !invoices.contains_key(invoice) {
        return Err(ReportError::InvoiceNotFound(invoice.to_string()));
    }

    orders
        .get_mut(&reference)
        .ok_or_else(|| ReportError::OrderNotFound(reference.clone()))?
        .link(&reference, invoice)?;
    let count = commit_links(cfg_dir, &orders, &reference, &invoices)?;

    println!("Linked {} to {} ({} invoice(s))", invoice, reference, count);
    Ok(())
}

/// Remove an invoice from a purchase order
fn cmd_unlink(cfg_dir: &Path, order_ref: &str, invoice: &str) -> Result<()> {
    let mut orders = load_orders(cfg_dir)?;
    let invoices = load_invoices(cfg_dir)?;

    let reference = resolve_order_ref(&orders, order_ref)?;
    orders
        .get_mut(&reference)
        .ok_or_else(|| ReportError::OrderNotFound(reference.clone()))?
        .unlink(&reference, invoice)?;
    let count = commit_links(cfg_dir, &orders, &reference, &invoices)?;

    println!("Unlinked {} from {} ({} invoice(s))", invoice, reference, count);
    Ok(())
}

/// Refresh every stored invoice count
fn cmd_recompute(cfg_dir: &Path) -> Result<()> {
    let orders = load_orders(cfg_dir)?;
    let invoices = load_invoices(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;

    let mut changed = 0;
    for (reference, order) in &orders {
        let linked = order.linked_invoices(reference, &invoices)?;
        if state.sync_count(reference, invoice_count(linked.iter().map(|l| l.invoice))) {
            changed += 1;
        }
    }
    let dropped = state.retain_orders(orders.keys());

    save_state(cfg_dir, &state)?;
    tracing::info!(changed, dropped, "stored invoice counts refreshed");

    println!(
        "Recomputed invoice counts for {} orders ({} updated, {} removed)",
        orders.len(),
        changed,
        dropped
    );
    Ok(())
}

/// Generate a PDF report for a purchase order
fn cmd_report(
    cfg_dir: &Path,
    order_ref: &str,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let orders = load_orders(cfg_dir)?;
    let invoices = load_invoices(cfg_dir)?;

    let reference = resolve_order_ref(&orders, order_ref)?;
    let order = &orders[&reference];
    let linked = order.linked_invoices(&reference, &invoices)?;

    let supplier = suppliers
        .get(&order.supplier)
        .ok_or_else(|| ReportError::SupplierNotFound(order.supplier.clone()))?;

    let report_data = build_report(
        &config.company,
        supplier,
        &config.report.currency_symbol,
        &reference,
        order,
        &linked,
        &config.status_policy(),
    );

    // Determine output path
    let pdf_path = match output {
        Some(path) => path,
        None => {
            let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
            std::fs::create_dir_all(&output_dir)?;
            output_dir.join(format!("REPORT-{}.pdf", reference.replace('/', "-")))
        }
    };

    generate_report_pdf(&report_data, &pdf_path)?;

    println!("Generated report for {}", reference);
    println!("  {}: {}", STATUS_LABEL, report_data.summary.status_summary);
    println!("  Invoices: {}", report_data.summary.invoice_count);
    println!("  Saved:    {}", pdf_path.display());

    if open {
        open_path(&pdf_path)?;
    }

    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(pdf_path)
            .spawn()?;
    }
    Ok(())
}
