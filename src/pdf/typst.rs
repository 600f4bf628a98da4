use serde::Serialize;
use std::path::Path;
use std::process::Command;

use crate::error::{ReportError, Result};
use crate::purchase::ReportData;

/// Embedded Typst template for the purchase order report.
/// DATA_JSON_PATH is replaced with the JSON file name before compiling.
const ORDER_REPORT_TEMPLATE: &str = r##"// Purchase Order Report Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
)

#set text(font: "Helvetica", size: 10pt)

#let fmt-int(digits) = {
  let len = digits.len()
  let out = ""
  for (i, digit) in digits.clusters().enumerate() {
    if i > 0 and calc.rem(len - i, 3) == 0 {
      out += ","
    }
    out += digit
  }
  out
}

#let fmt-currency(amount) = {
  let parts = str(calc.round(amount, digits: 2)).split(".")
  let whole = fmt-int(parts.at(0))
  let frac = if parts.len() > 1 { parts.at(1) } else { "00" }
  let frac2 = if frac.len() == 1 { frac + "0" } else { frac }
  data.currency_symbol + whole + "." + frac2
}

// Header with company info and order reference
#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 18pt, weight: "bold")[#data.company.name]
    #v(0.3em)
    #data.company.address \
    #data.company.city, #data.company.state #data.company.zip \
    #data.company.email
    #if data.company.phone != none [
      \ #data.company.phone
    ]
  ],
  [
    #text(size: 22pt, weight: "bold")[ORDEN DE COMPRA]
    #v(0.5em)
    #table(
      columns: (auto, auto),
      stroke: none,
      align: (right, left),
      inset: 2pt,
      [*Orden:*], [#data.order],
      ..if data.order_date != none { ([*Fecha:*], [#data.order_date]) } else { () },
      [*Generado:*], [#data.generated_date],
    )
  ]
)

#v(1em)
#line(length: 100%, stroke: 0.5pt + gray)
#v(1em)

// Supplier block
#text(weight: "bold", size: 11pt)[Proveedor:]
#v(0.3em)
#text(weight: "bold")[#data.supplier.name]
#if data.supplier.contact != none [
  \ #data.supplier.contact
]
\ #data.supplier.address
\ #data.supplier.city, #data.supplier.state #data.supplier.zip
\ #data.supplier.email
#if data.supplier.tax_id != none [
  \ Tax ID: #data.supplier.tax_id
]
\ Condiciones: #data.supplier_terms

#v(1.5em)

// Derived invoice fields
#table(
  columns: (auto, 1fr),
  stroke: none,
  align: (right, left),
  inset: 5pt,
  ..data.fields.map(f => ([*#f.label:*], [#f.value])).flatten()
)

#v(1em)

// Invoice detail table
#if data.rows.len() > 0 [
  #table(
    columns: (auto, auto, auto, auto, 1fr),
    align: (left, left, right, right, left),
    stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else if y > 0 { (bottom: 0.5pt + gray) },
    inset: 8pt,
    fill: (x, y) => if y == 0 { luma(240) } else { none },

    // Header
    [*Factura*], [*Fecha*], [*Total*], [*Resta*], [*Estado*],

    // Rows
    ..data.rows.map(row => (
      row.number,
      if row.date != none { row.date } else { "" },
      [#fmt-currency(row.total)],
      [#fmt-currency(row.residual)],
      row.status,
    )).flatten()
  )

  #v(1em)

  #align(right)[
    #table(
      columns: (auto, auto),
      stroke: none,
      align: (right, right),
      inset: 6pt,

      [Total facturado:], [#fmt-currency(data.total)],
      table.hline(stroke: 1pt),
      [*Resta:*], [*#fmt-currency(data.residual)*],
    )
  ]
]

#if data.company.tax_id != none [
  #v(2em)
  #text(size: 9pt, fill: gray)[Tax ID: #data.company.tax_id]
]
"##;

/// Compile `template` against `data` with the Typst CLI, writing `output_path`.
fn compile<T: Serialize>(template: &str, name: &str, data: &T, output_path: &Path) -> Result<()> {
    // Check if typst is available
    if Command::new("typst").arg("--version").output().is_err() {
        return Err(ReportError::TypstNotFound);
    }

    let temp_dir = std::env::temp_dir().join("purchase-report");
    std::fs::create_dir_all(&temp_dir)?;

    let json_data =
        serde_json::to_string(data).map_err(|e| ReportError::PdfGeneration(e.to_string()))?;

    let json_name = format!("{name}.json");
    let json_path = temp_dir.join(&json_name);
    std::fs::write(&json_path, &json_data)?;

    // The JSON path is relative: data file and template share the temp dir
    let template_content = template.replace("DATA_JSON_PATH", &json_name);
    let template_path = temp_dir.join(format!("{name}.typ"));
    std::fs::write(&template_path, &template_content)?;

    tracing::debug!(
        template = %template_path.display(),
        output = %output_path.display(),
        "running typst compile"
    );

    let output = Command::new("typst")
        .arg("compile")
        .arg("--root")
        .arg(&temp_dir)
        .arg(&template_path)
        .arg(output_path)
        .output()?;

    // Clean up temp files
    let _ = std::fs::remove_file(&template_path);
    let _ = std::fs::remove_file(&json_path);

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!(status = ?output.status, "typst compile failed");
        return Err(ReportError::PdfGeneration(stderr.to_string()));
    }

    Ok(())
}

/// Generate the purchase order report PDF using Typst CLI
pub fn generate_report_pdf(report_data: &ReportData, output_path: &Path) -> Result<()> {
    compile(ORDER_REPORT_TEMPLATE, "order_report", report_data, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_references_report_fields() {
        for key in [
            "data.order",
            "data.order_date",
            "data.supplier.name",
            "data.supplier.tax_id",
            "data.supplier_terms",
            "data.fields",
            "data.rows",
            "row.status",
            "row.residual",
            "data.currency_symbol",
            "data.generated_date",
        ] {
            assert!(ORDER_REPORT_TEMPLATE.contains(key), "missing {key}");
        }
        assert_eq!(ORDER_REPORT_TEMPLATE.matches("DATA_JSON_PATH").count(), 1);
    }
}
