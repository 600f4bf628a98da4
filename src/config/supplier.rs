use serde::{Deserialize, Serialize};

/// A vendor purchase orders are placed with (suppliers.toml)
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Supplier {
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default)]
    pub country: Option<String>,
    /// Supplier tax id, printed on the purchase order report
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Credit terms granted by the supplier; `None` or 0 means cash on delivery
    #[serde(default)]
    pub payment_days: Option<u32>,
}

impl Supplier {
    pub fn payment_terms_label(&self) -> String {
        match self.payment_days {
            Some(days) if days > 0 => format!("Net {} days", days),
            _ => "Cash on delivery".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_to_none() {
        let supplier: Supplier = toml::from_str(
            r#"
name = "Proveedor"
email = "ventas@proveedor.com"
address = "Av. 2"
city = "Lima"
state = "LIM"
zip = "15002"
"#,
        )
        .unwrap();

        assert!(supplier.tax_id.is_none());
        assert_eq!(supplier.payment_terms_label(), "Cash on delivery");
    }

    #[test]
    fn payment_terms_label_uses_days() {
        let mut supplier: Supplier = toml::from_str(
            r#"
name = "Proveedor"
email = "ventas@proveedor.com"
address = "Av. 2"
city = "Lima"
state = "LIM"
zip = "15002"
tax_id = "20123456789"
payment_days = 45
"#,
        )
        .unwrap();
        assert_eq!(supplier.payment_terms_label(), "Net 45 days");

        supplier.payment_days = Some(0);
        assert_eq!(supplier.payment_terms_label(), "Cash on delivery");
    }
}
