use serde::{Deserialize, Serialize};

use crate::purchase::{ResidualFormat, StatusPolicy};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub company: Company,
    pub report: ReportSettings,
    #[serde(default)]
    pub summary: SummarySettings,
    pub pdf: PdfSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportSettings {
    pub currency_symbol: String,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResidualStyle {
    #[default]
    Plain,
    Currency,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SummarySettings {
    #[serde(default)]
    pub residual_format: ResidualStyle,
    #[serde(default)]
    pub unknown_payment_phrase: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PdfSettings {
    pub output_dir: String,
}

impl Config {
    /// Classification policy derived from the `[summary]` section
    pub fn status_policy(&self) -> StatusPolicy {
        let residual = match self.summary.residual_format {
            ResidualStyle::Plain => ResidualFormat::Plain,
            ResidualStyle::Currency => ResidualFormat::Currency {
                symbol: self.report.currency_symbol.clone(),
            },
        };
        StatusPolicy {
            residual,
            unknown_payment: self.summary.unknown_payment_phrase.clone(),
        }
    }
}
