//! Quotation jobs as read from JSON.
//!
//! ```json
//! { "kind": "QT", "customer": {"name": "ACME", "address": "1 Main Rd"},
//!   "tax_enabled": true,
//!   "items": [{"description": "Survey", "quantity": "2", "unit_price": 1500}] }
//! ```

use crate::error::QuotegridError;
use chrono::NaiveDate;
use quotegrid_types::{Customer, DocumentKind, DocumentTotals, LineItem};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_kind() -> DocumentKind {
    DocumentKind::Quotation
}

fn default_tax_enabled() -> bool {
    true
}

/// Everything needed to issue one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationJob {
    #[serde(default = "default_kind")]
    pub kind: DocumentKind,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default = "default_tax_enabled")]
    pub tax_enabled: bool,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Issue date; today when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl QuotationJob {
    pub fn new(kind: DocumentKind, customer: Customer, items: Vec<LineItem>) -> Self {
        Self {
            kind,
            customer,
            tax_enabled: true,
            items,
            date: None,
        }
    }

    pub fn with_tax(mut self, enabled: bool) -> Self {
        self.tax_enabled = enabled;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, QuotegridError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QuotegridError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read job from '{}': {}", path.display(), e),
            )
        })?;
        Self::from_json(&source)
    }

    pub fn totals(&self) -> DocumentTotals {
        DocumentTotals::compute(&self.items, self.tax_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_with_lenient_items() {
        let job = QuotationJob::from_json(
            r#"{
                "kind": "IV",
                "customer": {"name": "ACME", "address": "1 Main Rd"},
                "tax_enabled": false,
                "items": [
                    {"description": "Survey", "quantity": "2", "unit_price": "1,500"},
                    {"description": "Broken", "quantity": "abc", "unit_price": -3}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(job.kind, DocumentKind::Invoice);
        assert_eq!(job.items[0].unit_price, 1500.0);
        assert_eq!(job.items[1].quantity, 0.0);
        assert_eq!(job.items[1].unit_price, 0.0);
        assert_eq!(job.totals(), DocumentTotals::from_parts(3000, 0));
    }

    #[test]
    fn test_defaults() {
        let job = QuotationJob::from_json("{}").unwrap();
        assert_eq!(job.kind, DocumentKind::Quotation);
        assert!(job.tax_enabled);
        assert!(job.items.is_empty());
        assert_eq!(job.date, None);
        assert_eq!(job.totals(), DocumentTotals::default());
    }

    #[test]
    fn test_explicit_date() {
        let job = QuotationJob::from_json(r#"{"date": "2024-03-09"}"#).unwrap();
        assert_eq!(job.date, NaiveDate::from_ymd_opt(2024, 3, 9));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(matches!(
            QuotationJob::from_json(r#"{"kind": "XX"}"#),
            Err(QuotegridError::Json(_))
        ));
    }
}
