use chrono::NaiveDate;
use quotegrid_traits::SharedResourceData;
use quotegrid_types::{Customer, DocumentNumber, DocumentTotals, LineItem};
use std::path::Path;
use thiserror::Error;

/// Everything printed on one quotation.
///
/// Totals are carried alongside the items rather than recomputed, so a caller can print
/// figures that were agreed elsewhere.
#[derive(Debug, Clone)]
pub struct QuotationDocument {
    pub number: DocumentNumber,
    /// Printed in the header; normally the date encoded in `number`.
    pub issue_date: NaiveDate,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub totals: DocumentTotals,
    pub tax_enabled: bool,
    /// Raw PNG/JPEG bytes.
    pub logo: Option<SharedResourceData>,
}

impl QuotationDocument {
    /// Builds a document and computes its totals from `items`.
    pub fn new(number: DocumentNumber, customer: Customer, items: Vec<LineItem>, tax_enabled: bool) -> Self {
        let totals = DocumentTotals::compute(&items, tax_enabled);
        Self {
            issue_date: number.date(),
            number,
            customer,
            items,
            totals,
            tax_enabled,
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: SharedResourceData) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_totals(mut self, totals: DocumentTotals) -> Self {
        self.totals = totals;
        self
    }

    pub fn with_issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = date;
        self
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }
}

/// A non-fatal condition encountered while rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    #[error("Unicode font unavailable, text rendered with Helvetica: {reason}")]
    FontFallback { reason: String },
    #[error("Bold font unavailable, regular face used for emphasis")]
    BoldFontMissing,
    #[error("{dropped} line items beyond the first {shown} were not rendered")]
    ItemsTruncated { shown: usize, dropped: usize },
    #[error("{dropped} customer address lines beyond the first {shown} were not rendered")]
    AddressTruncated { shown: usize, dropped: usize },
}

/// A finished PDF plus diagnostics about how it was produced.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Table rows drawn across all pages, blank rows included.
    pub rows_rendered: usize,
    pub dropped_items: usize,
    pub warnings: Vec<RenderWarning>,
}

impl RenderedDocument {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn used_fallback_font(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, RenderWarning::FontFallback { .. }))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}
