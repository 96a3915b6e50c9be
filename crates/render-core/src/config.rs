//! Geometry and text configuration for the fixed grid.
//!
//! All measurements are PDF points with the origin at the top-left corner of the page
//! and y growing downward; the renderer flips coordinates when writing content.

use crate::error::RenderError;
use quotegrid_types::{Color, DocumentKind, DocumentNumber, Size};
use serde::{Deserialize, Serialize};

/// Number of table rows emitted per page.
pub const TARGET_ROWS: usize = 20;

/// What to do with items beyond the row capacity of one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Show the first `target_rows` items and drop the rest.
    #[default]
    Truncate,
    /// Continue on further pages, each with the header and a full grid.
    Paginate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub page: Size,
    /// Left, right and top page margin.
    pub margin: f32,
    pub logo_size: f32,
    /// Space between the logo and the header block.
    pub logo_gap: f32,
    pub title_font_size: f32,
    pub body_font_size: f32,
    pub header_line_height: f32,
    pub left_column_width: f32,
    pub right_column_width: f32,
    /// Description, quantity, unit price, line total.
    pub column_widths: [f32; 4],
    pub header_row_height: f32,
    pub row_height: f32,
    pub cell_padding: f32,
    pub header_fill: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub section_gap: f32,
    pub totals_row_height: f32,
    pub grand_total_row_height: f32,
    pub grand_total_font_size: f32,
    /// Distance from the bottom page edge to the signature lines.
    pub signature_offset: f32,
    pub signature_line_width: f32,
    pub target_rows: usize,
    pub overflow: OverflowPolicy,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            page: Size::a4(),
            margin: 40.0,
            logo_size: 80.0,
            logo_gap: 10.0,
            title_font_size: 20.0,
            body_font_size: 10.0,
            header_line_height: 15.0,
            left_column_width: 300.0,
            right_column_width: 215.0,
            column_widths: [265.0, 70.0, 90.0, 90.0],
            header_row_height: 22.0,
            row_height: 20.0,
            cell_padding: 4.0,
            header_fill: Color::gray(0xE6),
            border_color: Color::BLACK,
            border_width: 0.5,
            section_gap: 12.0,
            totals_row_height: 16.0,
            grand_total_row_height: 20.0,
            grand_total_font_size: 12.0,
            signature_offset: 110.0,
            signature_line_width: 180.0,
            target_rows: TARGET_ROWS,
            overflow: OverflowPolicy::Truncate,
        }
    }
}

/// Lines in the header block; the name plus up to three address lines.
pub const HEADER_LINES: usize = 4;

/// Vertical room kept free above the signature lines.
const SIGNATURE_CLEARANCE: f32 = 24.0;

impl GridLayout {
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_target_rows(mut self, target_rows: usize) -> Self {
        self.target_rows = target_rows;
        self
    }

    pub fn content_width(&self) -> f32 {
        self.page.width - 2.0 * self.margin
    }

    pub fn table_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    /// Top of the header block. The logo pushes it down when present.
    pub fn header_top(&self, has_logo: bool) -> f32 {
        if has_logo {
            self.margin + self.logo_size + self.logo_gap
        } else {
            self.margin + self.title_font_size * 1.2 + self.section_gap / 2.0
        }
    }

    pub fn table_top(&self, has_logo: bool) -> f32 {
        self.header_top(has_logo) + HEADER_LINES as f32 * self.header_line_height + self.section_gap
    }

    pub fn table_bottom(&self, has_logo: bool) -> f32 {
        self.table_top(has_logo) + self.header_row_height + self.target_rows as f32 * self.row_height
    }

    pub fn totals_bottom(&self, has_logo: bool) -> f32 {
        self.table_bottom(has_logo)
            + self.section_gap / 2.0
            + 2.0 * self.totals_row_height
            + self.grand_total_row_height
            + 4.0
    }

    pub fn signature_line_y(&self) -> f32 {
        self.page.height - self.signature_offset
    }

    /// Checks that the grid, totals and signatures fit on one page without overlap.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.target_rows == 0 {
            return Err(RenderError::InvalidLayout("target_rows must be at least 1".into()));
        }
        if self.column_widths.iter().any(|w| *w <= 2.0 * self.cell_padding) {
            return Err(RenderError::InvalidLayout(
                "every column must be wider than its padding".into(),
            ));
        }
        if self.table_width() > self.content_width() + 0.5 {
            return Err(RenderError::InvalidLayout(format!(
                "table width {:.1} exceeds content width {:.1}",
                self.table_width(),
                self.content_width()
            )));
        }
        if self.left_column_width + self.right_column_width > self.content_width() + 0.5 {
            return Err(RenderError::InvalidLayout(
                "header columns exceed content width".into(),
            ));
        }
        let limit = self.signature_line_y() - SIGNATURE_CLEARANCE;
        if self.totals_bottom(true) > limit {
            return Err(RenderError::InvalidLayout(format!(
                "{} rows of {:.1}pt do not fit above the signature block",
                self.target_rows, self.row_height
            )));
        }
        if self.signature_offset < 2.0 * self.body_font_size + 8.0 {
            return Err(RenderError::InvalidLayout(
                "signature block would run off the page".into(),
            ));
        }
        Ok(())
    }
}

/// Fixed captions printed on the document.
///
/// `tax` is printed as-is; it does not follow the computed tax rate or the tax flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Overrides the title derived from the document prefix.
    pub title: Option<String>,
    pub document_number: String,
    pub date: String,
    pub page: String,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
    pub subtotal: String,
    pub tax: String,
    pub grand_total: String,
    pub proposer: String,
    pub approver: String,
    pub signature_date: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: None,
            document_number: "No.".into(),
            date: "Date".into(),
            page: "Page".into(),
            description: "Description".into(),
            quantity: "Qty".into(),
            unit_price: "Unit Price".into(),
            amount: "Amount".into(),
            subtotal: "Subtotal".into(),
            tax: "VAT 7%".into(),
            grand_total: "Grand Total".into(),
            proposer: "Proposer".into(),
            approver: "Approver".into(),
            signature_date: "Date ____________".into(),
        }
    }
}

impl Labels {
    pub fn title_for(&self, number: &DocumentNumber) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => DocumentKind::from_prefix(number.prefix())
                .unwrap_or(DocumentKind::Quotation)
                .title()
                .to_string(),
        }
    }

    pub fn column_headers(&self) -> [&str; 4] {
        [
            self.description.as_str(),
            self.quantity.as_str(),
            self.unit_price.as_str(),
            self.amount.as_str(),
        ]
    }
}
