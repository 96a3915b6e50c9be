//! Fixed-grid page planning.
//!
//! Every page carries the header and exactly `target_rows` bordered table rows. Rows
//! past the end of the item list are drawn blank. Totals and signatures appear on the
//! last page only.

use crate::config::{GridLayout, HEADER_LINES, Labels, OverflowPolicy};
use crate::document::QuotationDocument;
use crate::elements::{
    FontRole, ImageElement, LayoutElement, PositionedElement, RectElement, Stroke, TextElement,
    TextMeasurer,
};
use crate::error::RenderError;
use crate::utils::cell_amount;
use quotegrid_types::{Color, LineItem, Rect, Size, format_units};
use std::ops::Range;

/// Key under which the document logo is registered with the renderer.
pub const LOGO_SRC: &str = "logo";

/// One planned page.
#[derive(Debug, Clone)]
pub struct LaidOutPage {
    pub elements: Vec<PositionedElement>,
    /// Indices into the document's items shown on this page.
    pub items: Range<usize>,
    pub table_rows: usize,
}

impl LaidOutPage {
    /// Text content in emission order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .filter_map(|el| el.as_text().map(|t| t.content.as_str()))
    }
}

/// The complete layout of a document, ready to be drawn.
#[derive(Debug, Clone)]
pub struct GridPlan {
    pub page_size: Size,
    pub pages: Vec<LaidOutPage>,
    pub dropped_items: usize,
    /// Customer address lines that did not fit in the header block.
    pub dropped_address_lines: usize,
}

impl GridPlan {
    pub fn rows_rendered(&self) -> usize {
        self.pages.iter().map(|p| p.table_rows).sum()
    }

    pub fn items_shown(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }
}

/// Horizontal placement of text within its box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

pub struct GridLayoutEngine<'a, M: TextMeasurer + ?Sized> {
    layout: &'a GridLayout,
    labels: &'a Labels,
    measurer: &'a M,
}

impl<'a, M: TextMeasurer + ?Sized> GridLayoutEngine<'a, M> {
    pub fn new(layout: &'a GridLayout, labels: &'a Labels, measurer: &'a M) -> Self {
        Self {
            layout,
            labels,
            measurer,
        }
    }

    /// Splits the items over pages according to the overflow policy.
    pub fn paginate(&self, item_count: usize) -> (Vec<Range<usize>>, usize) {
        let rows = self.layout.target_rows;
        match self.layout.overflow {
            OverflowPolicy::Truncate => {
                let shown = item_count.min(rows);
                (vec![0..shown], item_count - shown)
            }
            OverflowPolicy::Paginate => {
                let page_count = item_count.div_ceil(rows).max(1);
                let ranges = (0..page_count)
                    .map(|p| (p * rows)..((p + 1) * rows).min(item_count))
                    .collect();
                (ranges, 0)
            }
        }
    }

    pub fn plan(&self, document: &QuotationDocument) -> Result<GridPlan, RenderError> {
        self.layout.validate()?;

        let (ranges, dropped_items) = self.paginate(document.items.len());
        if dropped_items > 0 {
            log::warn!(
                "{}: {} items exceed the {}-row grid and were dropped",
                document.number,
                dropped_items,
                self.layout.target_rows
            );
        }

        let address_room = HEADER_LINES - 1;
        let dropped_address_lines = document
            .customer
            .address_lines()
            .count()
            .saturating_sub(address_room);
        if dropped_address_lines > 0 {
            log::warn!(
                "{}: customer address has {} line(s) beyond the {} the header holds",
                document.number,
                dropped_address_lines,
                address_room
            );
        }

        let page_count = ranges.len();
        let pages = ranges
            .into_iter()
            .enumerate()
            .map(|(index, items)| {
                let mut page = PageBuilder::new(self);
                page.header(document, index, page_count);
                page.table(&document.items[items.clone()], document.has_logo());
                if index + 1 == page_count {
                    page.totals(document);
                    page.signatures();
                }
                LaidOutPage {
                    elements: page.elements,
                    items,
                    table_rows: self.layout.target_rows,
                }
            })
            .collect();

        Ok(GridPlan {
            page_size: self.layout.page,
            pages,
            dropped_items,
            dropped_address_lines,
        })
    }
}

struct PageBuilder<'e, 'a, M: TextMeasurer + ?Sized> {
    engine: &'e GridLayoutEngine<'a, M>,
    elements: Vec<PositionedElement>,
}

impl<'e, 'a, M: TextMeasurer + ?Sized> PageBuilder<'e, 'a, M> {
    fn new(engine: &'e GridLayoutEngine<'a, M>) -> Self {
        Self {
            engine,
            elements: Vec::new(),
        }
    }

    fn layout(&self) -> &'a GridLayout {
        self.engine.layout
    }

    fn labels(&self) -> &'a Labels {
        self.engine.labels
    }

    fn border(&self) -> Stroke {
        Stroke {
            width: self.layout().border_width,
            color: self.layout().border_color,
        }
    }

    /// Places one line of text inside `cell`, vertically centred. Text that does not
    /// fit the cell is shortened.
    fn text(&mut self, content: &str, cell: Rect, font: FontRole, font_size: f32, align: Align) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        let measurer = self.engine.measurer;
        let fitted = measurer.fit_text(content, font, font_size, cell.width);
        if fitted.is_empty() {
            return;
        }
        let width = measurer.text_width(&fitted, font, font_size);
        let x = match align {
            Align::Left => cell.x,
            Align::Center => cell.x + (cell.width - width) / 2.0,
            Align::Right => cell.right() - width,
        };
        let y = cell.y + (cell.height - font_size) / 2.0;
        self.elements.push(PositionedElement::new(
            Rect::new(x, y, width, font_size),
            LayoutElement::Text(TextElement {
                content: fitted,
                font,
                font_size,
                color: Color::BLACK,
            }),
        ));
    }

    fn rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>) {
        self.elements.push(PositionedElement::new(
            rect,
            LayoutElement::Rectangle(RectElement { fill, stroke }),
        ));
    }

    fn hline(&mut self, x: f32, y: f32, width: f32, stroke: Stroke) {
        self.elements
            .push(PositionedElement::new(Rect::new(x, y, width, 0.0), LayoutElement::Line(stroke)));
    }

    fn header(&mut self, document: &QuotationDocument, page_index: usize, page_count: usize) {
        let layout = self.layout();
        let labels = self.labels();
        let margin = layout.margin;
        let content_width = layout.content_width();
        let has_logo = document.has_logo();

        let title_align = if has_logo {
            self.elements.push(PositionedElement::new(
                Rect::new(margin, margin, layout.logo_size, layout.logo_size),
                LayoutElement::Image(ImageElement { src: LOGO_SRC.to_string() }),
            ));
            Align::Right
        } else {
            Align::Center
        };
        let title_box = Rect::new(margin, margin, content_width, layout.title_font_size * 1.2);
        let title = labels.title_for(&document.number);
        self.text(&title, title_box, FontRole::Bold, layout.title_font_size, title_align);

        let top = layout.header_top(has_logo);
        let line_h = layout.header_line_height;
        let size = layout.body_font_size;
        let pad = layout.cell_padding;

        let left = Rect::new(margin, top, layout.left_column_width, line_h).inset_x(pad);
        self.text(&document.customer.name, left, FontRole::Bold, size, Align::Left);
        for (i, line) in document.customer.address_lines().take(HEADER_LINES - 1).enumerate() {
            let cell = Rect { y: top + (i + 1) as f32 * line_h, ..left };
            self.text(line, cell, FontRole::Regular, size, Align::Left);
        }

        let right_x = margin + content_width - layout.right_column_width;
        let right = Rect::new(right_x, top, layout.right_column_width, line_h).inset_x(pad);
        let mut right_lines = vec![
            format!("{} {}", labels.document_number, document.number),
            format!("{} {}", labels.date, document.issue_date.format("%d/%m/%Y")),
        ];
        if page_count > 1 {
            right_lines.push(format!("{} {}/{}", labels.page, page_index + 1, page_count));
        }
        for (i, line) in right_lines.iter().enumerate() {
            let cell = Rect { y: top + i as f32 * line_h, ..right };
            self.text(line, cell, FontRole::Regular, size, Align::Left);
        }
    }

    /// Column boxes for a row starting at `y`.
    fn columns(&self, y: f32, height: f32) -> [Rect; 4] {
        let layout = self.layout();
        let mut x = layout.margin;
        layout.column_widths.map(|width| {
            let cell = Rect::new(x, y, width, height);
            x += width;
            cell
        })
    }

    fn table(&mut self, items: &[LineItem], has_logo: bool) {
        let layout = self.layout();
        let top = layout.table_top(has_logo);
        let size = layout.body_font_size;
        let pad = layout.cell_padding;
        let border = self.border();

        let header_cells = self.columns(top, layout.header_row_height);
        for (cell, caption) in header_cells.iter().zip(self.labels().column_headers()) {
            self.rect(*cell, Some(layout.header_fill), Some(border));
            self.text(caption, cell.inset_x(pad), FontRole::Bold, size, Align::Center);
        }

        let body_top = top + layout.header_row_height;
        for row in 0..layout.target_rows {
            let cells = self.columns(body_top + row as f32 * layout.row_height, layout.row_height);
            for cell in &cells {
                self.rect(*cell, None, Some(border));
            }
            let Some(item) = items.get(row) else {
                continue;
            };
            self.text(&item.description, cells[0].inset_x(pad), FontRole::Regular, size, Align::Left);
            let values = [item.quantity, item.unit_price, item.line_total()];
            for (cell, value) in cells[1..].iter().zip(values) {
                self.text(&cell_amount(value), cell.inset_x(pad), FontRole::Regular, size, Align::Right);
            }
        }
    }

    fn totals(&mut self, document: &QuotationDocument) {
        let layout = self.layout();
        let labels = self.labels();
        let has_logo = document.has_logo();
        let pad = layout.cell_padding;
        let [_, _, label_col, value_col] = self.columns(0.0, 0.0);

        if !document.tax_enabled && document.totals.tax != 0 {
            log::debug!(
                "{}: tax of {} printed although tax is disabled",
                document.number,
                document.totals.tax
            );
        }

        let rows = [
            (&labels.subtotal, document.totals.subtotal, layout.totals_row_height, FontRole::Regular, layout.body_font_size),
            (&labels.tax, document.totals.tax, layout.totals_row_height, FontRole::Regular, layout.body_font_size),
            (
                &labels.grand_total,
                document.totals.grand_total,
                layout.grand_total_row_height,
                FontRole::Bold,
                layout.grand_total_font_size,
            ),
        ];

        let last = rows.len() - 1;
        let mut y = layout.table_bottom(has_logo) + layout.section_gap / 2.0;
        let rule = Stroke { width: 0.75, ..self.border() };
        let rule_x = label_col.x;
        let rule_width = label_col.width + value_col.width;
        for (index, (label, value, height, font, size)) in rows.into_iter().enumerate() {
            if index == last {
                self.hline(rule_x, y, rule_width, rule);
            }
            let label_cell = Rect::new(label_col.x, y, label_col.width, height).inset_x(pad);
            let value_cell = Rect::new(value_col.x, y, value_col.width, height).inset_x(pad);
            self.text(label, label_cell, font, size, Align::Left);
            self.text(&format_units(value), value_cell, font, size, Align::Right);
            y += height;
        }

        // Double rule under the grand total.
        self.hline(rule_x, y + 1.0, rule_width, rule);
        self.hline(rule_x, y + 3.0, rule_width, rule);
    }

    fn signatures(&mut self) {
        let layout = self.layout();
        let labels = self.labels();
        let line_y = layout.signature_line_y();
        let half = layout.content_width() / 2.0;
        let size = layout.body_font_size;
        let stroke = Stroke {
            width: 0.75,
            color: layout.border_color,
        };

        for (index, caption) in [&labels.proposer, &labels.approver].into_iter().enumerate() {
            let center = layout.margin + half * (index as f32 + 0.5);
            let width = layout.signature_line_width.min(half - 2.0 * layout.cell_padding);
            self.hline(center - width / 2.0, line_y, width, stroke);

            let caption_cell = Rect::new(center - half / 2.0, line_y + 4.0, half, size * 1.4);
            self.text(caption, caption_cell, FontRole::Regular, size, Align::Center);
            let date_cell = Rect { y: caption_cell.bottom() + 2.0, ..caption_cell };
            self.text(&labels.signature_date, date_cell, FontRole::Regular, size, Align::Center);
        }
    }
}
