use crate::fonts::{FontAssets, FontSet, GlyphUsage};
use crate::image::decode_logo;
use crate::page::PageContext;
use crate::writer::PdfWriter;
use quotegrid_render_core::{
    DocumentRenderer, GridLayout, GridLayoutEngine, HEADER_LINES, LOGO_SRC, Labels, OverflowPolicy,
    QuotationDocument, RenderError, RenderWarning, RenderedDocument,
};
use quotegrid_types::{Customer, DocumentNumber, DocumentTotals, LineItem};
use std::collections::BTreeMap;
use std::sync::Arc;

const LOGO_RESOURCE: &str = "Im1";

/// Renders quotations onto a fixed 20-row grid using `lopdf`.
///
/// Fonts are resolved once when the renderer is built; every render reuses them and
/// repeats any font warnings on its result.
#[derive(Debug, Clone)]
pub struct FixedGridRenderer {
    layout: GridLayout,
    labels: Labels,
    fonts: Arc<FontSet>,
}

#[derive(Debug, Clone, Default)]
pub struct FixedGridRendererBuilder {
    layout: GridLayout,
    labels: Labels,
    fonts: Option<FontAssets>,
}

impl FixedGridRendererBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.layout.overflow = overflow;
        self
    }

    pub fn with_target_rows(mut self, target_rows: usize) -> Self {
        self.layout.target_rows = target_rows;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_fonts(mut self, fonts: FontAssets) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn build(self) -> Result<FixedGridRenderer, RenderError> {
        self.layout.validate()?;
        let assets = self.fonts.unwrap_or_else(FontAssets::none);
        Ok(FixedGridRenderer {
            layout: self.layout,
            labels: self.labels,
            fonts: Arc::new(FontSet::resolve(&assets)),
        })
    }
}

impl FixedGridRenderer {
    pub fn builder() -> FixedGridRendererBuilder {
        FixedGridRendererBuilder::new()
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Warnings raised while resolving fonts, repeated on every render.
    pub fn font_warnings(&self) -> &[RenderWarning] {
        self.fonts.warnings()
    }

    pub fn render(&self, document: &QuotationDocument) -> Result<RenderedDocument, RenderError> {
        let fonts = self.fonts.as_ref();
        let plan = GridLayoutEngine::new(&self.layout, &self.labels, fonts).plan(document)?;

        let mut writer = PdfWriter::new();
        let mut images = BTreeMap::new();
        if let Some(logo) = &document.logo {
            writer.add_image(LOGO_RESOURCE, decode_logo(logo)?);
            images.insert(LOGO_SRC.to_string(), LOGO_RESOURCE.to_string());
        }

        let mut usage = GlyphUsage::default();
        for page in &plan.pages {
            let mut ctx = PageContext::new(plan.page_size.height, fonts, &mut usage, &images);
            for element in &page.elements {
                ctx.draw_element(element)?;
            }
            writer.add_page(ctx.finish(), plan.page_size.width, plan.page_size.height)?;
        }

        let page_count = writer.page_count();
        let bytes = writer.finish(fonts, &usage)?;

        let mut warnings = fonts.warnings().to_vec();
        if plan.dropped_items > 0 {
            warnings.push(RenderWarning::ItemsTruncated {
                shown: plan.items_shown(),
                dropped: plan.dropped_items,
            });
        }
        if plan.dropped_address_lines > 0 {
            warnings.push(RenderWarning::AddressTruncated {
                shown: HEADER_LINES - 1,
                dropped: plan.dropped_address_lines,
            });
        }

        log::info!(
            "Rendered {} ({} page(s), {} rows, {} bytes)",
            document.number,
            page_count,
            plan.rows_rendered(),
            bytes.len()
        );

        Ok(RenderedDocument {
            bytes,
            page_count,
            rows_rendered: plan.rows_rendered(),
            dropped_items: plan.dropped_items,
            warnings,
        })
    }

    /// Renders from individual values rather than a prepared [`QuotationDocument`].
    ///
    /// The totals are printed as given; a grand total that does not equal
    /// `subtotal + tax` is logged but not corrected.
    #[allow(clippy::too_many_arguments)]
    pub fn render_quotation(
        &self,
        document_number: &DocumentNumber,
        customer_name: &str,
        customer_address: &str,
        line_items: &[LineItem],
        subtotal: i64,
        tax: i64,
        grand_total: i64,
        tax_enabled: bool,
        logo_image: Option<&[u8]>,
    ) -> Result<RenderedDocument, RenderError> {
        let totals = DocumentTotals {
            subtotal,
            tax,
            grand_total,
        };
        if !totals.is_consistent() {
            log::warn!(
                "{}: grand total {} differs from subtotal {} + tax {}",
                document_number,
                grand_total,
                subtotal,
                tax
            );
        }

        let mut document = QuotationDocument::new(
            document_number.clone(),
            Customer::new(customer_name, customer_address),
            line_items.to_vec(),
            tax_enabled,
        )
        .with_totals(totals);
        if let Some(logo) = logo_image {
            document = document.with_logo(Arc::new(logo.to_vec()));
        }
        self.render(&document)
    }
}

impl DocumentRenderer for FixedGridRenderer {
    fn render(&self, document: &QuotationDocument) -> Result<RenderedDocument, RenderError> {
        FixedGridRenderer::render(self, document)
    }

    fn name(&self) -> &'static str {
        "FixedGridRenderer"
    }
}
