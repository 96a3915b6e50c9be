pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use quotegrid::{
    FixedGridRenderer, QuotationDocument, QuotegridError, RenderedDocument,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
    pub rendered: RenderedDocument,
}

impl GeneratedPdf {
    /// Loads the bytes of a rendered document back through lopdf
    pub fn from_rendered(rendered: RenderedDocument) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&rendered.bytes)?;
        Ok(Self {
            bytes: rendered.bytes.clone(),
            doc,
            rendered,
        })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text of a single page (1-based)
    pub fn page_text(&self, page: u32) -> String {
        self.doc.extract_text(&[page]).unwrap_or_default()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Render with the default renderer (fallback font, truncate policy)
pub fn render_default(document: &QuotationDocument) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let renderer = FixedGridRenderer::builder().build()?;
    render_with(&renderer, document)
}

pub fn render_with(
    renderer: &FixedGridRenderer,
    document: &QuotationDocument,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let rendered = renderer.render(document).map_err(QuotegridError::from)?;
    GeneratedPdf::from_rendered(rendered)
}
