use crate::document::{QuotationDocument, RenderedDocument};
use crate::error::RenderError;

/// Turns a quotation into finished document bytes.
///
/// Implementations are pure over their input: rendering the same document twice yields
/// identical output.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, document: &QuotationDocument) -> Result<RenderedDocument, RenderError>;

    /// Returns a human-readable name for this renderer (for logging/debugging).
    fn name(&self) -> &'static str;
}
