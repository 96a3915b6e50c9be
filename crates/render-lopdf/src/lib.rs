//! PDF backend for fixed-grid quotations, built on `lopdf`.
//!
//! [`FixedGridRenderer`] plans pages with `quotegrid-render-core` and writes them as a
//! single in-memory PDF: Flate-compressed content streams, an embedded TrueType font
//! (or the Helvetica fallback) and an optional logo image.

mod fonts;
mod image;
mod page;
mod renderer;
mod writer;

pub use fonts::{EmbeddedFont, FontAssets, FontSet, PdfFont, ShapedGlyph, StandardFont, to_win_ansi};
pub use image::{ImageXObject, decode_logo};
pub use renderer::{FixedGridRenderer, FixedGridRendererBuilder};
pub use writer::to_unicode_cmap;
