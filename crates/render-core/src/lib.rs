//! Core rendering abstractions for fixed-grid quotation documents.
//!
//! This crate provides the backend-independent half of rendering:
//! - `GridLayout`, `OverflowPolicy` and `Labels` configuration
//! - `GridLayoutEngine`, which plans every page as positioned elements
//! - the `DocumentRenderer` trait implemented by PDF backends
//! - error and warning types shared by all backends

mod config;
mod document;
mod elements;
mod engine;
mod error;
mod traits;
pub mod utils;

pub use config::{GridLayout, HEADER_LINES, Labels, OverflowPolicy, TARGET_ROWS};
pub use document::{QuotationDocument, RenderWarning, RenderedDocument};
pub use elements::{
    FontRole, ImageElement, LayoutElement, PositionedElement, RectElement, Stroke, TextElement,
    TextMeasurer,
};
pub use engine::{GridLayoutEngine, GridPlan, LOGO_SRC, LaidOutPage};
pub use error::RenderError;
pub use traits::DocumentRenderer;
