use quotegrid_numbering::AllocationError;
use quotegrid_render_core::RenderError;
use quotegrid_traits::{HistoryError, ResourceError};
use quotegrid_types::DocumentNumberError;
use thiserror::Error;

/// Top-level error for issuing and rendering quotations.
#[derive(Error, Debug)]
pub enum QuotegridError {
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("History store error: {0}")]
    History(#[from] HistoryError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Number allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Invalid document number: {0}")]
    DocumentNumber(#[from] DocumentNumberError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
