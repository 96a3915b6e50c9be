//! # quotegrid
//!
//! Quotation documents on a fixed 20-row grid, numbered from the history of issued
//! documents.
//!
//! - **numbering**: `PREFIX-YYYYMMDD-RUN` allocation derived from issued numbers
//! - **render**: [`FixedGridRenderer`] writes the PDF with `lopdf`
//! - **service**: [`QuotationService`] allocates, renders and records in one call
//!
//! ```no_run
//! use quotegrid::{QuotationJob, QuotationService, QuotegridConfig};
//!
//! let config = QuotegridConfig::from_file("quotegrid.json")?;
//! let service = QuotationService::from_config(&config)?;
//! let issued = service.issue(&QuotationJob::from_file("job.json")?)?;
//! issued.save("quotation.pdf")?;
//! # Ok::<(), quotegrid::QuotegridError>(())
//! ```

// Re-export foundation crates
pub use quotegrid_traits as traits;
pub use quotegrid_types as types;

// Re-export algorithm and render crates
pub use quotegrid_numbering as numbering;
pub use quotegrid_render_core as render_core;
pub use quotegrid_render_lopdf as render;
pub use quotegrid_resource as resource;

pub mod config;
pub mod error;
pub mod job;
pub mod service;

pub use config::QuotegridConfig;
pub use error::QuotegridError;
pub use job::QuotationJob;
pub use service::{IssuedQuotation, QuotationService, QuotationServiceBuilder};

pub use quotegrid_numbering::{AllocationError, Clock, FixedClock, SequenceAllocator, SystemClock};
pub use quotegrid_render_core::{
    DocumentRenderer, GridLayout, Labels, OverflowPolicy, QuotationDocument, RenderError,
    RenderWarning, RenderedDocument, TARGET_ROWS,
};
pub use quotegrid_render_lopdf::{FixedGridRenderer, FontAssets};
pub use quotegrid_traits::{HistoryRecord, HistoryStore, InMemoryHistoryStore};
pub use quotegrid_resource::FileHistoryStore;
pub use quotegrid_types::{Customer, DocumentKind, DocumentNumber, DocumentTotals, LineItem};
