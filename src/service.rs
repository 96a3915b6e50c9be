//! Issuing quotations: allocate a number, render, then record it.

use crate::config::QuotegridConfig;
use crate::error::QuotegridError;
use crate::job::QuotationJob;
use quotegrid_numbering::{Clock, SequenceAllocator, SystemClock};
use quotegrid_render_core::{DocumentRenderer, QuotationDocument, RenderedDocument};
use quotegrid_render_lopdf::FixedGridRenderer;
use quotegrid_traits::{HistoryRecord, HistoryStore, InMemoryHistoryStore, SharedResourceData};
use quotegrid_types::{DocumentNumber, DocumentTotals};
use std::path::Path;
use std::sync::Arc;

/// A rendered document together with the number it was issued under.
#[derive(Debug, Clone)]
pub struct IssuedQuotation {
    pub number: DocumentNumber,
    pub totals: DocumentTotals,
    pub rendered: RenderedDocument,
    /// Whether the number was written to the history.
    pub recorded: bool,
}

impl IssuedQuotation {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), QuotegridError> {
        Ok(self.rendered.save(path)?)
    }
}

/// Composes number allocation, rendering and history.
///
/// Numbers are derived from a fresh snapshot of the history on every call and recorded
/// only after the document rendered successfully. Nothing is locked between the two
/// steps: callers issuing from several threads or processes must serialize issuance.
pub struct QuotationService<C: Clock = SystemClock> {
    allocator: SequenceAllocator<C>,
    history: Arc<dyn HistoryStore>,
    renderer: Arc<dyn DocumentRenderer>,
    logo: Option<SharedResourceData>,
}

impl<C: Clock> std::fmt::Debug for QuotationService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotationService")
            .field("clock", self.allocator.clock())
            .field("history", &self.history.name())
            .field("renderer", &self.renderer.name())
            .field("logo", &self.logo.is_some())
            .finish()
    }
}

impl QuotationService<SystemClock> {
    pub fn builder() -> QuotationServiceBuilder<SystemClock> {
        QuotationServiceBuilder::new()
    }

    /// Builds a service from configuration: renderer, fonts, logo and history store.
    pub fn from_config(config: &QuotegridConfig) -> Result<Self, QuotegridError> {
        let mut builder = Self::builder()
            .with_renderer(config.renderer()?)
            .with_history(config.history_store());
        if let Some(logo) = config.load_logo()? {
            builder = builder.with_logo(logo);
        }
        builder.build()
    }
}

impl<C: Clock> QuotationService<C> {
    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// The number the next [`issue`](Self::issue) of `job` would receive.
    pub fn peek_number(&self, job: &QuotationJob) -> Result<DocumentNumber, QuotegridError> {
        let issued = self.history.issued_numbers()?;
        let date = job.date.unwrap_or_else(|| self.allocator.clock().today());
        Ok(self.allocator.next_for_date(job.kind.prefix(), date, issued)?)
    }

    /// Allocates a number, renders the document and records the number.
    ///
    /// A failed render leaves the history untouched.
    pub fn issue(&self, job: &QuotationJob) -> Result<IssuedQuotation, QuotegridError> {
        let mut issued = self.generate(job)?;
        self.history.record(HistoryRecord::issued(
            &issued.number,
            job.customer.name.clone(),
            &issued.totals,
        ))?;
        issued.recorded = true;
        log::info!(
            "Issued {} for '{}' (grand total {})",
            issued.number,
            job.customer.name,
            issued.totals.grand_total
        );
        Ok(issued)
    }

    /// Renders under the next number without recording it.
    pub fn preview(&self, job: &QuotationJob) -> Result<IssuedQuotation, QuotegridError> {
        let issued = self.generate(job)?;
        log::info!("Previewed {} (not recorded)", issued.number);
        Ok(issued)
    }

    fn generate(&self, job: &QuotationJob) -> Result<IssuedQuotation, QuotegridError> {
        let number = self.peek_number(job)?;
        let mut document = QuotationDocument::new(
            number.clone(),
            job.customer.clone(),
            job.items.clone(),
            job.tax_enabled,
        );
        if let Some(logo) = &self.logo {
            document = document.with_logo(Arc::clone(logo));
        }

        let rendered = self.renderer.render(&document)?;
        for warning in &rendered.warnings {
            log::warn!("{}: {}", number, warning);
        }

        Ok(IssuedQuotation {
            number,
            totals: document.totals,
            rendered,
            recorded: false,
        })
    }
}

pub struct QuotationServiceBuilder<C: Clock = SystemClock> {
    clock: C,
    history: Option<Arc<dyn HistoryStore>>,
    renderer: Option<Arc<dyn DocumentRenderer>>,
    logo: Option<SharedResourceData>,
}

impl QuotationServiceBuilder<SystemClock> {
    pub fn new() -> Self {
        Self {
            clock: SystemClock,
            history: None,
            renderer: None,
            logo: None,
        }
    }
}

impl Default for QuotationServiceBuilder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> QuotationServiceBuilder<C> {
    /// Replaces the clock "today" is read from.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> QuotationServiceBuilder<C2> {
        QuotationServiceBuilder {
            clock,
            history: self.history,
            renderer: self.renderer,
            logo: self.logo,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_renderer<R: DocumentRenderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn with_logo(mut self, logo: SharedResourceData) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Unset collaborators default to an in-memory history and a [`FixedGridRenderer`]
    /// with the default layout and the built-in fallback font.
    pub fn build(self) -> Result<QuotationService<C>, QuotegridError> {
        let history = self
            .history
            .unwrap_or_else(|| Arc::new(InMemoryHistoryStore::new()));
        let renderer: Arc<dyn DocumentRenderer> = match self.renderer {
            Some(renderer) => renderer,
            None => Arc::new(FixedGridRenderer::builder().build()?),
        };
        Ok(QuotationService {
            allocator: SequenceAllocator::with_clock(self.clock),
            history,
            renderer,
            logo: self.logo,
        })
    }
}
