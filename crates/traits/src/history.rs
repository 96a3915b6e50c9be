//! HistoryStore trait for the log of issued document numbers.
//!
//! The history is the only source the allocator derives run numbers from. Stores are
//! injected into the service layer; none of them offers transactional guarantees.

use chrono::NaiveDate;
use quotegrid_types::{DocumentNumber, DocumentTotals};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for history store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History I/O error: {0}")]
    Io(String),

    #[error("Document number '{0}' has already been recorded")]
    Duplicate(String),

    #[error("History store lock poisoned")]
    Poisoned,
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::Io(err.to_string())
    }
}

/// One issued document as kept in the history.
///
/// `number` stays free text: history written by older tools may hold entries that do
/// not parse as a [`DocumentNumber`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub number: String,
    pub issued_on: Option<NaiveDate>,
    pub customer: String,
    pub grand_total: i64,
}

impl HistoryRecord {
    pub fn issued(number: &DocumentNumber, customer: impl Into<String>, totals: &DocumentTotals) -> Self {
        Self {
            number: number.to_string(),
            issued_on: Some(number.date()),
            customer: customer.into(),
            grand_total: totals.grand_total,
        }
    }

    /// A record known only by its number text.
    pub fn bare(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            issued_on: None,
            customer: String::new(),
            grand_total: 0,
        }
    }
}

/// Persisted log of issued numbers.
pub trait HistoryStore: Send + Sync + Debug {
    /// Every record, in the order it was stored.
    fn records(&self) -> Result<Vec<HistoryRecord>, HistoryError>;

    /// Appends a record. Fails with [`HistoryError::Duplicate`] if the number text is
    /// already present; issued numbers are immutable.
    fn record(&self, record: HistoryRecord) -> Result<(), HistoryError>;

    /// The number text of every record.
    fn issued_numbers(&self) -> Result<Vec<String>, HistoryError> {
        Ok(self.records()?.into_iter().map(|r| r.number).collect())
    }

    /// Returns a human-readable name for this store (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A history that lives for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    records: RwLock<Vec<HistoryRecord>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with bare number strings, e.g. a snapshot from elsewhere.
    pub fn from_numbers<I, S>(numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = numbers.into_iter().map(HistoryRecord::bare).collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn records(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        self.records
            .read()
            .map(|r| r.clone())
            .map_err(|_| HistoryError::Poisoned)
    }

    fn record(&self, record: HistoryRecord) -> Result<(), HistoryError> {
        let mut records = self.records.write().map_err(|_| HistoryError::Poisoned)?;
        if records.iter().any(|r| r.number == record.number) {
            return Err(HistoryError::Duplicate(record.number));
        }
        records.push(record);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "InMemoryHistoryStore"
    }
}
