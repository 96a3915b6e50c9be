//! Sequential document number allocation.
//!
//! There is no counter store. The next run for a `PREFIX-YYYYMMDD` scope is always
//! recomputed from the highest run found in the history of issued numbers.
//!
//! ## Concurrency
//!
//! Allocation is a pure function of the snapshot it is given. Two allocations computed
//! from the same snapshot before either result is recorded return the same number;
//! callers issuing from several writers must serialize access to their history.

mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::NaiveDate;
use quotegrid_types::{DocumentNumber, DocumentNumberError, scope_key};
use thiserror::Error;

/// Error type for number allocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The history already holds the largest representable run for the scope.
    #[error("No run numbers left for {0}")]
    RunsExhausted(String),
}

/// Derives the next unused document number from previously issued numbers.
#[derive(Debug, Clone, Default)]
pub struct SequenceAllocator<C: Clock = SystemClock> {
    clock: C,
}

impl SequenceAllocator<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> SequenceAllocator<C> {
    /// Creates an allocator that reads "today" from the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the next number for `prefix_type` dated today.
    ///
    /// `issued_numbers` is the complete, unordered history. Entries that do not start
    /// with `PREFIX-YYYYMMDD` are ignored, and entries whose run cannot be parsed are
    /// skipped without error. Fails only when no larger run can be represented.
    pub fn next_document_number<I, S>(
        &self,
        prefix_type: &str,
        issued_numbers: I,
    ) -> Result<DocumentNumber, AllocationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.next_for_date(prefix_type, self.clock.today(), issued_numbers)
    }

    /// Same as [`next_document_number`](Self::next_document_number) for an explicit date.
    pub fn next_for_date<I, S>(
        &self,
        prefix_type: &str,
        date: NaiveDate,
        issued_numbers: I,
    ) -> Result<DocumentNumber, AllocationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scope = scope_key(prefix_type, date);
        let run = max_run(&scope, issued_numbers)?
            .checked_add(1)
            .ok_or(AllocationError::RunsExhausted(scope))?;
        let number = DocumentNumber::new(prefix_type, date, run);
        log::debug!("Allocated document number {}", number);
        Ok(number)
    }
}

/// Highest valid run among the numbers that start with `scope`; `0` when there is none.
///
/// Malformed entries are skipped. A run made of digits but too large to represent is
/// not: no larger run exists for that scope.
pub fn max_run<I, S>(scope: &str, issued_numbers: I) -> Result<u64, AllocationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut max = 0;
    for issued in issued_numbers {
        let text: &str = issued.as_ref();
        if !text.starts_with(scope) {
            continue;
        }
        match DocumentNumber::parse_run(text) {
            Ok(run) => max = max.max(run),
            Err(DocumentNumberError::RunOutOfRange { .. }) => {
                return Err(AllocationError::RunsExhausted(scope.to_string()));
            }
            Err(e) => log::debug!("Skipping malformed history entry: {}", e),
        }
    }
    Ok(max)
}
