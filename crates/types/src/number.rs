//! Structured document numbers.
//!
//! A number is stored as `{prefix, date, run}` and only becomes the delimited text
//! `PREFIX-YYYYMMDD-RUN` at the boundary (rendering, history files).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between prefix, date and run.
pub const RUN_SEPARATOR: char = '-';

/// Error type for parsing the text form of a document number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentNumberError {
    #[error("Document number '{0}' needs at least three '-' separated components")]
    MissingComponents(String),

    #[error("Run component '{run}' of '{text}' is not a positive integer")]
    InvalidRun { text: String, run: String },

    #[error("Run component '{run}' of '{text}' is too large to represent")]
    RunOutOfRange { text: String, run: String },

    #[error("Date component '{date}' of '{text}' is not a valid YYYYMMDD date")]
    InvalidDate { text: String, date: String },
}

/// A sequential document identifier scoped to a prefix and an issue date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentNumber {
    prefix: String,
    date: NaiveDate,
    run: u64,
}

impl DocumentNumber {
    pub fn new(prefix: impl Into<String>, date: NaiveDate, run: u64) -> Self {
        Self {
            prefix: prefix.into(),
            date,
            run,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    /// Extracts the run number from the text form of a previously issued number.
    ///
    /// Only the shape is checked: at least three components, the last being an
    /// integer. The prefix and date components are not validated here. A run made of
    /// digits that does not fit in a `u64` is `RunOutOfRange`, not `InvalidRun`.
    pub fn parse_run(text: &str) -> Result<u64, DocumentNumberError> {
        let components: Vec<&str> = text.split(RUN_SEPARATOR).collect();
        if components.len() < 3 {
            return Err(DocumentNumberError::MissingComponents(text.to_string()));
        }
        let run = components[components.len() - 1];
        let digits = run.trim();
        digits.parse::<u64>().map_err(|_| {
            let (text, run) = (text.to_string(), run.to_string());
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                DocumentNumberError::RunOutOfRange { text, run }
            } else {
                DocumentNumberError::InvalidRun { text, run }
            }
        })
    }
}

/// Builds the `PREFIX-YYYYMMDD` scope for a prefix and date.
pub fn scope_key(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}{}{:04}{:02}{:02}",
        prefix,
        RUN_SEPARATOR,
        date.year(),
        date.month(),
        date.day()
    )
}

fn parse_compact_date(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = digits[0..4].parse().ok()?;
    let month = digits[4..6].parse().ok()?;
    let day = digits[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{:03}",
            scope_key(&self.prefix, self.date),
            RUN_SEPARATOR,
            self.run
        )
    }
}

impl FromStr for DocumentNumber {
    type Err = DocumentNumberError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.rsplitn(3, RUN_SEPARATOR);
        let (run, date, prefix) = match (parts.next(), parts.next(), parts.next()) {
            (Some(run), Some(date), Some(prefix)) if !prefix.is_empty() => (run, date, prefix),
            _ => return Err(DocumentNumberError::MissingComponents(text.to_string())),
        };

        let date = parse_compact_date(date).ok_or_else(|| DocumentNumberError::InvalidDate {
            text: text.to_string(),
            date: date.to_string(),
        })?;
        let run = Self::parse_run(text)?;
        Ok(Self::new(prefix, date, run))
    }
}

impl Serialize for DocumentNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
