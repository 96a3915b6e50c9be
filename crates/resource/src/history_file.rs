//! Issued-number history kept as a flat comma-separated text file.
//!
//! ```text
//! doc_no,date,customer,grand_total
//! QT-20240101-001,2024-01-01,"ACME, Inc.",1070
//! ```
//!
//! The file is read once, on first use, and cached for the lifetime of the store.
//! Records are appended to both the cache and the file.

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use quotegrid_traits::{HistoryError, HistoryRecord, HistoryStore};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const HEADER: &str = "doc_no,date,customer,grand_total";

#[derive(Debug)]
pub struct FileHistoryStore {
    path: PathBuf,
    cache: OnceCell<RwLock<Vec<HistoryRecord>>>,
}

impl FileHistoryStore {
    /// Creates a store over `path`. Nothing is read until the history is first needed;
    /// a missing file is treated as an empty history.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn loaded(&self) -> Result<&RwLock<Vec<HistoryRecord>>, HistoryError> {
        self.cache.get_or_try_init(|| {
            let records = read_records(&self.path)?;
            log::info!(
                "Loaded {} history records from {}",
                records.len(),
                self.path.display()
            );
            Ok(RwLock::new(records))
        })
    }

    fn append_line(&self, record: &HistoryRecord) -> Result<(), HistoryError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            writeln!(file, "{}", HEADER)?;
        } else if !ends_with_newline(&mut file)? {
            // Hand-edited file without a final newline.
            writeln!(file)?;
        }
        writeln!(file, "{}", format_line(record))?;
        Ok(())
    }
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl HistoryStore for FileHistoryStore {
    fn records(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        self.loaded()?
            .read()
            .map(|r| r.clone())
            .map_err(|_| HistoryError::Poisoned)
    }

    fn record(&self, record: HistoryRecord) -> Result<(), HistoryError> {
        let mut records = self.loaded()?.write().map_err(|_| HistoryError::Poisoned)?;
        if records.iter().any(|r| r.number == record.number) {
            return Err(HistoryError::Duplicate(record.number));
        }
        self.append_line(&record)?;
        records.push(record);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "FileHistoryStore"
    }
}

fn read_records(path: &Path) -> Result<Vec<HistoryRecord>, HistoryError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_fields)
        .filter(|fields| fields.first().map(String::as_str) != Some("doc_no"))
        .map(|fields| parse_record(&fields))
        .collect())
}

/// Lenient: only the number column matters to allocation, so the other columns
/// default when absent or unparseable.
fn parse_record(fields: &[String]) -> HistoryRecord {
    let field = |i: usize| fields.get(i).map(|f| f.trim()).unwrap_or("");
    HistoryRecord {
        number: field(0).to_string(),
        issued_on: field(1).parse::<NaiveDate>().ok(),
        customer: field(2).to_string(),
        grand_total: field(3).parse().unwrap_or(0),
    }
}

/// Splits one line on commas, honouring double-quoted fields with `""` escapes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"").replace(['\n', '\r'], " "))
    } else {
        field.to_string()
    }
}

fn format_line(record: &HistoryRecord) -> String {
    let date = record.issued_on.map(|d| d.to_string()).unwrap_or_default();
    format!(
        "{},{},{},{}",
        quote_field(&record.number),
        date,
        quote_field(&record.customer),
        record.grand_total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotegrid_types::{DocumentNumber, DocumentTotals};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempdir().unwrap();
        let store = FileHistoryStore::new(dir.path().join("history.csv"));
        assert!(store.issued_numbers().unwrap().is_empty());
    }

    #[test]
    fn test_reads_quoted_fields_and_skips_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(
            &path,
            "doc_no,date,customer,grand_total\n\
             QT-20240101-001,2024-01-01,\"ACME, Inc.\",1070\n\
             \n\
             QT-20240101-abc,,Someone,\n",
        )
        .unwrap();

        let store = FileHistoryStore::new(&path);
        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].customer, "ACME, Inc.");
        assert_eq!(records[0].grand_total, 1070);
        assert_eq!(records[1].number, "QT-20240101-abc");
        assert_eq!(records[1].issued_on, None);
    }

    #[test]
    fn test_record_appends_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let store = FileHistoryStore::new(&path);

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let number = DocumentNumber::new("QT", date, 1);
        let totals = DocumentTotals::from_parts(100, 7);
        store
            .record(HistoryRecord::issued(&number, "Say \"hi\", Ltd", &totals))
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(HEADER));
        assert!(text.contains("QT-20240101-001,2024-01-01,\"Say \"\"hi\"\", Ltd\",107"));

        let reopened = FileHistoryStore::new(&path);
        assert_eq!(reopened.records().unwrap()[0].customer, "Say \"hi\", Ltd");
    }

    #[test]
    fn test_file_is_read_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path, "QT-20240101-001\n").unwrap();

        let store = FileHistoryStore::new(&path);
        assert_eq!(store.issued_numbers().unwrap().len(), 1);

        // Changes made behind the store's back are not picked up.
        fs::write(&path, "QT-20240101-001\nQT-20240101-002\n").unwrap();
        assert_eq!(store.issued_numbers().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_is_rejected_without_touching_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path, "QT-20240101-001\n").unwrap();

        let store = FileHistoryStore::new(&path);
        let err = store.record(HistoryRecord::bare("QT-20240101-001")).unwrap_err();
        assert!(matches!(err, HistoryError::Duplicate(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "QT-20240101-001\n");
    }

    #[test]
    fn test_record_after_missing_final_newline_survives_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(
            &path,
            "doc_no,date,customer,grand_total\nQT-20240101-009,2024-01-01,ACME,100",
        )
        .unwrap();

        let store = FileHistoryStore::new(&path);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let number = DocumentNumber::new("IV", date, 1);
        store
            .record(HistoryRecord::issued(&number, "B", &DocumentTotals::from_parts(1, 0)))
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("ACME,100\nIV-20240101-001,2024-01-01,B,1\n"));

        let reopened = FileHistoryStore::new(&path);
        assert_eq!(
            reopened.issued_numbers().unwrap(),
            vec!["QT-20240101-009".to_string(), "IV-20240101-001".to_string()]
        );
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a,b,,d"), vec!["a", "b", "", "d"]);
        assert_eq!(split_fields("\"x,y\",z"), vec!["x,y", "z"]);
    }
}
