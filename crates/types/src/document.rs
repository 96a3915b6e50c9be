use serde::{Deserialize, Serialize};
use std::fmt;

/// The party a quotation is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    /// Free-form postal address; line breaks are preserved when rendered.
    #[serde(default)]
    pub address: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Non-blank address lines, trimmed.
    pub fn address_lines(&self) -> impl Iterator<Item = &str> {
        self.address
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// The document kinds issued by default, each with its own numbering prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "QT")]
    Quotation,
    #[serde(rename = "IV")]
    Invoice,
    #[serde(rename = "RE")]
    Receipt,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Quotation,
        DocumentKind::Invoice,
        DocumentKind::Receipt,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "QT",
            DocumentKind::Invoice => "IV",
            DocumentKind::Receipt => "RE",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "QUOTATION",
            DocumentKind::Invoice => "INVOICE",
            DocumentKind::Receipt => "RECEIPT",
        }
    }

    /// Looks up the kind for a numbering prefix. Case-sensitive, like the prefix match
    /// used during allocation.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}
