//! Static fallback catalog
//!
//! Maps fragments of a query to known song page paths for songs the live search
//! endpoints tend to miss. Built once from configuration and never updated.

use serde::{Deserialize, Serialize};

/// A single `pattern -> path` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Lower-case text that must appear somewhere in the query.
    pub pattern: String,
    /// Site-relative path of the song page, e.g. `/Queen-bohemian-rhapsody-lyrics`.
    pub path: String,
}

impl CatalogEntry {
    pub fn new(pattern: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Regional entries are tried before international ones.
    pub fn from_groups(regional: &[CatalogEntry], international: &[CatalogEntry]) -> Self {
        Self::new(regional.iter().chain(international).cloned().collect())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries whose pattern is contained in the lower-cased query, in catalog order.
    pub fn matches<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(move |e| !e.pattern.is_empty() && query.contains(&e.pattern.to_lowercase()))
    }
}
