//! Lyrics lookup
//!
//! This module provides:
//! - Genius client that resolves free-text queries to song pages
//! - Song page parser with tiered lyrics extraction
//! - Static fallback catalog of known song pages

pub mod catalog;
pub mod error;
pub mod extract;
pub mod genius;

pub use catalog::{CatalogEntry, StaticCatalog};
pub use error::LyricsError;
pub use genius::GeniusClient;

use serde::Serialize;

/// Lyrics found for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricsResult {
    /// Page heading, may include site branding
    pub title: String,
    /// Plain text, at most one blank line in a row
    pub lyrics: String,
    /// Absolute URL of the source page
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(LyricsResult),
    Missing(LyricsError),
}
