//! Media type resolution from a `mime.types` style table.
//!
//! Each line of the table names a media type followed by the extensions that
//! map to it:
//!
//! ```text
//! # media type       extensions
//! text/html          html htm
//! image/jpeg         jpeg jpg jpe
//! ```
//!
//! A line is a comment only when its first whitespace-delimited token is
//! exactly `#`. When an extension is listed more than once the first mapping
//! wins.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Type returned when a file has no extension or an unregistered one.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Type returned for names ending in `/`.
pub const DIRECTORY_MEDIA_TYPE: &str = "text/directory";

/// Immutable extension to media type table.
#[derive(Debug, Clone, Default)]
pub struct MimeTable {
    types: HashMap<String, String>,
    entries: usize,
}

impl MimeTable {
    /// Parses table text. Every extension listed counts as one entry, even
    /// when an earlier line already registered it.
    pub fn parse(text: &str) -> Self {
        let mut table = MimeTable::default();

        for line in text.lines() {
            let mut tokens = line.split_whitespace();
            let Some(media_type) = tokens.next() else {
                continue;
            };
            if media_type == "#" {
                continue;
            }
            for ext in tokens {
                table
                    .types
                    .entry(ext.to_ascii_lowercase())
                    .or_insert_with(|| media_type.to_string());
                table.entries += 1;
            }
        }

        table
    }

    /// Reads and parses the table at `path`. A missing file surfaces as an
    /// `io::ErrorKind::NotFound` error.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Number of extension entries registered while parsing.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Media type for `filename`, judged by the extension of its last path
    /// component.
    pub fn resolve(&self, filename: &str) -> &str {
        if filename.ends_with('/') {
            return DIRECTORY_MEDIA_TYPE;
        }

        let name = filename.rsplit('/').next().unwrap_or(filename);
        let Some((_, ext)) = name.rsplit_once('.') else {
            return DEFAULT_MEDIA_TYPE;
        };

        self.types
            .get(&ext.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or(DEFAULT_MEDIA_TYPE)
    }
}

/// Shared handle to the current [`MimeTable`].
///
/// Readers take a snapshot with [`MimeRegistry::current`]; a reload builds a
/// new table and swaps it in whole, so in-flight requests keep the snapshot
/// they started with.
#[derive(Debug, Clone)]
pub struct MimeRegistry {
    table: Arc<ArcSwap<MimeTable>>,
}

impl Default for MimeRegistry {
    fn default() -> Self {
        Self::new(MimeTable::default())
    }
}

impl MimeRegistry {
    pub fn new(table: MimeTable) -> Self {
        Self {
            table: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    pub fn current(&self) -> Arc<MimeTable> {
        self.table.load_full()
    }

    /// Replaces the table with one read from `path` and returns its entry
    /// count. On error the previous table stays in place.
    pub fn reload(&self, path: impl AsRef<Path>) -> io::Result<usize> {
        let table = MimeTable::load(path)?;
        let count = table.len();
        self.table.store(Arc::new(table));
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_needs_hash_as_first_token() {
        let table = MimeTable::parse("# text/plain txt\n#text/css css\n");
        assert_eq!(table.resolve("a.txt"), DEFAULT_MEDIA_TYPE);
        // "#text/css" is a media type token, not a comment
        assert_eq!(table.resolve("a.css"), "#text/css");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn first_mapping_wins() {
        let table = MimeTable::parse("text/plain txt\napplication/x-text txt\n");
        assert_eq!(table.resolve("notes.txt"), "text/plain");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn extension_taken_from_last_component() {
        let table = MimeTable::parse("text/plain txt\n");
        assert_eq!(table.resolve("/srv/v1.txt/README"), DEFAULT_MEDIA_TYPE);
        assert_eq!(table.resolve("/srv/docs/README.TXT"), "text/plain");
    }
}
