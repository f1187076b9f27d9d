// src/rows/definitions.rs
//! Core data model for the working set: one row per product.

/// Canonical column order used everywhere: spreadsheet table, CSV files,
/// autosave snapshots.
pub const CANONICAL_COLUMNS: [&str; 3] = ["name", "description", "ad"];

/// A single row of the working set. Identity is positional: the row's index
/// within `RowSheet::rows` is what generation results are keyed by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdRow {
    pub name: String,
    pub description: String,
    /// Empty until generation succeeds, or carries an `Error: ...` marker.
    pub ad: String,
}

impl AdRow {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ad: String::new(),
        }
    }

    pub fn has_ad(&self) -> bool {
        !self.ad.trim().is_empty()
    }
}

/// Which field of a row a cell edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Name,
    Description,
    Ad,
}

/// A row eligible for generation, detached from the live working set so the
/// background worker never holds a reference into UI-owned storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRow {
    pub row_index: usize,
    pub name: String,
    pub description: String,
}

/// True iff both name and description are non-empty after trimming.
/// Rows failing this are silently excluded from generation, not errors.
pub fn row_is_complete(name: &str, description: &str) -> bool {
    !name.trim().is_empty() && !description.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_row_passes() {
        assert!(row_is_complete("Widget", "Shiny widget"));
    }

    #[test]
    fn empty_fields_fail() {
        assert!(!row_is_complete("", "Shiny widget"));
        assert!(!row_is_complete("Widget", ""));
        assert!(!row_is_complete("", ""));
    }

    #[test]
    fn whitespace_only_fields_fail() {
        assert!(!row_is_complete("   ", "desc"));
        assert!(!row_is_complete("name", "\t\n"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(row_is_complete("  Widget  ", "\tShiny widget\n"));
    }

    #[test]
    fn georgian_content_passes() {
        assert!(row_is_complete("ხინკალი", "გემრიელი ხინკალი"));
    }

    #[test]
    fn has_ad_ignores_whitespace() {
        let mut row = AdRow::new("a", "b");
        assert!(!row.has_ad());
        row.ad = "  ".to_string();
        assert!(!row.has_ad());
        row.ad = "იყიდე ახლავე!".to_string();
        assert!(row.has_ad());
    }
}
